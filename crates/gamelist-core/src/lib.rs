pub mod game;
pub mod identity;
pub mod object_id;
pub mod store;
pub mod validate;

pub use game::{Game, GameId, StoredGame};
pub use store::{GameStore, StoreError};
pub use validate::{ValidationError, validate_game};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use serde_json::{Value, json};

    use crate::game::Game;

    /// A request body that passes validation.
    pub fn valid_payload(name: &str) -> Value {
        json!({
            "name": name,
            "year": 2020,
            "studio": "Test Studio",
            "genre": "Platformer",
            "image": "https://example.com/cover.png"
        })
    }

    /// The typed game `valid_payload(name)` validates to.
    pub fn sample_game(name: &str) -> Game {
        Game {
            name: name.to_string(),
            year: 2020,
            studio: "Test Studio".to_string(),
            genre: "Platformer".to_string(),
            image: "https://example.com/cover.png".to_string(),
        }
    }

    /// Copy of `valid_payload(name)` with `key` removed.
    pub fn payload_without(name: &str, key: &str) -> Value {
        let mut payload = valid_payload(name);
        if let Some(map) = payload.as_object_mut() {
            map.remove(key);
        }
        payload
    }
}
