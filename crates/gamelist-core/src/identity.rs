//! Sequential id assignment and lookup for the in-memory collection.
//!
//! Ids follow a monotonic-append policy: the next id is one past the id of
//! the last record in insertion order, not one past the largest id. This
//! only yields unique ids while the collection keeps insertion order, so
//! callers must append new records at the end and never reorder.

use crate::game::StoredGame;

/// Id for the next record appended to `records`.
pub fn next_id(records: &[StoredGame]) -> u64 {
    records
        .last()
        .and_then(|last| last.id.as_seq())
        .map_or(1, |id| id + 1)
}

pub fn find_by_id(records: &[StoredGame], id: u64) -> Option<&StoredGame> {
    records.iter().find(|r| r.id.as_seq() == Some(id))
}

/// Position of the record with `id`, if present.
pub fn find_index_by_id(records: &[StoredGame], id: u64) -> Option<usize> {
    records.iter().position(|r| r.id.as_seq() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, GameId};

    fn record(id: u64) -> StoredGame {
        StoredGame::new(
            GameId::Seq(id),
            Game {
                name: format!("Game {id}"),
                year: 2000,
                studio: "Studio".to_string(),
                genre: "Genre".to_string(),
                image: "https://example.com/cover.png".to_string(),
            },
        )
    }

    #[test]
    fn empty_collection_starts_at_one() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn next_id_follows_last_record_not_max() {
        assert_eq!(next_id(&[record(1), record(3)]), 4);
        assert_eq!(next_id(&[record(5), record(2)]), 3);
    }

    #[test]
    fn lookups_by_id() {
        let records = vec![record(1), record(3), record(4)];
        assert_eq!(find_by_id(&records, 3).unwrap().game.name, "Game 3");
        assert!(find_by_id(&records, 2).is_none());
        assert_eq!(find_index_by_id(&records, 4), Some(2));
        assert_eq!(find_index_by_id(&records, 99), None);
    }
}
