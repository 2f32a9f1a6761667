use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;

/// A game that has passed validation and may be written to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub name: String,
    pub year: i64,
    pub studio: String,
    pub genre: String,
    pub image: String,
}

/// Identifier of a stored game.
///
/// In-memory stores hand out sequential integers; the document store uses
/// 24-hex-character object ids. On the wire this is a bare number or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameId {
    Seq(u64),
    Object(ObjectId),
}

impl GameId {
    /// The sequence number, if this is an in-memory id.
    pub fn as_seq(&self) -> Option<u64> {
        match self {
            Self::Seq(n) => Some(*n),
            Self::Object(_) => None,
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seq(n) => write!(f, "{n}"),
            Self::Object(oid) => write!(f, "{oid}"),
        }
    }
}

/// A game together with the identifier its store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: GameId,
    #[serde(flatten)]
    pub game: Game,
}

impl StoredGame {
    pub fn new(id: GameId, game: Game) -> Self {
        Self { id, game }
    }
}
