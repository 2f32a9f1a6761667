//! Persistence capability for game records.
//!
//! Handlers talk to storage only through [`GameStore`]. Identifiers arrive
//! as the raw text from the request path; each backend decides what a
//! well-formed id looks like.

pub mod document;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::game::{Game, StoredGame};

pub use document::DocumentGameStore;
pub use memory::{GameCollection, MemoryGameStore};

/// Failures surfaced by a [`GameStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record carries the given id.
    #[error("game not found: {0}")]
    NotFound(String),

    /// The id is not in the backend's identifier format. Reported before any
    /// storage access.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// The backing storage failed (I/O, transaction, corrupt document).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// All records in storage order.
    async fn list_all(&self) -> Result<Vec<StoredGame>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<StoredGame, StoreError>;

    /// Store a new record and return it with its assigned id.
    async fn insert(&self, game: Game) -> Result<StoredGame, StoreError>;

    /// Overwrite the whole record under `id`, keeping the id.
    async fn replace(&self, id: &str, game: Game) -> Result<StoredGame, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}
