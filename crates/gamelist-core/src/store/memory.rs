use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{GameStore, StoreError};
use crate::game::{Game, GameId, StoredGame};
use crate::identity;

/// Ordered, dense collection of games with sequential ids.
///
/// Records stay in insertion order. Deleting compacts the vector without
/// reordering, so lookups never see holes.
#[derive(Debug, Default)]
pub struct GameCollection {
    records: Vec<StoredGame>,
}

impl GameCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[StoredGame] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&StoredGame> {
        identity::find_by_id(&self.records, id)
    }

    /// Append a game under the next sequential id.
    pub fn insert(&mut self, game: Game) -> StoredGame {
        let id = identity::next_id(&self.records);
        let stored = StoredGame::new(GameId::Seq(id), game);
        self.records.push(stored.clone());
        stored
    }

    /// Overwrite the game under `id` in place. Returns `None` if absent.
    pub fn replace(&mut self, id: u64, game: Game) -> Option<StoredGame> {
        let index = identity::find_index_by_id(&self.records, id)?;
        let slot = &mut self.records[index];
        slot.game = game;
        Some(slot.clone())
    }

    /// Remove and return the game under `id`.
    pub fn remove(&mut self, id: u64) -> Option<StoredGame> {
        let index = identity::find_index_by_id(&self.records, id)?;
        Some(self.records.remove(index))
    }
}

/// [`GameStore`] over a process-lifetime [`GameCollection`].
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    collection: RwLock<GameCollection>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_collection(collection: GameCollection) -> Self {
        Self {
            collection: RwLock::new(collection),
        }
    }
}

/// Sequential ids are written as plain decimal digits with no sign and no
/// leading zeros. Any other text, `+1` and `01` included, cannot name a record.
fn parse_seq_id(id: &str) -> Result<u64, StoreError> {
    let canonical = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && (id == "0" || !id.starts_with('0'));
    canonical
        .then(|| id.parse().ok())
        .flatten()
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn list_all(&self) -> Result<Vec<StoredGame>, StoreError> {
        Ok(self.collection.read().await.records().to_vec())
    }

    async fn get_by_id(&self, id: &str) -> Result<StoredGame, StoreError> {
        let seq = parse_seq_id(id)?;
        self.collection
            .read()
            .await
            .get(seq)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&self, game: Game) -> Result<StoredGame, StoreError> {
        Ok(self.collection.write().await.insert(game))
    }

    async fn replace(&self, id: &str, game: Game) -> Result<StoredGame, StoreError> {
        let seq = parse_seq_id(id)?;
        self.collection
            .write()
            .await
            .replace(seq, game)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let seq = parse_seq_id(id)?;
        self.collection
            .write()
            .await
            .remove(seq)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.collection.read().await.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
