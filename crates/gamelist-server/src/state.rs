use std::sync::Arc;

use gamelist_core::GameStore;
use gamelist_core::store::{DocumentGameStore, MemoryGameStore, StoreError};

use crate::config::{ServerConfig, StorageBackend, StorageConfig};

pub type SharedGameStore = Arc<dyn GameStore>;

#[derive(Clone)]
pub struct AppState {
    pub games: SharedGameStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state, opening the backend named in `config.storage`.
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let games = open_store(&config.storage)?;
        Ok(Self::with_store(config, games))
    }

    pub fn with_store(config: ServerConfig, games: SharedGameStore) -> Self {
        Self {
            games,
            config: Arc::new(config),
        }
    }
}

pub fn open_store(storage: &StorageConfig) -> Result<SharedGameStore, StoreError> {
    match storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryGameStore::new())),
        StorageBackend::Document => Ok(Arc::new(DocumentGameStore::open(&storage.data_path)?)),
    }
}
