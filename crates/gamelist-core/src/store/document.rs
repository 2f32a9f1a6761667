//! Persistent document store backed by a single redb file.
//!
//! Each game is a JSON document keyed by the 12 raw bytes of its
//! [`ObjectId`]. Generated ids start with a big-endian timestamp, so key
//! order follows creation time to the second. Within one second, ids from a
//! single process follow its counter; ids from different processes (a
//! restart included) are ordered by their random process bytes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};

use super::{GameStore, StoreError};
use crate::game::{Game, GameId, StoredGame};
use crate::object_id::ObjectId;

const GAMES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("games");

pub struct DocumentGameStore {
    db: Arc<Database>,
    path: PathBuf,
}

fn unavailable<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> StoreError {
    move |e| StoreError::StoreUnavailable(format!("{context}: {e}"))
}

/// Object ids must be 24 hex characters. Checked before any storage access.
fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    id.parse()
        .map_err(|_| StoreError::MalformedIdentifier(id.to_string()))
}

fn encode(game: &Game) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(game).map_err(unavailable("encode document"))
}

fn decode(key: &[u8], value: &[u8]) -> Result<StoredGame, StoreError> {
    let bytes: [u8; 12] = key
        .try_into()
        .map_err(|_| StoreError::StoreUnavailable(format!("corrupt key of {} bytes", key.len())))?;
    let game: Game = serde_json::from_slice(value).map_err(unavailable("decode document"))?;
    Ok(StoredGame::new(GameId::Object(ObjectId::from_bytes(bytes)), game))
}

impl DocumentGameStore {
    /// Open or create the database file at `path`, creating parent
    /// directories and the games table as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(unavailable("create data directory"))?;
        }

        let db = Database::create(&path).map_err(|e| {
            StoreError::StoreUnavailable(format!("failed to open {}: {e}", path.display()))
        })?;

        let txn = db.begin_write().map_err(unavailable("write txn"))?;
        txn.open_table(GAMES).map_err(unavailable("open table"))?;
        txn.commit().map_err(unavailable("commit"))?;

        tracing::debug!(path = %path.display(), "Opened document store");

        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a blocking database closure off the async runtime.
    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(unavailable("task join"))?
    }
}

impl std::fmt::Debug for DocumentGameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentGameStore")
            .field("path", &self.path)
            .finish()
    }
}

#[async_trait]
impl GameStore for DocumentGameStore {
    async fn list_all(&self) -> Result<Vec<StoredGame>, StoreError> {
        self.run(|db| {
            let txn = db.begin_read().map_err(unavailable("read txn"))?;
            let table = txn.open_table(GAMES).map_err(unavailable("open table"))?;
            let mut games = Vec::new();
            for entry in table.iter().map_err(unavailable("scan"))? {
                let (key, value) = entry.map_err(unavailable("scan entry"))?;
                games.push(decode(key.value(), value.value())?);
            }
            Ok(games)
        })
        .await
    }

    async fn get_by_id(&self, id: &str) -> Result<StoredGame, StoreError> {
        let oid = parse_object_id(id)?;
        let missing = id.to_string();
        self.run(move |db| {
            let txn = db.begin_read().map_err(unavailable("read txn"))?;
            let table = txn.open_table(GAMES).map_err(unavailable("open table"))?;
            let found = match table.get(oid.bytes().as_slice()).map_err(unavailable("get"))? {
                Some(value) => decode(oid.bytes(), value.value()),
                None => Err(StoreError::NotFound(missing)),
            };
            found
        })
        .await
    }

    async fn insert(&self, game: Game) -> Result<StoredGame, StoreError> {
        let document = encode(&game)?;
        let oid = ObjectId::generate();
        self.run(move |db| {
            let txn = db.begin_write().map_err(unavailable("write txn"))?;
            {
                let mut table = txn.open_table(GAMES).map_err(unavailable("open table"))?;
                table
                    .insert(oid.bytes().as_slice(), document.as_slice())
                    .map_err(unavailable("insert"))?;
            }
            txn.commit().map_err(unavailable("commit"))?;
            Ok(())
        })
        .await?;
        Ok(StoredGame::new(GameId::Object(oid), game))
    }

    async fn replace(&self, id: &str, game: Game) -> Result<StoredGame, StoreError> {
        let oid = parse_object_id(id)?;
        let document = encode(&game)?;
        let missing = id.to_string();
        self.run(move |db| {
            let txn = db.begin_write().map_err(unavailable("write txn"))?;
            {
                let mut table = txn.open_table(GAMES).map_err(unavailable("open table"))?;
                let exists = table
                    .get(oid.bytes().as_slice())
                    .map_err(unavailable("get"))?
                    .is_some();
                if !exists {
                    return Err(StoreError::NotFound(missing));
                }
                table
                    .insert(oid.bytes().as_slice(), document.as_slice())
                    .map_err(unavailable("insert"))?;
            }
            txn.commit().map_err(unavailable("commit"))?;
            Ok(())
        })
        .await?;
        Ok(StoredGame::new(GameId::Object(oid), game))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let oid = parse_object_id(id)?;
        let missing = id.to_string();
        self.run(move |db| {
            let txn = db.begin_write().map_err(unavailable("write txn"))?;
            let existed = {
                let mut table = txn.open_table(GAMES).map_err(unavailable("open table"))?;
                table
                    .remove(oid.bytes().as_slice())
                    .map_err(unavailable("remove"))?
                    .is_some()
            };
            if !existed {
                return Err(StoreError::NotFound(missing));
            }
            txn.commit().map_err(unavailable("commit"))?;
            Ok(())
        })
        .await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.run(|db| {
            let txn = db.begin_read().map_err(unavailable("read txn"))?;
            let table = txn.open_table(GAMES).map_err(unavailable("open table"))?;
            let len = table.len().map_err(unavailable("count"))?;
            Ok(len as usize)
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "document"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(name: &str) -> Game {
        Game {
            name: name.to_string(),
            year: 2011,
            studio: "Mojang".to_string(),
            genre: "Sandbox".to_string(),
            image: "https://example.com/cover.jpg".to_string(),
        }
    }

    fn open_temp() -> (tempfile::TempDir, DocumentGameStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentGameStore::open(dir.path().join("games.redb")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn round_trip() {
        let (_dir, store) = open_temp();
        let created = store.insert(game("Minecraft")).await.unwrap();
        let id = created.id.to_string();
        assert!(ObjectId::is_valid(&id));

        let fetched = store.get_by_id(&id).await.unwrap();
        assert_eq!(fetched, created);

        let replaced = store.replace(&id, game("Minecraft Legends")).await.unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(
            store.get_by_id(&id).await.unwrap().game.name,
            "Minecraft Legends"
        );

        store.delete_by_id(&id).await.unwrap();
        assert_eq!(
            store.get_by_id(&id).await.unwrap_err(),
            StoreError::NotFound(id.clone())
        );
        assert_eq!(
            store.delete_by_id(&id).await.unwrap_err(),
            StoreError::NotFound(id)
        );
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected() {
        let (_dir, store) = open_temp();
        for id in ["1", "abc", "65a1f0c2e4b0a1b2c3d4e5fz"] {
            let malformed = StoreError::MalformedIdentifier(id.to_string());
            assert_eq!(store.get_by_id(id).await.unwrap_err(), malformed);
            assert_eq!(store.replace(id, game("x")).await.unwrap_err(), malformed);
            assert_eq!(store.delete_by_id(id).await.unwrap_err(), malformed);
        }
    }

    #[tokio::test]
    async fn well_formed_missing_id_is_not_found() {
        let (_dir, store) = open_temp();
        let id = "65a1f0c2e4b0a1b2c3d4e5f6";
        assert!(matches!(
            store.replace(id, game("x")).await,
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_returns_creation_order() {
        let (_dir, store) = open_temp();
        for name in ["one", "two", "three"] {
            store.insert(game(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.game.name)
            .collect();
        assert_eq!(names, ["one", "two", "three"]);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("games.redb");
        let id = {
            let store = DocumentGameStore::open(&path).unwrap();
            store.insert(game("Terraria")).await.unwrap().id.to_string()
        };
        let store = DocumentGameStore::open(&path).unwrap();
        assert_eq!(store.get_by_id(&id).await.unwrap().game.name, "Terraria");
        assert_eq!(store.path(), path.as_path());
    }
}
