use std::net::SocketAddr;
use std::time::Duration;

use gamelist_server::config::{ServerConfig, StorageBackend, StorageConfig};
use gamelist_server::state::SharedGameStore;
use gamelist_server::{build_app, build_app_with_store};

pub struct TestServer {
    pub addr: SocketAddr,
    _data_dir: Option<tempfile::TempDir>,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server backed by process memory.
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default(), None).await
    }

    /// Start a test server backed by a document store in a temp directory.
    pub async fn with_document_store() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            storage: StorageConfig {
                backend: StorageBackend::Document,
                data_path: dir.path().join("games.redb").display().to_string(),
            },
            ..ServerConfig::default()
        };
        Self::from_config(config, Some(dir)).await
    }

    /// Start a test server around an already populated store.
    pub async fn with_store(games: SharedGameStore) -> Self {
        let (app, _state) = build_app_with_store(ServerConfig::default(), games);
        Self::serve(app, None).await
    }

    async fn from_config(config: ServerConfig, data_dir: Option<tempfile::TempDir>) -> Self {
        let (app, _state) = build_app(config).unwrap();
        Self::serve(app, data_dir).await
    }

    async fn serve(app: axum::Router, data_dir: Option<tempfile::TempDir>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _data_dir: data_dir,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn games_url(&self) -> String {
        format!("{}/games", self.base_url())
    }

    pub fn game_url(&self, id: &str) -> String {
        format!("{}/games/{id}", self.base_url())
    }
}

/// POST a payload and return the created record's id as path text.
pub async fn create_game(server: &TestServer, payload: &serde_json::Value) -> String {
    let resp = reqwest::Client::new()
        .post(server.games_url())
        .json(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    match &body["newGame"]["id"] {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => panic!("Unexpected id: {other}"),
    }
}
