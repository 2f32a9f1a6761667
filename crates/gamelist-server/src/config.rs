use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

/// Config file read from the working directory at startup.
pub const CONFIG_FILE: &str = "gamelist.toml";

/// Top-level server configuration, loaded from `gamelist.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

/// Which backend holds the game collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory, sequential integer ids. Lost on restart.
    #[default]
    Memory,
    /// redb file on disk, 24-hex object ids.
    Document,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "document" => Ok(Self::Document),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file for the document backend.
    pub data_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_path: "data/games.redb".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidListenAddr(String),
    UnknownBackend(String),
    EmptyDataPath,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidListenAddr(addr) => {
                write!(f, "listen_addr {addr:?} is not a valid socket address")
            },
            Self::UnknownBackend(name) => {
                write!(f, "unknown storage backend {name:?} (expected memory or document)")
            },
            Self::EmptyDataPath => write!(f, "storage.data_path must be set for the document backend"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidListenAddr(self.listen_addr.clone()));
        }
        if self.storage.backend == StorageBackend::Document && self.storage.data_path.is_empty() {
            return Err(ConfigError::EmptyDataPath);
        }
        Ok(())
    }

    /// Load config from `gamelist.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = Self::load_file(Path::new(CONFIG_FILE));
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Parse `path`, falling back to defaults when it is missing or invalid.
    pub fn load_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {} found, using defaults", path.display());
                ServerConfig::default()
            },
        }
    }

    /// Apply `GAMELIST_*` overrides. `lookup` resolves a variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("GAMELIST_LISTEN_ADDR")
            && !addr.is_empty()
        {
            self.listen_addr = addr;
        }
        if let Some(backend) = lookup("GAMELIST_STORAGE")
            && !backend.is_empty()
        {
            match backend.parse() {
                Ok(b) => self.storage.backend = b,
                Err(e) => tracing::warn!("Ignoring GAMELIST_STORAGE: {e}"),
            }
        }
        if let Some(path) = lookup("GAMELIST_DATA_PATH")
            && !path.is_empty()
        {
            self.storage.data_path = path;
        }
    }
}
