use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: StorageInfo,
}

#[derive(Serialize)]
pub struct StorageInfo {
    pub backend: &'static str,
    pub records: usize,
}

/// Reports the active backend and how many games it holds. Fails with 503
/// when the store cannot be read.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let records = state.games.count().await?;
    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        storage: StorageInfo {
            backend: state.games.backend_name(),
            records,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy",
            version: "0.1.0",
            storage: StorageInfo {
                backend: "memory",
                records: 3,
            },
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"healthy\""));
        assert!(json.contains("\"backend\":\"memory\""));
        assert!(json.contains("\"records\":3"));
    }

    #[tokio::test]
    async fn health_counts_records() {
        let state = AppState::new(ServerConfig::default()).unwrap();
        state
            .games
            .insert(gamelist_core::test_helpers::sample_game("a"))
            .await
            .unwrap();
        let json = health_check(State(state)).await.unwrap();
        assert_eq!(json.storage.records, 1);
        assert_eq!(json.storage.backend, "memory");
    }
}
