pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod state;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use gamelist_core::StoreError;

use config::ServerConfig;
use state::{AppState, SharedGameStore};

/// Build the Axum router and application state from a config, opening the
/// configured storage backend.
pub fn build_app(config: ServerConfig) -> Result<(Router<()>, AppState), StoreError> {
    let state = AppState::new(config)?;
    Ok((router(state.clone()), state))
}

/// Build the router around an already opened store.
pub fn build_app_with_store(config: ServerConfig, games: SharedGameStore) -> (Router<()>, AppState) {
    let state = AppState::with_store(config, games);
    (router(state.clone()), state)
}

fn router(state: AppState) -> Router<()> {
    Router::new()
        .route("/", get(api::welcome))
        .route("/health", get(health::health_check))
        .route("/games", get(api::list_games).post(api::create_game))
        .route(
            "/games/{id}",
            get(api::get_game)
                .put(api::update_game)
                .delete(api::delete_game),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
