use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use serde_json::Value;

use gamelist_core::{StoredGame, validate_game};

use crate::error::AppError;
use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the list of games!";
pub const DELETED_MESSAGE: &str = "Game has been successfully deleted";

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<StoredGame>,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game: StoredGame,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    #[serde(rename = "newGame")]
    pub new_game: StoredGame,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    #[serde(rename = "updatedGame")]
    pub updated_game: StoredGame,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body that failed to parse as JSON is treated like any other invalid game.
fn payload(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(%rejection, "Unreadable game payload");
            Err(AppError::BadRequest(
                gamelist_core::validate::INVALID_GAME_MESSAGE.to_string(),
            ))
        },
    }
}

/// GET /: plain-text greeting.
pub async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// GET /games: every stored game.
pub async fn list_games(State(state): State<AppState>) -> Result<Json<GamesResponse>, AppError> {
    let games = state.games.list_all().await?;
    Ok(Json(GamesResponse { games }))
}

/// GET /games/{id}
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state.games.get_by_id(&id).await?;
    Ok(Json(GameResponse { game }))
}

/// POST /games: validate and store a new game.
pub async fn create_game(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let game = validate_game(&payload(body)?)?;
    let new_game = state.games.insert(game).await?;
    tracing::info!(id = %new_game.id, name = %new_game.game.name, "Game created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { new_game })))
}

/// PUT /games/{id}: replace the whole record, keeping its id.
///
/// The id is resolved before the body is looked at, so a bad id wins over a
/// bad body.
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, AppError> {
    state.games.get_by_id(&id).await?;
    let game = validate_game(&payload(body)?)?;
    let updated_game = state.games.replace(&id, game).await?;
    tracing::info!(id = %updated_game.id, "Game replaced");
    Ok(Json(UpdatedResponse { updated_game }))
}

/// DELETE /games/{id}
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.games.delete_by_id(&id).await?;
    tracing::info!(%id, "Game deleted");
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE,
    }))
}
