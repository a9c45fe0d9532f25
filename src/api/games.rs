//! `/api/games` handlers

use crate::api::{ApiError, ApiState};
use crate::game::{Game, GameDraft};
use crate::types::GameId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/games", get(list).post(create))
        .route("/api/games/scrimable", get(scrimable))
        .route("/api/games/{id}", get(get_one).put(update).delete(delete))
}

async fn list(State(state): State<ApiState>) -> Result<Json<Vec<Game>>, ApiError> {
    Ok(Json(state.games.list()?))
}

async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<GameId>,
) -> Result<Json<Game>, ApiError> {
    Ok(Json(state.games.get(id)?))
}

async fn create(
    State(state): State<ApiState>,
    Json(draft): Json<GameDraft>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.games.create(draft)?)))
}

async fn update(
    State(state): State<ApiState>,
    Path(id): Path<GameId>,
    Json(draft): Json<GameDraft>,
) -> Result<Json<Game>, ApiError> {
    Ok(Json(state.games.update(id, draft)?))
}

async fn delete(
    State(state): State<ApiState>,
    Path(id): Path<GameId>,
) -> Result<StatusCode, ApiError> {
    state.games.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn scrimable(State(state): State<ApiState>) -> Result<Json<Vec<Game>>, ApiError> {
    Ok(Json(state.games.scrimable()?))
}
