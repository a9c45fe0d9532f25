//! `/api/players` handlers

use crate::api::{ApiError, ApiState};
use crate::player::{NewPlayer, Player, PlayerUpdate};
use crate::types::{PlayerId, UserId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/players", get(list).post(create))
        .route("/api/players/looking-for-team", get(looking_for_team))
        .route("/api/players/skill/{level}", get(by_skill_level))
        .route("/api/players/user/{user_id}", get(by_user))
        .route("/api/players/{id}", get(get_one).put(update).delete(delete))
        .route("/api/players/{id}/avatar/{avatar_id}", put(set_avatar))
        .route(
            "/api/players/{id}/background/{background_id}",
            put(set_background),
        )
}

async fn list(State(state): State<ApiState>) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(state.players.list()?))
}

async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<PlayerId>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.players.get(id)?))
}

async fn create(
    State(state): State<ApiState>,
    Json(new_player): Json<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.players.create(new_player)?)))
}

async fn update(
    State(state): State<ApiState>,
    Path(id): Path<PlayerId>,
    Json(update): Json<PlayerUpdate>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.players.update(id, update)?))
}

async fn delete(
    State(state): State<ApiState>,
    Path(id): Path<PlayerId>,
) -> Result<StatusCode, ApiError> {
    state.players.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn by_skill_level(
    State(state): State<ApiState>,
    Path(level): Path<String>,
) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(state.players.by_skill_level(&level)?))
}

async fn looking_for_team(State(state): State<ApiState>) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(state.players.looking_for_team()?))
}

async fn by_user(
    State(state): State<ApiState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.players.by_user(user_id)?))
}

async fn set_avatar(
    State(state): State<ApiState>,
    Path((id, avatar_id)): Path<(PlayerId, Uuid)>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.players.set_avatar(id, avatar_id)?))
}

async fn set_background(
    State(state): State<ApiState>,
    Path((id, background_id)): Path<(PlayerId, Uuid)>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.players.set_background(id, background_id)?))
}
