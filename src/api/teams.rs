//! `/api/teams` handlers

use crate::api::{ApiError, ApiState, CallerId};
use crate::team::{NewTeam, Team, TeamUpdate};
use crate::types::{GameId, PlayerId, TeamId, UserId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddPlayerBody {
    player_id: PlayerId,
}

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/teams", get(list).post(create))
        .route("/api/teams/game/{game_id}", get(by_game))
        .route("/api/teams/creator/{creator_id}", get(by_creator))
        .route("/api/teams/player/{player_id}", get(by_player))
        .route(
            "/api/teams/{id}",
            get(get_one).put(update).delete(delete_team),
        )
        .route("/api/teams/{id}/players", post(add_player))
        .route("/api/teams/{id}/players/{player_id}", delete(remove_player))
        .route("/api/teams/{id}/votekick/{target_id}", post(votekick))
}

async fn list(State(state): State<ApiState>) -> Result<Json<Vec<Team>>, ApiError> {
    Ok(Json(state.teams.list()?))
}

async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<TeamId>,
) -> Result<Json<Team>, ApiError> {
    Ok(Json(state.teams.get(id)?))
}

async fn create(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Json(new_team): Json<NewTeam>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.teams.create(new_team, caller)?)))
}

async fn update(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TeamId>,
    Json(update): Json<TeamUpdate>,
) -> Result<Json<Team>, ApiError> {
    Ok(Json(state.teams.update(id, update, caller)?))
}

async fn delete_team(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TeamId>,
) -> Result<StatusCode, ApiError> {
    state.teams.delete(id, caller)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_player(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TeamId>,
    Json(body): Json<AddPlayerBody>,
) -> Result<Json<Team>, ApiError> {
    Ok(Json(state.teams.add_player(id, body.player_id, caller)?))
}

async fn remove_player(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path((id, player_id)): Path<(TeamId, PlayerId)>,
) -> Result<Json<Team>, ApiError> {
    Ok(Json(state.teams.remove_player(id, player_id, caller)?))
}

async fn votekick(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path((id, target_id)): Path<(TeamId, PlayerId)>,
) -> Result<Json<Team>, ApiError> {
    Ok(Json(state.teams.votekick(id, target_id, caller)?))
}

async fn by_game(
    State(state): State<ApiState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<Vec<Team>>, ApiError> {
    Ok(Json(state.teams.by_game(game_id)?))
}

async fn by_creator(
    State(state): State<ApiState>,
    Path(creator_id): Path<UserId>,
) -> Result<Json<Vec<Team>>, ApiError> {
    Ok(Json(state.teams.by_creator(creator_id)?))
}

async fn by_player(
    State(state): State<ApiState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<Vec<Team>>, ApiError> {
    Ok(Json(state.teams.by_player(player_id)?))
}
