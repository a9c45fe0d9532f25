//! `/api/join-requests` handlers

use crate::api::{ApiError, ApiState, CallerId};
use crate::team::{JoinRequest, JoinRequestUpdate, NewJoinRequest};
use crate::types::{PlayerId, TeamId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/join-requests", get(list).post(create))
        .route("/api/join-requests/team/{team_id}", get(by_team))
        .route("/api/join-requests/team/{team_id}/pending", get(pending_by_team))
        .route("/api/join-requests/player/{player_id}", get(by_player))
        .route(
            "/api/join-requests/player/{player_id}/pending",
            get(pending_by_player),
        )
        .route(
            "/api/join-requests/{id}",
            get(get_one).put(update).delete(delete),
        )
        .route("/api/join-requests/{id}/accept", put(accept))
        .route("/api/join-requests/{id}/reject", put(reject))
}

async fn list(State(state): State<ApiState>) -> Result<Json<Vec<JoinRequest>>, ApiError> {
    Ok(Json(state.join_requests.list()?))
}

async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JoinRequest>, ApiError> {
    Ok(Json(state.join_requests.get(id)?))
}

async fn create(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Json(request): Json<NewJoinRequest>,
) -> Result<(StatusCode, Json<JoinRequest>), ApiError> {
    let created = state.join_requests.create(request, caller)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(update): Json<JoinRequestUpdate>,
) -> Result<Json<JoinRequest>, ApiError> {
    Ok(Json(state.join_requests.update(id, update, caller)?))
}

async fn delete(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.join_requests.delete(id, caller)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn accept(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<JoinRequest>, ApiError> {
    Ok(Json(state.join_requests.accept(id, caller)?))
}

async fn reject(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<JoinRequest>, ApiError> {
    Ok(Json(state.join_requests.reject(id, caller)?))
}

async fn by_team(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(team_id): Path<TeamId>,
) -> Result<Json<Vec<JoinRequest>>, ApiError> {
    Ok(Json(state.join_requests.by_team(team_id, caller)?))
}

async fn pending_by_team(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(team_id): Path<TeamId>,
) -> Result<Json<Vec<JoinRequest>>, ApiError> {
    Ok(Json(state.join_requests.pending_by_team(team_id, caller)?))
}

async fn by_player(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<Vec<JoinRequest>>, ApiError> {
    Ok(Json(state.join_requests.by_player(player_id, caller)?))
}

async fn pending_by_player(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<Vec<JoinRequest>>, ApiError> {
    Ok(Json(state.join_requests.pending_by_player(player_id, caller)?))
}
