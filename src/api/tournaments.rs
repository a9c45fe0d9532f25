//! `/api/tournaments` handlers

use crate::api::{ApiError, ApiState, CallerId};
use crate::tournament::{
    MatchView, NewMatch, NewTournament, NewTournamentJoinRequest, Tournament, TournamentFilter,
    TournamentJoinRequest, TournamentJoinRequestUpdate, TournamentUpdate,
};
use crate::types::{MatchId, MatchStatus, TeamId, TechResult, TournamentId};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamBody {
    team_id: TeamId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TechResultBody {
    team_id: TeamId,
    result: TechResult,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: MatchStatus,
}

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/tournaments", get(list).post(create))
        .route("/api/tournaments/team/{team_id}", get(by_team))
        .route("/api/tournaments/join-requests", post(create_join_request))
        .route(
            "/api/tournaments/join-requests/{id}",
            put(update_join_request).delete(delete_join_request),
        )
        .route(
            "/api/tournaments/matches/{match_id}",
            get(get_match).delete(delete_match),
        )
        .route("/api/tournaments/matches/{match_id}/scores", put(update_scores))
        .route(
            "/api/tournaments/matches/{match_id}/tech-result",
            put(set_tech_result),
        )
        .route(
            "/api/tournaments/matches/{match_id}/status",
            put(set_match_status),
        )
        .route(
            "/api/tournaments/{id}",
            get(get_one).put(update).delete(delete_tournament),
        )
        .route("/api/tournaments/{id}/teams", post(add_team))
        .route("/api/tournaments/{id}/teams/{team_id}", delete(remove_team))
        .route(
            "/api/tournaments/{id}/matches",
            get(matches).post(create_match),
        )
        .route(
            "/api/tournaments/{id}/bracket",
            post(generate_bracket).put(update_bracket),
        )
        .route("/api/tournaments/{id}/join-requests", get(join_requests))
}

async fn list(
    State(state): State<ApiState>,
    Query(filter): Query<TournamentFilter>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    Ok(Json(state.tournaments.list(&filter)?))
}

async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<TournamentId>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.tournaments.get(id)?))
}

async fn create(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Json(new): Json<NewTournament>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let created = state.tournaments.create(new, caller).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TournamentId>,
    Json(update): Json<TournamentUpdate>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.tournaments.update(id, update, caller)?))
}

async fn delete_tournament(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TournamentId>,
) -> Result<StatusCode, ApiError> {
    state.tournaments.delete(id, caller)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn by_team(
    State(state): State<ApiState>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    Ok(Json(state.tournaments.by_team(team_id)?))
}

async fn add_team(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TournamentId>,
    Json(body): Json<TeamBody>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state.tournaments.add_team(id, body.team_id, caller).await?;
    Ok(Json(tournament))
}

async fn remove_team(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path((id, team_id)): Path<(TournamentId, TeamId)>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.tournaments.remove_team(id, team_id, caller)?))
}

async fn matches(
    State(state): State<ApiState>,
    Path(id): Path<TournamentId>,
) -> Result<Json<Vec<MatchView>>, ApiError> {
    Ok(Json(state.tournaments.matches(id)?))
}

async fn create_match(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TournamentId>,
    Json(new): Json<NewMatch>,
) -> Result<(StatusCode, Json<MatchView>), ApiError> {
    let created = state.tournaments.create_match(id, new, caller)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_match(
    State(state): State<ApiState>,
    Path(match_id): Path<MatchId>,
) -> Result<Json<MatchView>, ApiError> {
    Ok(Json(state.tournaments.get_match(match_id)?))
}

async fn update_scores(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(match_id): Path<MatchId>,
    Json(scores): Json<HashMap<TeamId, i32>>,
) -> Result<Json<MatchView>, ApiError> {
    Ok(Json(
        state.tournaments.update_scores(match_id, &scores, caller)?,
    ))
}

async fn set_tech_result(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(match_id): Path<MatchId>,
    Json(body): Json<TechResultBody>,
) -> Result<Json<MatchView>, ApiError> {
    let updated = state
        .tournaments
        .set_tech_result(match_id, body.team_id, body.result, caller)?;
    Ok(Json(updated))
}

async fn set_match_status(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(match_id): Path<MatchId>,
    Json(body): Json<StatusBody>,
) -> Result<Json<MatchView>, ApiError> {
    let updated = state
        .tournaments
        .set_match_status(match_id, body.status, caller)?;
    Ok(Json(updated))
}

async fn delete_match(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(match_id): Path<MatchId>,
) -> Result<StatusCode, ApiError> {
    state.tournaments.delete_match(match_id, caller)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn generate_bracket(
    State(state): State<ApiState>,
    Path(id): Path<TournamentId>,
) -> Result<Json<Vec<MatchView>>, ApiError> {
    let matches = state.tournaments.generate_bracket(id)?;
    Ok(Json(matches.into_iter().map(MatchView::from).collect()))
}

async fn update_bracket(
    State(state): State<ApiState>,
    Path(id): Path<TournamentId>,
) -> Result<StatusCode, ApiError> {
    state.tournaments.update_bracket(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn join_requests(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<TournamentId>,
) -> Result<Json<Vec<TournamentJoinRequest>>, ApiError> {
    Ok(Json(state.tournaments.join_requests(id, caller)?))
}

async fn create_join_request(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Json(request): Json<NewTournamentJoinRequest>,
) -> Result<(StatusCode, Json<TournamentJoinRequest>), ApiError> {
    let created = state
        .tournaments
        .create_join_request(request, caller)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_join_request(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(update): Json<TournamentJoinRequestUpdate>,
) -> Result<Json<TournamentJoinRequest>, ApiError> {
    Ok(Json(
        state.tournaments.update_join_request(id, update, caller)?,
    ))
}

async fn delete_join_request(
    State(state): State<ApiState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tournaments.delete_join_request(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
