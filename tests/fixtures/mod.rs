//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use ascender::api::{router, ApiState, USER_ID_HEADER};
use ascender::clients::{GameCatalog, TeamDirectory};
use ascender::error::Result;
use ascender::metrics::MetricsCollector;
use ascender::tournament::{NewTournament, TournamentService, TournamentStores};
use ascender::types::{GameId, TeamId, TournamentFormat, UserId};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

mockall::mock! {
    pub Directory {}

    #[async_trait]
    impl TeamDirectory for Directory {
        async fn team_exists(&self, team_id: TeamId) -> Result<bool>;
        async fn is_team_creator(&self, team_id: TeamId, user_id: UserId) -> Result<bool>;
        fn name(&self) -> &'static str;
    }
}

/// Team directory backed by a fixed roster that counts lookups
#[derive(Debug, Default)]
pub struct RosterDirectory {
    creators: Mutex<HashMap<TeamId, UserId>>,
    lookups: Mutex<usize>,
}

impl RosterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team and return its id
    pub fn add_team(&self, creator: UserId) -> TeamId {
        let team_id = Uuid::new_v4();
        if let Ok(mut creators) = self.creators.lock() {
            creators.insert(team_id, creator);
        }
        team_id
    }

    pub fn lookups(&self) -> usize {
        self.lookups.lock().map(|n| *n).unwrap_or_default()
    }

    fn creator_of(&self, team_id: TeamId) -> Option<UserId> {
        if let Ok(mut lookups) = self.lookups.lock() {
            *lookups += 1;
        }
        self.creators
            .lock()
            .ok()
            .and_then(|creators| creators.get(&team_id).copied())
    }
}

#[async_trait]
impl TeamDirectory for RosterDirectory {
    async fn team_exists(&self, team_id: TeamId) -> Result<bool> {
        Ok(self.creator_of(team_id).is_some())
    }

    async fn is_team_creator(&self, team_id: TeamId, user_id: UserId) -> Result<bool> {
        Ok(self.creator_of(team_id) == Some(user_id))
    }

    fn name(&self) -> &'static str {
        "roster"
    }
}

/// Game catalog that knows a fixed set of games
#[derive(Debug, Default)]
pub struct FixedGameCatalog {
    games: HashSet<GameId>,
}

impl FixedGameCatalog {
    pub fn with_games(games: impl IntoIterator<Item = GameId>) -> Self {
        Self {
            games: games.into_iter().collect(),
        }
    }
}

#[async_trait]
impl GameCatalog for FixedGameCatalog {
    async fn game_exists(&self, game_id: GameId) -> Result<bool> {
        Ok(self.games.contains(&game_id))
    }
}

/// Tournament service over in-memory stores and the given upstreams
pub fn tournament_service(
    teams: Arc<dyn TeamDirectory>,
    games: Arc<dyn GameCatalog>,
) -> TournamentService {
    TournamentService::new(
        TournamentStores::in_memory(),
        teams,
        games,
        Arc::new(MetricsCollector::new().expect("Failed to create metrics collector")),
    )
}

pub fn new_tournament(name: &str, game_id: GameId) -> NewTournament {
    NewTournament::new(name, game_id, TournamentFormat::Bo3)
}

/// In-process REST API driven with `oneshot`
#[derive(Clone)]
pub struct TestApi {
    pub app: Router,
    pub state: ApiState,
}

impl TestApi {
    pub fn new() -> Self {
        Self::with_state(ApiState::in_memory(Arc::new(
            MetricsCollector::new().expect("Failed to create metrics collector"),
        )))
    }

    pub fn with_state(state: ApiState) -> Self {
        Self {
            app: router(state.clone()),
            state,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Option<UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            builder = builder.header(USER_ID_HEADER, caller.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, caller: UserId, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(caller), Some(body)).await
    }

    pub async fn put(&self, uri: &str, caller: UserId, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(caller), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, caller: UserId) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(caller), None).await
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("Response has no id")
}
