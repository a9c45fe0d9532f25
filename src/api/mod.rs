//! REST API
//!
//! One axum router hosts the game, player, team, join-request and
//! tournament resources. Mutating endpoints identify the caller through the
//! `X-User-ID` header.

pub mod error;
pub mod extract;
pub mod games;
pub mod join_requests;
pub mod middleware;
pub mod players;
pub mod teams;
pub mod tournaments;

pub use error::ApiError;
pub use extract::{CallerId, USER_ID_HEADER};

use crate::clients::{GameCatalog, LocalGameCatalog, LocalTeamDirectory, TeamDirectory};
use crate::error::Result;
use crate::game::GameService;
use crate::metrics::MetricsCollector;
use crate::player::PlayerService;
use crate::storage::InMemoryStore;
use crate::team::{JoinRequestService, TeamService};
use crate::tournament::{TournamentService, TournamentStores};
use axum::Router;
use std::sync::Arc;

/// Services shared by every handler
#[derive(Clone)]
pub struct ApiState {
    pub games: GameService,
    pub players: PlayerService,
    pub teams: TeamService,
    pub join_requests: JoinRequestService,
    pub tournaments: TournamentService,
    /// Team lookups used by the tournament service
    pub team_directory: Arc<dyn TeamDirectory>,
    pub metrics: Arc<MetricsCollector>,
}

impl ApiState {
    /// All services in memory, with tournaments consulting the local team and
    /// game services
    pub fn in_memory(metrics: Arc<MetricsCollector>) -> Self {
        Self::with_upstreams(metrics, None, None)
    }

    /// Build the services, using the given remote team directory and game
    /// catalog where provided and the in-process services otherwise
    pub fn with_upstreams(
        metrics: Arc<MetricsCollector>,
        team_directory: Option<Arc<dyn TeamDirectory>>,
        game_catalog: Option<Arc<dyn GameCatalog>>,
    ) -> Self {
        let games = GameService::new(Arc::new(InMemoryStore::new("games")));
        let players = PlayerService::new(Arc::new(InMemoryStore::new("players")));
        let teams = TeamService::new(Arc::new(InMemoryStore::new("teams")));
        let join_requests = JoinRequestService::new(
            Arc::new(InMemoryStore::new("join_requests")),
            teams.clone(),
        );

        let team_directory = team_directory
            .unwrap_or_else(|| Arc::new(LocalTeamDirectory::new(teams.clone())));
        let game_catalog =
            game_catalog.unwrap_or_else(|| Arc::new(LocalGameCatalog::new(games.clone())));

        let tournaments = TournamentService::new(
            TournamentStores::in_memory(),
            team_directory.clone(),
            game_catalog,
            metrics.clone(),
        );

        Self {
            games,
            players,
            teams,
            join_requests,
            tournaments,
            team_directory,
            metrics,
        }
    }

    /// Number of stored entities per kind
    pub fn entity_counts(&self) -> Result<Vec<(&'static str, usize)>> {
        Ok(vec![
            ("games", self.games.count()?),
            ("players", self.players.count()?),
            ("teams", self.teams.count()?),
            ("join_requests", self.join_requests.count()?),
            ("tournaments", self.tournaments.count()?),
            ("matches", self.tournaments.match_count()?),
        ])
    }
}

/// Build the API router
pub fn router(state: ApiState) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .merge(games::routes())
        .merge(players::routes())
        .merge(teams::routes())
        .merge(join_requests::routes())
        .merge(tournaments::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            metrics,
            middleware::track_requests,
        ))
        .with_state(state)
}
