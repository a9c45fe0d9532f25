//! In-process client implementations

use crate::clients::{GameCatalog, TeamDirectory};
use crate::error::Result;
use crate::game::GameService;
use crate::team::TeamService;
use crate::types::{GameId, TeamId, UserId};
use async_trait::async_trait;

/// Team directory backed by the team service running in this process
#[derive(Clone)]
pub struct LocalTeamDirectory {
    teams: TeamService,
}

impl LocalTeamDirectory {
    pub fn new(teams: TeamService) -> Self {
        Self { teams }
    }
}

#[async_trait]
impl TeamDirectory for LocalTeamDirectory {
    async fn team_exists(&self, team_id: TeamId) -> Result<bool> {
        self.teams.exists(team_id)
    }

    async fn is_team_creator(&self, team_id: TeamId, user_id: UserId) -> Result<bool> {
        self.teams.is_creator(team_id, user_id)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Game catalog backed by the game service running in this process
#[derive(Clone)]
pub struct LocalGameCatalog {
    games: GameService,
}

impl LocalGameCatalog {
    pub fn new(games: GameService) -> Self {
        Self { games }
    }
}

#[async_trait]
impl GameCatalog for LocalGameCatalog {
    async fn game_exists(&self, game_id: GameId) -> Result<bool> {
        self.games.exists(game_id)
    }
}
