//! Clients for the team and game services
//!
//! Tournament operations consult the team directory and the game catalog.
//! In a single-binary deployment they talk to the in-process services; when
//! an upstream URL is configured they call the remote service over HTTP.

pub mod http;
pub mod local;

pub use http::{HttpGameCatalog, HttpTeamDirectory};
pub use local::{LocalGameCatalog, LocalTeamDirectory};

use crate::error::Result;
use crate::types::{GameId, TeamId, UserId};
use async_trait::async_trait;

/// Read-only view of teams used for authorization decisions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn team_exists(&self, team_id: TeamId) -> Result<bool>;

    /// Whether `user_id` created the team. False for unknown teams.
    async fn is_team_creator(&self, team_id: TeamId, user_id: UserId) -> Result<bool>;

    /// Short name used in health reports
    fn name(&self) -> &'static str;
}

/// Read-only view of the game catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameCatalog: Send + Sync {
    async fn game_exists(&self, game_id: GameId) -> Result<bool>;
}
