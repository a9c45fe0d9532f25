//! Teams, rosters and join requests

pub mod join_request;
pub mod model;
pub mod service;

pub use join_request::{JoinRequest, JoinRequestService, JoinRequestUpdate, NewJoinRequest};
pub use model::{NewTeam, Team, TeamUpdate};
pub use service::TeamService;
