//! Tournaments, their matches and registration
//!
//! [`TournamentService`] is split across files by concern: tournament
//! lifecycle and roster in `service`, match scheduling and scoring in
//! `matches`, and registration requests in `registration`.

pub mod matches;
pub mod model;
pub mod registration;
pub mod service;

pub use matches::{MatchView, NewMatch};
pub use model::{
    NewTournament, NewTournamentJoinRequest, Tournament, TournamentFilter, TournamentJoinRequest,
    TournamentJoinRequestUpdate, TournamentUpdate,
};
pub use service::{TournamentService, TournamentStores};
