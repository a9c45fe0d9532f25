//! Ascender - esports services for games, players, teams and tournaments
//!
//! This crate provides the REST services of the Ascender platform: a game
//! catalog, player profiles, team rosters with join requests, and
//! tournaments whose matches resolve winners from scores and technical
//! results.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod game;
pub mod matches;
pub mod metrics;
pub mod player;
pub mod service;
pub mod storage;
pub mod team;
pub mod tournament;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{AscenderError, Result};
pub use types::*;

// Re-export key components
pub use api::{router, ApiState};
pub use matches::{is_draw, resolve_winner, MatchOutcome, TeamScore, TournamentMatch};
pub use tournament::TournamentService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
