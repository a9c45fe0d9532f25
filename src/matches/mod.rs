//! Tournament matches and outcome resolution
//!
//! This module contains the match entity, its per-team score records and the
//! rules that decide a winner or a draw.

pub mod instance;
pub mod outcome;
pub mod score;

pub use instance::{AddTeamOutcome, ScoreUpdate, TournamentMatch};
pub use outcome::{is_draw, resolve_winner, MatchOutcome};
pub use score::TeamScore;
