//! Common types used throughout the Ascender services

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a team
pub type TeamId = Uuid;

/// Identifier of a player profile
pub type PlayerId = Uuid;

/// Identifier of the authenticated user issuing a request (the `X-User-ID` header)
pub type UserId = Uuid;

/// Identifier of a game title
pub type GameId = Uuid;

/// Identifier of a tournament
pub type TournamentId = Uuid;

/// Identifier of a tournament match
pub type MatchId = Uuid;

/// Lifecycle of a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Whether a match in this state may move to `next`
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Scheduled, MatchStatus::InProgress)
                | (MatchStatus::InProgress, MatchStatus::Completed)
                | (MatchStatus::Scheduled, MatchStatus::Cancelled)
                | (MatchStatus::InProgress, MatchStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "SCHEDULED"),
            MatchStatus::InProgress => write!(f, "IN_PROGRESS"),
            MatchStatus::Completed => write!(f, "COMPLETED"),
            MatchStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Technical result assigned to a team independent of its numeric score
/// (forfeits, disqualifications)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechResult {
    #[default]
    None,
    Win,
    Loss,
    Draw,
}

impl TechResult {
    pub fn description(self) -> &'static str {
        match self {
            TechResult::None => "No technical result",
            TechResult::Win => "Technical win",
            TechResult::Loss => "Technical loss",
            TechResult::Draw => "Technical draw",
        }
    }
}

/// Series format of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TournamentFormat {
    #[serde(rename = "BO1")]
    Bo1,
    #[serde(rename = "BO3")]
    Bo3,
    #[serde(rename = "BO5")]
    Bo5,
}

impl TournamentFormat {
    pub fn description(self) -> &'static str {
        match self {
            TournamentFormat::Bo1 => "Best of 1",
            TournamentFormat::Bo3 => "Best of 3",
            TournamentFormat::Bo5 => "Best of 5",
        }
    }
}

/// Lifecycle of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    Created,
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Whether teams may still ask to join
    pub fn accepts_registrations(self) -> bool {
        matches!(
            self,
            TournamentStatus::Created | TournamentStatus::RegistrationOpen
        )
    }
}

/// State of a join request (team membership or tournament registration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_status_transitions() {
        assert!(MatchStatus::Scheduled.can_transition_to(MatchStatus::InProgress));
        assert!(MatchStatus::InProgress.can_transition_to(MatchStatus::Completed));
        assert!(MatchStatus::Scheduled.can_transition_to(MatchStatus::Cancelled));
        assert!(MatchStatus::InProgress.can_transition_to(MatchStatus::Cancelled));

        assert!(!MatchStatus::Scheduled.can_transition_to(MatchStatus::Completed));
        assert!(!MatchStatus::Completed.can_transition_to(MatchStatus::Cancelled));
        assert!(!MatchStatus::Cancelled.can_transition_to(MatchStatus::Scheduled));
        assert!(!MatchStatus::Completed.can_transition_to(MatchStatus::Completed));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&MatchStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(serde_json::to_string(&TechResult::Win).unwrap(), "\"WIN\"");
        assert_eq!(
            serde_json::from_str::<TournamentFormat>("\"BO3\"").unwrap(),
            TournamentFormat::Bo3
        );
        assert_eq!(
            serde_json::from_str::<TournamentStatus>("\"REGISTRATION_OPEN\"").unwrap(),
            TournamentStatus::RegistrationOpen
        );
    }

    #[test]
    fn test_registration_window() {
        assert!(TournamentStatus::Created.accepts_registrations());
        assert!(TournamentStatus::RegistrationOpen.accepts_registrations());
        assert!(!TournamentStatus::RegistrationClosed.accepts_registrations());
        assert!(!TournamentStatus::InProgress.accepts_registrations());
    }
}
