//! Per-team score records owned by a match

use crate::types::{MatchId, TeamId, TechResult};
use crate::utils::generate_id;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team's numeric score and technical-result annotation within one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamScore {
    pub id: Uuid,
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub score: i32,
    /// Final placement (1st, 2nd, ...) when the match ranks more than two teams
    pub position: Option<u32>,
    pub tech_result: TechResult,
}

impl TeamScore {
    /// Fresh record for a team joining a match: score 0, no technical result
    pub fn new(match_id: MatchId, team_id: TeamId) -> Self {
        Self {
            id: generate_id(),
            match_id,
            team_id,
            score: 0,
            position: None,
            tech_result: TechResult::None,
        }
    }

    /// Builder used mostly by tests and fixtures
    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    pub fn with_tech_result(mut self, tech_result: TechResult) -> Self {
        self.tech_result = tech_result;
        self
    }

    pub fn has_technical_win(&self) -> bool {
        self.tech_result == TechResult::Win
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_score_defaults() {
        let match_id = generate_id();
        let team_id = generate_id();
        let score = TeamScore::new(match_id, team_id);

        assert_eq!(score.match_id, match_id);
        assert_eq!(score.team_id, team_id);
        assert_eq!(score.score, 0);
        assert_eq!(score.position, None);
        assert_eq!(score.tech_result, TechResult::None);
        assert!(!score.has_technical_win());
    }

    #[test]
    fn test_serialized_field_names() {
        let score = TeamScore::new(generate_id(), generate_id()).with_tech_result(TechResult::Loss);
        let json = serde_json::to_value(&score).unwrap();

        assert_eq!(json["techResult"], "LOSS");
        assert!(json.get("teamId").is_some());
        assert!(json.get("matchId").is_some());
    }
}
