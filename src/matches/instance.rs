//! Tournament match entity and its score mutators

use crate::error::{AscenderError, Result};
use crate::matches::outcome::{self, MatchOutcome};
use crate::matches::score::TeamScore;
use crate::storage::Entity;
use crate::types::{MatchId, MatchStatus, TeamId, TechResult, TournamentId};
use crate::utils::{current_timestamp, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of registering a team in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTeamOutcome {
    Added,
    /// The team already had a score record; nothing changed
    AlreadyPresent,
}

/// Result of a score or technical-result mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreUpdate {
    Applied,
    /// The team takes no part in this match; nothing changed
    TeamNotFound,
}

impl ScoreUpdate {
    pub fn is_applied(self) -> bool {
        self == ScoreUpdate::Applied
    }
}

/// A single scheduled contest between teams within a tournament round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub round: Option<u32>,
    /// Human-readable label, e.g. "Quarter-final 1"
    pub match_number: Option<String>,
    pub status: MatchStatus,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// One record per team, in registration order. Order matters for tie-breaks.
    team_scores: Vec<TeamScore>,
    pub match_history_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TournamentMatch {
    /// Create a scheduled match with no teams
    pub fn new(tournament_id: TournamentId) -> Self {
        let now = current_timestamp();
        Self {
            id: generate_id(),
            tournament_id,
            round: None,
            match_number: None,
            status: MatchStatus::Scheduled,
            scheduled_time: None,
            actual_start_time: None,
            end_time: None,
            team_scores: Vec::new(),
            match_history_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn team_scores(&self) -> &[TeamScore] {
        &self.team_scores
    }

    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.team_scores.iter().map(|ts| ts.team_id)
    }

    pub fn has_team(&self, team_id: TeamId) -> bool {
        self.score_for(team_id).is_some()
    }

    pub fn score_for(&self, team_id: TeamId) -> Option<&TeamScore> {
        self.team_scores.iter().find(|ts| ts.team_id == team_id)
    }

    fn score_for_mut(&mut self, team_id: TeamId) -> Option<&mut TeamScore> {
        self.team_scores.iter_mut().find(|ts| ts.team_id == team_id)
    }

    /// Register a team with a zeroed score record.
    ///
    /// Team ids are unique within a match: adding a team twice keeps the
    /// original record.
    pub fn add_team(&mut self, team_id: TeamId) -> AddTeamOutcome {
        if self.has_team(team_id) {
            return AddTeamOutcome::AlreadyPresent;
        }

        self.team_scores.push(TeamScore::new(self.id, team_id));
        AddTeamOutcome::Added
    }

    /// Overwrite a team's numeric score
    pub fn update_score(&mut self, team_id: TeamId, score: i32) -> ScoreUpdate {
        match self.score_for_mut(team_id) {
            Some(ts) => {
                ts.score = score;
                ScoreUpdate::Applied
            }
            None => ScoreUpdate::TeamNotFound,
        }
    }

    /// Overwrite a team's technical result
    pub fn set_tech_result(&mut self, team_id: TeamId, result: TechResult) -> ScoreUpdate {
        match self.score_for_mut(team_id) {
            Some(ts) => {
                ts.tech_result = result;
                ScoreUpdate::Applied
            }
            None => ScoreUpdate::TeamNotFound,
        }
    }

    /// Record a team's final placement
    pub fn set_position(&mut self, team_id: TeamId, position: Option<u32>) -> ScoreUpdate {
        match self.score_for_mut(team_id) {
            Some(ts) => {
                ts.position = position;
                ScoreUpdate::Applied
            }
            None => ScoreUpdate::TeamNotFound,
        }
    }

    /// Move the match along its lifecycle, stamping start and end times
    pub fn transition(&mut self, next: MatchStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(AscenderError::bad_request(format!(
                "Cannot move match {} from {} to {}",
                self.id, self.status, next
            ))
            .into());
        }

        let now = current_timestamp();
        match next {
            MatchStatus::InProgress => self.actual_start_time = Some(now),
            MatchStatus::Completed | MatchStatus::Cancelled => self.end_time = Some(now),
            MatchStatus::Scheduled => {}
        }

        self.status = next;
        Ok(())
    }

    pub fn winner(&self) -> Option<TeamId> {
        outcome::resolve_winner(self.status, &self.team_scores)
    }

    pub fn is_draw(&self) -> bool {
        outcome::is_draw(self.status, &self.team_scores)
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::evaluate(self.status, &self.team_scores)
    }
}

impl Entity for TournamentMatch {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_with_teams(n: usize) -> (TournamentMatch, Vec<TeamId>) {
        let mut m = TournamentMatch::new(generate_id());
        let teams: Vec<TeamId> = (0..n).map(|_| generate_id()).collect();
        for team in &teams {
            assert_eq!(m.add_team(*team), AddTeamOutcome::Added);
        }
        (m, teams)
    }

    fn complete(m: &mut TournamentMatch) {
        m.transition(MatchStatus::InProgress).unwrap();
        m.transition(MatchStatus::Completed).unwrap();
    }

    #[test]
    fn test_add_team_initializes_record() {
        let (m, teams) = match_with_teams(1);
        let record = m.score_for(teams[0]).unwrap();

        assert_eq!(record.match_id, m.id);
        assert_eq!(record.score, 0);
        assert_eq!(record.tech_result, TechResult::None);
        assert_eq!(record.position, None);
    }

    #[test]
    fn test_add_team_twice_keeps_single_record() {
        let (mut m, teams) = match_with_teams(1);
        m.update_score(teams[0], 4);

        assert_eq!(m.add_team(teams[0]), AddTeamOutcome::AlreadyPresent);
        assert_eq!(m.team_scores().len(), 1);
        assert_eq!(m.score_for(teams[0]).unwrap().score, 4);
    }

    #[test]
    fn test_update_score_for_unknown_team_is_reported() {
        let (mut m, teams) = match_with_teams(2);
        m.update_score(teams[0], 3);
        let before = m.team_scores().to_vec();

        assert_eq!(m.update_score(generate_id(), 10), ScoreUpdate::TeamNotFound);
        assert_eq!(m.team_scores(), before.as_slice());
    }

    #[test]
    fn test_set_tech_result_for_unknown_team_is_reported() {
        let (mut m, _) = match_with_teams(2);
        let before = m.team_scores().to_vec();

        assert_eq!(
            m.set_tech_result(generate_id(), TechResult::Win),
            ScoreUpdate::TeamNotFound
        );
        assert_eq!(m.team_scores(), before.as_slice());
    }

    #[test]
    fn test_mutators_apply_in_place() {
        let (mut m, teams) = match_with_teams(2);

        assert!(m.update_score(teams[1], 7).is_applied());
        assert!(m.set_tech_result(teams[0], TechResult::Loss).is_applied());
        assert!(m.set_position(teams[1], Some(1)).is_applied());

        assert_eq!(m.score_for(teams[1]).unwrap().score, 7);
        assert_eq!(m.score_for(teams[1]).unwrap().position, Some(1));
        assert_eq!(m.score_for(teams[0]).unwrap().tech_result, TechResult::Loss);
    }

    #[test]
    fn test_outcome_only_after_completion() {
        let (mut m, teams) = match_with_teams(2);
        m.update_score(teams[0], 1);
        m.update_score(teams[1], 2);

        assert_eq!(m.winner(), None);
        m.transition(MatchStatus::InProgress).unwrap();
        assert_eq!(m.winner(), None);
        assert!(!m.is_draw());

        m.transition(MatchStatus::Completed).unwrap();
        assert_eq!(m.winner(), Some(teams[1]));
        assert_eq!(m.outcome(), MatchOutcome::Winner(teams[1]));
    }

    #[test]
    fn test_technical_win_overrides_scores() {
        let (mut m, teams) = match_with_teams(2);
        m.update_score(teams[1], 100);
        m.set_tech_result(teams[0], TechResult::Win);
        complete(&mut m);

        assert_eq!(m.winner(), Some(teams[0]));
        assert!(!m.is_draw());
    }

    #[test]
    fn test_lifecycle_timestamps() {
        let mut m = TournamentMatch::new(generate_id());
        assert!(m.actual_start_time.is_none());

        m.transition(MatchStatus::InProgress).unwrap();
        assert!(m.actual_start_time.is_some());
        assert!(m.end_time.is_none());

        m.transition(MatchStatus::Cancelled).unwrap();
        assert!(m.end_time.is_some());
        assert_eq!(m.status, MatchStatus::Cancelled);
    }

    #[test]
    fn test_invalid_transition_rejected() {
        let mut m = TournamentMatch::new(generate_id());
        let err = m.transition(MatchStatus::Completed).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AscenderError>(),
            Some(AscenderError::BadRequest { .. })
        ));
        assert_eq!(m.status, MatchStatus::Scheduled);
    }
}
