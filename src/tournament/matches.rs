//! Match operations of the tournament service

use crate::error::{AscenderError, Result};
use crate::matches::{MatchOutcome, ScoreUpdate, TournamentMatch};
use crate::tournament::service::TournamentService;
use crate::types::{MatchId, MatchStatus, TeamId, TechResult, TournamentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A match together with its resolved result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    #[serde(flatten)]
    pub details: TournamentMatch,
    pub winner: Option<TeamId>,
    pub draw: bool,
    pub outcome: MatchOutcome,
}

impl From<TournamentMatch> for MatchView {
    fn from(details: TournamentMatch) -> Self {
        Self {
            winner: details.winner(),
            draw: details.is_draw(),
            outcome: details.outcome(),
            details,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub match_number: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Competing teams in tie-break order
    #[serde(default)]
    pub team_ids: Vec<TeamId>,
}

impl TournamentService {
    /// Matches of a tournament ordered by round, then label
    pub fn matches(&self, tournament_id: TournamentId) -> Result<Vec<MatchView>> {
        self.get(tournament_id)?;

        let mut matches = self
            .matches
            .find_by(&|m| m.tournament_id == tournament_id)?;
        matches.sort_by(|a, b| {
            a.round
                .cmp(&b.round)
                .then_with(|| a.match_number.cmp(&b.match_number))
        });

        Ok(matches.into_iter().map(MatchView::from).collect())
    }

    /// Schedule a match between teams registered in the tournament
    pub fn create_match(
        &self,
        tournament_id: TournamentId,
        new: NewMatch,
        caller: UserId,
    ) -> Result<MatchView> {
        let tournament = self.ensure_organizer(tournament_id, caller)?;

        if let Some(outsider) = new.team_ids.iter().find(|t| !tournament.has_team(**t)) {
            return Err(AscenderError::bad_request(format!(
                "Team {} is not registered in tournament {}",
                outsider, tournament_id
            ))
            .into());
        }

        let mut created = TournamentMatch::new(tournament_id);
        created.round = new.round;
        created.match_number = new.match_number;
        created.scheduled_time = new.scheduled_time;
        for team_id in new.team_ids {
            created.add_team(team_id);
        }

        let created = self.matches.insert(created)?;
        self.metrics.record_match_created();
        info!(
            "Scheduled match {} in tournament {} with {} teams",
            created.id,
            tournament_id,
            created.team_scores().len()
        );
        Ok(created.into())
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<MatchView> {
        Ok(self.load_match(match_id)?.into())
    }

    /// Overwrite several scores at once.
    ///
    /// Fails with `NotFound` and applies nothing when any team is not part of
    /// the match.
    pub fn update_scores(
        &self,
        match_id: MatchId,
        scores: &HashMap<TeamId, i32>,
        caller: UserId,
    ) -> Result<MatchView> {
        self.ensure_match_organizer(match_id, caller)?;

        let updated = self.modify_match(match_id, &mut |m| {
            if let Some(unknown) = scores.keys().find(|team_id| !m.has_team(**team_id)) {
                self.metrics
                    .record_score_mutation("score", ScoreUpdate::TeamNotFound);
                return Err(AscenderError::not_found("Team in match", unknown).into());
            }

            for (team_id, score) in scores {
                let result = m.update_score(*team_id, *score);
                self.metrics.record_score_mutation("score", result);
            }
            Ok(())
        })?;

        debug!("Updated {} scores in match {}", scores.len(), match_id);
        Ok(updated.into())
    }

    pub fn set_tech_result(
        &self,
        match_id: MatchId,
        team_id: TeamId,
        result: TechResult,
        caller: UserId,
    ) -> Result<MatchView> {
        self.ensure_match_organizer(match_id, caller)?;

        let updated = self.modify_match(match_id, &mut |m| {
            let update = m.set_tech_result(team_id, result);
            self.metrics.record_score_mutation("tech_result", update);
            match update {
                ScoreUpdate::Applied => Ok(()),
                ScoreUpdate::TeamNotFound => {
                    Err(AscenderError::not_found("Team in match", team_id).into())
                }
            }
        })?;

        info!(
            "{} assigned to team {} in match {}",
            result.description(),
            team_id,
            match_id
        );
        Ok(updated.into())
    }

    /// Move a match along its lifecycle
    pub fn set_match_status(
        &self,
        match_id: MatchId,
        status: MatchStatus,
        caller: UserId,
    ) -> Result<MatchView> {
        self.ensure_match_organizer(match_id, caller)?;

        let updated = self.modify_match(match_id, &mut |m| m.transition(status))?;

        if status == MatchStatus::Completed {
            let outcome = updated.outcome();
            self.metrics.record_match_outcome(&outcome);
            info!("Match {} completed: {:?}", match_id, outcome);
        } else {
            info!("Match {} is now {}", match_id, status);
        }
        Ok(updated.into())
    }

    pub fn delete_match(&self, match_id: MatchId, caller: UserId) -> Result<()> {
        self.ensure_match_organizer(match_id, caller)?;
        self.matches.remove(&match_id)?;
        info!("Deleted match {}", match_id);
        Ok(())
    }

    fn load_match(&self, match_id: MatchId) -> Result<TournamentMatch> {
        self.matches
            .get(&match_id)?
            .ok_or_else(|| AscenderError::not_found("Match", match_id).into())
    }

    /// Only the organizer of the owning tournament may touch a match
    fn ensure_match_organizer(&self, match_id: MatchId, caller: UserId) -> Result<()> {
        let tournament_id = self.load_match(match_id)?.tournament_id;
        self.ensure_organizer(tournament_id, caller)?;
        Ok(())
    }

    fn modify_match(
        &self,
        match_id: MatchId,
        change: &mut dyn FnMut(&mut TournamentMatch) -> Result<()>,
    ) -> Result<TournamentMatch> {
        self.matches
            .update(&match_id, change)?
            .ok_or_else(|| AscenderError::not_found("Match", match_id).into())
    }
}
