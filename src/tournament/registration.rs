//! Tournament registration requests

use crate::error::{AscenderError, Result};
use crate::tournament::model::{
    NewTournamentJoinRequest, TournamentJoinRequest, TournamentJoinRequestUpdate,
};
use crate::tournament::service::TournamentService;
use crate::types::{RequestStatus, TournamentId, UserId};
use tracing::info;
use uuid::Uuid;

impl TournamentService {
    /// All registration requests for a tournament; organizer only
    pub fn join_requests(
        &self,
        tournament_id: TournamentId,
        caller: UserId,
    ) -> Result<Vec<TournamentJoinRequest>> {
        self.ensure_organizer(tournament_id, caller)?;
        self.join_requests
            .find_by(&|r| r.tournament_id == tournament_id)
    }

    pub fn get_join_request(&self, id: Uuid) -> Result<TournamentJoinRequest> {
        self.join_requests
            .get(&id)?
            .ok_or_else(|| AscenderError::not_found("Tournament join request", id).into())
    }

    /// Ask for a team to be registered. Only the team's creator may ask.
    pub async fn create_join_request(
        &self,
        request: NewTournamentJoinRequest,
        caller: UserId,
    ) -> Result<TournamentJoinRequest> {
        if !self.teams.is_team_creator(request.team_id, caller).await? {
            return Err(AscenderError::forbidden(
                "Only the team creator can register the team in a tournament",
            )
            .into());
        }

        let tournament = self.get(request.tournament_id)?;
        if !tournament.status.accepts_registrations() {
            return Err(AscenderError::bad_request(format!(
                "Tournament {} is not accepting registrations",
                tournament.id
            ))
            .into());
        }

        if tournament.has_team(request.team_id) {
            return Err(
                AscenderError::bad_request("Team is already registered in the tournament").into(),
            );
        }

        let (tournament_id, team_id) = (request.tournament_id, request.team_id);
        let pending = self.join_requests.find_by(&|r| {
            r.tournament_id == tournament_id && r.team_id == team_id && r.is_pending()
        })?;
        if !pending.is_empty() {
            return Err(AscenderError::bad_request("A pending join request already exists").into());
        }

        let request = self
            .join_requests
            .insert(TournamentJoinRequest::new(request))?;
        info!(
            "Team {} asked to join tournament {} ({})",
            team_id, tournament_id, request.id
        );
        Ok(request)
    }

    /// Organizer response. Accepting registers the team.
    pub fn update_join_request(
        &self,
        id: Uuid,
        update: TournamentJoinRequestUpdate,
        caller: UserId,
    ) -> Result<TournamentJoinRequest> {
        let existing = self.get_join_request(id)?;
        self.ensure_organizer(existing.tournament_id, caller)?;

        if update.status == Some(RequestStatus::Accepted) {
            self.register_team(existing.tournament_id, existing.team_id)?;
        }

        let mut update = Some(update);
        let request = self
            .join_requests
            .update(&id, &mut |request| {
                if let Some(update) = update.take() {
                    request.apply(update);
                }
                Ok(())
            })?
            .ok_or_else(|| AscenderError::not_found("Tournament join request", id))?;

        info!("Tournament join request {} is now {:?}", id, request.status);
        Ok(request)
    }

    /// Withdraw (team creator) or discard (organizer) a request
    pub async fn delete_join_request(&self, id: Uuid, caller: UserId) -> Result<()> {
        let existing = self.get_join_request(id)?;

        let is_organizer = self
            .tournaments
            .get(&existing.tournament_id)?
            .is_some_and(|t| t.is_organizer(caller));
        if !is_organizer && !self.teams.is_team_creator(existing.team_id, caller).await? {
            return Err(AscenderError::forbidden(
                "You don't have permission to delete this join request",
            )
            .into());
        }

        self.join_requests.remove(&id)?;
        Ok(())
    }
}
