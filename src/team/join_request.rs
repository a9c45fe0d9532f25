//! Requests by players to join a team

use crate::error::{AscenderError, Result};
use crate::storage::{Entity, EntityStore};
use crate::team::service::TeamService;
use crate::types::{PlayerId, RequestStatus, TeamId, UserId};
use crate::utils::{current_timestamp, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub id: Uuid,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJoinRequest {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from the team creator; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinRequestUpdate {
    pub status: Option<RequestStatus>,
    pub message: Option<String>,
    pub response_message: Option<String>,
}

impl JoinRequestUpdate {
    pub fn status(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl JoinRequest {
    pub fn new(request: NewJoinRequest) -> Self {
        let now = current_timestamp();
        Self {
            id: generate_id(),
            team_id: request.team_id,
            player_id: request.player_id,
            status: RequestStatus::Pending,
            request_date: now,
            response_date: None,
            message: request.message,
            response_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Apply a response. Any non-pending status stamps the response date.
    pub fn apply(&mut self, update: JoinRequestUpdate) {
        if let Some(message) = update.message {
            self.message = Some(message);
        }
        if let Some(response_message) = update.response_message {
            self.response_message = Some(response_message);
        }
        if let Some(status) = update.status {
            self.status = status;
            if status != RequestStatus::Pending {
                self.response_date = Some(current_timestamp());
            }
        }
    }
}

impl Entity for JoinRequest {
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

/// Team join request workflow
#[derive(Clone)]
pub struct JoinRequestService {
    store: Arc<dyn EntityStore<JoinRequest>>,
    teams: TeamService,
}

impl JoinRequestService {
    pub fn new(store: Arc<dyn EntityStore<JoinRequest>>, teams: TeamService) -> Self {
        Self { store, teams }
    }

    pub fn list(&self) -> Result<Vec<JoinRequest>> {
        self.store.list()
    }

    pub fn get(&self, id: Uuid) -> Result<JoinRequest> {
        self.store
            .get(&id)?
            .ok_or_else(|| AscenderError::not_found("Join request", id).into())
    }

    /// File a request on the caller's own behalf
    pub fn create(&self, request: NewJoinRequest, caller: UserId) -> Result<JoinRequest> {
        if request.player_id != caller {
            return Err(
                AscenderError::forbidden("You can only create join requests for yourself").into(),
            );
        }

        if !self.teams.exists(request.team_id)? {
            return Err(AscenderError::not_found("Team", request.team_id).into());
        }

        if self.teams.is_member(request.team_id, request.player_id)? {
            return Err(AscenderError::bad_request("Player is already a member of the team").into());
        }

        let (team_id, player_id) = (request.team_id, request.player_id);
        let pending = self.store.find_by(&|r| {
            r.team_id == team_id && r.player_id == player_id && r.is_pending()
        })?;
        if !pending.is_empty() {
            return Err(AscenderError::bad_request("A pending join request already exists").into());
        }

        let request = self.store.insert(JoinRequest::new(request))?;
        info!(
            "Player {} asked to join team {} ({})",
            player_id, team_id, request.id
        );
        Ok(request)
    }

    /// Respond to a request. Accepting adds the player to the team.
    pub fn update(&self, id: Uuid, update: JoinRequestUpdate, caller: UserId) -> Result<JoinRequest> {
        let existing = self.get(id)?;
        self.ensure_team_creator(existing.team_id, caller, "respond to join requests")?;

        if update.status == Some(RequestStatus::Accepted) {
            self.teams.add_member(existing.team_id, existing.player_id)?;
        }

        let mut update = Some(update);
        let request = self
            .store
            .update(&id, &mut |request| {
                if let Some(update) = update.take() {
                    request.apply(update);
                }
                Ok(())
            })?
            .ok_or_else(|| AscenderError::not_found("Join request", id))?;

        info!("Join request {} is now {:?}", id, request.status);
        Ok(request)
    }

    pub fn accept(&self, id: Uuid, caller: UserId) -> Result<JoinRequest> {
        self.update(id, JoinRequestUpdate::status(RequestStatus::Accepted), caller)
    }

    pub fn reject(&self, id: Uuid, caller: UserId) -> Result<JoinRequest> {
        self.update(id, JoinRequestUpdate::status(RequestStatus::Rejected), caller)
    }

    /// Withdraw (requester) or discard (team creator) a request
    pub fn delete(&self, id: Uuid, caller: UserId) -> Result<()> {
        let existing = self.get(id)?;
        if existing.player_id != caller && !self.teams.is_creator(existing.team_id, caller)? {
            return Err(AscenderError::forbidden(
                "You don't have permission to delete this join request",
            )
            .into());
        }

        self.store.remove(&id)?;
        Ok(())
    }

    pub fn by_team(&self, team_id: TeamId, caller: UserId) -> Result<Vec<JoinRequest>> {
        self.ensure_team_creator(team_id, caller, "view join requests for the team")?;
        self.store.find_by(&|r| r.team_id == team_id)
    }

    pub fn pending_by_team(&self, team_id: TeamId, caller: UserId) -> Result<Vec<JoinRequest>> {
        self.ensure_team_creator(team_id, caller, "view join requests for the team")?;
        self.store.find_by(&|r| r.team_id == team_id && r.is_pending())
    }

    pub fn by_player(&self, player_id: PlayerId, caller: UserId) -> Result<Vec<JoinRequest>> {
        ensure_self(player_id, caller)?;
        self.store.find_by(&|r| r.player_id == player_id)
    }

    pub fn pending_by_player(&self, player_id: PlayerId, caller: UserId) -> Result<Vec<JoinRequest>> {
        ensure_self(player_id, caller)?;
        self.store
            .find_by(&|r| r.player_id == player_id && r.is_pending())
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }

    fn ensure_team_creator(&self, team_id: TeamId, caller: UserId, action: &str) -> Result<()> {
        if self.teams.is_creator(team_id, caller)? {
            Ok(())
        } else {
            Err(AscenderError::forbidden(format!("Only the team creator can {}", action)).into())
        }
    }
}

fn ensure_self(player_id: PlayerId, caller: UserId) -> Result<()> {
    if player_id == caller {
        Ok(())
    } else {
        Err(AscenderError::forbidden("You can only view your own join requests").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use crate::team::model::NewTeam;

    struct Setup {
        teams: TeamService,
        requests: JoinRequestService,
        team_id: TeamId,
        creator: UserId,
    }

    fn setup() -> Setup {
        let teams = TeamService::new(Arc::new(InMemoryStore::new("teams")));
        let requests =
            JoinRequestService::new(Arc::new(InMemoryStore::new("join_requests")), teams.clone());
        let creator = generate_id();
        let team_id = teams.create(NewTeam::named("BetBoom"), creator).unwrap().id;

        Setup {
            teams,
            requests,
            team_id,
            creator,
        }
    }

    fn ask(team_id: TeamId, player_id: PlayerId) -> NewJoinRequest {
        NewJoinRequest {
            team_id,
            player_id,
            message: Some("let me in".to_string()),
        }
    }

    fn error_of(err: &anyhow::Error) -> Option<&AscenderError> {
        err.downcast_ref::<AscenderError>()
    }

    #[test]
    fn test_accept_adds_member() {
        let s = setup();
        let player = generate_id();
        let request = s.requests.create(ask(s.team_id, player), player).unwrap();
        assert!(request.is_pending());

        let accepted = s.requests.accept(request.id, s.creator).unwrap();

        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert!(accepted.response_date.is_some());
        assert!(s.teams.is_member(s.team_id, player).unwrap());
    }

    #[test]
    fn test_reject_leaves_roster_alone() {
        let s = setup();
        let player = generate_id();
        let request = s.requests.create(ask(s.team_id, player), player).unwrap();

        let rejected = s.requests.reject(request.id, s.creator).unwrap();

        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert!(!s.teams.is_member(s.team_id, player).unwrap());
    }

    #[test]
    fn test_create_validation() {
        let s = setup();
        let player = generate_id();

        // On behalf of someone else
        let err = s.requests.create(ask(s.team_id, player), generate_id()).unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::Forbidden { .. })));

        // Already a member
        let err = s.requests.create(ask(s.team_id, s.creator), s.creator).unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::BadRequest { .. })));

        // Duplicate pending request
        s.requests.create(ask(s.team_id, player), player).unwrap();
        let err = s.requests.create(ask(s.team_id, player), player).unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::BadRequest { .. })));
    }

    #[test]
    fn test_only_creator_responds() {
        let s = setup();
        let player = generate_id();
        let request = s.requests.create(ask(s.team_id, player), player).unwrap();

        let err = s.requests.accept(request.id, player).unwrap_err();
        assert!(matches!(error_of(&err), Some(AscenderError::Forbidden { .. })));
        assert!(s.requests.get(request.id).unwrap().is_pending());
    }

    #[test]
    fn test_listing_permissions() {
        let s = setup();
        let player = generate_id();
        let request = s.requests.create(ask(s.team_id, player), player).unwrap();
        s.requests.reject(request.id, s.creator).unwrap();
        s.requests.create(ask(s.team_id, player), player).unwrap();

        assert_eq!(s.requests.by_team(s.team_id, s.creator).unwrap().len(), 2);
        assert_eq!(s.requests.pending_by_team(s.team_id, s.creator).unwrap().len(), 1);
        assert_eq!(s.requests.by_player(player, player).unwrap().len(), 2);
        assert_eq!(s.requests.pending_by_player(player, player).unwrap().len(), 1);

        assert!(s.requests.by_team(s.team_id, player).is_err());
        assert!(s.requests.by_player(player, s.creator).is_err());
    }

    #[test]
    fn test_delete_by_requester_or_creator() {
        let s = setup();
        let player = generate_id();
        let first = s.requests.create(ask(s.team_id, player), player).unwrap();

        assert!(s.requests.delete(first.id, generate_id()).is_err());
        s.requests.delete(first.id, player).unwrap();

        let second = s.requests.create(ask(s.team_id, player), player).unwrap();
        s.requests.delete(second.id, s.creator).unwrap();
        assert_eq!(s.requests.count().unwrap(), 0);
    }
}
