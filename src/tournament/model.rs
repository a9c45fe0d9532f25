//! Tournaments and their registration requests

use crate::storage::Entity;
use crate::types::{
    GameId, RequestStatus, TeamId, TournamentFormat, TournamentId, TournamentStatus, UserId,
};
use crate::utils::{current_timestamp, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A competition between registered teams on one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub game_id: GameId,
    pub format: TournamentFormat,
    /// Registration cap; `None` means unlimited
    pub max_teams: Option<u32>,
    pub prize_pool: Option<f64>,
    pub currency: Option<String>,
    pub max_skill: Option<i32>,
    /// Whether the tournament has entered its bracket stage
    pub bracket_stage: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: TournamentStatus,
    pub team_ids: BTreeSet<TeamId>,
    /// User who created the tournament and has authority over it and its matches
    pub organizer_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub game_id: GameId,
    pub format: TournamentFormat,
    #[serde(default)]
    pub max_teams: Option<u32>,
    #[serde(default)]
    pub prize_pool: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub max_skill: Option<i32>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl NewTournament {
    pub fn new(name: impl Into<String>, game_id: GameId, format: TournamentFormat) -> Self {
        Self {
            name: name.into(),
            description: None,
            game_id,
            format,
            max_teams: None,
            prize_pool: None,
            currency: None,
            max_skill: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Partial tournament update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub format: Option<TournamentFormat>,
    pub max_teams: Option<u32>,
    pub prize_pool: Option<f64>,
    pub currency: Option<String>,
    pub max_skill: Option<i32>,
    pub bracket_stage: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<TournamentStatus>,
}

/// Query filters for listing tournaments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentFilter {
    pub game_id: Option<GameId>,
    pub status: Option<TournamentStatus>,
    /// Case-insensitive substring of the tournament name
    pub name: Option<String>,
}

impl TournamentFilter {
    pub fn matches(&self, tournament: &Tournament) -> bool {
        self.game_id.map_or(true, |id| tournament.game_id == id)
            && self.status.map_or(true, |status| tournament.status == status)
            && self.name.as_deref().map_or(true, |name| {
                tournament
                    .name
                    .to_lowercase()
                    .contains(&name.to_lowercase())
            })
    }
}

impl Tournament {
    pub fn new(new: NewTournament, organizer_id: UserId) -> Self {
        let now = current_timestamp();
        Self {
            id: generate_id(),
            name: new.name,
            description: new.description,
            game_id: new.game_id,
            format: new.format,
            max_teams: new.max_teams,
            prize_pool: new.prize_pool,
            currency: new.currency,
            max_skill: new.max_skill,
            bracket_stage: false,
            start_date: new.start_date,
            end_date: new.end_date,
            status: TournamentStatus::Created,
            team_ids: BTreeSet::new(),
            organizer_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_organizer(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id
    }

    pub fn has_team(&self, team_id: TeamId) -> bool {
        self.team_ids.contains(&team_id)
    }

    pub fn is_full(&self) -> bool {
        self.max_teams
            .is_some_and(|max| self.team_ids.len() >= max as usize)
    }

    pub fn apply(&mut self, update: TournamentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(format) = update.format {
            self.format = format;
        }
        if let Some(max_teams) = update.max_teams {
            self.max_teams = Some(max_teams);
        }
        if let Some(prize_pool) = update.prize_pool {
            self.prize_pool = Some(prize_pool);
        }
        if let Some(currency) = update.currency {
            self.currency = Some(currency);
        }
        if let Some(max_skill) = update.max_skill {
            self.max_skill = Some(max_skill);
        }
        if let Some(bracket_stage) = update.bracket_stage {
            self.bracket_stage = bracket_stage;
        }
        if let Some(start_date) = update.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(end_date) = update.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

impl Entity for Tournament {
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

/// Request by a team creator to register the team in a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentJoinRequest {
    pub id: Uuid,
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
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
pub struct NewTournamentJoinRequest {
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
    #[serde(default)]
    pub message: Option<String>,
}

/// Organizer response to a registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentJoinRequestUpdate {
    pub status: Option<RequestStatus>,
    pub response_message: Option<String>,
}

impl TournamentJoinRequest {
    pub fn new(request: NewTournamentJoinRequest) -> Self {
        let now = current_timestamp();
        Self {
            id: generate_id(),
            tournament_id: request.tournament_id,
            team_id: request.team_id,
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

    pub fn apply(&mut self, update: TournamentJoinRequestUpdate) {
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

impl Entity for TournamentJoinRequest {
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
