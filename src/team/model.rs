//! Teams and their membership

use crate::storage::Entity;
use crate::types::{GameId, TeamId, UserId};
use crate::utils::{current_timestamp, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A roster of players competing together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: Option<String>,
    pub game_ids: BTreeSet<GameId>,
    pub logo: Option<String>,
    pub background: Option<String>,
    pub website: Option<String>,
    pub discord: Option<String>,
    pub vk: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    /// User who created the team and administers it
    pub creator_id: UserId,
    /// Members, identified by user id. Always contains the creator at creation.
    pub player_ids: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied fields for a new team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub game_ids: BTreeSet<GameId>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub vk: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub tiktok: Option<String>,
}

impl NewTeam {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial team update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub game_ids: Option<BTreeSet<GameId>>,
    pub logo: Option<String>,
    pub background: Option<String>,
    pub website: Option<String>,
    pub discord: Option<String>,
    pub vk: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
}

impl Team {
    pub fn new(new_team: NewTeam, creator_id: UserId) -> Self {
        let now = current_timestamp();
        Self {
            id: generate_id(),
            name: new_team.name,
            description: new_team.description,
            game_ids: new_team.game_ids,
            logo: new_team.logo,
            background: new_team.background,
            website: new_team.website,
            discord: new_team.discord,
            vk: new_team.vk,
            instagram: new_team.instagram,
            tiktok: new_team.tiktok,
            creator_id,
            player_ids: BTreeSet::from([creator_id]),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_creator(&self, user_id: UserId) -> bool {
        self.creator_id == user_id
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.player_ids.contains(&user_id)
    }

    pub fn apply(&mut self, update: TeamUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(game_ids) = update.game_ids {
            self.game_ids = game_ids;
        }

        let links = [
            (&mut self.description, update.description),
            (&mut self.logo, update.logo),
            (&mut self.background, update.background),
            (&mut self.website, update.website),
            (&mut self.discord, update.discord),
            (&mut self.vk, update.vk),
            (&mut self.instagram, update.instagram),
            (&mut self.tiktok, update.tiktok),
        ];
        for (field, value) in links {
            if value.is_some() {
                *field = value;
            }
        }
    }
}

impl Entity for Team {
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
