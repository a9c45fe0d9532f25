//! Game catalog entries

use crate::storage::Entity;
use crate::types::GameId;
use crate::utils::{current_timestamp, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A game title teams and tournaments can be attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub background: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    /// Whether the game supports scrimmages (practice matches)
    pub scrimable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied fields for creating or replacing a game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub scrimable: Option<bool>,
}

impl GameDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Game {
    pub fn from_draft(draft: GameDraft) -> Self {
        let now = current_timestamp();
        let mut game = Self {
            id: generate_id(),
            name: String::new(),
            description: None,
            icon: None,
            background: None,
            logo: None,
            website: None,
            scrimable: true,
            created_at: now,
            updated_at: now,
        };
        game.apply(draft);
        game
    }

    /// Replace every editable field. An omitted `scrimable` keeps the current value.
    pub fn apply(&mut self, draft: GameDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.icon = draft.icon;
        self.background = draft.background;
        self.logo = draft.logo;
        self.website = draft.website;
        if let Some(scrimable) = draft.scrimable {
            self.scrimable = scrimable;
        }
    }
}

impl Entity for Game {
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
