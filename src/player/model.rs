//! Player profiles

use crate::storage::Entity;
use crate::types::{GameId, PlayerId, UserId};
use crate::utils::{current_timestamp, generate_id};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Public profile of a player, owned by one platform user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    /// In-game nickname
    pub calling_name: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub steam_id: Option<String>,
    pub discord_id: Option<String>,
    pub twitch_username: Option<String>,
    pub youtube_channel: Option<String>,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub language: Option<String>,
    pub avatar_id: Option<Uuid>,
    pub profile_background_id: Option<Uuid>,
    pub skill_level: Option<String>,
    pub total_matches_played: u32,
    pub total_wins: u32,
    pub win_rate: f64,
    pub preferred_game_ids: BTreeSet<GameId>,
    pub achievements: BTreeSet<String>,
    pub looking_for_team: bool,
    pub availability: Option<String>,
    pub timezone: Option<String>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal fields required to register a player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub calling_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub user_id: UserId,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerUpdate {
    pub calling_name: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub steam_id: Option<String>,
    pub discord_id: Option<String>,
    pub twitch_username: Option<String>,
    pub youtube_channel: Option<String>,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub language: Option<String>,
    pub skill_level: Option<String>,
    pub total_matches_played: Option<u32>,
    pub total_wins: Option<u32>,
    pub preferred_game_ids: Option<BTreeSet<GameId>>,
    pub achievements: Option<BTreeSet<String>>,
    pub looking_for_team: Option<bool>,
    pub availability: Option<String>,
    pub timezone: Option<String>,
}

macro_rules! assign_some {
    ($target:expr, $update:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $update.$field {
                $target.$field = Some(value);
            }
        )*
    };
}

impl Player {
    pub fn new(new_player: NewPlayer) -> Self {
        let now = current_timestamp();
        Self {
            id: generate_id(),
            calling_name: new_player.calling_name,
            full_name: new_player.full_name,
            email: None,
            steam_id: None,
            discord_id: None,
            twitch_username: None,
            youtube_channel: None,
            bio: None,
            birth_date: None,
            country: None,
            city: None,
            language: None,
            avatar_id: None,
            profile_background_id: None,
            skill_level: None,
            total_matches_played: 0,
            total_wins: 0,
            win_rate: 0.0,
            preferred_game_ids: BTreeSet::new(),
            achievements: BTreeSet::new(),
            looking_for_team: false,
            availability: None,
            timezone: None,
            user_id: new_player.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: PlayerUpdate) {
        if let Some(calling_name) = update.calling_name {
            self.calling_name = calling_name;
        }

        assign_some!(
            self,
            update,
            [
                full_name,
                email,
                steam_id,
                discord_id,
                twitch_username,
                youtube_channel,
                bio,
                birth_date,
                country,
                city,
                language,
                skill_level,
                availability,
                timezone,
            ]
        );

        if let Some(played) = update.total_matches_played {
            self.total_matches_played = played;
        }
        if let Some(wins) = update.total_wins {
            self.total_wins = wins;
        }
        if let Some(games) = update.preferred_game_ids {
            self.preferred_game_ids = games;
        }
        if let Some(achievements) = update.achievements {
            self.achievements = achievements;
        }
        if let Some(looking) = update.looking_for_team {
            self.looking_for_team = looking;
        }

        self.win_rate = win_rate(self.total_wins, self.total_matches_played);
    }
}

/// Share of matches won, 0.0 when nothing has been played
pub fn win_rate(wins: u32, played: u32) -> f64 {
    if played == 0 {
        0.0
    } else {
        f64::from(wins.min(played)) / f64::from(played)
    }
}

impl Entity for Player {
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

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut player = Player::new(NewPlayer {
            calling_name: "miracle".to_string(),
            full_name: Some("Amer".to_string()),
            user_id: generate_id(),
        });

        player.apply(PlayerUpdate {
            country: Some("JO".to_string()),
            total_matches_played: Some(4),
            total_wins: Some(3),
            ..Default::default()
        });

        assert_eq!(player.calling_name, "miracle");
        assert_eq!(player.full_name.as_deref(), Some("Amer"));
        assert_eq!(player.country.as_deref(), Some("JO"));
        assert!((player.win_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(win_rate(5, 10), 0.5);
        assert_eq!(win_rate(12, 10), 1.0);
    }
}
