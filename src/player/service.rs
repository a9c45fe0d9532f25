//! Player profile service

use crate::error::{AscenderError, Result};
use crate::player::model::{NewPlayer, Player, PlayerUpdate};
use crate::storage::EntityStore;
use crate::types::{PlayerId, UserId};
use crate::utils::is_blank;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn EntityStore<Player>>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn EntityStore<Player>>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Player>> {
        self.store.list()
    }

    pub fn get(&self, id: PlayerId) -> Result<Player> {
        self.store
            .get(&id)?
            .ok_or_else(|| AscenderError::not_found("Player", id).into())
    }

    /// Register a profile. Each user owns at most one player profile.
    pub fn create(&self, new_player: NewPlayer) -> Result<Player> {
        if is_blank(&new_player.calling_name) {
            return Err(AscenderError::bad_request("Calling name is required").into());
        }

        let user_id = new_player.user_id;
        if !self.store.find_by(&|p| p.user_id == user_id)?.is_empty() {
            return Err(AscenderError::bad_request(format!(
                "User {} already has a player profile",
                user_id
            ))
            .into());
        }

        let player = self.store.insert(Player::new(new_player))?;
        info!("Created player {} ({})", player.calling_name, player.id);
        Ok(player)
    }

    pub fn update(&self, id: PlayerId, update: PlayerUpdate) -> Result<Player> {
        if update.calling_name.as_deref().is_some_and(is_blank) {
            return Err(AscenderError::bad_request("Calling name must not be blank").into());
        }

        let mut update = Some(update);
        let player = self.modify(id, &mut |player| {
            if let Some(update) = update.take() {
                player.apply(update);
            }
        })?;
        debug!("Updated player {}", id);
        Ok(player)
    }

    pub fn delete(&self, id: PlayerId) -> Result<()> {
        self.store
            .remove(&id)?
            .ok_or_else(|| AscenderError::not_found("Player", id))?;
        info!("Deleted player {}", id);
        Ok(())
    }

    pub fn by_skill_level(&self, level: &str) -> Result<Vec<Player>> {
        self.store
            .find_by(&|p| p.skill_level.as_deref() == Some(level))
    }

    pub fn looking_for_team(&self) -> Result<Vec<Player>> {
        self.store.find_by(&|p| p.looking_for_team)
    }

    pub fn by_user(&self, user_id: UserId) -> Result<Player> {
        self.store
            .find_by(&|p| p.user_id == user_id)?
            .into_iter()
            .next()
            .ok_or_else(|| AscenderError::not_found("Player for user", user_id).into())
    }

    pub fn set_avatar(&self, id: PlayerId, avatar_id: Uuid) -> Result<Player> {
        self.modify(id, &mut |player| player.avatar_id = Some(avatar_id))
    }

    pub fn set_background(&self, id: PlayerId, background_id: Uuid) -> Result<Player> {
        self.modify(id, &mut |player| {
            player.profile_background_id = Some(background_id)
        })
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }

    fn modify(&self, id: PlayerId, change: &mut dyn FnMut(&mut Player)) -> Result<Player> {
        self.store
            .update(&id, &mut |player| {
                change(player);
                Ok(())
            })?
            .ok_or_else(|| AscenderError::not_found("Player", id).into())
    }
}
