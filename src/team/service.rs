//! Team service
//!
//! Every mutation is authorized against the calling user. Only the creator
//! may edit a team or its roster; any member may votekick a non-creator.

use crate::error::{AscenderError, Result};
use crate::storage::EntityStore;
use crate::team::model::{NewTeam, Team, TeamUpdate};
use crate::types::{GameId, TeamId, UserId};
use crate::utils::is_blank;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct TeamService {
    store: Arc<dyn EntityStore<Team>>,
}

impl TeamService {
    pub fn new(store: Arc<dyn EntityStore<Team>>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Team>> {
        self.store.list()
    }

    pub fn get(&self, id: TeamId) -> Result<Team> {
        self.store
            .get(&id)?
            .ok_or_else(|| AscenderError::not_found("Team", id).into())
    }

    pub fn exists(&self, id: TeamId) -> Result<bool> {
        self.store.exists(&id)
    }

    /// Whether `user_id` created the team. An unknown team has no creator.
    pub fn is_creator(&self, id: TeamId, user_id: UserId) -> Result<bool> {
        Ok(self
            .store
            .get(&id)?
            .is_some_and(|team| team.is_creator(user_id)))
    }

    /// Whether `user_id` is on the roster. An unknown team has no members.
    pub fn is_member(&self, id: TeamId, user_id: Uuid) -> Result<bool> {
        Ok(self
            .store
            .get(&id)?
            .is_some_and(|team| team.is_member(user_id)))
    }

    /// Create a team; the caller becomes its creator and first member
    pub fn create(&self, new_team: NewTeam, caller: UserId) -> Result<Team> {
        if is_blank(&new_team.name) {
            return Err(AscenderError::bad_request("Team name is required").into());
        }

        let team = self.store.insert(Team::new(new_team, caller))?;
        info!("User {} created team {} ({})", caller, team.name, team.id);
        Ok(team)
    }

    pub fn update(&self, id: TeamId, update: TeamUpdate, caller: UserId) -> Result<Team> {
        self.ensure_creator(id, caller, "update the team")?;
        if update.name.as_deref().is_some_and(is_blank) {
            return Err(AscenderError::bad_request("Team name must not be blank").into());
        }

        let mut update = Some(update);
        self.modify(id, &mut |team| {
            if let Some(update) = update.take() {
                team.apply(update);
            }
        })
    }

    pub fn delete(&self, id: TeamId, caller: UserId) -> Result<()> {
        self.ensure_creator(id, caller, "delete the team")?;

        self.store
            .remove(&id)?
            .ok_or_else(|| AscenderError::not_found("Team", id))?;
        info!("User {} deleted team {}", caller, id);
        Ok(())
    }

    pub fn add_player(&self, id: TeamId, player_id: Uuid, caller: UserId) -> Result<Team> {
        self.ensure_creator(id, caller, "add players")?;
        self.add_member(id, player_id)
    }

    pub fn remove_player(&self, id: TeamId, player_id: Uuid, caller: UserId) -> Result<Team> {
        self.ensure_creator(id, caller, "remove players")?;
        self.remove_member(id, player_id)
    }

    /// Remove `target` from the roster on behalf of a fellow member
    pub fn votekick(&self, id: TeamId, target: Uuid, caller: UserId) -> Result<Team> {
        if !self.is_member(id, caller)? {
            return Err(AscenderError::forbidden("You are not a member of this team").into());
        }
        if self.is_creator(id, target)? {
            return Err(AscenderError::forbidden("You cannot votekick the team creator").into());
        }

        info!("User {} votekicked {} from team {}", caller, target, id);
        self.remove_member(id, target)
    }

    pub fn by_game(&self, game_id: GameId) -> Result<Vec<Team>> {
        self.store.find_by(&|team| team.game_ids.contains(&game_id))
    }

    pub fn by_creator(&self, creator_id: UserId) -> Result<Vec<Team>> {
        self.store.find_by(&|team| team.creator_id == creator_id)
    }

    pub fn by_player(&self, player_id: Uuid) -> Result<Vec<Team>> {
        self.store.find_by(&|team| team.is_member(player_id))
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }

    /// Add a member without an authorization check. Used when a join request
    /// is accepted by the creator.
    pub(crate) fn add_member(&self, id: TeamId, player_id: Uuid) -> Result<Team> {
        let team = self.modify(id, &mut |team| {
            team.player_ids.insert(player_id);
        })?;
        debug!("Player {} joined team {}", player_id, id);
        Ok(team)
    }

    fn remove_member(&self, id: TeamId, player_id: Uuid) -> Result<Team> {
        let team = self.modify(id, &mut |team| {
            team.player_ids.remove(&player_id);
        })?;
        debug!("Player {} left team {}", player_id, id);
        Ok(team)
    }

    fn ensure_creator(&self, id: TeamId, caller: UserId, action: &str) -> Result<()> {
        if self.is_creator(id, caller)? {
            Ok(())
        } else {
            Err(AscenderError::forbidden(format!("Only the team creator can {}", action)).into())
        }
    }

    fn modify(&self, id: TeamId, change: &mut dyn FnMut(&mut Team)) -> Result<Team> {
        self.store
            .update(&id, &mut |team| {
                change(team);
                Ok(())
            })?
            .ok_or_else(|| AscenderError::not_found("Team", id).into())
    }
}
