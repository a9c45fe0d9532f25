//! Game catalog service

use crate::error::{AscenderError, Result};
use crate::game::model::{Game, GameDraft};
use crate::storage::EntityStore;
use crate::types::GameId;
use crate::utils::is_blank;
use std::sync::Arc;
use tracing::{debug, info};

/// CRUD operations over the game catalog
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn EntityStore<Game>>,
}

impl GameService {
    pub fn new(store: Arc<dyn EntityStore<Game>>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Game>> {
        self.store.list()
    }

    pub fn get(&self, id: GameId) -> Result<Game> {
        self.store
            .get(&id)?
            .ok_or_else(|| AscenderError::not_found("Game", id).into())
    }

    pub fn exists(&self, id: GameId) -> Result<bool> {
        self.store.exists(&id)
    }

    pub fn create(&self, draft: GameDraft) -> Result<Game> {
        validate(&draft)?;

        let game = self.store.insert(Game::from_draft(draft))?;
        info!("Created game {} ({})", game.name, game.id);
        Ok(game)
    }

    pub fn update(&self, id: GameId, draft: GameDraft) -> Result<Game> {
        validate(&draft)?;

        let mut draft = Some(draft);
        let updated = self.store.update(&id, &mut |game| {
            if let Some(draft) = draft.take() {
                game.apply(draft);
            }
            Ok(())
        })?;

        let game = updated.ok_or_else(|| AscenderError::not_found("Game", id))?;
        debug!("Updated game {}", id);
        Ok(game)
    }

    pub fn delete(&self, id: GameId) -> Result<()> {
        self.store
            .remove(&id)?
            .ok_or_else(|| AscenderError::not_found("Game", id))?;
        info!("Deleted game {}", id);
        Ok(())
    }

    /// Games that support scrimmages
    pub fn scrimable(&self) -> Result<Vec<Game>> {
        self.store.find_by(&|game| game.scrimable)
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }
}

fn validate(draft: &GameDraft) -> Result<()> {
    if is_blank(&draft.name) {
        return Err(AscenderError::bad_request("Game name must not be blank").into());
    }
    Ok(())
}
