//! In-memory entity storage

use crate::error::{AscenderError, Result};
use crate::storage::{Entity, EntityStore};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory storage implementation backed by a `HashMap`
#[derive(Debug)]
pub struct InMemoryStore<T> {
    entities: RwLock<HashMap<Uuid, T>>,
    name: &'static str,
}

impl<T: Entity> InMemoryStore<T> {
    /// Create a new, empty store. `name` appears in lock error messages.
    pub fn new(name: &'static str) -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            name,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, T>>> {
        self.entities.read().map_err(|_| {
            AscenderError::InternalError {
                message: format!("Failed to acquire {} read lock", self.name),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, T>>> {
        self.entities.write().map_err(|_| {
            AscenderError::InternalError {
                message: format!("Failed to acquire {} write lock", self.name),
            }
            .into()
        })
    }

    fn sorted(mut entities: Vec<T>) -> Vec<T> {
        entities.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        entities
    }
}

impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    fn get(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn insert(&self, entity: T) -> Result<T> {
        let mut entities = self.write()?;
        entities.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    fn update(&self, id: &Uuid, apply: &mut dyn FnMut(&mut T) -> Result<()>) -> Result<Option<T>> {
        let mut entities = self.write()?;

        let Some(current) = entities.get(id) else {
            return Ok(None);
        };

        // Work on a copy so a failing closure leaves the stored entity intact
        let mut updated = current.clone();
        apply(&mut updated)?;
        updated.touch();

        entities.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    fn remove(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.write()?.remove(id))
    }

    fn list(&self) -> Result<Vec<T>> {
        let entities = self.read()?;
        Ok(Self::sorted(entities.values().cloned().collect()))
    }

    fn find_by(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>> {
        let entities = self.read()?;
        Ok(Self::sorted(
            entities.values().filter(|e| predicate(e)).cloned().collect(),
        ))
    }

    fn remove_where(&self, predicate: &dyn Fn(&T) -> bool) -> Result<usize> {
        let mut entities = self.write()?;
        let before = entities.len();
        entities.retain(|_, e| !predicate(e));
        Ok(before - entities.len())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
