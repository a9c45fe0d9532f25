//! Entity storage interface and implementations
//!
//! Every service persists its entities through [`EntityStore`]. The store
//! gives `update` closures exclusive access to one entity for the duration of
//! the call, which is what the match score mutators rely on.

pub mod memory;

pub use memory::InMemoryStore;

use crate::error::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Common surface of persisted entities
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    /// Refresh the modification timestamp
    fn touch(&mut self);
}

/// Trait for entity storage operations
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Get an entity by ID
    fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// Store a new entity, replacing any entity with the same ID
    fn insert(&self, entity: T) -> Result<T>;

    /// Mutate an entity in place under exclusive access.
    ///
    /// Returns `Ok(None)` when the entity does not exist. If the closure
    /// fails, the stored entity is left untouched and the error is returned.
    fn update(&self, id: &Uuid, apply: &mut dyn FnMut(&mut T) -> Result<()>) -> Result<Option<T>>;

    /// Remove an entity, returning it if it existed
    fn remove(&self, id: &Uuid) -> Result<Option<T>>;

    /// Check whether an entity exists
    fn exists(&self, id: &Uuid) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// All entities in creation order
    fn list(&self) -> Result<Vec<T>>;

    /// Entities matching a predicate, in creation order
    fn find_by(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>>;

    /// Remove every entity matching a predicate and return how many were removed
    fn remove_where(&self, predicate: &dyn Fn(&T) -> bool) -> Result<usize>;

    /// Total number of stored entities
    fn count(&self) -> Result<usize>;
}
