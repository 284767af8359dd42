//! In-memory entity storage for tests.
//!
//! [`InMemoryEntityStorage`] keeps entities in a `HashMap` and remembers
//! insertion order so queries return the oldest entity first. It can be told
//! to start failing saves, which is how tests exercise partial failures.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on lock poisoning

use crate::mocks::test_clock;
use commerce_shipping_core::entity::Entity;
use commerce_shipping_core::environment::Clock;
use commerce_shipping_core::storage::{
    EntityStorage, QueryCondition, SaveOutcome, StorageError, StorageFuture,
};
use std::collections::HashMap;
use std::future;
use std::sync::{Arc, RwLock};

struct Inner<E: Entity> {
    entities: HashMap<E::Id, E>,
    insertion_order: Vec<E::Id>,
    saves: usize,
    remaining_saves: Option<usize>,
}

/// In-memory storage for one entity type.
///
/// Clones share the same data, so a test can keep a handle while the code
/// under test holds an `Arc<dyn EntityStorage<E>>`.
///
/// # Example
///
/// ```ignore
/// let storage = InMemoryEntityStorage::<Shipment>::new();
/// storage.fail_saves_after(1);
///
/// storage.save(&mut first).await?;          // Ok
/// assert!(storage.save(&mut second).await.is_err());
/// ```
pub struct InMemoryEntityStorage<E: Entity> {
    inner: Arc<RwLock<Inner<E>>>,
    clock: Arc<dyn Clock>,
}

impl<E: Entity> InMemoryEntityStorage<E> {
    /// Create an empty storage stamped by [`test_clock`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(test_clock()))
    }

    /// Create an empty storage that passes `clock` time to [`Entity::pre_save`]
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entities: HashMap::new(),
                insertion_order: Vec::new(),
                saves: 0,
                remaining_saves: None,
            })),
            clock,
        }
    }

    /// Allow `count` more successful saves, then fail every save
    pub fn fail_saves_after(&self, count: usize) {
        self.inner.write().unwrap().remaining_saves = Some(count);
    }

    /// Stop failing saves
    pub fn clear_failures(&self) {
        self.inner.write().unwrap().remaining_saves = None;
    }

    /// Number of successful saves so far
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.read().unwrap().saves
    }

    /// Snapshot of a stored entity, bypassing the async API
    #[must_use]
    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.inner.read().unwrap().entities.get(id).cloned()
    }

    /// Number of stored entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entities.len()
    }

    /// Check if the storage is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().entities.is_empty()
    }

    fn save_now(&self, entity: &mut E) -> Result<SaveOutcome, StorageError> {
        let mut inner = self.inner.write().unwrap();

        if let Some(remaining) = inner.remaining_saves {
            if remaining == 0 {
                return Err(StorageError::Backend(format!(
                    "injected failure saving {} {}",
                    E::ENTITY_TYPE,
                    entity.id()
                )));
            }
            inner.remaining_saves = Some(remaining - 1);
        }

        entity.pre_save(self.clock.now());
        let id = entity.id().clone();
        let outcome = if inner.entities.insert(id.clone(), entity.clone()).is_some() {
            SaveOutcome::Updated
        } else {
            inner.insertion_order.push(id);
            SaveOutcome::New
        };
        inner.saves += 1;
        Ok(outcome)
    }
}

impl<E: Entity> Default for InMemoryEntityStorage<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for InMemoryEntityStorage<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<E: Entity> EntityStorage<E> for InMemoryEntityStorage<E> {
    fn load<'a>(&'a self, id: &'a E::Id) -> StorageFuture<'a, Option<E>> {
        Box::pin(future::ready(Ok::<_, StorageError>(self.get(id))))
    }

    fn load_multiple<'a>(&'a self, ids: &'a [E::Id]) -> StorageFuture<'a, Vec<E>> {
        let inner = self.inner.read().unwrap();
        let entities: Vec<E> = ids
            .iter()
            .filter_map(|id| inner.entities.get(id).cloned())
            .collect();
        Box::pin(future::ready(Ok::<_, StorageError>(entities)))
    }

    fn query(&self, condition: QueryCondition) -> StorageFuture<'_, Vec<E::Id>> {
        let inner = self.inner.read().unwrap();
        let ids: Vec<E::Id> = inner
            .insertion_order
            .iter()
            .filter(|id| {
                inner
                    .entities
                    .get(*id)
                    .is_some_and(|entity| condition.matches(entity))
            })
            .cloned()
            .collect();
        Box::pin(future::ready(Ok::<_, StorageError>(ids)))
    }

    fn save<'a>(&'a self, entity: &'a mut E) -> StorageFuture<'a, SaveOutcome> {
        Box::pin(future::ready(self.save_now(entity)))
    }

    fn delete<'a>(&'a self, ids: &'a [E::Id]) -> StorageFuture<'a, ()> {
        let mut inner = self.inner.write().unwrap();
        for id in ids {
            if inner.entities.remove(id).is_some() {
                inner.insertion_order.retain(|existing| existing != id);
            }
        }
        Box::pin(future::ready(Ok::<_, StorageError>(())))
    }
}
