//! Entity storage trait and related types.
//!
//! This module defines the persistence seam used by the shipping domain. The
//! domain never talks to a database directly; it loads, queries and saves
//! entities through [`EntityStorage`].
//!
//! # Design
//!
//! The trait is small:
//!
//! - Load one entity, or a batch of entities by id
//! - Query ids by a field equality condition
//! - Save (insert or update) and delete
//!
//! It does NOT provide transactions, locking or optimistic concurrency. Two
//! callers saving the same entity resolve last-writer-wins.
//!
//! # Implementations
//!
//! - `InMemoryEntityStorage` (in `commerce-shipping-testing`): fast, deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use commerce_shipping_core::storage::{EntityStorage, QueryCondition};
//!
//! async fn cancel_all(storage: &dyn EntityStorage<Shipment>, order_id: &OrderId) -> Result<(), StorageError> {
//!     let ids = storage.query(QueryCondition::equals("order_id", order_id.as_str())).await?;
//!     for mut shipment in storage.load_multiple(&ids).await? {
//!         shipment.set_state("canceled");
//!         storage.save(&mut shipment).await?;
//!     }
//!     Ok(())
//! }
//! ```

use crate::entity::Entity;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested entity does not exist.
    #[error("{entity_type} entity not found: {id}")]
    NotFound {
        /// Entity type that was looked up
        entity_type: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The storage backend rejected or failed the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// An entity could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result of a successful save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The entity did not exist and was inserted
    New,
    /// An existing entity was overwritten
    Updated,
}

/// Field equality condition for [`EntityStorage::query`].
///
/// # Examples
///
/// ```
/// use commerce_shipping_core::storage::QueryCondition;
///
/// let condition = QueryCondition::equals("order_id", "42");
/// assert_eq!(condition.field(), "order_id");
/// assert_eq!(condition.value(), "42");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryCondition {
    field: String,
    value: String,
}

impl QueryCondition {
    /// Matches entities whose `field` equals `value`
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Field name being compared
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Value the field must equal
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Evaluates the condition against an entity
    #[must_use]
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        entity
            .field_value(&self.field)
            .is_some_and(|value| value == self.value)
    }
}

impl fmt::Display for QueryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

/// Boxed future returned by storage operations.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Storage abstraction for one entity type.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single storage handle can be
/// shared (`Arc<dyn EntityStorage<E>>`) between subscribers and request code.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// to enable trait object usage (`Arc<dyn EntityStorage<Shipment>>`).
pub trait EntityStorage<E: Entity>: Send + Sync {
    /// Load a single entity.
    ///
    /// Returns `Ok(None)` when no entity has that id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend fails.
    fn load<'a>(&'a self, id: &'a E::Id) -> StorageFuture<'a, Option<E>>;

    /// Load several entities in one round trip.
    ///
    /// Entities are returned in the order of `ids`; ids with no entity are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend fails.
    fn load_multiple<'a>(&'a self, ids: &'a [E::Id]) -> StorageFuture<'a, Vec<E>>;

    /// Return the ids of every entity matching `condition`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend fails.
    fn query(&self, condition: QueryCondition) -> StorageFuture<'_, Vec<E::Id>>;

    /// Insert or overwrite an entity.
    ///
    /// Calls [`Entity::pre_save`] before writing, so the entity passed in
    /// reflects what was stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the write fails.
    fn save<'a>(&'a self, entity: &'a mut E) -> StorageFuture<'a, SaveOutcome>;

    /// Delete entities by id. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the delete fails.
    fn delete<'a>(&'a self, ids: &'a [E::Id]) -> StorageFuture<'a, ()>;
}
