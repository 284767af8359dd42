//! Entity capability traits.
//!
//! A persisted record is a plain struct that opts into capabilities by
//! implementing the traits below. There is no base class: storage only needs
//! [`Entity`], and the other traits describe optional behavior.
//!
//! | Capability   | Trait               |
//! |--------------|---------------------|
//! | identifiable | [`Entity`]          |
//! | timestamped  | [`EntityChanged`]   |
//! | adjustable   | [`EntityAdjustable`]|
//! | stateful     | [`EntityWithState`] |

use crate::workflow::StateItem;
use chrono::{DateTime, Utc};
use std::fmt;
use std::hash::Hash;

/// A record that can be stored by an [`EntityStorage`](crate::storage::EntityStorage).
///
/// # Field Queries
///
/// Storage backends answer equality queries by asking the entity for the
/// string form of a named field through [`Entity::field_value`]. Fields that
/// are unset or unknown return `None` and never match a condition.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identifier type
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Machine name of the entity type (e.g. `commerce_shipment`)
    const ENTITY_TYPE: &'static str;

    /// The entity identifier
    fn id(&self) -> &Self::Id;

    /// String value of a queryable field, `None` if unset or unknown
    fn field_value(&self, field: &str) -> Option<String>;

    /// Hook invoked by storage right before the entity is written
    fn pre_save(&mut self, _now: DateTime<Utc>) {}
}

/// Entities that track their last modification time.
pub trait EntityChanged {
    /// UNIX timestamp of the last save
    fn changed_time(&self) -> i64;

    /// Sets the last modification timestamp
    fn set_changed_time(&mut self, timestamp: i64) -> &mut Self;
}

/// Entities that carry an ordered list of price adjustments.
///
/// Adjustments compare by value: removal drops the first equal entry and is a
/// no-op when nothing matches.
pub trait EntityAdjustable {
    /// Adjustment value type
    type Adjustment: Clone + PartialEq;

    /// Adjustments in the order they were added
    fn adjustments(&self) -> &[Self::Adjustment];

    /// Replaces every adjustment
    fn set_adjustments(&mut self, adjustments: Vec<Self::Adjustment>) -> &mut Self;

    /// Appends an adjustment
    fn add_adjustment(&mut self, adjustment: Self::Adjustment) -> &mut Self;

    /// Removes the first adjustment equal to `adjustment`
    fn remove_adjustment(&mut self, adjustment: &Self::Adjustment) -> &mut Self;
}

/// Entities whose lifecycle is governed by a workflow.
pub trait EntityWithState {
    /// The workflow state field
    fn state(&self) -> &StateItem;
}
