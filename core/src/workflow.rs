//! Workflow state field and transition events.
//!
//! Transition legality is owned by an external state machine. This module only
//! models what the shipping domain touches:
//!
//! - [`StateItem`]: the raw state string stored on an entity
//! - [`WorkflowTransitionEvent`]: the payload fired around a transition
//!
//! # Event Naming Convention
//!
//! Transition events are named `{workflow_group}.{transition_id}.{phase}`,
//! where phase is `pre_transition` or `post_transition`:
//!
//! - `order.cancel.pre_transition`
//! - `order.cancel.post_transition`
//! - `order.place.post_transition`

use serde::{Deserialize, Serialize};
use std::fmt;

/// The workflow state field of an entity.
///
/// Holds the current state as an opaque string. Writing `value` performs no
/// legality check.
///
/// # Examples
///
/// ```
/// use commerce_shipping_core::workflow::StateItem;
///
/// let mut state = StateItem::new("ready");
/// assert_eq!(state.value, "ready");
///
/// state.set_value("shipped");
/// assert_eq!(state.value(), "shipped");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateItem {
    /// The current state identifier
    pub value: String,
}

impl StateItem {
    /// Creates a state field holding the given state
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the current state identifier
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Overwrites the current state identifier
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Returns true if the current state equals `state`
    #[must_use]
    pub fn is(&self, state: &str) -> bool {
        self.value == state
    }
}

impl fmt::Display for StateItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Phase of a workflow transition an event is fired in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Fired before the new state is applied
    Pre,
    /// Fired after the transition has been committed
    Post,
}

impl TransitionPhase {
    /// Returns the event-name suffix for this phase
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Pre => "pre_transition",
            Self::Post => "post_transition",
        }
    }
}

/// Builds a transition event name from its parts.
///
/// # Examples
///
/// ```
/// use commerce_shipping_core::workflow::{transition_event_name, TransitionPhase};
///
/// assert_eq!(
///     transition_event_name("order", "cancel", TransitionPhase::Post),
///     "order.cancel.post_transition"
/// );
/// ```
#[must_use]
pub fn transition_event_name(
    workflow_group: &str,
    transition_id: &str,
    phase: TransitionPhase,
) -> String {
    format!("{workflow_group}.{transition_id}.{}", phase.suffix())
}

/// Event fired by a state machine when an entity moves through a transition.
///
/// The payload carries the entity as it was when the event was fired, plus the
/// states on both sides of the transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowTransitionEvent<E> {
    entity: E,
    workflow_group: String,
    transition_id: String,
    from_state: String,
    to_state: String,
}

impl<E> WorkflowTransitionEvent<E> {
    /// Creates a new transition event
    #[must_use]
    pub fn new(
        entity: E,
        workflow_group: impl Into<String>,
        transition_id: impl Into<String>,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
    ) -> Self {
        Self {
            entity,
            workflow_group: workflow_group.into(),
            transition_id: transition_id.into(),
            from_state: from_state.into(),
            to_state: to_state.into(),
        }
    }

    /// The entity that went through the transition
    pub const fn entity(&self) -> &E {
        &self.entity
    }

    /// Workflow group the transition belongs to (e.g. `order`)
    #[must_use]
    pub fn workflow_group(&self) -> &str {
        &self.workflow_group
    }

    /// Transition identifier (e.g. `cancel`)
    #[must_use]
    pub fn transition_id(&self) -> &str {
        &self.transition_id
    }

    /// State before the transition
    #[must_use]
    pub fn from_state(&self) -> &str {
        &self.from_state
    }

    /// State after the transition
    #[must_use]
    pub fn to_state(&self) -> &str {
        &self.to_state
    }

    /// Event name this payload is dispatched under for `phase`
    #[must_use]
    pub fn event_name(&self, phase: TransitionPhase) -> String {
        transition_event_name(&self.workflow_group, &self.transition_id, phase)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn state_item_serializes_as_plain_string() {
        let state = StateItem::new("ready");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"ready\"");

        let back: StateItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn state_item_overwrite_has_no_guard() {
        let mut state = StateItem::new("shipped");
        state.set_value("canceled");
        assert!(state.is("canceled"));
        assert_eq!(state.to_string(), "canceled");
    }

    #[test]
    fn event_names_per_phase() {
        let event = WorkflowTransitionEvent::new((), "order", "cancel", "placed", "canceled");
        assert_eq!(
            event.event_name(TransitionPhase::Pre),
            "order.cancel.pre_transition"
        );
        assert_eq!(
            event.event_name(TransitionPhase::Post),
            "order.cancel.post_transition"
        );
        assert_eq!(event.from_state(), "placed");
        assert_eq!(event.to_state(), "canceled");
    }
}
