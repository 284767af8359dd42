//! Configuration for the shipping extension.
//!
//! Loads from environment variables (after a `.env` file, if present) or
//! from an explicit dotenv file, with defaults matching the stock
//! behavior: the cancellation subscriber listens to
//! `order.cancel.post_transition` at priority `-100` and overwrites every
//! shipment state unconditionally.

use crate::error::ShippingError;
use commerce_shipping_core::workflow::StateItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Event the cancellation subscriber listens to by default
pub const DEFAULT_CANCEL_EVENT: &str = "order.cancel.post_transition";

/// Default priority of the cancellation subscriber (runs late)
pub const DEFAULT_CANCEL_PRIORITY: i32 = -100;

/// Which shipments an order cancellation may touch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancellationPolicy {
    /// Cancel every shipment of the order, whatever its current state.
    ///
    /// A shipment that already left the warehouse is still forced to
    /// `canceled`.
    #[default]
    Unconditional,
    /// Leave shipments in any of these states untouched.
    SkipStates(Vec<String>),
}

impl CancellationPolicy {
    /// Returns true if a shipment in `state` may be canceled
    #[must_use]
    pub fn allows(&self, state: &StateItem) -> bool {
        match self {
            Self::Unconditional => true,
            Self::SkipStates(states) => !states.iter().any(|skipped| state.is(skipped)),
        }
    }

    /// Parses a comma separated state list; blank input means `Unconditional`
    #[must_use]
    pub fn from_skip_list(list: &str) -> Self {
        let states: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|state| !state.is_empty())
            .map(str::to_string)
            .collect();
        if states.is_empty() {
            Self::Unconditional
        } else {
            Self::SkipStates(states)
        }
    }
}

/// Shipping configuration.
///
/// # Example
///
/// ```
/// use commerce_shipping::config::{CancellationPolicy, ShippingConfig};
///
/// let config = ShippingConfig::default()
///     .with_cancel_subscriber_priority(-50)
///     .with_cancellation_policy(CancellationPolicy::SkipStates(vec!["shipped".into()]));
///
/// assert_eq!(config.cancel_event_name, "order.cancel.post_transition");
/// assert_eq!(config.cancel_subscriber_priority, -50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingConfig {
    /// Event name the cancellation subscriber listens to
    pub cancel_event_name: String,
    /// Priority of the cancellation subscriber
    pub cancel_subscriber_priority: i32,
    /// Which shipments a cancellation may touch
    pub cancellation_policy: CancellationPolicy,
}

impl ShippingConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SHIPPING_CANCEL_EVENT`
    /// - `SHIPPING_CANCEL_PRIORITY`
    /// - `SHIPPING_CANCEL_SKIP_STATES` (comma separated)
    ///
    /// A `.env` file in the working directory or its parents is loaded
    /// first; variables already set in the process win. Missing or
    /// unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                tracing::warn!(%error, "Ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from a dotenv-format file without touching the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Config`] if the file cannot be read or a
    /// line cannot be parsed.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ShippingError> {
        let path = path.as_ref();
        let values = dotenvy::from_path_iter(path)
            .and_then(Iterator::collect::<Result<HashMap<String, String>, _>>)
            .map_err(|error| ShippingError::Config(format!("{}: {error}", path.display())))?;
        Ok(Self::from_lookup(|key| values.get(key).cloned()))
    }

    /// Load configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            cancel_event_name: lookup("SHIPPING_CANCEL_EVENT")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.cancel_event_name),
            cancel_subscriber_priority: lookup("SHIPPING_CANCEL_PRIORITY")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.cancel_subscriber_priority),
            cancellation_policy: lookup("SHIPPING_CANCEL_SKIP_STATES")
                .map(|list| CancellationPolicy::from_skip_list(&list))
                .unwrap_or(defaults.cancellation_policy),
        }
    }

    /// Set the cancellation event name
    #[must_use]
    pub fn with_cancel_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.cancel_event_name = event_name.into();
        self
    }

    /// Set the cancellation subscriber priority
    #[must_use]
    pub const fn with_cancel_subscriber_priority(mut self, priority: i32) -> Self {
        self.cancel_subscriber_priority = priority;
        self
    }

    /// Set the cancellation policy
    #[must_use]
    pub fn with_cancellation_policy(mut self, policy: CancellationPolicy) -> Self {
        self.cancellation_policy = policy;
        self
    }
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            cancel_event_name: DEFAULT_CANCEL_EVENT.to_string(),
            cancel_subscriber_priority: DEFAULT_CANCEL_PRIORITY,
            cancellation_policy: CancellationPolicy::Unconditional,
        }
    }
}
