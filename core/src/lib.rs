//! # Commerce Shipping Core
//!
//! Host-framework abstractions the shipping domain is built on.
//!
//! The shipping crate does not own a database, a workflow engine or an event
//! bus. It talks to them through the seams defined here:
//!
//! - [`entity`]: capability traits every persisted record implements
//!   (identifiable, timestamped, adjustable, stateful)
//! - [`storage`]: the [`EntityStorage`](storage::EntityStorage) trait for
//!   load, batch load, field queries, save and delete
//! - [`event_dispatcher`]: synchronous, priority-ordered event dispatch
//! - [`workflow`]: the raw workflow state field and transition events
//! - [`environment`]: injected dependencies such as the [`Clock`](environment::Clock)
//!
//! ## Example
//!
//! ```ignore
//! use commerce_shipping_core::event_dispatcher::EventDispatcher;
//! use commerce_shipping_core::workflow::{TransitionPhase, WorkflowTransitionEvent};
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.add_subscriber(Arc::new(OrderCanceledSubscriber::new(shipments)));
//!
//! let event = WorkflowTransitionEvent::new(order, "order", "cancel", "draft", "canceled");
//! dispatcher.dispatch(&event.event_name(TransitionPhase::Post), &event).await?;
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod entity;
pub mod event_dispatcher;
pub mod storage;
pub mod workflow;

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected where
/// they are needed, so tests can swap in deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use commerce_shipping_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// assert!(clock.now().timestamp() > 0);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Get the current time as a UNIX timestamp in seconds
        fn timestamp(&self) -> i64 {
            self.now().timestamp()
        }
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
