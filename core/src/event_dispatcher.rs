//! Synchronous, priority-ordered event dispatch.
//!
//! The [`EventDispatcher`] maps event names to listeners. Listeners are
//! registered with a numeric priority and are awaited one after another when
//! an event is dispatched:
//!
//! - Higher priority runs first
//! - Equal priorities run in registration order
//! - The first listener error stops dispatch and is returned to the caller
//!
//! ```text
//!   dispatch("order.cancel.post_transition")
//!          │
//!          ▼
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │ priority 100 │──►│ priority 0   │──►│ priority -100│
//!   └──────────────┘   └──────────────┘   └──────────────┘
//!                          │ Err
//!                          ▼
//!                    returned to caller, later listeners skipped
//! ```
//!
//! There is no parallelism and no retry. Subscribers that need to observe the
//! world before another subscriber changes it register with a higher priority.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`EventListener::handle`].
pub type ListenerFuture<'a, Err> = Pin<Box<dyn Future<Output = Result<(), Err>> + Send + 'a>>;

/// A handler for events of type `E`.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so listeners can be stored as `Arc<dyn EventListener<E, Err>>`.
pub trait EventListener<E, Err>: Send + Sync {
    /// Handle one dispatched event.
    ///
    /// # Errors
    ///
    /// Any error stops the dispatch loop and is returned from
    /// [`EventDispatcher::dispatch`].
    fn handle<'a>(&'a self, event_name: &'a str, event: &'a E) -> ListenerFuture<'a, Err>;

    /// Name used in log output
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// One `(event name, priority)` pair a subscriber wants to be registered for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    /// Event name to listen to
    pub event_name: String,
    /// Higher runs earlier
    pub priority: i32,
}

impl Subscription {
    /// Creates a subscription
    #[must_use]
    pub fn new(event_name: impl Into<String>, priority: i32) -> Self {
        Self {
            event_name: event_name.into(),
            priority,
        }
    }
}

/// A listener that declares its own subscriptions.
pub trait EventSubscriber<E, Err>: EventListener<E, Err> {
    /// Events this subscriber listens to, with their priorities
    fn subscribed_events(&self) -> Vec<Subscription>;
}

/// Adapts a synchronous closure into an [`EventListener`].
///
/// # Examples
///
/// ```
/// use commerce_shipping_core::event_dispatcher::{EventDispatcher, FnListener};
/// use std::sync::Arc;
///
/// let mut dispatcher: EventDispatcher<u32, String> = EventDispatcher::new();
/// dispatcher.add_listener(
///     "tick",
///     0,
///     Arc::new(FnListener::new(|_name: &str, n: &u32| {
///         if *n > 10 { Err("too big".to_string()) } else { Ok(()) }
///     })),
/// );
/// assert!(dispatcher.has_listeners("tick"));
/// ```
pub struct FnListener<F> {
    handler: F,
}

impl<F> FnListener<F> {
    /// Wraps `handler`
    pub const fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<E, Err, F> EventListener<E, Err> for FnListener<F>
where
    E: Sync,
    Err: Send + 'static,
    F: Fn(&str, &E) -> Result<(), Err> + Send + Sync,
{
    fn handle<'a>(&'a self, event_name: &'a str, event: &'a E) -> ListenerFuture<'a, Err> {
        let result = (self.handler)(event_name, event);
        Box::pin(async move { result })
    }
}

struct RegisteredListener<E, Err> {
    priority: i32,
    listener: Arc<dyn EventListener<E, Err>>,
}

impl<E, Err> Clone for RegisteredListener<E, Err> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            listener: Arc::clone(&self.listener),
        }
    }
}

/// Name-keyed registry of prioritized listeners.
///
/// # Type Parameters
///
/// - `E`: event payload type
/// - `Err`: error type listeners may fail with
pub struct EventDispatcher<E, Err> {
    listeners: HashMap<String, Vec<RegisteredListener<E, Err>>>,
}

impl<E, Err> EventDispatcher<E, Err>
where
    E: Sync + 'static,
    Err: fmt::Display + 'static,
{
    /// Creates an empty dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Registers `listener` for `event_name` at `priority`.
    ///
    /// The listener is placed after every existing listener with a priority
    /// greater than or equal to its own.
    pub fn add_listener(
        &mut self,
        event_name: impl Into<String>,
        priority: i32,
        listener: Arc<dyn EventListener<E, Err>>,
    ) {
        let event_name = event_name.into();
        tracing::debug!(
            event = %event_name,
            priority,
            listener = listener.name(),
            "Registering event listener"
        );
        let entries = self.listeners.entry(event_name).or_default();
        let position = entries.partition_point(|entry| entry.priority >= priority);
        entries.insert(position, RegisteredListener { priority, listener });
    }

    /// Registers `subscriber` for every event it subscribes to.
    pub fn add_subscriber<S>(&mut self, subscriber: Arc<S>)
    where
        S: EventSubscriber<E, Err> + 'static,
    {
        for subscription in subscriber.subscribed_events() {
            let listener: Arc<dyn EventListener<E, Err>> = subscriber.clone();
            self.add_listener(subscription.event_name, subscription.priority, listener);
        }
    }

    /// Returns true if anything listens to `event_name`
    #[must_use]
    pub fn has_listeners(&self, event_name: &str) -> bool {
        self.listeners
            .get(event_name)
            .is_some_and(|entries| !entries.is_empty())
    }

    /// Listener names and priorities for `event_name`, in dispatch order
    #[must_use]
    pub fn listeners(&self, event_name: &str) -> Vec<(&'static str, i32)> {
        self.listeners
            .get(event_name)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| (entry.listener.name(), entry.priority))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dispatch `event` to every listener of `event_name`.
    ///
    /// Returns how many listeners ran. Dispatching an event nobody listens
    /// to is a no-op returning `Ok(0)`.
    ///
    /// # Errors
    ///
    /// Returns the first listener error. Listeners after the failing one are
    /// not invoked and nothing already done is undone.
    pub async fn dispatch(&self, event_name: &str, event: &E) -> Result<usize, Err> {
        let Some(entries) = self.listeners.get(event_name) else {
            tracing::trace!(event = event_name, "No listeners registered");
            return Ok(0);
        };

        tracing::debug!(
            event = event_name,
            listeners = entries.len(),
            "Dispatching event"
        );

        for entry in entries {
            if let Err(error) = entry.listener.handle(event_name, event).await {
                tracing::error!(
                    event = event_name,
                    listener = entry.listener.name(),
                    priority = entry.priority,
                    %error,
                    "Event listener failed, stopping dispatch"
                );
                return Err(error);
            }
        }

        Ok(entries.len())
    }
}

impl<E, Err> Default for EventDispatcher<E, Err>
where
    E: Sync + 'static,
    Err: fmt::Display + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, Err> Clone for EventDispatcher<E, Err> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E, Err> fmt::Debug for EventDispatcher<E, Err> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, entries) in &self.listeners {
            map.entry(name, &entries.len());
        }
        map.finish()
    }
}
