//! Cancels shipments when their order is canceled.
//!
//! ```text
//! order workflow ── order.cancel.post_transition ──► EventDispatcher
//!                                                        │ priority -100
//!                                                        ▼
//!                                           OrderCanceledSubscriber
//!                                                        │
//!                           query(order_id = order.id) ◄─┤
//!                           load_multiple(ids)         ◄─┤
//!                           for each: state = canceled,  │
//!                                     save             ◄─┘
//! ```
//!
//! There is no transaction around the loop. If a save fails, the shipments
//! saved before it stay canceled, the rest keep their old state, and the
//! error goes back to whoever dispatched the event.

use crate::config::{CancellationPolicy, ShippingConfig};
use crate::error::ShippingError;
use crate::shipment::{Shipment, states};
use crate::types::Order;
use commerce_shipping_core::event_dispatcher::{
    EventListener, EventSubscriber, ListenerFuture, Subscription,
};
use commerce_shipping_core::storage::{EntityStorage, QueryCondition};
use commerce_shipping_core::workflow::WorkflowTransitionEvent;
use std::sync::Arc;

/// Transition event fired by the order workflow
pub type OrderTransitionEvent = WorkflowTransitionEvent<Order>;

/// Dispatcher carrying order transition events
pub type OrderEventDispatcher =
    commerce_shipping_core::event_dispatcher::EventDispatcher<OrderTransitionEvent, ShippingError>;

/// Moves every shipment of a canceled order to the `canceled` state.
///
/// With the default [`CancellationPolicy::Unconditional`] the current
/// shipment state is not looked at, so a shipment that has already shipped
/// is overwritten as well.
pub struct OrderCanceledSubscriber {
    shipments: Arc<dyn EntityStorage<Shipment>>,
    event_name: String,
    priority: i32,
    policy: CancellationPolicy,
}

impl OrderCanceledSubscriber {
    /// Creates a subscriber with the default configuration
    #[must_use]
    pub fn new(shipments: Arc<dyn EntityStorage<Shipment>>) -> Self {
        Self::with_config(shipments, &ShippingConfig::default())
    }

    /// Creates a subscriber from `config`
    #[must_use]
    pub fn with_config(shipments: Arc<dyn EntityStorage<Shipment>>, config: &ShippingConfig) -> Self {
        Self {
            shipments,
            event_name: config.cancel_event_name.clone(),
            priority: config.cancel_subscriber_priority,
            policy: config.cancellation_policy.clone(),
        }
    }

    /// Cancels the shipments that reference the event's order.
    ///
    /// Returns how many shipments were saved as canceled.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Storage`] if the query, the batch load or
    /// any save fails. Nothing is retried or rolled back.
    #[tracing::instrument(skip(self, event), fields(order_id = %event.entity().id()))]
    pub async fn cancel_shipments(&self, event: &OrderTransitionEvent) -> Result<usize, ShippingError> {
        let order = event.entity();
        let ids = self
            .shipments
            .query(QueryCondition::equals("order_id", order.id().as_str()))
            .await?;

        if ids.is_empty() {
            tracing::debug!("Order has no shipments");
            return Ok(0);
        }

        let shipments = self.shipments.load_multiple(&ids).await?;
        let mut canceled = 0;

        for mut shipment in shipments {
            if !self.policy.allows(shipment.state()) {
                tracing::warn!(
                    shipment_id = %shipment.id(),
                    state = %shipment.state(),
                    "Leaving shipment untouched by cancellation policy"
                );
                continue;
            }

            shipment.set_state(states::CANCELED);
            if let Err(error) = self.shipments.save(&mut shipment).await {
                tracing::error!(
                    shipment_id = %shipment.id(),
                    canceled,
                    %error,
                    "Failed to save canceled shipment"
                );
                return Err(error.into());
            }
            tracing::debug!(shipment_id = %shipment.id(), "Shipment canceled");
            canceled += 1;
        }

        tracing::info!(canceled, "Canceled order shipments");
        Ok(canceled)
    }
}

impl EventListener<OrderTransitionEvent, ShippingError> for OrderCanceledSubscriber {
    fn handle<'a>(
        &'a self,
        _event_name: &'a str,
        event: &'a OrderTransitionEvent,
    ) -> ListenerFuture<'a, ShippingError> {
        Box::pin(async move { self.cancel_shipments(event).await.map(|_| ()) })
    }

    fn name(&self) -> &'static str {
        "OrderCanceledSubscriber"
    }
}

impl EventSubscriber<OrderTransitionEvent, ShippingError> for OrderCanceledSubscriber {
    fn subscribed_events(&self) -> Vec<Subscription> {
        vec![Subscription::new(self.event_name.clone(), self.priority)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CANCEL_EVENT, DEFAULT_CANCEL_PRIORITY};
    use crate::types::ShipmentId;
    use commerce_shipping_core::storage::{SaveOutcome, StorageError, StorageFuture};

    struct NoStorage;

    impl EntityStorage<Shipment> for NoStorage {
        fn load<'a>(&'a self, _id: &'a ShipmentId) -> StorageFuture<'a, Option<Shipment>> {
            Box::pin(async { Ok::<Option<Shipment>, StorageError>(None) })
        }

        fn load_multiple<'a>(
            &'a self,
            _ids: &'a [ShipmentId],
        ) -> StorageFuture<'a, Vec<Shipment>> {
            Box::pin(async { Ok::<Vec<Shipment>, StorageError>(Vec::new()) })
        }

        fn query(&self, _condition: QueryCondition) -> StorageFuture<'_, Vec<ShipmentId>> {
            Box::pin(async { Ok::<Vec<ShipmentId>, StorageError>(Vec::new()) })
        }

        fn save<'a>(&'a self, _entity: &'a mut Shipment) -> StorageFuture<'a, SaveOutcome> {
            Box::pin(async { Ok::<_, StorageError>(SaveOutcome::Updated) })
        }

        fn delete<'a>(&'a self, _ids: &'a [ShipmentId]) -> StorageFuture<'a, ()> {
            Box::pin(async { Ok::<_, StorageError>(()) })
        }
    }

    #[test]
    fn subscribes_late_to_order_cancel() {
        let subscriber = OrderCanceledSubscriber::new(Arc::new(NoStorage));
        assert_eq!(
            subscriber.subscribed_events(),
            vec![Subscription::new(DEFAULT_CANCEL_EVENT, DEFAULT_CANCEL_PRIORITY)]
        );
        assert_eq!(DEFAULT_CANCEL_EVENT, "order.cancel.post_transition");
        assert_eq!(DEFAULT_CANCEL_PRIORITY, -100);
    }

    #[test]
    fn subscription_follows_config() {
        let config = ShippingConfig::default()
            .with_cancel_event_name("order.void.post_transition")
            .with_cancel_subscriber_priority(10);
        let subscriber = OrderCanceledSubscriber::with_config(Arc::new(NoStorage), &config);
        assert_eq!(
            subscriber.subscribed_events(),
            vec![Subscription::new("order.void.post_transition", 10)]
        );
    }
}
