//! Shared fixtures for shipping integration tests

#![allow(dead_code)] // Not every test binary uses every fixture
#![allow(clippy::unwrap_used)] // Tests can unwrap

use commerce_shipping::shipment::Shipment;
use commerce_shipping::types::{Order, OrderId, ShipmentId};
use commerce_shipping::{
    OrderCanceledSubscriber, OrderEventDispatcher, OrderTransitionEvent, ShippingConfig,
};
use commerce_shipping_core::storage::EntityStorage;
use commerce_shipping_core::workflow::{TransitionPhase, WorkflowTransitionEvent};
use commerce_shipping_testing::{InMemoryEntityStorage, init_tracing, test_clock};
use std::sync::Arc;

/// Shipment storage and a dispatcher with the cancel subscriber registered
pub struct Harness {
    pub shipments: InMemoryEntityStorage<Shipment>,
    pub dispatcher: OrderEventDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(&ShippingConfig::default())
    }

    pub fn with_config(config: &ShippingConfig) -> Self {
        init_tracing();
        let shipments = InMemoryEntityStorage::new();
        let storage: Arc<dyn EntityStorage<Shipment>> = Arc::new(shipments.clone());

        let mut dispatcher = OrderEventDispatcher::new();
        dispatcher.add_subscriber(Arc::new(OrderCanceledSubscriber::with_config(
            storage, config,
        )));

        Self {
            shipments,
            dispatcher,
        }
    }

    /// Saves a new shipment for `order_id` and returns its id
    pub async fn seed(&self, order_id: &str, state: &str) -> ShipmentId {
        let mut shipment = Shipment::new(OrderId::new(order_id), state, &test_clock());
        self.shipments.save(&mut shipment).await.unwrap();
        shipment.id().clone()
    }

    /// Current stored state of a shipment
    pub fn state_of(&self, id: &ShipmentId) -> String {
        self.shipments.get(id).unwrap().state().value().to_string()
    }

    /// Runs the order's cancel transition through the dispatcher
    pub async fn cancel_order(&self, order_id: &str) -> Result<usize, commerce_shipping::ShippingError> {
        let event = cancel_event(order_id);
        self.dispatcher
            .dispatch(&event.event_name(TransitionPhase::Post), &event)
            .await
    }
}

/// The event fired after an order moves from `placed` to `canceled`
pub fn cancel_event(order_id: &str) -> OrderTransitionEvent {
    WorkflowTransitionEvent::new(
        Order::new(OrderId::new(order_id), "canceled"),
        "order",
        "cancel",
        "placed",
        "canceled",
    )
}
