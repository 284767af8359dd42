//! Shipments for commerce orders.
//!
//! This crate models the shipments of an order-processing system and keeps
//! them consistent with order cancellation. It demonstrates:
//!
//! - A persisted record with typed accessors ([`Shipment`])
//! - An immutable, validated value object ([`ShipmentItem`])
//! - An embedded ordered collection ([`ShipmentItemList`])
//! - An event subscriber reacting to another aggregate's workflow
//!   ([`OrderCanceledSubscriber`])
//!
//! # Architecture
//!
//! 1. The order workflow cancels an order and dispatches
//!    `order.cancel.post_transition`
//! 2. [`OrderCanceledSubscriber`] runs late (priority `-100`)
//! 3. It queries shipment storage for the order's shipments
//! 4. Each one is set to `canceled` and saved immediately
//!
//! # Example Usage
//!
//! ```no_run
//! use commerce_shipping::{OrderCanceledSubscriber, OrderEventDispatcher, Shipment};
//! use commerce_shipping::types::{Order, OrderId};
//! use commerce_shipping_core::environment::SystemClock;
//! use commerce_shipping_core::storage::EntityStorage;
//! use commerce_shipping_core::workflow::{TransitionPhase, WorkflowTransitionEvent};
//! use std::sync::Arc;
//!
//! # async fn example(shipments: Arc<dyn EntityStorage<Shipment>>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut dispatcher = OrderEventDispatcher::new();
//! dispatcher.add_subscriber(Arc::new(OrderCanceledSubscriber::new(Arc::clone(&shipments))));
//!
//! let order = Order::new(OrderId::new("42"), "canceled");
//! let mut shipment = Shipment::new(order.id().clone(), "ready", &SystemClock);
//! shipments.save(&mut shipment).await?;
//!
//! let event = WorkflowTransitionEvent::new(order, "order", "cancel", "placed", "canceled");
//! dispatcher.dispatch(&event.event_name(TransitionPhase::Post), &event).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod item;
pub mod item_list;
pub mod package_type;
pub mod shipment;
pub mod subscriber;
pub mod types;

// Re-export main types
pub use config::{CancellationPolicy, ShippingConfig};
pub use error::ShippingError;
pub use item::{ShipmentItem, ShipmentItemDefinition};
pub use item_list::ShipmentItemList;
pub use package_type::{PackageType, PackageTypeManager};
pub use shipment::Shipment;
pub use subscriber::{OrderCanceledSubscriber, OrderEventDispatcher, OrderTransitionEvent};
