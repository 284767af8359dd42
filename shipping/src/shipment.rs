//! The shipment entity.
//!
//! A [`Shipment`] is one physical parcel sent for one order. It is a plain
//! record with accessors; persistence happens only when a caller hands it to
//! an [`EntityStorage`]. Setters return `&mut Self` so calls chain:
//!
//! ```ignore
//! shipment
//!     .set_shipping_method(method)
//!     .set_shipping_service("express")
//!     .set_tracking_code("1Z999");
//! shipments.save(&mut shipment).await?;
//! ```

use crate::error::ShippingError;
use crate::item::ShipmentItem;
use crate::item_list::ShipmentItemList;
use crate::package_type::PackageType;
use crate::types::{
    Adjustment, Order, OrderId, Price, Profile, ShipmentId, ShippingMethod, ShippingMethodId,
    Weight,
};
use commerce_shipping_core::entity::{Entity, EntityAdjustable, EntityChanged, EntityWithState};
use commerce_shipping_core::environment::Clock;
use commerce_shipping_core::storage::EntityStorage;
use commerce_shipping_core::workflow::StateItem;
use commerce_shipping_core::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known shipment workflow states
pub mod states {
    /// Packed and waiting for the carrier
    pub const READY: &str = "ready";
    /// Handed to the carrier
    pub const SHIPPED: &str = "shipped";
    /// Will not be shipped
    pub const CANCELED: &str = "canceled";
}

/// A shipment of part or all of an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    id: ShipmentId,
    order_id: OrderId,
    shipping_method_id: Option<ShippingMethodId>,
    #[serde(skip)]
    shipping_method: Option<ShippingMethod>,
    shipping_service: Option<String>,
    shipping_profile: Option<Profile>,
    tracking_code: Option<String>,
    amount: Option<Price>,
    weight: Option<Weight>,
    package_type: Option<PackageType>,
    #[serde(default)]
    items: ShipmentItemList,
    #[serde(default)]
    adjustments: Vec<Adjustment>,
    state: StateItem,
    created_time: i64,
    changed_time: i64,
    shipped_time: Option<i64>,
}

impl Shipment {
    /// Creates a shipment for `order_id` in `state`, stamped with the
    /// clock's current time.
    #[must_use]
    pub fn new(order_id: OrderId, state: impl Into<String>, clock: &dyn Clock) -> Self {
        let now = clock.timestamp();
        Self {
            id: ShipmentId::generate(),
            order_id,
            shipping_method_id: None,
            shipping_method: None,
            shipping_service: None,
            shipping_profile: None,
            tracking_code: None,
            amount: None,
            weight: None,
            package_type: None,
            items: ShipmentItemList::new(),
            adjustments: Vec::new(),
            state: StateItem::new(state),
            created_time: now,
            changed_time: now,
            shipped_time: None,
        }
    }

    /// The shipment id
    #[must_use]
    pub const fn id(&self) -> &ShipmentId {
        &self.id
    }

    /// Id of the order this shipment belongs to
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Loads the parent order.
    ///
    /// Returns `None` if the order no longer exists or the lookup fails; the
    /// failure is logged, never returned.
    pub async fn order(&self, orders: &dyn EntityStorage<Order>) -> Option<Order> {
        match orders.load(&self.order_id).await {
            Ok(Some(order)) => Some(order),
            Ok(None) => {
                tracing::warn!(
                    shipment_id = %self.id,
                    order_id = %self.order_id,
                    "Shipment references a missing order"
                );
                None
            },
            Err(error) => {
                tracing::warn!(
                    shipment_id = %self.id,
                    order_id = %self.order_id,
                    %error,
                    "Failed to load shipment order"
                );
                None
            },
        }
    }

    /// The shipping method, if one was set on this instance
    #[must_use]
    pub const fn shipping_method(&self) -> Option<&ShippingMethod> {
        self.shipping_method.as_ref()
    }

    /// The shipping method id
    #[must_use]
    pub const fn shipping_method_id(&self) -> Option<&ShippingMethodId> {
        self.shipping_method_id.as_ref()
    }

    /// Sets the shipping method
    pub fn set_shipping_method(&mut self, shipping_method: ShippingMethod) -> &mut Self {
        self.shipping_method_id = Some(shipping_method.id().clone());
        self.shipping_method = Some(shipping_method);
        self
    }

    /// Returns the shipping method, loading it by id if it is not cached.
    ///
    /// A loaded shipment only carries the method id. Resolution failures are
    /// logged and yield `None`.
    pub async fn resolve_shipping_method(
        &mut self,
        methods: &dyn EntityStorage<ShippingMethod>,
    ) -> Option<&ShippingMethod> {
        if self.shipping_method.is_none() {
            if let Some(id) = &self.shipping_method_id {
                match methods.load(id).await {
                    Ok(method) => self.shipping_method = method,
                    Err(error) => {
                        tracing::warn!(
                            shipment_id = %self.id,
                            shipping_method_id = %id,
                            %error,
                            "Failed to load shipping method"
                        );
                    },
                }
            }
        }
        self.shipping_method.as_ref()
    }

    /// The carrier service tier, if chosen
    #[must_use]
    pub fn shipping_service(&self) -> Option<&str> {
        self.shipping_service.as_deref()
    }

    /// Sets the carrier service tier
    pub fn set_shipping_service(&mut self, shipping_service: impl Into<String>) -> &mut Self {
        self.shipping_service = Some(shipping_service.into());
        self
    }

    /// The address/contact profile the shipment goes to
    #[must_use]
    pub const fn shipping_profile(&self) -> Option<&Profile> {
        self.shipping_profile.as_ref()
    }

    /// Sets the shipping profile
    pub fn set_shipping_profile(&mut self, profile: Profile) -> &mut Self {
        self.shipping_profile = Some(profile);
        self
    }

    /// The carrier tracking code.
    ///
    /// Only meaningful once the shipment has shipped and only if the carrier
    /// supports tracking; the accessor does not check either.
    #[must_use]
    pub fn tracking_code(&self) -> Option<&str> {
        self.tracking_code.as_deref()
    }

    /// Sets the tracking code
    pub fn set_tracking_code(&mut self, tracking_code: impl Into<String>) -> &mut Self {
        self.tracking_code = Some(tracking_code.into());
        self
    }

    /// The shipping amount, if computed
    #[must_use]
    pub const fn amount(&self) -> Option<&Price> {
        self.amount.as_ref()
    }

    /// Sets the shipping amount. No currency check is made.
    pub fn set_amount(&mut self, amount: Price) -> &mut Self {
        self.amount = Some(amount);
        self
    }

    /// The amount with every adjustment applied.
    ///
    /// Returns `Ok(None)` if no amount is set.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::CurrencyMismatch`] if an adjustment is in a
    /// different currency than the amount, or [`ShippingError::InvalidArgument`]
    /// if the total overflows.
    pub fn adjusted_amount(&self) -> Result<Option<Price>, ShippingError> {
        let Some(amount) = &self.amount else {
            return Ok(None);
        };
        self.adjustments
            .iter()
            .try_fold(amount.clone(), |total, adjustment| total.add(adjustment.amount()))
            .map(Some)
    }

    /// The shipment weight, if known
    #[must_use]
    pub const fn weight(&self) -> Option<&Weight> {
        self.weight.as_ref()
    }

    /// Sets the shipment weight
    pub fn set_weight(&mut self, weight: Weight) -> &mut Self {
        self.weight = Some(weight);
        self
    }

    /// The package type, if chosen
    #[must_use]
    pub const fn package_type(&self) -> Option<&PackageType> {
        self.package_type.as_ref()
    }

    /// Sets the package type
    pub fn set_package_type(&mut self, package_type: PackageType) -> &mut Self {
        self.package_type = Some(package_type);
        self
    }

    /// Creation timestamp
    #[must_use]
    pub const fn created_time(&self) -> i64 {
        self.created_time
    }

    /// Sets the creation timestamp
    pub fn set_created_time(&mut self, timestamp: i64) -> &mut Self {
        self.created_time = timestamp;
        self
    }

    /// Timestamp the carrier took the shipment, if shipped
    #[must_use]
    pub const fn shipped_time(&self) -> Option<i64> {
        self.shipped_time
    }

    /// Sets the shipped timestamp
    pub fn set_shipped_time(&mut self, timestamp: i64) -> &mut Self {
        self.shipped_time = Some(timestamp);
        self
    }

    /// The items, in order
    #[must_use]
    pub fn items(&self) -> &[ShipmentItem] {
        self.items.shipment_items()
    }

    /// The underlying item list
    #[must_use]
    pub const fn item_list(&self) -> &ShipmentItemList {
        &self.items
    }

    /// Replaces every item
    pub fn set_items(&mut self, items: Vec<ShipmentItem>) -> &mut Self {
        self.items.set(items);
        self
    }

    /// Appends an item; duplicates are kept
    pub fn add_item(&mut self, item: ShipmentItem) -> &mut Self {
        self.items.append(item);
        self
    }

    /// Removes the first item equal to `item`; no-op if there is none
    pub fn remove_item(&mut self, item: &ShipmentItem) -> &mut Self {
        self.items.remove_shipment_item(item);
        self
    }

    /// The workflow state field
    #[must_use]
    pub const fn state(&self) -> &StateItem {
        &self.state
    }

    /// Overwrites the raw workflow state. Transition legality is not checked.
    pub fn set_state(&mut self, state: impl Into<String>) -> &mut Self {
        self.state.set_value(state);
        self
    }
}

impl Entity for Shipment {
    type Id = ShipmentId;
    const ENTITY_TYPE: &'static str = "commerce_shipment";

    fn id(&self) -> &ShipmentId {
        &self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "order_id" => Some(self.order_id.to_string()),
            "state" => Some(self.state.value.clone()),
            "shipping_method" | "shipping_method_id" => {
                self.shipping_method_id.as_ref().map(ToString::to_string)
            },
            "shipping_service" => self.shipping_service.clone(),
            "tracking_code" => self.tracking_code.clone(),
            "package_type" => self.package_type.as_ref().map(|p| p.id().to_string()),
            _ => None,
        }
    }

    fn pre_save(&mut self, now: DateTime<Utc>) {
        self.changed_time = now.timestamp();
    }
}

impl EntityChanged for Shipment {
    fn changed_time(&self) -> i64 {
        self.changed_time
    }

    fn set_changed_time(&mut self, timestamp: i64) -> &mut Self {
        self.changed_time = timestamp;
        self
    }
}

impl EntityAdjustable for Shipment {
    type Adjustment = Adjustment;

    fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    fn set_adjustments(&mut self, adjustments: Vec<Adjustment>) -> &mut Self {
        self.adjustments = adjustments;
        self
    }

    fn add_adjustment(&mut self, adjustment: Adjustment) -> &mut Self {
        self.adjustments.push(adjustment);
        self
    }

    fn remove_adjustment(&mut self, adjustment: &Adjustment) -> &mut Self {
        if let Some(index) = self.adjustments.iter().position(|a| a == adjustment) {
            self.adjustments.remove(index);
        }
        self
    }
}

impl EntityWithState for Shipment {
    fn state(&self) -> &StateItem {
        &self.state
    }
}
