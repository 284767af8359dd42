//! Core domain types for shipping.
//!
//! Identifiers, money, weight, adjustments and the entities a shipment
//! references (order, shipping method, customer profile).

use crate::error::ShippingError;
use commerce_shipping_core::entity::{Entity, EntityWithState};
use commerce_shipping_core::workflow::StateItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "` from a string")]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the inner string value
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id! {
    /// Unique identifier for an order
    OrderId
}

string_id! {
    /// Unique identifier for a shipment
    ShipmentId
}

string_id! {
    /// Unique identifier for a shipping method
    ShippingMethodId
}

string_id! {
    /// Unique identifier for a customer profile
    ProfileId
}

impl ShipmentId {
    /// Generates a fresh random shipment id
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// A monetary amount in a single currency.
///
/// # Examples
///
/// ```
/// use commerce_shipping::types::Price;
/// use rust_decimal::Decimal;
///
/// let fee = Price::new(Decimal::new(1000, 2), "USD");
/// let discount = Price::new(Decimal::new(-100, 2), "USD");
/// assert_eq!(fee.add(&discount).unwrap().to_string(), "9.00 USD");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    number: Decimal,
    currency_code: String,
}

impl Price {
    /// Creates a price
    #[must_use]
    pub fn new(number: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            number,
            currency_code: currency_code.into(),
        }
    }

    /// The decimal amount
    #[must_use]
    pub const fn number(&self) -> Decimal {
        self.number
    }

    /// The ISO 4217 currency code
    #[must_use]
    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// Adds two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::CurrencyMismatch`] if the currencies differ
    /// and [`ShippingError::InvalidArgument`] if the sum overflows.
    pub fn add(&self, other: &Self) -> Result<Self, ShippingError> {
        self.ensure_same_currency(other)?;
        let number = self
            .number
            .checked_add(other.number)
            .ok_or_else(|| ShippingError::InvalidArgument("Price overflow".to_string()))?;
        Ok(Self::new(number, self.currency_code.clone()))
    }

    /// Subtracts `other` from this price.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::CurrencyMismatch`] if the currencies differ
    /// and [`ShippingError::InvalidArgument`] if the difference overflows.
    pub fn subtract(&self, other: &Self) -> Result<Self, ShippingError> {
        self.ensure_same_currency(other)?;
        let number = self
            .number
            .checked_sub(other.number)
            .ok_or_else(|| ShippingError::InvalidArgument("Price overflow".to_string()))?;
        Ok(Self::new(number, self.currency_code.clone()))
    }

    fn ensure_same_currency(&self, other: &Self) -> Result<(), ShippingError> {
        if self.currency_code == other.currency_code {
            Ok(())
        } else {
            Err(ShippingError::CurrencyMismatch {
                left: self.currency_code.clone(),
                right: other.currency_code.clone(),
            })
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency_code)
    }
}

/// Unit of a [`Weight`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
    /// Grams
    #[serde(rename = "g")]
    Gram,
    /// Kilograms
    #[serde(rename = "kg")]
    Kilogram,
    /// Ounces
    #[serde(rename = "oz")]
    Ounce,
    /// Pounds
    #[serde(rename = "lb")]
    Pound,
}

impl WeightUnit {
    /// Short unit code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Ounce => "oz",
            Self::Pound => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = ShippingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(Self::Gram),
            "kg" => Ok(Self::Kilogram),
            "oz" => Ok(Self::Ounce),
            "lb" => Ok(Self::Pound),
            other => Err(ShippingError::InvalidArgument(format!(
                "Invalid weight unit \"{other}\"."
            ))),
        }
    }
}

/// A physical weight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weight {
    number: Decimal,
    unit: WeightUnit,
}

impl Weight {
    /// Creates a weight
    #[must_use]
    pub const fn new(number: Decimal, unit: WeightUnit) -> Self {
        Self { number, unit }
    }

    /// The decimal amount
    #[must_use]
    pub const fn number(&self) -> Decimal {
        self.number
    }

    /// The unit
    #[must_use]
    pub const fn unit(&self) -> WeightUnit {
        self.unit
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.unit)
    }
}

/// A priced modifier (fee or discount) applied to a total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    adjustment_type: String,
    label: String,
    amount: Price,
    source_id: Option<String>,
}

impl Adjustment {
    /// Creates an adjustment
    #[must_use]
    pub fn new(adjustment_type: impl Into<String>, label: impl Into<String>, amount: Price) -> Self {
        Self {
            adjustment_type: adjustment_type.into(),
            label: label.into(),
            amount,
            source_id: None,
        }
    }

    /// Records what produced the adjustment (e.g. a promotion id)
    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Adjustment type (e.g. `custom`, `promotion`, `fee`)
    #[must_use]
    pub fn adjustment_type(&self) -> &str {
        &self.adjustment_type
    }

    /// Human readable label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Signed amount; negative for discounts
    #[must_use]
    pub const fn amount(&self) -> &Price {
        &self.amount
    }

    /// Source identifier, if any
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }
}

/// Postal address carried by a customer profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code
    pub country_code: String,
    /// Administrative area (state, province)
    pub administrative_area: String,
    /// City
    pub locality: String,
    /// Postal code
    pub postal_code: String,
    /// Street line
    pub address_line1: String,
    /// Recipient given name
    pub given_name: String,
    /// Recipient family name
    pub family_name: String,
}

/// Address and contact profile a shipment is sent to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    id: ProfileId,
    profile_type: String,
    address: Option<Address>,
}

impl Profile {
    /// Creates a profile without an address
    #[must_use]
    pub fn new(id: ProfileId, profile_type: impl Into<String>) -> Self {
        Self {
            id,
            profile_type: profile_type.into(),
            address: None,
        }
    }

    /// Sets the postal address
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Profile id
    #[must_use]
    pub const fn id(&self) -> &ProfileId {
        &self.id
    }

    /// Profile bundle (e.g. `customer`)
    #[must_use]
    pub fn profile_type(&self) -> &str {
        &self.profile_type
    }

    /// Postal address, if set
    #[must_use]
    pub const fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }
}

/// A configured way of shipping (carrier plus rate rules)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    id: ShippingMethodId,
    name: String,
}

impl ShippingMethod {
    /// Creates a shipping method
    #[must_use]
    pub fn new(id: ShippingMethodId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Method id
    #[must_use]
    pub const fn id(&self) -> &ShippingMethodId {
        &self.id
    }

    /// Administrative name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for ShippingMethod {
    type Id = ShippingMethodId;
    const ENTITY_TYPE: &'static str = "commerce_shipping_method";

    fn id(&self) -> &ShippingMethodId {
        &self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }
}

/// The order a shipment belongs to.
///
/// Only the parts the shipping domain reads are modelled: the id and the
/// workflow state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    state: StateItem,
}

impl Order {
    /// Creates an order in `state`
    #[must_use]
    pub fn new(id: OrderId, state: impl Into<String>) -> Self {
        Self {
            id,
            state: StateItem::new(state),
        }
    }

    /// Order id
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }
}

impl Entity for Order {
    type Id = OrderId;
    const ENTITY_TYPE: &'static str = "commerce_order";

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" | "order_id" => Some(self.id.to_string()),
            "state" => Some(self.state.value.clone()),
            _ => None,
        }
    }
}

impl EntityWithState for Order {
    fn state(&self) -> &StateItem {
        &self.state
    }
}
