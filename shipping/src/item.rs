//! Shipment item value object.

use crate::error::ShippingError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a shipment: a purchasable entity and the quantity shipped.
///
/// Immutable once built. Two items with the same fields are equal and
/// interchangeable, which is what list removal relies on.
///
/// # Examples
///
/// ```
/// use commerce_shipping::item::ShipmentItem;
/// use rust_decimal::Decimal;
///
/// let item = ShipmentItem::new("commerce_product_variation", "1", Decimal::TWO).unwrap();
/// assert_eq!(item.purchased_entity_id(), "1");
///
/// let error = ShipmentItem::new("commerce_product_variation", "", Decimal::TWO).unwrap_err();
/// assert_eq!(error.to_string(), "Missing required property purchased_entity_id.");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ShipmentItemDefinition", into = "ShipmentItemDefinition")]
pub struct ShipmentItem {
    purchased_entity_type: String,
    purchased_entity_id: String,
    quantity: Decimal,
}

/// Raw, unvalidated shipment item values as stored in the item list.
///
/// Every field is optional so a stored record missing a value can still be
/// read and then rejected by [`ShipmentItem::from_definition`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentItemDefinition {
    /// Kind of purchasable entity (e.g. `commerce_product_variation`)
    #[serde(default)]
    pub purchased_entity_type: Option<String>,
    /// Identifier of the purchasable entity
    #[serde(default)]
    pub purchased_entity_id: Option<String>,
    /// Quantity shipped
    #[serde(default)]
    pub quantity: Option<Decimal>,
}

impl ShipmentItem {
    /// Creates a shipment item.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::InvalidArgument`] naming the first missing
    /// property if a string is blank or `"0"`, or the quantity is zero.
    pub fn new(
        purchased_entity_type: impl Into<String>,
        purchased_entity_id: impl Into<String>,
        quantity: Decimal,
    ) -> Result<Self, ShippingError> {
        Self::from_definition(ShipmentItemDefinition {
            purchased_entity_type: Some(purchased_entity_type.into()),
            purchased_entity_id: Some(purchased_entity_id.into()),
            quantity: Some(quantity),
        })
    }

    /// Creates a shipment item from raw stored values.
    ///
    /// Properties are checked in the order type, id, quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::InvalidArgument`] naming the first property
    /// that is absent, blank, `"0"`, or (for the quantity) zero.
    pub fn from_definition(definition: ShipmentItemDefinition) -> Result<Self, ShippingError> {
        let purchased_entity_type = definition
            .purchased_entity_type
            .filter(|value| is_present(value))
            .ok_or_else(|| ShippingError::missing_property("purchased_entity_type"))?;
        let purchased_entity_id = definition
            .purchased_entity_id
            .filter(|value| is_present(value))
            .ok_or_else(|| ShippingError::missing_property("purchased_entity_id"))?;
        let quantity = definition
            .quantity
            .filter(|value| !value.is_zero())
            .ok_or_else(|| ShippingError::missing_property("quantity"))?;

        Ok(Self {
            purchased_entity_type,
            purchased_entity_id,
            quantity,
        })
    }

    /// The purchased entity type
    #[must_use]
    pub fn purchased_entity_type(&self) -> &str {
        &self.purchased_entity_type
    }

    /// The purchased entity id
    #[must_use]
    pub fn purchased_entity_id(&self) -> &str {
        &self.purchased_entity_id
    }

    /// The quantity
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }
}

/// Blank strings and `"0"` count as missing.
fn is_present(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0"
}

impl TryFrom<ShipmentItemDefinition> for ShipmentItem {
    type Error = ShippingError;

    fn try_from(definition: ShipmentItemDefinition) -> Result<Self, Self::Error> {
        Self::from_definition(definition)
    }
}

impl From<ShipmentItem> for ShipmentItemDefinition {
    fn from(item: ShipmentItem) -> Self {
        Self {
            purchased_entity_type: Some(item.purchased_entity_type),
            purchased_entity_id: Some(item.purchased_entity_id),
            quantity: Some(item.quantity),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VARIATION: &str = "commerce_product_variation";

    #[test]
    fn reads_back_fields() {
        let item = ShipmentItem::new(VARIATION, "12", Decimal::new(25, 1)).unwrap();
        assert_eq!(item.purchased_entity_type(), VARIATION);
        assert_eq!(item.purchased_entity_id(), "12");
        assert_eq!(item.quantity(), Decimal::new(25, 1));
    }

    #[test]
    fn rejects_each_missing_property() {
        let cases = [
            (ShipmentItem::new("", "1", Decimal::ONE), "purchased_entity_type"),
            (ShipmentItem::new("  ", "1", Decimal::ONE), "purchased_entity_type"),
            (ShipmentItem::new(VARIATION, "", Decimal::ONE), "purchased_entity_id"),
            (ShipmentItem::new(VARIATION, "0", Decimal::ONE), "purchased_entity_id"),
            (ShipmentItem::new("0", "1", Decimal::ONE), "purchased_entity_type"),
            (ShipmentItem::new(VARIATION, "1", Decimal::ZERO), "quantity"),
        ];
        for (result, property) in cases {
            assert_eq!(result.unwrap_err(), ShippingError::missing_property(property));
        }
    }

    #[test]
    fn absent_fields_are_rejected_in_order() {
        let error = ShipmentItem::from_definition(ShipmentItemDefinition::default()).unwrap_err();
        assert_eq!(error, ShippingError::missing_property("purchased_entity_type"));

        let error = ShipmentItem::try_from(ShipmentItemDefinition {
            purchased_entity_type: Some(VARIATION.to_string()),
            purchased_entity_id: Some("3".to_string()),
            quantity: None,
        })
        .unwrap_err();
        assert_eq!(error, ShippingError::missing_property("quantity"));
    }

    #[test]
    fn equality_is_by_value() {
        let a = ShipmentItem::new(VARIATION, "1", Decimal::TWO).unwrap();
        let b = ShipmentItem::new(VARIATION, "1", Decimal::TWO).unwrap();
        let c = ShipmentItem::new(VARIATION, "2", Decimal::TWO).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn deserializing_validates_stored_record() {
        let json = r#"{"purchased_entity_type":"commerce_product_variation","purchased_entity_id":"","quantity":"1"}"#;
        let error = serde_json::from_str::<ShipmentItem>(json).unwrap_err();
        assert!(error.to_string().contains("purchased_entity_id"));

        let json = r#"{"purchased_entity_type":"commerce_product_variation","purchased_entity_id":"9"}"#;
        assert!(serde_json::from_str::<ShipmentItem>(json).is_err());
    }

    proptest! {
        #[test]
        fn well_formed_input_reads_back(
            entity_type in "[a-z_]{1,24}",
            entity_id in "[1-9][0-9]{0,5}",
            quantity in 1i64..10_000,
            scale in 0u32..4,
        ) {
            let quantity = Decimal::new(quantity, scale);
            let item = ShipmentItem::new(entity_type.clone(), entity_id.clone(), quantity).unwrap();
            prop_assert_eq!(item.purchased_entity_type(), entity_type.as_str());
            prop_assert_eq!(item.purchased_entity_id(), entity_id.as_str());
            prop_assert_eq!(item.quantity(), quantity);
        }
    }
}
