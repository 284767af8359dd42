//! Package type definitions and their registry.
//!
//! A package type describes a reusable container (box, envelope) by its
//! dimensions and empty weight. Definitions live in a [`PackageTypeManager`];
//! shipments hold an instance created from it.

use crate::error::ShippingError;
use crate::types::{Weight, WeightUnit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Id of the package type every manager starts with
pub const CUSTOM_BOX: &str = "custom_box";

/// Unit of a length
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Millimeters
    #[serde(rename = "mm")]
    Millimeter,
    /// Centimeters
    #[serde(rename = "cm")]
    Centimeter,
    /// Meters
    #[serde(rename = "m")]
    Meter,
    /// Inches
    #[serde(rename = "in")]
    Inch,
    /// Feet
    #[serde(rename = "ft")]
    Foot,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Inch => "in",
            Self::Foot => "ft",
        })
    }
}

/// Outer dimensions of a package
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length
    pub length: Decimal,
    /// Width
    pub width: Decimal,
    /// Height
    pub height: Decimal,
    /// Unit shared by all three sides
    pub unit: LengthUnit,
}

impl Dimensions {
    /// Creates dimensions
    #[must_use]
    pub const fn new(length: Decimal, width: Decimal, height: Decimal, unit: LengthUnit) -> Self {
        Self {
            length,
            width,
            height,
            unit,
        }
    }
}

/// A package type instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageType {
    id: String,
    label: String,
    dimensions: Dimensions,
    weight: Weight,
}

impl PackageType {
    /// Creates a package type
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        dimensions: Dimensions,
        weight: Weight,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            dimensions,
            weight,
        }
    }

    /// Package type id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Outer dimensions
    #[must_use]
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Weight of the empty package
    #[must_use]
    pub const fn weight(&self) -> Weight {
        self.weight
    }
}

fn custom_box() -> PackageType {
    PackageType::new(
        CUSTOM_BOX,
        "Custom box",
        Dimensions::new(Decimal::ONE, Decimal::ONE, Decimal::ONE, LengthUnit::Millimeter),
        Weight::new(Decimal::ZERO, WeightUnit::Gram),
    )
}

/// Registry of package type definitions.
///
/// # Examples
///
/// ```
/// use commerce_shipping::package_type::{PackageTypeManager, CUSTOM_BOX};
///
/// let manager = PackageTypeManager::new();
/// let package_type = manager.create_instance(CUSTOM_BOX).unwrap();
/// assert_eq!(package_type.label(), "Custom box");
/// ```
#[derive(Clone, Debug)]
pub struct PackageTypeManager {
    definitions: BTreeMap<String, PackageType>,
}

impl PackageTypeManager {
    /// Creates a manager holding the built-in `custom_box` definition
    #[must_use]
    pub fn new() -> Self {
        let mut definitions = BTreeMap::new();
        definitions.insert(CUSTOM_BOX.to_string(), custom_box());
        Self { definitions }
    }

    /// Registers a definition.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::InvalidArgument`] if the id is blank or
    /// already registered.
    pub fn register(&mut self, definition: PackageType) -> Result<(), ShippingError> {
        if definition.id.trim().is_empty() {
            return Err(ShippingError::missing_property("id"));
        }
        if self.definitions.contains_key(&definition.id) {
            return Err(ShippingError::InvalidArgument(format!(
                "Package type \"{}\" is already defined.",
                definition.id
            )));
        }
        tracing::debug!(package_type = %definition.id, "Registered package type");
        self.definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Returns true if a definition exists for `id`
    #[must_use]
    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// All definitions, sorted by id
    pub fn definitions(&self) -> impl Iterator<Item = &PackageType> {
        self.definitions.values()
    }

    /// Creates an instance of the definition registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::UnknownPackageType`] if nothing is registered
    /// under `id`.
    pub fn create_instance(&self, id: &str) -> Result<PackageType, ShippingError> {
        self.definitions
            .get(id)
            .cloned()
            .ok_or_else(|| ShippingError::UnknownPackageType(id.to_string()))
    }
}

impl Default for PackageTypeManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    fn envelope() -> PackageType {
        PackageType::new(
            "envelope",
            "Padded envelope",
            Dimensions::new(
                Decimal::new(30, 0),
                Decimal::new(20, 0),
                Decimal::new(2, 0),
                LengthUnit::Centimeter,
            ),
            Weight::new(Decimal::new(15, 0), WeightUnit::Gram),
        )
    }

    #[test]
    fn custom_box_is_built_in() {
        let manager = PackageTypeManager::default();
        assert!(manager.has_definition(CUSTOM_BOX));
        let instance = manager.create_instance(CUSTOM_BOX).unwrap();
        assert_eq!(instance.dimensions().unit, LengthUnit::Millimeter);
        assert_eq!(instance.dimensions().length, Decimal::ONE);
        assert_eq!(instance.dimensions().height, Decimal::ONE);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let manager = PackageTypeManager::new();
        assert_eq!(
            manager.create_instance("crate"),
            Err(ShippingError::UnknownPackageType("crate".to_string()))
        );
    }

    #[test]
    fn register_rejects_duplicates_and_blank_ids() {
        let mut manager = PackageTypeManager::new();
        manager.register(envelope()).unwrap();
        assert!(manager.register(envelope()).is_err());

        let mut blank = envelope();
        blank.id = " ".to_string();
        assert_eq!(
            manager.register(blank),
            Err(ShippingError::missing_property("id"))
        );

        let ids: Vec<&str> = manager.definitions().map(PackageType::id).collect();
        assert_eq!(ids, vec![CUSTOM_BOX, "envelope"]);
    }
}
