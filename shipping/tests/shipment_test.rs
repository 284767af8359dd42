//! Shipment field round-trips against in-memory collaborators

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use commerce_shipping::package_type::CUSTOM_BOX;
use commerce_shipping::shipment::{Shipment, states};
use commerce_shipping::types::{
    Address, Adjustment, Order, OrderId, Price, Profile, ProfileId, ShippingMethod,
    ShippingMethodId, Weight, WeightUnit,
};
use commerce_shipping::{PackageTypeManager, ShipmentItem, ShippingError};
use commerce_shipping_core::entity::{EntityAdjustable, EntityChanged};
use commerce_shipping_core::storage::EntityStorage;
use commerce_shipping_testing::{FixedClock, InMemoryEntityStorage, TEST_EPOCH, test_clock};
use rust_decimal::Decimal;

const CREATED: i64 = 635_879_700;
const SHIPPED: i64 = 635_879_800;

fn usd(cents: i64) -> Price {
    Price::new(Decimal::new(cents, 2), "USD")
}

fn shipment_for(order_id: &str) -> Shipment {
    Shipment::new(
        OrderId::new(order_id),
        states::READY,
        &FixedClock::at_timestamp(CREATED),
    )
}

#[tokio::test]
async fn order_is_loaded_through_storage() {
    let orders = InMemoryEntityStorage::<Order>::new();
    let mut order = Order::new(OrderId::new("1"), "draft");
    orders.save(&mut order).await.unwrap();

    let shipment = shipment_for("1");
    assert_eq!(shipment.order_id(), &OrderId::new("1"));
    assert_eq!(shipment.order(&orders).await, Some(order));
}

#[tokio::test]
async fn missing_order_yields_none() {
    let orders = InMemoryEntityStorage::<Order>::new();
    let shipment = shipment_for("404");
    assert!(shipment.order(&orders).await.is_none());
}

#[tokio::test]
async fn shipping_method_resolves_from_its_id() {
    let methods = InMemoryEntityStorage::<ShippingMethod>::new();
    let mut method = ShippingMethod::new(ShippingMethodId::new("standard"), "Standard shipping");
    methods.save(&mut method).await.unwrap();

    let mut shipment = shipment_for("1");
    shipment.set_shipping_method(method.clone());
    assert_eq!(shipment.shipping_method(), Some(&method));
    assert_eq!(
        shipment.shipping_method_id(),
        Some(&ShippingMethodId::new("standard"))
    );

    // Stored shipments only carry the method id
    let json = serde_json::to_string(&shipment).unwrap();
    let mut loaded: Shipment = serde_json::from_str(&json).unwrap();
    assert!(loaded.shipping_method().is_none());
    assert_eq!(loaded.resolve_shipping_method(&methods).await, Some(&method));
}

#[test]
fn package_type_comes_from_the_manager() {
    let manager = PackageTypeManager::new();
    let package_type = manager.create_instance(CUSTOM_BOX).unwrap();

    let mut shipment = shipment_for("1");
    shipment.set_package_type(package_type.clone());
    assert_eq!(shipment.package_type(), Some(&package_type));
    assert_eq!(shipment.package_type().map(|p| p.id()), Some(CUSTOM_BOX));

    assert!(matches!(
        manager.create_instance("crate"),
        Err(ShippingError::UnknownPackageType(id)) if id == "crate"
    ));
}

#[test]
fn plain_fields_round_trip() {
    let profile = Profile::new(ProfileId::new("9"), "customer").with_address(Address {
        country_code: "US".into(),
        administrative_area: "SC".into(),
        locality: "Greenville".into(),
        postal_code: "29616".into(),
        address_line1: "9 Drupal Ave".into(),
        given_name: "Bryan".into(),
        family_name: "Centarro".into(),
    });
    let weight = Weight::new(Decimal::new(25, 1), WeightUnit::Kilogram);

    let mut shipment = shipment_for("1");
    shipment
        .set_shipping_service("standard")
        .set_shipping_profile(profile.clone())
        .set_weight(weight)
        .set_amount(usd(500))
        .set_tracking_code("ABC123")
        .set_shipped_time(SHIPPED);

    assert_eq!(shipment.shipping_service(), Some("standard"));
    assert_eq!(shipment.shipping_profile(), Some(&profile));
    assert_eq!(shipment.weight(), Some(&weight));
    assert_eq!(shipment.amount(), Some(&usd(500)));
    assert_eq!(shipment.tracking_code(), Some("ABC123"));
    assert_eq!(shipment.state().value(), states::READY);
    assert_eq!(shipment.created_time(), CREATED);
    assert_eq!(shipment.shipped_time(), Some(SHIPPED));
}

#[test]
fn timestamps_round_trip() {
    let mut shipment = Shipment::new(OrderId::new("1"), states::READY, &test_clock());
    assert_eq!(shipment.created_time(), TEST_EPOCH);
    assert_eq!(shipment.shipped_time(), None);

    shipment.set_created_time(CREATED).set_shipped_time(SHIPPED);

    assert_eq!(shipment.created_time(), CREATED);
    assert_eq!(shipment.shipped_time(), Some(SHIPPED));
}

#[test]
fn items_keep_insertion_order() {
    let first = ShipmentItem::new("commerce_product_variation", "1", Decimal::ONE).unwrap();
    let second = ShipmentItem::new("commerce_product_variation", "2", Decimal::TWO).unwrap();

    let mut shipment = shipment_for("1");
    shipment.add_item(first.clone()).add_item(second.clone());
    assert_eq!(shipment.items(), [first.clone(), second.clone()].as_slice());

    shipment.remove_item(&first);
    assert_eq!(shipment.items(), [second.clone()].as_slice());

    shipment.set_items(vec![second.clone(), first.clone()]);
    assert_eq!(shipment.items(), [second, first].as_slice());
}

#[test]
fn adjustments_change_the_adjusted_amount() {
    let discount = Adjustment::new("promotion", "10% off", usd(-50)).with_source_id("1");
    let fee = Adjustment::new("fee", "Handling", usd(100));

    let mut shipment = shipment_for("1");
    shipment.set_amount(usd(500));
    shipment.add_adjustment(discount.clone()).add_adjustment(fee.clone());
    assert_eq!(shipment.adjustments(), [discount.clone(), fee.clone()].as_slice());
    assert_eq!(shipment.adjusted_amount().unwrap(), Some(usd(550)));

    shipment.remove_adjustment(&discount);
    assert_eq!(shipment.adjustments(), [fee].as_slice());

    shipment.set_adjustments(vec![discount]);
    assert_eq!(shipment.adjusted_amount().unwrap(), Some(usd(450)));
}

#[tokio::test]
async fn saving_stamps_the_changed_time() {
    let shipments = InMemoryEntityStorage::<Shipment>::new();
    let mut shipment = shipment_for("1");
    assert_eq!(shipment.changed_time(), CREATED);

    shipments.save(&mut shipment).await.unwrap();

    assert_eq!(shipment.changed_time(), TEST_EPOCH);
    assert_eq!(shipment.created_time(), CREATED);
    assert_eq!(shipments.get(shipment.id()), Some(shipment));
}

#[test]
fn corrupted_item_record_fails_to_load() {
    let mut shipment = shipment_for("1");
    shipment.add_item(ShipmentItem::new("commerce_product_variation", "7", Decimal::ONE).unwrap());

    let mut stored = serde_json::to_value(&shipment).unwrap();
    stored["items"][0]["purchased_entity_id"] = serde_json::Value::String(String::new());

    let error = serde_json::from_value::<Shipment>(stored).unwrap_err();
    assert!(error.to_string().contains("purchased_entity_id"));
}
