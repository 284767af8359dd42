//! Ordered list of shipment items embedded in a shipment.

use crate::item::ShipmentItem;
use serde::{Deserialize, Serialize};

/// The shipment items field.
///
/// Keeps insertion order and allows duplicates. Stored as a plain list of
/// item records; loading a stored list validates every record again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentItemList {
    items: Vec<ShipmentItem>,
}

impl ShipmentItemList {
    /// Creates an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The items as value objects, in order
    #[must_use]
    pub fn shipment_items(&self) -> &[ShipmentItem] {
        &self.items
    }

    /// Appends an item
    pub fn append(&mut self, item: ShipmentItem) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Replaces every item
    pub fn set(&mut self, items: Vec<ShipmentItem>) -> &mut Self {
        self.items = items;
        self
    }

    /// Removes the first item equal to `item`.
    ///
    /// Returns whether anything was removed; the relative order of the
    /// remaining items is unchanged.
    pub fn remove_shipment_item(&mut self, item: &ShipmentItem) -> bool {
        match self.items.iter().position(|existing| existing == item) {
            Some(index) => {
                self.items.remove(index);
                true
            },
            None => false,
        }
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in order
    pub fn iter(&self) -> std::slice::Iter<'_, ShipmentItem> {
        self.items.iter()
    }
}

impl From<Vec<ShipmentItem>> for ShipmentItemList {
    fn from(items: Vec<ShipmentItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<ShipmentItem> for ShipmentItemList {
    fn from_iter<I: IntoIterator<Item = ShipmentItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ShipmentItemList {
    type Item = &'a ShipmentItem;
    type IntoIter = std::slice::Iter<'a, ShipmentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn item(id: u32) -> ShipmentItem {
        ShipmentItem::new("commerce_product_variation", id.to_string(), Decimal::ONE).unwrap()
    }

    #[test]
    fn append_keeps_insertion_order_and_duplicates() {
        let mut list = ShipmentItemList::new();
        list.append(item(1)).append(item(2)).append(item(1));
        assert_eq!(list.shipment_items(), &[item(1), item(2), item(1)]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_drops_first_match_only() {
        let mut list: ShipmentItemList = [item(1), item(2), item(1), item(3)].into_iter().collect();
        assert!(list.remove_shipment_item(&item(1)));
        assert_eq!(list.shipment_items(), &[item(2), item(1), item(3)]);
    }

    #[test]
    fn remove_missing_item_is_noop() {
        let mut list = ShipmentItemList::from(vec![item(1)]);
        assert!(!list.remove_shipment_item(&item(9)));
        assert_eq!(list.shipment_items(), &[item(1)]);
    }

    #[test]
    fn set_replaces_everything() {
        let mut list = ShipmentItemList::from(vec![item(1), item(2)]);
        list.set(vec![item(3)]);
        assert_eq!(list.shipment_items(), &[item(3)]);
        list.set(Vec::new());
        assert!(list.is_empty());
    }

    #[test]
    fn stored_list_is_a_plain_array() {
        let list = ShipmentItemList::from(vec![item(4)]);
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["purchased_entity_id"], "4");

        let back: ShipmentItemList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }

    proptest! {
        #[test]
        fn remove_keeps_relative_order(ids in proptest::collection::vec(0u32..5, 0..12), target in 0u32..5) {
            let mut list: ShipmentItemList = ids.iter().copied().map(item).collect();
            let removed = list.remove_shipment_item(&item(target));

            let mut expected = ids.clone();
            if let Some(index) = expected.iter().position(|id| *id == target) {
                expected.remove(index);
            }
            let expected: Vec<ShipmentItem> = expected.into_iter().map(item).collect();

            prop_assert_eq!(removed, ids.contains(&target));
            prop_assert_eq!(list.shipment_items(), expected.as_slice());
        }
    }
}
