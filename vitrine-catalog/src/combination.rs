use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::AttributeId;

/// One purchasable variant row of a product page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    /// Manufacturer part number; the discontinuation marker is overloaded
    /// onto its tail by merchandising
    #[serde(default)]
    pub mpn: String,

    /// Stock on hand; negative values mean the variant is backorderable
    #[serde(default)]
    pub quantity: i64,

    /// Attribute choices that define this variant, one per group
    #[serde(default)]
    pub attributes: BTreeSet<AttributeId>,

    /// Display fields owned by the host (price, reference, weight, ...),
    /// carried through untouched
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Combination {
    pub fn new(
        mpn: impl Into<String>,
        quantity: i64,
        attributes: impl IntoIterator<Item = AttributeId>,
    ) -> Self {
        Self {
            mpn: mpn.into(),
            quantity,
            attributes: attributes.into_iter().collect(),
            details: serde_json::Map::new(),
        }
    }

    /// A variant is discontinued when its MPN carries the marker suffix and
    /// its stock is exactly zero
    pub fn is_discontinued(&self, marker: char) -> bool {
        self.mpn.ends_with(marker) && self.quantity == 0
    }

    /// Whether this variant is defined by the given attribute
    pub fn references(&self, attribute: AttributeId) -> bool {
        self.attributes.contains(&attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discontinued_predicate() {
        let gone = Combination::new("B2#", 0, [AttributeId(1), AttributeId(11)]);
        assert!(gone.is_discontinued('#'));

        // marker but still in stock
        let stocked = Combination::new("B2#", 5, [AttributeId(1)]);
        assert!(!stocked.is_discontinued('#'));

        // zero stock but no marker
        let plain = Combination::new("A1", 0, [AttributeId(1)]);
        assert!(!plain.is_discontinued('#'));

        // negative stock means backorderable, not discontinued
        let backorder = Combination::new("B2#", -3, [AttributeId(1)]);
        assert!(!backorder.is_discontinued('#'));

        let empty_mpn = Combination::new("", 0, [AttributeId(1)]);
        assert!(!empty_mpn.is_discontinued('#'));
    }

    #[test]
    fn test_custom_marker() {
        let combo = Combination::new("C9!", 0, [AttributeId(2)]);
        assert!(combo.is_discontinued('!'));
        assert!(!combo.is_discontinued('#'));
    }

    #[test]
    fn test_absent_field_defaults() {
        // hosts may omit mpn or quantity; both read as "not discontinued"
        // unless quantity is missing AND the marker is present
        let combo: Combination = serde_json::from_value(json!({
            "attributes": [3, 4],
        }))
        .unwrap();
        assert_eq!(combo.mpn, "");
        assert_eq!(combo.quantity, 0);
        assert!(!combo.is_discontinued('#'));

        let marked: Combination = serde_json::from_value(json!({
            "mpn": "X7#",
        }))
        .unwrap();
        assert!(marked.is_discontinued('#'));
    }

    #[test]
    fn test_detail_passthrough() {
        let value = json!({
            "mpn": "A1",
            "quantity": 5,
            "attributes": [1, 10],
            "price": "10.00",
            "reference": "demo_1",
        });
        let combo: Combination = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(combo.details.get("price"), Some(&json!("10.00")));

        let back = serde_json::to_value(&combo).unwrap();
        assert_eq!(back, value);
    }
}
