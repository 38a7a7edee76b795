//! Cart and region records returned by the commerce backend.

use serde::{Deserialize, Serialize};
use tailored_core::{CartId, ProductId, RegionId, VariantId};

/// A sales region (currency, tax and shipping settings live on the backend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// A cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub region_id: Option<RegionId>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Cart {
    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Envelope for `GET /store/products`.
#[derive(Debug, Deserialize)]
pub(super) struct ProductsEnvelope {
    pub products: Vec<tailored_core::Product>,
}

/// Envelope for `GET /store/regions`.
#[derive(Debug, Deserialize)]
pub(super) struct RegionsEnvelope {
    pub regions: Vec<Region>,
}

/// Envelope for cart endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct CartEnvelope {
    pub cart: Cart,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_count() {
        let cart: Cart = serde_json::from_str(
            r#"{
                "id": "cart_1",
                "region_id": "reg_eu",
                "items": [
                    {"id": "item_1", "title": "Cap", "quantity": 2},
                    {"id": "item_2", "title": "Scarf", "quantity": 1}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_empty_cart_defaults() {
        let cart: Cart = serde_json::from_str(r#"{"id": "cart_1"}"#).unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
