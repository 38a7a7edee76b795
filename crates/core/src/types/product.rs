//! Catalog product records.
//!
//! The commerce backend returns products in two shapes: a *partial* record
//! when the query projects only `id`, and a *full* record when variants,
//! categories and tags are requested as relations. Both deserialize into
//! [`Product`]; every field except `id` defaults when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId, TagId, VariantId};

/// A product category assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Display name (e.g., "Sneakers").
    #[serde(default)]
    pub name: String,
    /// URL handle.
    #[serde(default)]
    pub handle: Option<String>,
}

/// A product tag. Continent codes are stored as tag values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTag {
    /// Tag ID.
    pub id: TagId,
    /// Tag value (e.g., "EU").
    pub value: String,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID (pass to cart line items).
    pub id: VariantId,
    /// Display title (e.g., "Large / Blue").
    #[serde(default)]
    pub title: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Ordered category assignments. The first entry drives listing order.
    #[serde(default)]
    pub categories: Vec<ProductCategory>,
    #[serde(default)]
    pub tags: Vec<ProductTag>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a partial record that only carries an ID.
    #[must_use]
    pub fn partial(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            subtitle: None,
            description: None,
            handle: None,
            thumbnail: None,
            categories: Vec::new(),
            tags: Vec::new(),
            variants: Vec::new(),
            created_at: None,
        }
    }

    /// The primary category (first assignment), if any.
    #[must_use]
    pub fn primary_category(&self) -> Option<&ProductCategory> {
        self.categories.first()
    }

    /// The primary category ID, if any.
    #[must_use]
    pub fn primary_category_id(&self) -> Option<&CategoryId> {
        self.primary_category().map(|c| &c.id)
    }

    /// Whether the product carries a tag with the given value.
    #[must_use]
    pub fn has_tag(&self, value: &str) -> bool {
        self.tags.iter().any(|t| t.value == value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_record_deserializes_from_id_only() {
        let product: Product = serde_json::from_str(r#"{"id":"prod_1"}"#).unwrap();
        assert_eq!(product, Product::partial("prod_1"));
        assert!(product.primary_category_id().is_none());
    }

    #[test]
    fn test_full_record_primary_category_is_first() {
        let json = r#"{
            "id": "prod_1",
            "title": "Trail Runner",
            "categories": [
                {"id": "pcat_shoes", "name": "Shoes"},
                {"id": "pcat_sale", "name": "Sale"}
            ],
            "tags": [{"id": "ptag_1", "value": "EU"}],
            "variants": [{"id": "variant_1", "title": "42"}],
            "created_at": "2024-01-15T10:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.primary_category_id().unwrap().as_str(), "pcat_shoes");
        assert_eq!(product.primary_category().unwrap().name, "Shoes");
        assert!(product.has_tag("EU"));
        assert!(!product.has_tag("NA"));
        assert_eq!(product.variants.len(), 1);
    }
}
