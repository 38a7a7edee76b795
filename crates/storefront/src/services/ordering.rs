//! Personalized ordering of the product listing.
//!
//! Takes the newest-first catalog page and the continent-targeted partial
//! records and produces:
//!
//! - `all_products`: the catalog regrouped by primary category, with the
//!   visitor's most recently browsed category moved to the front. Groups
//!   keep the order in which they were first encountered, and products keep
//!   their catalog order inside a group. This is a pure permutation.
//! - `personalized_products`: the partial records replaced by their full
//!   catalog records, in the personalized query's order. Records missing
//!   from the catalog are dropped and reported as hydration gaps.
//!
//! Everything here operates on already-fetched data and cannot fail.

use std::collections::HashMap;

use tailored_core::{CategoryId, Product, ProductId};

/// Output of [`reorder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedResult {
    /// Hydrated personalized records.
    pub personalized_products: Vec<Product>,
    /// Reordered catalog.
    pub all_products: Vec<Product>,
    /// Personalized IDs that had no catalog record.
    pub hydration_gaps: Vec<ProductId>,
}

/// Products grouped by primary category, in encounter order.
///
/// Products without a category share the `None` bucket. The index is built
/// per call and consumed by [`CategoryBuckets::into_products`].
#[derive(Debug, Default)]
struct CategoryBuckets {
    order: Vec<Option<CategoryId>>,
    buckets: HashMap<Option<CategoryId>, Vec<Product>>,
}

impl CategoryBuckets {
    fn from_products(products: Vec<Product>) -> Self {
        let mut index = Self::default();
        for product in products {
            let key = product.primary_category_id().cloned();
            index
                .buckets
                .entry(key)
                .or_insert_with_key(|key| {
                    index.order.push(key.clone());
                    Vec::new()
                })
                .push(product);
        }
        index
    }

    /// Remove a category's bucket. Unknown categories yield an empty list.
    fn take(&mut self, category_id: &CategoryId) -> Vec<Product> {
        self.buckets
            .remove(&Some(category_id.clone()))
            .unwrap_or_default()
    }

    /// Flatten the remaining buckets in encounter order.
    fn into_products(mut self) -> Vec<Product> {
        let mut products = Vec::with_capacity(self.buckets.values().map(Vec::len).sum());
        for key in &self.order {
            if let Some(bucket) = self.buckets.remove(key) {
                products.extend(bucket);
            }
        }
        products
    }
}

/// Replace partial records with their full catalog records.
///
/// Returns the hydrated records and the IDs that could not be found.
fn hydrate(catalog: &[Product], personalized: &[Product]) -> (Vec<Product>, Vec<ProductId>) {
    // Later duplicates win, matching a map built by sequential insertion
    let by_id: HashMap<&ProductId, &Product> = catalog.iter().map(|p| (&p.id, p)).collect();

    let mut hydrated = Vec::with_capacity(personalized.len());
    let mut gaps = Vec::new();
    for partial in personalized {
        match by_id.get(&partial.id) {
            Some(full) => hydrated.push((*full).clone()),
            None => gaps.push(partial.id.clone()),
        }
    }
    (hydrated, gaps)
}

/// Order the catalog with the recent category first and hydrate the
/// personalized records.
#[must_use]
pub fn reorder(
    catalog: Vec<Product>,
    personalized: &[Product],
    recent_category_id: Option<&CategoryId>,
) -> OrderedResult {
    let (personalized_products, hydration_gaps) = hydrate(&catalog, personalized);
    if !hydration_gaps.is_empty() {
        tracing::warn!(
            missing = ?hydration_gaps,
            "Personalized products missing from catalog page, dropping them"
        );
    }

    let mut buckets = CategoryBuckets::from_products(catalog);
    let mut all_products = recent_category_id
        .map(|id| buckets.take(id))
        .unwrap_or_default();
    all_products.extend(buckets.into_products());

    OrderedResult {
        personalized_products,
        all_products,
        hydration_gaps,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use tailored_core::{ProductCategory, ProductTag, TagId};

    use super::*;

    fn product(id: &str, category: Option<&str>) -> Product {
        let mut p = Product::partial(id);
        p.title = Some(format!("Product {id}"));
        p.tags = vec![ProductTag {
            id: TagId::new("ptag_eu"),
            value: "EU".to_string(),
        }];
        p.categories = category
            .map(|c| {
                vec![ProductCategory {
                    id: CategoryId::new(c),
                    name: c.to_uppercase(),
                    handle: None,
                }]
            })
            .unwrap_or_default();
        p
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn sorted_ids(products: &[Product]) -> Vec<String> {
        let mut ids: Vec<String> = products.iter().map(|p| p.id.to_string()).collect();
        ids.sort();
        ids
    }

    /// Deterministic pseudo-random catalogs with a handful of categories.
    fn generated_catalogs() -> Vec<Vec<Product>> {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        (0..40)
            .map(|len| {
                (0..len)
                    .map(|i| {
                        let category = match next() % 5 {
                            0 => None,
                            n => Some(format!("pcat_{n}")),
                        };
                        product(&format!("prod_{i:03}"), category.as_deref())
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_recent_category_moves_to_front() {
        let catalog = vec![
            product("1", Some("A")),
            product("2", Some("B")),
            product("3", Some("A")),
        ];
        let personalized = vec![Product::partial("2")];

        let result = reorder(catalog.clone(), &personalized, Some(&CategoryId::new("B")));

        assert_eq!(ids(&result.all_products), ["2", "1", "3"]);
        assert_eq!(result.personalized_products, vec![catalog[1].clone()]);
        assert!(result.hydration_gaps.is_empty());
    }

    #[test]
    fn test_without_recent_category_groups_by_encounter_order() {
        let catalog = vec![
            product("1", Some("A")),
            product("2", Some("B")),
            product("3", Some("A")),
        ];

        let result = reorder(catalog, &[], None);

        assert_eq!(ids(&result.all_products), ["1", "3", "2"]);
        assert!(result.personalized_products.is_empty());
    }

    #[test]
    fn test_unknown_recent_category_matches_absent() {
        for catalog in generated_catalogs() {
            let absent = reorder(catalog.clone(), &[], None);
            let missing = reorder(catalog, &[], Some(&CategoryId::new("pcat_unknown")));
            assert_eq!(absent.all_products, missing.all_products);
        }
    }

    #[test]
    fn test_reorder_is_a_permutation() {
        for catalog in generated_catalogs() {
            for recent in [None, Some(CategoryId::new("pcat_2"))] {
                let result = reorder(catalog.clone(), &[], recent.as_ref());
                assert_eq!(result.all_products.len(), catalog.len());
                assert_eq!(sorted_ids(&result.all_products), sorted_ids(&catalog));
            }
        }
    }

    #[test]
    fn test_recent_category_is_contiguous_prefix_in_original_order() {
        let recent = CategoryId::new("pcat_3");
        for catalog in generated_catalogs() {
            let expected: Vec<&Product> = catalog
                .iter()
                .filter(|p| p.primary_category_id() == Some(&recent))
                .collect();

            let result = reorder(catalog.clone(), &[], Some(&recent));

            let prefix: Vec<&Product> = result.all_products.iter().take(expected.len()).collect();
            assert_eq!(prefix, expected);
            assert!(
                result.all_products[expected.len()..]
                    .iter()
                    .all(|p| p.primary_category_id() != Some(&recent))
            );
        }
    }

    #[test]
    fn test_uncategorized_products_form_their_own_bucket() {
        let catalog = vec![
            product("1", None),
            product("2", Some("A")),
            product("3", None),
            product("4", Some("A")),
        ];

        let result = reorder(catalog, &[], Some(&CategoryId::new("A")));

        assert_eq!(ids(&result.all_products), ["2", "4", "1", "3"]);
    }

    #[test]
    fn test_primary_category_is_first_assignment() {
        let mut multi = product("1", Some("B"));
        multi.categories.push(ProductCategory {
            id: CategoryId::new("A"),
            name: "A".to_string(),
            handle: None,
        });
        let catalog = vec![product("0", Some("A")), multi, product("2", Some("A"))];

        let result = reorder(catalog, &[], None);

        assert_eq!(ids(&result.all_products), ["0", "2", "1"]);
    }

    #[test]
    fn test_hydration_preserves_personalized_order() {
        let catalog = vec![
            product("1", Some("A")),
            product("2", Some("B")),
            product("3", Some("A")),
        ];
        let personalized = vec![Product::partial("3"), Product::partial("1")];

        let result = reorder(catalog.clone(), &personalized, None);

        assert_eq!(
            result.personalized_products,
            vec![catalog[2].clone(), catalog[0].clone()]
        );
    }

    #[test]
    fn test_hydration_gap_is_dropped_not_fatal() {
        let catalog = vec![product("1", Some("A"))];
        let personalized = vec![
            Product::partial("missing"),
            Product::partial("1"),
        ];

        let result = reorder(catalog, &personalized, None);

        assert_eq!(ids(&result.personalized_products), ["1"]);
        assert_eq!(result.hydration_gaps, vec![ProductId::new("missing")]);
        assert_eq!(ids(&result.all_products), ["1"]);
    }

    #[test]
    fn test_empty_inputs() {
        let result = reorder(Vec::new(), &[], Some(&CategoryId::new("A")));
        assert_eq!(result, OrderedResult::default());
    }

    #[test]
    fn test_duplicate_catalog_ids_hydrate_to_last_record() {
        let first = product("1", Some("A"));
        let mut second = product("1", Some("B"));
        second.title = Some("Updated".to_string());

        let result = reorder(vec![first, second], &[Product::partial("1")], None);

        assert_eq!(
            result.personalized_products[0].title.as_deref(),
            Some("Updated")
        );
        assert_eq!(result.all_products.len(), 2);
    }
}
