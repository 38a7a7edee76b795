//! Cart resolution: reuse the visitor's cart or start a new one.

use tailored_core::CartId;
use tracing::{info, instrument};

use crate::catalog::{Cart, CatalogError, CatalogService};

/// A resolved cart and whether it was newly created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCart {
    pub cart: Cart,
    /// `true` when the cart ID cookie must be (re)issued.
    pub created: bool,
}

/// Return the visitor's existing cart, or create one in the first region.
///
/// A cart ID that no longer resolves (checked-out or expired carts) is
/// treated the same as no cart ID.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the backend fails or has no regions.
#[instrument(skip(catalog))]
pub async fn get_or_create_cart(
    catalog: &dyn CatalogService,
    cart_id: Option<&CartId>,
) -> Result<ResolvedCart, CatalogError> {
    if let Some(id) = cart_id
        && let Some(cart) = catalog.retrieve_cart(id).await?
    {
        return Ok(ResolvedCart {
            cart,
            created: false,
        });
    }

    let region = catalog
        .list_regions()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CatalogError::NotFound("no regions configured".to_string()))?;

    let cart = catalog.create_cart(&region.id).await?;
    info!(cart_id = %cart.id, region_id = %region.id, "Created cart");

    Ok(ResolvedCart {
        cart,
        created: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tailored_core::RegionId;

    use super::*;
    use crate::catalog::Region;
    use crate::catalog::memory::MemoryCatalog;

    fn region(id: &str) -> Region {
        Region {
            id: RegionId::new(id),
            name: id.to_uppercase(),
            currency_code: Some("eur".to_string()),
        }
    }

    #[tokio::test]
    async fn test_existing_cart_is_reused() {
        let catalog = MemoryCatalog::new(vec![], vec![region("reg_eu")]);
        let existing = Cart {
            id: CartId::new("cart_1"),
            region_id: Some(RegionId::new("reg_eu")),
            items: vec![],
        };
        catalog.insert_cart(existing.clone()).await;

        let resolved = get_or_create_cart(&catalog, Some(&existing.id)).await.unwrap();

        assert!(!resolved.created);
        assert_eq!(resolved.cart, existing);
        assert_eq!(catalog.cart_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_cookie_creates_cart_in_first_region() {
        let catalog = MemoryCatalog::new(vec![], vec![region("reg_eu"), region("reg_us")]);

        let resolved = get_or_create_cart(&catalog, None).await.unwrap();

        assert!(resolved.created);
        assert_eq!(resolved.cart.region_id, Some(RegionId::new("reg_eu")));
    }

    #[tokio::test]
    async fn test_stale_cart_id_creates_new_cart() {
        let catalog = MemoryCatalog::new(vec![], vec![region("reg_eu")]);

        let resolved = get_or_create_cart(&catalog, Some(&CartId::new("cart_gone")))
            .await
            .unwrap();

        assert!(resolved.created);
        assert_ne!(resolved.cart.id.as_str(), "cart_gone");
    }

    #[tokio::test]
    async fn test_no_regions_is_an_error() {
        let catalog = MemoryCatalog::default();
        let result = get_or_create_cart(&catalog, None).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }
}
