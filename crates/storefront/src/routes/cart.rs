//! Cart route handlers.
//!
//! The cart ID lives in a cookie. A visitor without one, or whose cart the
//! catalog service no longer knows, gets a fresh cart in the first region.

use axum::{Json, extract::State};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Serialize;
use tailored_core::CartId;
use tracing::{info, instrument};

use crate::catalog::Cart;
use crate::error::AppError;
use crate::services::cart::get_or_create_cart;
use crate::state::AppState;

/// Cookie carrying the cart ID.
pub const CART_COOKIE: &str = "cartId";

/// Response body for `GET /cart`.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Cart,
    pub item_count: u32,
}

fn cart_cookie(id: &CartId) -> Cookie<'static> {
    Cookie::build((CART_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Show the visitor's cart, creating one if needed.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<CartResponse>), AppError> {
    let cart_id = jar
        .get(CART_COOKIE)
        .map(Cookie::value)
        .filter(|value| !value.is_empty())
        .map(CartId::new);

    let resolved = get_or_create_cart(state.catalog(), cart_id.as_ref()).await?;

    let jar = if resolved.created {
        info!(cart_id = %resolved.cart.id, "Issued new cart");
        jar.add(cart_cookie(&resolved.cart.id))
    } else {
        jar
    };

    let item_count = resolved.cart.item_count();
    Ok((
        jar,
        Json(CartResponse {
            cart: resolved.cart,
            item_count,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_cookie_attributes() {
        let cookie = cart_cookie(&CartId::new("cart_01"));
        assert_eq!(cookie.name(), CART_COOKIE);
        assert_eq!(cookie.value(), "cart_01");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
