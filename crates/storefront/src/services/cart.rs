//! Session cart: storage shape, mutation, and the priced aggregate view.
//!
//! The cart lives in the user's session under the fixed [`session_keys::CART`]
//! key as a map of product-id-as-string to quantity. It has no identity or
//! durability beyond the session and is discarded on checkout or explicit
//! clear.
//!
//! Mutation is read-modify-write without locking: two concurrent requests
//! from the same session can race and lose an increment (last-write-wins at
//! the session store). Accepted limitation.

use std::collections::HashMap;

use sqlx::PgPool;
use tower_sessions::Session;

use copperleaf_core::{Price, ProductId};

use crate::db::{CatalogRepository, RepositoryError};
use crate::models::{Product, session_keys};

/// The session wire shape of the cart.
///
/// Keys are product ids as strings because session values round-trip
/// through JSON, where object keys are always strings.
pub type CartMap = HashMap<String, u32>;

/// A priced cart line for display.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub unit_price: Price,
    pub image_url: String,
    pub detail_url: String,
    pub quantity: u32,
    pub line_total: Price,
}

/// The aggregate cart view: priced lines, total quantity, subtotal.
#[derive(Debug, Clone)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Price,
}

impl CartSummary {
    /// An empty cart view.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: Price::ZERO,
        }
    }

    /// Whether the view has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Cart mutation
// =============================================================================

/// Increment the stored quantity for a product by 1 (absent means 0).
///
/// Adding the same product twice yields quantity 2 under one key, never
/// two entries.
pub fn increment(cart: &mut CartMap, product_id: ProductId) {
    let qty = cart.entry(product_id.to_string()).or_insert(0);
    *qty = qty.saturating_add(1);
}

/// Parse the cart keys into product ids for the batch lookup.
///
/// Keys that don't parse as ids are dropped here, the same way ids that no
/// longer resolve to a product are dropped by the lookup itself.
#[must_use]
pub fn product_ids(cart: &CartMap) -> Vec<i32> {
    cart.keys().filter_map(|k| k.parse::<i32>().ok()).collect()
}

/// The cart as (product id, quantity) pairs for the order recorder.
#[must_use]
pub fn lines(cart: &CartMap) -> Vec<(ProductId, u32)> {
    cart.iter()
        .filter_map(|(key, &qty)| {
            let id = key.parse::<i32>().ok()?;
            Some((ProductId::new(id), qty))
        })
        .collect()
}

// =============================================================================
// Aggregation
// =============================================================================

/// Build the priced view from resolved products and the raw cart mapping.
///
/// Pure and read-only. Line order follows the store's return order (not
/// guaranteed stable). Cart entries with no matching product are simply
/// absent from the result — a deleted product disappears from the cart
/// without an error.
#[must_use]
pub fn summarize(products: Vec<Product>, cart: &CartMap) -> CartSummary {
    let mut summary = CartSummary::empty();

    for product in products {
        let Some(&quantity) = cart.get(&product.id.to_string()) else {
            continue;
        };

        let line_total = product.price.times(quantity);
        summary.item_count += quantity;
        summary.subtotal = summary.subtotal + line_total;
        summary.items.push(CartItem {
            id: product.id,
            title: product.title,
            description: product.description,
            unit_price: product.price,
            image_url: format!("/media/{}", product.image),
            detail_url: format!(
                "/catalog/{}/{}/{}",
                product.category_slug, product.subcategory_slug, product.slug
            ),
            quantity,
            line_total,
        });
    }

    summary
}

/// Load the priced view for a raw session cart.
///
/// Batch-fetches all referenced products in one query and aggregates.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the product lookup fails.
pub async fn load(pool: &PgPool, cart: &CartMap) -> Result<CartSummary, RepositoryError> {
    if cart.is_empty() {
        return Ok(CartSummary::empty());
    }

    let ids = product_ids(cart);
    let products = CatalogRepository::new(pool).products_by_ids(&ids).await?;

    Ok(summarize(products, cart))
}

// =============================================================================
// Session access
// =============================================================================

/// Read the cart from the session (empty if absent).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn read(session: &Session) -> Result<CartMap, tower_sessions::session::Error> {
    Ok(session
        .get::<CartMap>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn write(
    session: &Session,
    cart: &CartMap,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Remove the cart key from the session entirely.
///
/// Returns `true` if a cart was present.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear(session: &Session) -> Result<bool, tower_sessions::session::Error> {
    let removed = session.remove::<CartMap>(session_keys::CART).await?;
    Ok(removed.is_some())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use copperleaf_core::{CategoryId, SubcategoryId};

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            slug: format!("product-{id}"),
            description: "A fine product".to_string(),
            price: Price::from_cents(cents),
            image: format!("product_images/{id}.jpg"),
            category_id: CategoryId::new(1),
            subcategory_id: SubcategoryId::new(1),
            category_slug: "electronics".to_string(),
            subcategory_slug: "laptops".to_string(),
        }
    }

    #[test]
    fn test_summarize_totals() {
        // subtotal = sum(price * qty), item_count = sum(qty)
        let cart = CartMap::from([("1".to_string(), 2), ("2".to_string(), 3)]);
        let summary = summarize(vec![product(1, 1000), product(2, 250)], &cart);

        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.item_count, 5);
        assert_eq!(summary.subtotal, Price::from_cents(2 * 1000 + 3 * 250));
    }

    #[test]
    fn test_summarize_line_fields() {
        let cart = CartMap::from([("7".to_string(), 2)]);
        let summary = summarize(vec![product(7, 499)], &cart);

        let item = summary.items.first().unwrap();
        assert_eq!(item.id, ProductId::new(7));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total, Price::from_cents(998));
        assert_eq!(item.detail_url, "/catalog/electronics/laptops/product-7");
        assert_eq!(item.image_url, "/media/product_images/7.jpg");
    }

    #[test]
    fn test_summarize_empty_cart() {
        let summary = summarize(Vec::new(), &CartMap::new());
        assert!(summary.is_empty());
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.subtotal, Price::ZERO);
    }

    #[test]
    fn test_summarize_drops_deleted_products() {
        // Cart references product 99 but the store no longer has it:
        // the line is silently omitted, no error.
        let cart = CartMap::from([("1".to_string(), 1), ("99".to_string(), 4)]);
        let summary = summarize(vec![product(1, 500)], &cart);

        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.subtotal, Price::from_cents(500));
    }

    #[test]
    fn test_increment_same_product_twice() {
        let mut cart = CartMap::new();
        increment(&mut cart, ProductId::new(5));
        increment(&mut cart, ProductId::new(5));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("5"), Some(&2));
    }

    #[test]
    fn test_increment_distinct_products() {
        let mut cart = CartMap::new();
        increment(&mut cart, ProductId::new(1));
        increment(&mut cart, ProductId::new(2));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get("1"), Some(&1));
        assert_eq!(cart.get("2"), Some(&1));
    }

    #[test]
    fn test_product_ids_drops_junk_keys() {
        let cart = CartMap::from([
            ("3".to_string(), 1),
            ("not-a-number".to_string(), 2),
        ]);
        let mut ids = product_ids(&cart);
        ids.sort_unstable();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_lines_for_checkout() {
        let cart = CartMap::from([("1".to_string(), 2), ("2".to_string(), 1)]);
        let mut pairs = lines(&cart);
        pairs.sort_unstable_by_key(|(id, _)| *id);

        assert_eq!(
            pairs,
            vec![(ProductId::new(1), 2), (ProductId::new(2), 1)]
        );
    }
}
