//! Cart route handlers.
//!
//! The cart page is server-rendered; add-to-cart is a lightweight POST
//! returning a JSON success/failure signal for the storefront script.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use copperleaf_core::ProductId;

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::routes::{PageContext, session_error};
use crate::services::cart;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub title: String,
    pub description: String,
    pub detail_url: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
}

impl From<cart::CartSummary> for CartView {
    fn from(summary: cart::CartSummary) -> Self {
        Self {
            items: summary
                .items
                .into_iter()
                .map(|item| CartItemView {
                    title: item.title,
                    description: item.description,
                    detail_url: item.detail_url,
                    image_url: item.image_url,
                    quantity: item.quantity,
                    price: item.unit_price.to_string(),
                    line_total: item.line_total.to_string(),
                })
                .collect(),
            item_count: summary.item_count,
            subtotal: summary.subtotal.to_string(),
        }
    }
}

/// Cart page query parameters.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    /// Any value empties the cart before rendering.
    pub clear: Option<String>,
}

/// JSON response for the add-to-cart signal.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub ok: bool,
    pub message: &'static str,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
}

/// Display the cart page, or empty the cart when `?clear` is present.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CartQuery>,
) -> Result<Response> {
    let raw = cart::read(&session).await.map_err(session_error)?;

    if query.clear.is_some() && !raw.is_empty() {
        cart::clear(&session).await.map_err(session_error)?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let ctx = PageContext::load(&state, &session).await?;
    let summary = cart::load(state.pool(), &raw).await?;

    Ok(CartShowTemplate {
        ctx,
        cart: CartView::from(summary),
    }
    .into_response())
}

/// Add one unit of a product to the session cart.
///
/// The product must exist; otherwise the cart is left untouched and the
/// failure is reported in the JSON body (still HTTP 200 - the client shows
/// the message either way).
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i32>,
) -> Result<Json<AddToCartResponse>> {
    let id = ProductId::new(product_id);

    if !CatalogRepository::new(state.pool())
        .product_exists(id)
        .await?
    {
        return Ok(Json(AddToCartResponse {
            ok: false,
            message: "Could not add the item, please try again.",
        }));
    }

    let mut raw = cart::read(&session).await.map_err(session_error)?;
    cart::increment(&mut raw, id);
    cart::write(&session, &raw).await.map_err(session_error)?;

    Ok(Json(AddToCartResponse {
        ok: true,
        message: "Added to cart!",
    }))
}
