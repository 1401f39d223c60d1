//! Checkout route handler.
//!
//! State machine: an unauthenticated visitor is redirected to login with
//! the intent remembered in the session; once authenticated, the cart
//! snapshot is recorded as an order in one transaction and the session
//! cart is cleared.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::session_keys;
use crate::routes::{PageContext, session_error};
use crate::services::cart;
use crate::state::AppState;

/// Order success page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/success.html")]
pub struct OrderSuccessTemplate {
    pub ctx: PageContext,
    pub order_id: String,
}

/// Place an order from the session cart.
///
/// # Errors
///
/// Returns `AppError::Database` if the checkout transaction fails - in
/// which case nothing was persisted and the cart is left intact.
#[instrument(skip(state, session, user))]
pub async fn new(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response> {
    let Some(user) = user else {
        // Remember why the visitor lands on the login page; login resumes
        // checkout via the next parameter.
        session
            .insert(session_keys::CHECKOUT_INTENT, true)
            .await
            .map_err(session_error)?;
        return Ok(Redirect::to("/auth/login?next=/orders/new").into_response());
    };

    let raw = cart::read(&session).await.map_err(session_error)?;
    if raw.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let lines = cart::lines(&raw);
    let order_id = OrderRepository::new(state.pool())
        .checkout(user.id, &lines)
        .await?;

    // Post-condition of a successful checkout: the cart is gone.
    cart::clear(&session).await.map_err(session_error)?;

    tracing::info!(order_id = %order_id, customer = %user.email, "order placed");

    let ctx = PageContext::load(&state, &session).await?;
    Ok(OrderSuccessTemplate {
        ctx,
        order_id: order_id.to_string(),
    }
    .into_response())
}
