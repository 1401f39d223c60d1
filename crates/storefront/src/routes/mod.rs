//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (latest articles)
//! GET  /health                 - Health check
//!
//! # Articles
//! GET  /articles/{slug}        - Article detail
//!
//! # Catalog
//! GET  /catalog/{category}                           - Subcategory listing
//! GET  /catalog/{category}/{subcategory}             - Product listing (paginated)
//! GET  /catalog/{category}/{subcategory}/{product}   - Product detail
//! POST /catalog/{category}/{subcategory}/{product}   - Submit feedback
//!
//! # Cart
//! GET  /cart                   - Cart page (?clear=1 empties it)
//! POST /cart/add/{product_id}  - Add one unit (JSON success/failure signal)
//!
//! # Checkout
//! GET  /orders/new             - Place an order from the session cart
//!                                (redirects to login with remembered intent
//!                                when unauthenticated)
//!
//! # Auth
//! GET  /auth/signup            - Signup page
//! POST /auth/signup            - Signup action
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (honors ?next=/local/path)
//! POST /auth/logout            - Logout action
//! ```
//!
//! Handlers are plain functions composed from small helpers (`PageContext`,
//! the repositories, the pagination module) - there is no handler-class
//! hierarchy.

pub mod articles;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod home;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::db::CatalogRepository;
use crate::db::catalog::NavCategory;
use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Data every rendered page needs: the category navbar and the login state.
pub struct PageContext {
    pub navbar: Vec<NavCategory>,
    pub user: Option<CurrentUser>,
}

impl PageContext {
    /// Load the shared page context for a request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the navbar query fails.
    pub async fn load(state: &AppState, session: &Session) -> Result<Self, AppError> {
        let navbar = CatalogRepository::new(state.pool()).nav_categories().await?;
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();

        Ok(Self { navbar, user })
    }
}

/// Map a session store failure into an application error.
pub(crate) fn session_error(e: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session error: {e}"))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/{category}", get(catalog::subcategories))
        .route("/{category}/{subcategory}", get(catalog::products))
        .route(
            "/{category}/{subcategory}/{product}",
            get(catalog::product_detail).post(catalog::submit_feedback),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{product_id}", post(cart::add))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Articles
        .route("/articles/{slug}", get(articles::show))
        // Catalog routes
        .nest("/catalog", catalog_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/orders/new", get(orders::new))
        // Auth routes
        .nest("/auth", auth_routes())
}
