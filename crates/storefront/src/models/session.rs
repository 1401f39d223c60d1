//! Session-related types.
//!
//! Types stored in the session: authentication state, the cart mapping,
//! and the remembered checkout intent.

use serde::{Deserialize, Serialize};

use copperleaf_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart mapping (product id as string -> quantity).
    pub const CART: &str = "cart";

    /// Key marking that a login was triggered by an attempted checkout,
    /// so the login page can explain why the user landed there.
    pub const CHECKOUT_INTENT: &str = "checkout_intent";
}
