//! User account model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use copperleaf_core::{Email, UserId};

/// A storefront account.
///
/// Identity is the email address; there is no username. The password hash
/// lives in the same row and never leaves the db layer except for
/// verification inside the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub date_joined: NaiveDate,
    pub is_staff: bool,
    pub is_active: bool,
}
