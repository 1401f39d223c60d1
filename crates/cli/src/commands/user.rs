//! Account management commands.

use tracing::info;

use copperleaf_core::Email;
use copperleaf_storefront::db::UserRepository;
use copperleaf_storefront::services::auth::hash_password;

/// Create an account with the given email and password.
///
/// # Errors
///
/// Returns an error if the email or password is invalid, the email is
/// already registered, or the database operation fails.
pub async fn create(
    email: &str,
    password: &str,
    staff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;

    if password.len() < 8 {
        return Err("password must be at least 8 characters".into());
    }

    let pool = super::connect().await?;

    let password_hash = hash_password(password).map_err(|e| e.to_string())?;
    let user = UserRepository::new(&pool)
        .create(&email, &password_hash, staff)
        .await?;

    info!(id = %user.id, email = %user.email, staff = user.is_staff, "account created");
    Ok(())
}
