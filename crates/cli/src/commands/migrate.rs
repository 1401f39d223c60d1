//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cl-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/storefront/migrations/`.

use tracing::info;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the environment is missing the database URL, the
/// connection fails, or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Connecting to storefront database...");
    let pool = super::connect().await?;

    info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Storefront migrations complete!");
    Ok(())
}
