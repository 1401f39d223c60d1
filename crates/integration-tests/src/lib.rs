//! Integration tests for Copperleaf.
//!
//! These tests drive a running storefront over HTTP with a cookie-jar
//! client, and verify persisted state directly against the database.
//!
//! # Running Tests
//!
//! ```bash
//! # Terminal 1: migrated + seeded database, running storefront
//! cargo run -p copperleaf-cli -- migrate
//! cargo run -p copperleaf-cli -- seed
//! cargo run -p copperleaf-storefront
//!
//! # Terminal 2
//! STOREFRONT_TEST_URL=http://127.0.0.1:3000 \
//! STOREFRONT_TEST_DATABASE_URL=postgres://localhost/copperleaf \
//!     cargo test -p copperleaf-integration-tests
//! ```
//!
//! Tests that find neither variable set skip themselves, so the suite is
//! safe to run in environments without a live server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Shared context for one integration test.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Build a context from the environment.
    ///
    /// Returns `None` (the test should skip) when `STOREFRONT_TEST_URL` or
    /// `STOREFRONT_TEST_DATABASE_URL` is not set or unreachable.
    pub async fn from_env() -> Option<Self> {
        let base_url = std::env::var("STOREFRONT_TEST_URL").ok()?;
        let database_url = std::env::var("STOREFRONT_TEST_DATABASE_URL").ok()?;

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&database_url)
            .await
            .ok()?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .ok()?;

        Some(Self {
            client,
            base_url,
            pool,
        })
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// A unique email for this test run.
    #[must_use]
    pub fn unique_email(prefix: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("{prefix}+{nanos}@test.copperleaf.store")
    }

    /// Sign up and log in a fresh account; returns its email.
    ///
    /// # Panics
    ///
    /// Panics if either request fails - the server is expected to be up
    /// once the context exists.
    pub async fn login_fresh_account(&self, prefix: &str) -> String {
        let email = Self::unique_email(prefix);
        let password = "integration-test-password";

        let resp = self
            .client
            .post(self.url("/auth/signup"))
            .form(&[
                ("email", email.as_str()),
                ("password", password),
                ("password_confirm", password),
            ])
            .send()
            .await
            .expect("signup request failed");
        assert!(resp.status().is_success(), "signup failed: {}", resp.status());

        let resp = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("email", email.as_str()), ("password", password)])
            .send()
            .await
            .expect("login request failed");
        assert!(resp.status().is_success(), "login failed: {}", resp.status());

        email
    }

    /// Any seeded product: (id, detail path). `None` when the catalog is empty.
    pub async fn any_product(&self) -> Option<(i32, String)> {
        let row: Option<(i32, String, String, String)> = sqlx::query_as(
            "SELECT p.id, c.slug, s.slug, p.slug
             FROM products p
             JOIN categories c ON c.id = p.category_id
             JOIN subcategories s ON s.id = p.subcategory_id
             ORDER BY p.id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .ok()?;

        row.map(|(id, category, subcategory, product)| {
            (id, format!("/catalog/{category}/{subcategory}/{product}"))
        })
    }
}
