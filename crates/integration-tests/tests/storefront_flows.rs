//! End-to-end storefront flows: browsing, cart, checkout, feedback.
//!
//! Each test skips itself when no live server/database is configured; see
//! the crate docs for how to run against a real instance.

#![allow(clippy::print_stderr)]
#![allow(clippy::unwrap_used)]

use copperleaf_integration_tests::TestContext;

macro_rules! require_ctx {
    () => {
        match TestContext::from_env().await {
            Some(ctx) => ctx,
            None => {
                eprintln!("STOREFRONT_TEST_URL / STOREFRONT_TEST_DATABASE_URL not set; skipping");
                return;
            }
        }
    };
}

#[tokio::test]
async fn health_endpoints_respond() {
    let ctx = require_ctx!();

    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn add_to_cart_reports_success_and_failure() {
    let ctx = require_ctx!();
    let Some((product_id, _)) = ctx.any_product().await else {
        eprintln!("catalog is empty; run `cl-cli seed` first; skipping");
        return;
    };

    // Existing product: ok
    let body: serde_json::Value = ctx
        .client
        .post(ctx.url(&format!("/cart/add/{product_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], true);

    // Unknown product: failure signal, cart untouched
    let body: serde_json::Value = ctx
        .client
        .post(ctx.url("/cart/add/999999999"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn cart_clear_empties_the_cart() {
    let ctx = require_ctx!();
    let Some((product_id, _)) = ctx.any_product().await else {
        eprintln!("catalog is empty; skipping");
        return;
    };

    ctx.client
        .post(ctx.url(&format!("/cart/add/{product_id}")))
        .send()
        .await
        .unwrap();

    // The clear flag redirects back to an empty cart page
    let page = ctx
        .client
        .get(ctx.url("/cart?clear=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Your cart is empty"));
}

#[tokio::test]
async fn checkout_persists_order_and_clears_cart() {
    let ctx = require_ctx!();
    let Some((product_id, _)) = ctx.any_product().await else {
        eprintln!("catalog is empty; skipping");
        return;
    };

    let email = ctx.login_fresh_account("checkout").await;

    // Two adds of the same product collapse into one line with quantity 2
    for _ in 0..2 {
        let body: serde_json::Value = ctx
            .client
            .post(ctx.url(&format!("/cart/add/{product_id}")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
    }

    let resp = ctx.client.get(ctx.url("/orders/new")).send().await.unwrap();
    assert!(resp.status().is_success());
    let page = resp.text().await.unwrap();
    assert!(page.contains("has been placed"));

    // Exactly one order for this customer, with one (product, qty 2) line
    let lines: Vec<(i32, i32)> = sqlx::query_as(
        "SELECT op.product_id, op.quantity
         FROM order_products op
         JOIN orders o ON o.id = op.order_id
         JOIN users u ON u.id = o.customer_id
         WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_all(&ctx.pool)
    .await
    .unwrap();
    assert_eq!(lines, vec![(product_id, 2)]);

    // Post-condition: the cart is gone
    let page = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Your cart is empty"));
}

#[tokio::test]
async fn unauthenticated_checkout_redirects_and_resumes_after_login() {
    let ctx = require_ctx!();
    let Some((product_id, _)) = ctx.any_product().await else {
        eprintln!("catalog is empty; skipping");
        return;
    };

    // Fill the cart as a guest
    ctx.client
        .post(ctx.url(&format!("/cart/add/{product_id}")))
        .send()
        .await
        .unwrap();

    // Checkout lands on the login page with the remembered intent
    let resp = ctx.client.get(ctx.url("/orders/new")).send().await.unwrap();
    let final_url = resp.url().to_string();
    assert!(final_url.contains("/auth/login"), "got {final_url}");
    let page = resp.text().await.unwrap();
    assert!(page.contains("log in to place your order"));

    // Create the account, then log in with next=/orders/new: the checkout
    // resumes and completes
    let email = TestContext::unique_email("resume");
    let password = "integration-test-password";
    ctx.client
        .post(ctx.url("/auth/signup"))
        .form(&[
            ("email", email.as_str()),
            ("password", password),
            ("password_confirm", password),
        ])
        .send()
        .await
        .unwrap();

    let resp = ctx
        .client
        .post(ctx.url("/auth/login"))
        .form(&[
            ("email", email.as_str()),
            ("password", password),
            ("next", "/orders/new"),
        ])
        .send()
        .await
        .unwrap();
    let page = resp.text().await.unwrap();
    assert!(page.contains("has been placed"));
}

#[tokio::test]
async fn feedback_submission_persists() {
    let ctx = require_ctx!();
    let Some((product_id, product_path)) = ctx.any_product().await else {
        eprintln!("catalog is empty; skipping");
        return;
    };

    let name = format!("Tester {}", std::process::id());
    let resp = ctx
        .client
        .post(ctx.url(&product_path))
        .form(&[
            ("name", name.as_str()),
            ("text", "Five stars!"),
            ("rating", "5"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM feedbacks
         WHERE product_id = $1 AND name = $2 AND rating = 5",
    )
    .bind(product_id)
    .bind(&name)
    .fetch_one(&ctx.pool)
    .await
    .unwrap();
    assert!(count >= 1);
}

#[tokio::test]
async fn invalid_feedback_is_rejected_before_storage() {
    let ctx = require_ctx!();
    let Some((product_id, product_path)) = ctx.any_product().await else {
        eprintln!("catalog is empty; skipping");
        return;
    };

    let name = format!("OutOfRange {}", std::process::id());
    ctx.client
        .post(ctx.url(&product_path))
        .form(&[("name", name.as_str()), ("text", "Six stars!"), ("rating", "6")])
        .send()
        .await
        .unwrap();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM feedbacks WHERE product_id = $1 AND name = $2",
    )
    .bind(product_id)
    .bind(&name)
    .fetch_one(&ctx.pool)
    .await
    .unwrap();
    assert_eq!(count, 0);
}
