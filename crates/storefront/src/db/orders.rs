//! Order repository: the checkout transaction.

use sqlx::PgPool;

use copperleaf_core::{OrderId, ProductId, UserId};

use super::RepositoryError;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an order for a customer from resolved cart lines.
    ///
    /// The order row and all of its lines are written inside a single
    /// transaction: either the whole order commits or nothing does. A
    /// product deleted between cart and checkout trips the foreign key on
    /// its line insert and rolls the entire order back — partial orders
    /// are never persisted.
    ///
    /// The session cart is NOT cleared here; that is the caller's
    /// post-condition after a successful checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn checkout(
        &self,
        customer: UserId,
        lines: &[(ProductId, u32)],
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, OrderId>(
            "INSERT INTO orders (customer_id) VALUES ($1) RETURNING id",
        )
        .bind(customer)
        .fetch_one(&mut *tx)
        .await?;

        for &(product_id, quantity) in lines {
            sqlx::query(
                "INSERT INTO order_products (order_id, product_id, quantity)
                 VALUES ($1, $2, $3)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order_id)
    }
}
