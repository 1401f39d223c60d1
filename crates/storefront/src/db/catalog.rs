//! Catalog repository: categories, subcategories, products, articles, feedback.
//!
//! Product queries always join the category and subcategory slugs so a
//! `Product` row can build its canonical detail URL without extra lookups.

use sqlx::PgPool;

use copperleaf_core::{ArticleId, CategoryId, ProductId, SubcategoryId};

use super::RepositoryError;
use crate::models::{Article, Category, Feedback, Product, Subcategory};
use crate::pagination::Page;

/// Columns selected for every `Product` row.
const PRODUCT_COLUMNS: &str = "p.id, p.title, p.slug, p.description, p.price, p.image, \
     p.category_id, p.subcategory_id, c.slug AS category_slug, s.slug AS subcategory_slug";

/// FROM clause joining the slugs into product queries.
const PRODUCT_FROM: &str = "FROM products p \
     JOIN categories c ON c.id = p.category_id \
     JOIN subcategories s ON s.id = p.subcategory_id";

/// A category with its subcategories, for the site navigation bar.
#[derive(Debug, Clone)]
pub struct NavCategory {
    pub title: String,
    pub path: String,
    pub subcategories: Vec<NavSubcategory>,
}

/// A navigation entry for one subcategory.
#[derive(Debug, Clone)]
pub struct NavSubcategory {
    pub title: String,
    pub path: String,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// All categories (newest first) with their subcategories, for the navbar.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn nav_categories(&self) -> Result<Vec<NavCategory>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, title, slug FROM categories ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let subcategories = sqlx::query_as::<_, Subcategory>(
            "SELECT id, title, slug, category_id FROM subcategories ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        let nav = categories
            .into_iter()
            .map(|category| {
                let subs = subcategories
                    .iter()
                    .filter(|s| s.category_id == category.id)
                    .map(|s| NavSubcategory {
                        title: s.title.clone(),
                        path: format!("/catalog/{}/{}", category.slug, s.slug),
                    })
                    .collect();
                NavCategory {
                    title: category.title,
                    path: format!("/catalog/{}", category.slug),
                    subcategories: subs,
                }
            })
            .collect();

        Ok(nav)
    }

    // =========================================================================
    // Categories & Subcategories
    // =========================================================================

    /// Look up a category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, title, slug FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// All subcategories of a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subcategories_of(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Subcategory>, RepositoryError> {
        let subcategories = sqlx::query_as::<_, Subcategory>(
            "SELECT id, title, slug, category_id FROM subcategories
             WHERE category_id = $1 ORDER BY id",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(subcategories)
    }

    /// Look up a subcategory by slug within a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subcategory_by_slug(
        &self,
        category_id: CategoryId,
        slug: &str,
    ) -> Result<Option<Subcategory>, RepositoryError> {
        let subcategory = sqlx::query_as::<_, Subcategory>(
            "SELECT id, title, slug, category_id FROM subcategories
             WHERE category_id = $1 AND slug = $2",
        )
        .bind(category_id)
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(subcategory)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// One page of a subcategory's products, title descending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_page(
        &self,
        subcategory_id: SubcategoryId,
        page: Page,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM}
             WHERE p.subcategory_id = $1
             ORDER BY p.title DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(subcategory_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Total number of products in a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_products(
        &self,
        subcategory_id: SubcategoryId,
    ) -> Result<u64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE subcategory_id = $1",
        )
        .bind(subcategory_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count.try_into().unwrap_or(0))
    }

    /// Resolve a product by its category/subcategory/product slug triple.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_by_path(
        &self,
        category_slug: &str,
        subcategory_slug: &str,
        product_slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM}
             WHERE c.slug = $1 AND s.slug = $2 AND p.slug = $3"
        ))
        .bind(category_slug)
        .bind(subcategory_slug)
        .bind(product_slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Whether a product with this id exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Batch-fetch products by id.
    ///
    /// Ids that no longer resolve are simply absent from the result; the
    /// cart aggregator relies on this to drop deleted products silently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM} WHERE p.id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    // =========================================================================
    // Articles
    // =========================================================================

    /// The most recent articles, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_articles(&self, limit: i64) -> Result<Vec<Article>, RepositoryError> {
        let articles = sqlx::query_as::<_, Article>(
            "SELECT id, title, slug, subject_id, text, date_posted
             FROM articles ORDER BY date_posted DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(articles)
    }

    /// Look up an article by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, RepositoryError> {
        let article = sqlx::query_as::<_, Article>(
            "SELECT id, title, slug, subject_id, text, date_posted
             FROM articles WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(article)
    }

    /// Products linked to any of the given articles, tagged by article id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_for_articles(
        &self,
        article_ids: &[ArticleId],
    ) -> Result<Vec<(ArticleId, Product)>, RepositoryError> {
        if article_ids.is_empty() {
            return Ok(Vec::new());
        }

        #[derive(sqlx::FromRow)]
        struct Row {
            article_id: ArticleId,
            #[sqlx(flatten)]
            product: Product,
        }

        let ids: Vec<i32> = article_ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, Row>(&format!(
            "SELECT ap.article_id, {PRODUCT_COLUMNS}
             {PRODUCT_FROM}
             JOIN article_products ap ON ap.product_id = p.id
             WHERE ap.article_id = ANY($1)
             ORDER BY ap.article_id, p.id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| (r.article_id, r.product)).collect())
    }

    // =========================================================================
    // Feedback
    // =========================================================================

    /// All feedback for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn feedback_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Feedback>, RepositoryError> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT id, name, text, rating, product_id
             FROM feedbacks WHERE product_id = $1 ORDER BY id DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(feedback)
    }

    /// Persist one feedback record for a product.
    ///
    /// Rating bounds are validated by the caller and enforced again by a
    /// CHECK constraint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including
    /// a vanished product id tripping the foreign key).
    pub async fn create_feedback(
        &self,
        product_id: ProductId,
        name: &str,
        text: &str,
        rating: i16,
    ) -> Result<Feedback, RepositoryError> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedbacks (name, text, rating, product_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, text, rating, product_id",
        )
        .bind(name)
        .bind(text)
        .bind(rating)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(feedback)
    }
}
