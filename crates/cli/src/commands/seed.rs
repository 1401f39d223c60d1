//! Seed the database with a small demo catalog.
//!
//! Inserts a category tree, a handful of products, and one article so a
//! fresh install has something to browse. Idempotent: existing slugs are
//! left alone.

use sqlx::PgPool;
use tracing::info;

/// One product row to seed.
struct SeedProduct {
    title: &'static str,
    slug: &'static str,
    description: &'static str,
    /// Minor currency units (cents)
    price: i64,
    image: &'static str,
    subcategory_slug: &'static str,
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        title: "Fieldbook 14",
        slug: "fieldbook-14",
        description: "A quiet 14-inch laptop with an all-day battery.",
        price: 129_900,
        image: "product_images/fieldbook-14.jpg",
        subcategory_slug: "laptops",
    },
    SeedProduct {
        title: "Slate 11",
        slug: "slate-11",
        description: "An 11-inch tablet for reading and sketching.",
        price: 54_900,
        image: "product_images/slate-11.jpg",
        subcategory_slug: "tablets",
    },
    SeedProduct {
        title: "Seven-Port Hub",
        slug: "seven-port-hub",
        description: "USB-C hub with seven ports and pass-through charging.",
        price: 4_999,
        image: "product_images/seven-port-hub.jpg",
        subcategory_slug: "accessories",
    },
    SeedProduct {
        title: "Canvas Sleeve",
        slug: "canvas-sleeve",
        description: "Waxed canvas sleeve, fits 13-14 inch laptops.",
        price: 3_500,
        image: "product_images/canvas-sleeve.jpg",
        subcategory_slug: "accessories",
    },
];

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns an error if the database connection or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let category_id = upsert_category(&pool, "Electronics", "electronics").await?;

    for (title, slug) in [
        ("Laptops", "laptops"),
        ("Tablets", "tablets"),
        ("Accessories", "accessories"),
    ] {
        upsert_subcategory(&pool, category_id, title, slug).await?;
    }

    let mut inserted = 0;
    for product in SEED_PRODUCTS {
        if insert_product(&pool, category_id, product).await? {
            inserted += 1;
        }
    }

    seed_article(&pool, category_id).await?;

    info!(inserted, "Seeding complete");
    Ok(())
}

async fn upsert_category(pool: &PgPool, title: &str, slug: &str) -> Result<i32, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO categories (title, slug) VALUES ($1, $2)
         ON CONFLICT (slug) DO UPDATE SET title = EXCLUDED.title
         RETURNING id",
    )
    .bind(title)
    .bind(slug)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn upsert_subcategory(
    pool: &PgPool,
    category_id: i32,
    title: &str,
    slug: &str,
) -> Result<i32, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO subcategories (title, slug, category_id) VALUES ($1, $2, $3)
         ON CONFLICT (category_id, slug) DO UPDATE SET title = EXCLUDED.title
         RETURNING id",
    )
    .bind(title)
    .bind(slug)
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Insert one product; returns false if its slug already existed.
async fn insert_product(
    pool: &PgPool,
    category_id: i32,
    product: &SeedProduct,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_scalar::<_, i32>(
        "INSERT INTO products (title, slug, description, price, image, category_id, subcategory_id)
         SELECT $1, $2, $3, $4, $5, $6, s.id
         FROM subcategories s
         WHERE s.category_id = $6 AND s.slug = $7
         ON CONFLICT (subcategory_id, slug) DO NOTHING
         RETURNING id",
    )
    .bind(product.title)
    .bind(product.slug)
    .bind(product.description)
    .bind(product.price)
    .bind(product.image)
    .bind(category_id)
    .bind(product.subcategory_slug)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

async fn seed_article(pool: &PgPool, category_id: i32) -> Result<(), sqlx::Error> {
    let article_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO articles (title, slug, subject_id, text)
         SELECT $1, $2, s.id, $3
         FROM subcategories s
         WHERE s.category_id = $4 AND s.slug = 'laptops'
         ON CONFLICT (slug) DO NOTHING
         RETURNING id",
    )
    .bind("Picking your first laptop")
    .bind("picking-your-first-laptop")
    .bind(
        "Screen size, battery life, and weight matter more than raw specs \
         for most people. Here's what we'd look at first, and the machines \
         we keep recommending.",
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await?;

    let Some(article_id) = article_id else {
        return Ok(());
    };

    sqlx::query(
        "INSERT INTO article_products (article_id, product_id)
         SELECT $1, p.id FROM products p WHERE p.slug IN ('fieldbook-14', 'canvas-sleeve')
         ON CONFLICT DO NOTHING",
    )
    .bind(article_id)
    .execute(pool)
    .await?;

    Ok(())
}
