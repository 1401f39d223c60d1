//! Catalog models: categories, subcategories, products, articles, feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copperleaf_core::{ArticleId, CategoryId, FeedbackId, Price, ProductId, SubcategoryId};

/// A top-level catalog section.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub slug: String,
}

impl Category {
    /// Canonical URL of the category's subcategory listing.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/catalog/{}", self.slug)
    }
}

/// A section within a category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub title: String,
    pub slug: String,
    pub category_id: CategoryId,
}

/// A catalog product.
///
/// `category_slug` and `subcategory_slug` are joined in by every product
/// query so the canonical detail URL can be built without extra lookups.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    /// Media-relative image path, e.g. `product_images/hub.jpg`.
    pub image: String,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub category_slug: String,
    pub subcategory_slug: String,
}

impl Product {
    /// Canonical URL of the product detail page.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!(
            "/catalog/{}/{}/{}",
            self.category_slug, self.subcategory_slug, self.slug
        )
    }

    /// Public URL of the product image.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("/media/{}", self.image)
    }
}

/// An editorial article referencing zero or more products.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    /// Subcategory the article is about.
    pub subject_id: SubcategoryId,
    pub text: String,
    pub date_posted: DateTime<Utc>,
}

impl Article {
    /// Canonical URL of the article page.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/articles/{}", self.slug)
    }
}

/// A customer review of a product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: FeedbackId,
    pub name: String,
    pub text: String,
    /// 1..=5, enforced by a CHECK constraint and validated before insert.
    pub rating: i16,
    pub product_id: ProductId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(1),
            title: "USB-C Hub".to_string(),
            slug: "usb-c-hub".to_string(),
            description: "Seven ports".to_string(),
            price: Price::from_cents(4999),
            image: "product_images/hub.jpg".to_string(),
            category_id: CategoryId::new(1),
            subcategory_id: SubcategoryId::new(2),
            category_slug: "electronics".to_string(),
            subcategory_slug: "adapters".to_string(),
        }
    }

    #[test]
    fn test_product_detail_path() {
        assert_eq!(
            sample_product().detail_path(),
            "/catalog/electronics/adapters/usb-c-hub"
        );
    }

    #[test]
    fn test_product_image_url() {
        assert_eq!(sample_product().image_url(), "/media/product_images/hub.jpg");
    }
}
