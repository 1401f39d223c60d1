//! Catalog route handlers: subcategory listing, product listing, product
//! detail with customer feedback.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use copperleaf_core::Slug;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Feedback, Product, Subcategory};
use crate::pagination::{Page, PageInfo};
use crate::routes::PageContext;
use crate::state::AppState;

/// Products shown per listing page.
const PRODUCTS_PER_PAGE: u32 = 4;

/// Feedback name length limit.
const FEEDBACK_NAME_MAX: usize = 30;

/// Feedback text length limit.
const FEEDBACK_TEXT_MAX: usize = 500;

// =============================================================================
// Views
// =============================================================================

/// A subcategory tile on the category page.
#[derive(Clone)]
pub struct SubcategoryView {
    pub title: String,
    pub path: String,
}

/// A product card on the listing page.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub path: String,
    pub price: String,
    pub image_url: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            path: product.detail_path(),
            price: product.price.to_string(),
            image_url: product.image_url(),
        }
    }
}

/// A feedback entry on the product page.
#[derive(Clone)]
pub struct FeedbackView {
    pub name: String,
    pub text: String,
    pub rating: i16,
}

impl From<&Feedback> for FeedbackView {
    fn from(feedback: &Feedback) -> Self {
        Self {
            name: feedback.name.clone(),
            text: feedback.text.clone(),
            rating: feedback.rating,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Subcategory listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/subcategories.html")]
pub struct SubcategoriesTemplate {
    pub ctx: PageContext,
    pub category_title: String,
    pub subcategories: Vec<SubcategoryView>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/products.html")]
pub struct ProductsTemplate {
    pub ctx: PageContext,
    pub subcategory_title: String,
    pub base_path: String,
    pub products: Vec<ProductCardView>,
    pub page: PageInfo,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/product.html")]
pub struct ProductDetailTemplate {
    pub ctx: PageContext,
    pub product: ProductCardView,
    pub description: String,
    pub feedback: Vec<FeedbackView>,
    pub feedback_error: Option<String>,
    pub feedback_saved: bool,
}

// =============================================================================
// Query & Form Types
// =============================================================================

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

/// Feedback status query parameters (set by the POST redirect).
#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub feedback_error: Option<String>,
    pub feedback: Option<String>,
}

/// Feedback form data.
///
/// `rating` stays optional so a submission with no radio selected reaches
/// validation instead of failing form deserialization.
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub name: String,
    pub text: String,
    pub rating: Option<i16>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the subcategories of a category.
///
/// # Errors
///
/// Returns 404 if the category slug doesn't resolve.
#[instrument(skip(state, session))]
pub async fn subcategories(
    State(state): State<AppState>,
    session: Session,
    Path(category): Path<String>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::load(&state, &session).await?;
    let category = parse_slug(&category)?;

    let repo = CatalogRepository::new(state.pool());
    let category = repo
        .category_by_slug(category.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {category}")))?;

    let subcategories = repo
        .subcategories_of(category.id)
        .await?
        .iter()
        .map(|s| SubcategoryView {
            title: s.title.clone(),
            path: format!("/catalog/{}/{}", category.slug, s.slug),
        })
        .collect();

    Ok(SubcategoriesTemplate {
        ctx,
        category_title: category.title,
        subcategories,
    })
}

/// Display one page of a subcategory's products.
///
/// # Errors
///
/// Returns 404 if either slug doesn't resolve.
#[instrument(skip(state, session))]
pub async fn products(
    State(state): State<AppState>,
    session: Session,
    Path((category, subcategory)): Path<(String, String)>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::load(&state, &session).await?;

    let repo = CatalogRepository::new(state.pool());
    let subcategory = resolve_subcategory(&repo, &category, &subcategory).await?;

    let page = Page::new(query.page, PRODUCTS_PER_PAGE);
    let products = repo.product_page(subcategory.id, page).await?;
    let total = repo.count_products(subcategory.id).await?;

    Ok(ProductsTemplate {
        ctx,
        subcategory_title: subcategory.title.clone(),
        base_path: format!("/catalog/{}/{}", category, subcategory.slug),
        products: products.iter().map(ProductCardView::from).collect(),
        page: PageInfo::new(page, total),
    })
}

/// Display a product with its feedback and the feedback form.
///
/// # Errors
///
/// Returns 404 if the slug triple doesn't resolve.
#[instrument(skip(state, session))]
pub async fn product_detail(
    State(state): State<AppState>,
    session: Session,
    Path((category, subcategory, product)): Path<(String, String, String)>,
    Query(query): Query<FeedbackQuery>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::load(&state, &session).await?;

    let repo = CatalogRepository::new(state.pool());
    let product = resolve_product(&repo, &category, &subcategory, &product).await?;

    let feedback = repo
        .feedback_for_product(product.id)
        .await?
        .iter()
        .map(FeedbackView::from)
        .collect();

    Ok(ProductDetailTemplate {
        ctx,
        description: product.description.clone(),
        product: ProductCardView::from(&product),
        feedback,
        feedback_error: query.feedback_error.map(feedback_error_message),
        feedback_saved: query.feedback.is_some(),
    })
}

/// Handle a feedback form submission for a product.
///
/// Invalid submissions never reach storage; they redirect back to the
/// product page with an error flag. Valid ones persist a feedback row and
/// redirect to the product's canonical URL.
///
/// # Errors
///
/// Returns 404 if the slug triple doesn't resolve.
#[instrument(skip(state, form))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path((category, subcategory, product)): Path<(String, String, String)>,
    axum::Form(form): axum::Form<FeedbackForm>,
) -> Result<Response> {
    let repo = CatalogRepository::new(state.pool());
    let product = resolve_product(&repo, &category, &subcategory, &product).await?;

    let path = product.detail_path();
    let rating = form.rating.unwrap_or(0);

    if let Err(flag) = validate_feedback(&form.name, &form.text, rating) {
        return Ok(Redirect::to(&format!("{path}?feedback_error={flag}")).into_response());
    }

    repo.create_feedback(product.id, form.name.trim(), form.text.trim(), rating)
        .await?;

    Ok(Redirect::to(&format!("{path}?feedback=saved")).into_response())
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a raw path segment into a slug, or 404.
///
/// A path that can't even be a slug can't name anything in the catalog,
/// so it never reaches a query.
pub(crate) fn parse_slug(raw: &str) -> Result<Slug> {
    Slug::parse(raw).map_err(|_| AppError::NotFound(format!("page {raw}")))
}

/// Resolve a full product path triple or 404.
async fn resolve_product(
    repo: &CatalogRepository<'_>,
    category_slug: &str,
    subcategory_slug: &str,
    product_slug: &str,
) -> Result<Product> {
    let category_slug = parse_slug(category_slug)?;
    let subcategory_slug = parse_slug(subcategory_slug)?;
    let product_slug = parse_slug(product_slug)?;

    repo.product_by_path(
        category_slug.as_str(),
        subcategory_slug.as_str(),
        product_slug.as_str(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("product {product_slug}")))
}

/// Resolve a category/subcategory slug pair or 404.
async fn resolve_subcategory(
    repo: &CatalogRepository<'_>,
    category_slug: &str,
    subcategory_slug: &str,
) -> Result<Subcategory> {
    let category_slug = parse_slug(category_slug)?;
    let subcategory_slug = parse_slug(subcategory_slug)?;

    let category = repo
        .category_by_slug(category_slug.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {category_slug}")))?;

    repo.subcategory_by_slug(category.id, subcategory_slug.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("subcategory {subcategory_slug}")))
}

/// Validate a feedback submission; the error is a redirect flag.
fn validate_feedback(name: &str, text: &str, rating: i16) -> std::result::Result<(), &'static str> {
    let name = name.trim();
    let text = text.trim();

    if name.is_empty() || name.chars().count() > FEEDBACK_NAME_MAX {
        return Err("name");
    }
    if text.is_empty() || text.chars().count() > FEEDBACK_TEXT_MAX {
        return Err("text");
    }
    if !(1..=5).contains(&rating) {
        return Err("rating");
    }

    Ok(())
}

/// Human message for a feedback error flag.
fn feedback_error_message(flag: String) -> String {
    match flag.as_str() {
        "name" => "Please enter your name (up to 30 characters).".to_string(),
        "text" => "Please enter your review (up to 500 characters).".to_string(),
        "rating" => "Please pick a rating from 1 to 5.".to_string(),
        _ => "Could not save your review, please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_feedback_ok() {
        assert!(validate_feedback("John Doe", "Five stars!", 5).is_ok());
        assert!(validate_feedback("A", "Fine.", 1).is_ok());
    }

    #[test]
    fn test_validate_feedback_rating_bounds() {
        assert_eq!(validate_feedback("John", "Nice", 0), Err("rating"));
        assert_eq!(validate_feedback("John", "Nice", 6), Err("rating"));
        assert_eq!(validate_feedback("John", "Nice", -1), Err("rating"));
    }

    #[test]
    fn test_validate_feedback_name_bounds() {
        assert_eq!(validate_feedback("", "Nice", 3), Err("name"));
        assert_eq!(validate_feedback("   ", "Nice", 3), Err("name"));
        let long_name = "x".repeat(31);
        assert_eq!(validate_feedback(&long_name, "Nice", 3), Err("name"));
    }

    #[test]
    fn test_validate_feedback_text_bounds() {
        assert_eq!(validate_feedback("John", "", 3), Err("text"));
        let long_text = "x".repeat(501);
        assert_eq!(validate_feedback("John", &long_text, 3), Err("text"));
    }
}
