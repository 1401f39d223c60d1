//! Article route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::PageContext;
use crate::routes::home::ProductLinkView;
use crate::state::AppState;

/// Article detail template.
#[derive(Template, WebTemplate)]
#[template(path = "articles/show.html")]
pub struct ArticleShowTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub posted: String,
    pub text: String,
    pub products: Vec<ProductLinkView>,
}

/// Display a single article by slug.
///
/// # Errors
///
/// Returns 404 if the article doesn't exist.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::load(&state, &session).await?;
    let slug = crate::routes::catalog::parse_slug(&slug)?;

    let repo = CatalogRepository::new(state.pool());
    let article = repo
        .article_by_slug(slug.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("article {slug}")))?;

    let products = repo
        .products_for_articles(&[article.id])
        .await?
        .iter()
        .map(|(_, product)| ProductLinkView::from(product))
        .collect();

    Ok(ArticleShowTemplate {
        ctx,
        title: article.title,
        posted: article.date_posted.format("%B %d, %Y").to_string(),
        text: article.text,
        products,
    })
}
