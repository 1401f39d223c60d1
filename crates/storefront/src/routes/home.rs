//! Home page: the latest articles and the products they feature.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use copperleaf_core::ArticleId;

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::models::Product;
use crate::routes::PageContext;
use crate::state::AppState;

/// Number of articles shown on the home page.
const HOME_ARTICLE_COUNT: i64 = 6;

/// A product link inside an article card.
#[derive(Clone)]
pub struct ProductLinkView {
    pub title: String,
    pub path: String,
    pub price: String,
}

impl From<&Product> for ProductLinkView {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            path: product.detail_path(),
            price: product.price.to_string(),
        }
    }
}

/// An article card on the home page.
#[derive(Clone)]
pub struct ArticleCardView {
    pub title: String,
    pub path: String,
    pub posted: String,
    pub excerpt: String,
    pub products: Vec<ProductLinkView>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub articles: Vec<ArticleCardView>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let ctx = PageContext::load(&state, &session).await?;

    let repo = CatalogRepository::new(state.pool());
    let articles = repo.latest_articles(HOME_ARTICLE_COUNT).await?;

    let article_ids: Vec<ArticleId> = articles.iter().map(|a| a.id).collect();
    let mut products_by_article: HashMap<ArticleId, Vec<ProductLinkView>> = HashMap::new();
    for (article_id, product) in repo.products_for_articles(&article_ids).await? {
        products_by_article
            .entry(article_id)
            .or_default()
            .push(ProductLinkView::from(&product));
    }

    let cards = articles
        .into_iter()
        .map(|article| ArticleCardView {
            path: article.detail_path(),
            posted: article.date_posted.format("%B %d, %Y").to_string(),
            excerpt: excerpt(&article.text),
            products: products_by_article.remove(&article.id).unwrap_or_default(),
            title: article.title,
        })
        .collect();

    Ok(HomeTemplate {
        ctx,
        articles: cards,
    })
}

/// First 200 characters of the article body, cut at a char boundary.
fn excerpt(text: &str) -> String {
    const MAX: usize = 200;
    if text.chars().count() <= MAX {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_excerpt_truncates_long_text() {
        let long = "a".repeat(300);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), 201);
        assert!(cut.ends_with('…'));
    }
}
