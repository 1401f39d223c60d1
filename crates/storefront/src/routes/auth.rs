//! Authentication route handlers: signup, login, logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::routes::{PageContext, session_error};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Query parameters for error/success display on auth pages.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub registered: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub ctx: PageContext,
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub error: Option<String>,
    pub info: Option<String>,
    pub next: String,
}

// =============================================================================
// Signup
// =============================================================================

/// Display the signup page.
#[instrument(skip(state, session))]
pub async fn signup_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::load(&state, &session).await?;
    Ok(SignupTemplate {
        ctx,
        error: query.error.map(signup_error_message),
    })
}

/// Handle signup form submission.
#[instrument(skip(state, form))]
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/signup?error=password_mismatch").into_response();
    }

    match AuthService::new(state.pool())
        .register(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(email = %user.email, "account created");
            Redirect::to("/auth/login?registered=1").into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to("/auth/signup?error=email_taken").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/signup?error=invalid_email").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/auth/signup?error=password_too_short").into_response()
        }
        Err(e) => {
            tracing::error!("Signup failed: {e}");
            Redirect::to("/auth/signup?error=failed").into_response()
        }
    }
}

// =============================================================================
// Login
// =============================================================================

/// Display the login page.
///
/// When the visitor was sent here by an attempted checkout, the remembered
/// intent turns into an informational message and is then forgotten.
#[instrument(skip(state, session))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::load(&state, &session).await?;

    let from_checkout = session
        .remove::<bool>(session_keys::CHECKOUT_INTENT)
        .await
        .map_err(session_error)?
        .unwrap_or(false);

    let info = if from_checkout {
        Some("Please log in to place your order.".to_string())
    } else if query.registered.is_some() {
        Some("Account created! You can log in now.".to_string())
    } else {
        None
    };

    Ok(LoginTemplate {
        ctx,
        error: query.error.map(|_| "Invalid email or password.".to_string()),
        info,
        next: sanitize_next(query.next.as_deref()),
    })
}

/// Handle login form submission.
///
/// On success the user lands on the `next` target (local paths only), which
/// is how an interrupted checkout resumes.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                email: user.email,
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }

            set_sentry_user(&current.id, Some(current.email.as_str()));
            Redirect::to(&sanitize_next(form.next.as_deref())).into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            let next = form.next.as_deref().unwrap_or_default();
            if next.is_empty() {
                Redirect::to("/auth/login?error=credentials").into_response()
            } else {
                let target = format!(
                    "/auth/login?error=credentials&next={}",
                    urlencoding::encode(next)
                );
                Redirect::to(&target).into_response()
            }
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// Clears the user key and destroys the whole session (cart included).
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}

// =============================================================================
// Helpers
// =============================================================================

/// Restrict a `next` redirect target to local paths.
///
/// Anything that isn't a plain absolute path on this site (or that looks
/// like a protocol-relative URL) falls back to the home page.
fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}

/// Human message for a signup error flag.
fn signup_error_message(flag: String) -> String {
    match flag.as_str() {
        "password_mismatch" => "The passwords don't match.".to_string(),
        "password_too_short" => "The password must be at least 8 characters.".to_string(),
        "email_taken" => "An account with this email already exists.".to_string(),
        "invalid_email" => "Please enter a valid email address.".to_string(),
        _ => "Could not create the account, please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_next_allows_local_paths() {
        assert_eq!(sanitize_next(Some("/orders/new")), "/orders/new");
        assert_eq!(sanitize_next(Some("/cart")), "/cart");
    }

    #[test]
    fn test_sanitize_next_rejects_external_targets() {
        assert_eq!(sanitize_next(Some("https://evil.example")), "/");
        assert_eq!(sanitize_next(Some("//evil.example")), "/");
        assert_eq!(sanitize_next(Some("relative")), "/");
        assert_eq!(sanitize_next(None), "/");
    }
}
