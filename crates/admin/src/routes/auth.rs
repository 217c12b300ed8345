//! Authentication route handlers for admin.
//!
//! Provides the login page, the credential check and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::{CURRENT_ADMIN, LOGIN_PATH};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::services::{AdminSession, AuthError, Credentials};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub username: String,
    pub error: Option<&'static str>,
}

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Render the login page, or go straight to the dashboard when already
/// logged in.
///
/// GET /login
#[instrument(skip(session))]
pub async fn login_page(session: Session) -> Response {
    let logged_in = session
        .get::<AdminSession>(CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .is_some();
    if logged_in {
        return Redirect::to("/").into_response();
    }
    LoginPageTemplate {
        username: String::new(),
        error: None,
    }
    .into_response()
}

/// Check the submitted credentials and start an admin session.
///
/// POST /login
///
/// # Errors
///
/// Returns error if the session cannot be written or the configured
/// password hash is unusable.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = Credentials {
        username: form.username.clone(),
        password: SecretString::from(form.password),
    };

    match state.authenticator().authenticate(&credentials).await {
        Ok(admin) => {
            set_current_admin(&session, &admin).await?;
            set_sentry_user(&admin.username);
            tracing::info!("Admin logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Failed admin login");
            let page = LoginPageTemplate {
                username: form.username,
                error: Some("Invalid username or password"),
            };
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Logout and clear session.
///
/// POST /logout
///
/// # Errors
///
/// Returns error if the session cannot be modified.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}
