//! Authentication handlers - login page, credential submission, logout.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::{escape_html, page, render_flashes};
use crate::api::extractors::ValidatedForm;
use crate::api::AppState;
use crate::config::{NEXT_PARAM, ROUTE_DASHBOARD, ROUTE_LOGIN};
use crate::errors::AppResult;
use crate::session::{FlashLevel, Session};

const LOGIN_SUCCESS_MESSAGE: &str = "Welcome back.";
const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password.";
const LOGOUT_MESSAGE: &str = "You have been signed out.";

/// Credential submission from the login form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Account email address
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account password
    #[validate(length(max = 1024, message = "Password must be at most 1024 characters"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// Post-login destination (local path)
    #[schema(example = "/dashboard")]
    pub next: Option<String>,
}

/// Query parameters accepted by the login page
#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Render the login form.
///
/// Already-authenticated visitors are sent straight to the dashboard.
pub async fn login_page(
    Extension(session): Extension<Session>,
    Query(query): Query<LoginPageQuery>,
) -> Response {
    if session.is_authenticated() {
        return Redirect::to(ROUTE_DASHBOARD).into_response();
    }

    let flashes = session.take_flashes();
    let next_field = match query.next.as_deref().filter(|n| is_local_path(n)) {
        Some(next) => format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            NEXT_PARAM,
            escape_html(next)
        ),
        None => String::new(),
    };

    let body = format!(
        "{flashes}\n<h1>Log in</h1>\n\
         <form method=\"post\" action=\"{login}\">\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         {next_field}\n\
         <button type=\"submit\">Log in</button>\n\
         </form>",
        flashes = render_flashes(&flashes),
        login = ROUTE_LOGIN,
        next_field = next_field,
    );

    Html(page("Log in", &body)).into_response()
}

/// Submit credentials
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect: to the destination on success, back to the login page on failure"),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedForm(payload): ValidatedForm<LoginRequest>,
) -> AppResult<Redirect> {
    match state
        .auth
        .authenticate(&payload.email, &payload.password)
        .await?
    {
        Some(account) => {
            tracing::info!(account = %account.id, "Login succeeded");
            session.login(account.id, account.email);
            session.flash(FlashLevel::Success, LOGIN_SUCCESS_MESSAGE);
            Ok(Redirect::to(destination_or_dashboard(
                payload.next.as_deref(),
            )))
        }
        None => {
            tracing::info!("Login failed");
            session.flash(FlashLevel::Error, LOGIN_FAILED_MESSAGE);
            Ok(Redirect::to(&login_url(payload.next.as_deref())))
        }
    }
}

/// End the session
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    responses(
        (status = 303, description = "Redirect to the login page")
    )
)]
pub async fn logout(Extension(session): Extension<Session>) -> Redirect {
    session.clear();
    session.flash(FlashLevel::Info, LOGOUT_MESSAGE);
    Redirect::to(ROUTE_LOGIN)
}

/// Accept only local absolute paths as redirect targets.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

fn destination_or_dashboard(next: Option<&str>) -> &str {
    match next.filter(|n| is_local_path(n)) {
        Some(next) => next,
        None => ROUTE_DASHBOARD,
    }
}

fn login_url(next: Option<&str>) -> String {
    match next.filter(|n| is_local_path(n)) {
        Some(next) => format!("{}?{}={}", ROUTE_LOGIN, NEXT_PARAM, next),
        None => ROUTE_LOGIN.to_string(),
    }
}
