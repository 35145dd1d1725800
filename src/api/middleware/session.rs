//! Session middleware.
//!
//! Loads the session named by the request cookie, exposes it to the rest of
//! the stack through request extensions, and persists it once the response
//! is ready. A cookie is only issued when the client does not already hold
//! the session's id, and nothing is stored for untouched anonymous sessions.

use axum::{
    extract::{Request, State},
    http::{header::SET_COOKIE, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::SESSION_COOKIE_NAME;
use crate::errors::{AppError, AppResult};
use crate::session::SessionStore;

/// Load-session / run / persist middleware.
pub async fn session_middleware(
    State(sessions): State<SessionStore>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let cookie_value = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());
    let session = sessions.load(cookie_value.as_deref()).await?;

    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let Some(id) = sessions.persist(&session).await? {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();

        let value = HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| AppError::internal(format!("Invalid session cookie: {}", e)))?;
        response.headers_mut().append(SET_COOKIE, value);
    }

    Ok(response)
}
