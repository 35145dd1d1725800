//! Cache-control middleware for the dashboard.
//!
//! Two adjustments on every hit: the session is marked modified so its
//! record is re-saved (refreshing the TTL even when the handler changed
//! nothing), and the response is stamped with headers telling clients and
//! proxies not to cache the page.

use axum::{
    extract::Request,
    http::{
        header::{CACHE_CONTROL, EXPIRES, PRAGMA},
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};

use crate::session::Session;

/// Force session persistence and disable client caching.
pub async fn no_store_middleware(request: Request, next: Next) -> Response {
    if let Some(session) = request.extensions().get::<Session>() {
        session.touch();
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));

    response
}
