//! Login guard middleware.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::config::{NEXT_PARAM, ROUTE_LOGIN};
use crate::session::{FlashLevel, Session};

/// Flash shown when an anonymous visitor hits a guarded route.
const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Authenticated account taken from the session
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: Uuid,
    pub email: String,
}

/// Login guard.
///
/// Anonymous request: record a flash message and redirect to the login page,
/// carrying the original destination in the `next` parameter. Authenticated
/// request: inject the CurrentAccount into the request extensions and
/// continue.
pub async fn require_login(mut request: Request, next: Next) -> Response {
    let destination = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let Some(session) = request.extensions().get::<Session>().cloned() else {
        // Session middleware not mounted; treat as anonymous
        return redirect_to_login(&destination);
    };

    match (session.account_id(), session.account_email()) {
        (Some(id), Some(email)) => {
            request
                .extensions_mut()
                .insert(CurrentAccount { id, email });
            next.run(request).await
        }
        _ => {
            session.flash(FlashLevel::Warning, LOGIN_REQUIRED_MESSAGE);
            redirect_to_login(&destination)
        }
    }
}

fn redirect_to_login(destination: &str) -> Response {
    let target = format!("{}?{}={}", ROUTE_LOGIN, NEXT_PARAM, destination);
    Redirect::to(&target).into_response()
}
