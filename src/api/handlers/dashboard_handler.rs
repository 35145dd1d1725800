//! Dashboard handler - the guarded landing page.

use axum::{
    response::Html,
    routing::get,
    Extension, Router,
};

use super::{escape_html, page, render_flashes};
use crate::api::middleware::CurrentAccount;
use crate::api::AppState;
use crate::config::ROUTE_HELP;
use crate::session::Session;

/// Create dashboard routes.
///
/// The login guard and the cache-control middleware are layered on in
/// `routes::create_router`.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Render the dashboard for the signed-in account.
pub async fn dashboard(
    Extension(account): Extension<CurrentAccount>,
    Extension(session): Extension<Session>,
) -> Html<String> {
    let flashes = session.take_flashes();

    let body = format!(
        "{flashes}\n<h1>Dashboard</h1>\n\
         <p>Signed in as <strong>{email}</strong>.</p>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n\
         <p><a href=\"{help}\">Help center</a></p>",
        flashes = render_flashes(&flashes),
        email = escape_html(&account.email),
        help = ROUTE_HELP,
    );

    Html(page("Dashboard", &body))
}
