//! Help center handler - a public static page.

use axum::{response::Html, routing::get, Router};

use super::page;
use crate::api::AppState;
use crate::config::ROUTE_HELP;

/// Create help center routes
pub fn help_routes() -> Router<AppState> {
    Router::new().route(ROUTE_HELP, get(help_center))
}

/// Render the help center.
pub async fn help_center() -> Html<String> {
    let body = "<h1>Help Center</h1>\n\
         <p>Welcome to the help center.</p>\n\
         <ul>\n\
         <li>Log in with the email address and password you were provisioned with.</li>\n\
         <li>Forgotten credentials are reset by an operator.</li>\n\
         <li>Sign out with the button on your dashboard when you are done.</li>\n\
         </ul>\n\
         <p><a href=\"/login\">Back to login</a></p>";

    Html(page("Help Center", body))
}
