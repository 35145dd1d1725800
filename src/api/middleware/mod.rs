//! API middleware.

mod auth;
mod cache_control;
mod rate_limit;
mod session;

pub use auth::{require_login, CurrentAccount};
pub use cache_control::no_store_middleware;
pub use rate_limit::login_rate_limit_middleware;
pub use session::session_middleware;
