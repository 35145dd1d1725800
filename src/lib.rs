//! Gatehouse - Session-based web service with email login
//!
//! Accounts sign in with an email address and password; the credential check
//! costs the same hash work whether or not the address is registered. A
//! guarded dashboard forces session persistence and disables client caching,
//! and a public help center rounds out the pages.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Authentication pipeline and account provisioning
//! - **session**: Cookie-referenced server-side sessions and flash messages
//! - **infra**: Infrastructure concerns (database, Redis)
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Provision an account
//! cargo run -- account create --email user@example.com --password secret123
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod session;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, Password};
pub use errors::{AppError, AppResult};
pub use session::{Session, SessionStore};
