//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod account_service;
mod auth_service;
pub mod container;

// Service Container
pub use container::Services;

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthBackend, AuthPipeline, EmailAuthenticator};
