//! Newcomer Server Library
//!
//! Account, profile and follow-graph REST API with JWT authentication.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::{Environment, ServerConfig};
pub use error::{Result, ServerError};
pub use services::auth::AuthService;
pub use state::AppState;
