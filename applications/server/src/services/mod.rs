/// Server services
pub mod accounts;
pub mod auth;
pub mod profiles;
pub mod relationships;

pub use auth::AuthService;
