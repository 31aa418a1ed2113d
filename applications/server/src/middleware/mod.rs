/// Request middleware
pub mod auth;

pub use auth::{auth_middleware, authorize, AuthenticatedUser, TOKEN_COOKIE};
