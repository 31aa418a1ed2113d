/// Server error types
use crate::validation::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use newcomer_core::NewcomerError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] NewcomerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Auth(_) | ServerError::Jwt(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_)
            | ServerError::InvalidOperation(_)
            | ServerError::Conflict(_)
            | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::Database(e) => match e {
                NewcomerError::UserNotFound(_) => StatusCode::NOT_FOUND,
                NewcomerError::AlreadyFollowing { .. }
                | NewcomerError::NotFollowing { .. }
                | NewcomerError::SelfFollow(_)
                | NewcomerError::Duplicate(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Internal(_) | ServerError::Config(_) | ServerError::Bcrypt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            ServerError::Validation(errors) => {
                let body = Json(json!({
                    "success": false,
                    "errors": errors,
                }));
                return (status, body).into_response();
            }
            ServerError::Auth(msg)
            | ServerError::Forbidden(msg)
            | ServerError::NotFound(msg)
            | ServerError::BadRequest(msg)
            | ServerError::InvalidOperation(msg)
            | ServerError::Conflict(msg) => msg,
            ServerError::Database(ref e) => match e {
                NewcomerError::UserNotFound(_) => "User not found".to_string(),
                NewcomerError::AlreadyFollowing { .. } => {
                    "You are already following this user".to_string()
                }
                NewcomerError::NotFollowing { .. } => "You are not following this user".to_string(),
                NewcomerError::SelfFollow(_) => "You cannot follow yourself".to_string(),
                NewcomerError::Duplicate(_) => "User already exists".to_string(),
                other => {
                    tracing::error!("Database error: {:?}", other);
                    "Database error".to_string()
                }
            },
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Not authorized to access this route".to_string()
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                "Server Error".to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
