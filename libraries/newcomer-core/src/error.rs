/// Core error types for Newcomer
use thiserror::Error;
use crate::types::UserId;

/// Result type alias using `NewcomerError`
pub type Result<T> = std::result::Result<T, NewcomerError>;

/// Core error type for Newcomer
#[derive(Error, Debug)]
pub enum NewcomerError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Follow edge already exists
    #[error("{follower} already follows {followee}")]
    AlreadyFollowing { follower: UserId, followee: UserId },

    /// Follow edge does not exist
    #[error("{follower} does not follow {followee}")]
    NotFollowing { follower: UserId, followee: UserId },

    /// A user tried to follow or unfollow themselves
    #[error("User {0} cannot follow themselves")]
    SelfFollow(UserId),

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl NewcomerError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error means the referenced record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for NewcomerError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::Duplicate(db.message().to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}
