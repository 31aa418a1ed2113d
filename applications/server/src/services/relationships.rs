//! Follow/unfollow between users
//!
//! Preconditions are checked here in the order callers observe them
//! (self-follow, missing target, existing edge); the store applies both sides
//! of the edge and the follower count in one transaction.

use crate::error::{Result, ServerError};
use newcomer_core::{NewcomerError, UserId, UserStore};

/// `caller` starts following `target`
pub async fn follow(store: &dyn UserStore, caller: &UserId, target: &UserId) -> Result<()> {
    if caller == target {
        return Err(ServerError::InvalidOperation(
            "You cannot follow yourself".to_string(),
        ));
    }

    store
        .follow(caller, target)
        .await
        .map_err(|e| edge_error(e, target, "User to follow not found"))?;

    tracing::info!(user_id = %caller, target_id = %target, "User followed");
    Ok(())
}

/// `caller` stops following `target`
pub async fn unfollow(store: &dyn UserStore, caller: &UserId, target: &UserId) -> Result<()> {
    if caller == target {
        return Err(ServerError::InvalidOperation(
            "You cannot unfollow yourself".to_string(),
        ));
    }

    store
        .unfollow(caller, target)
        .await
        .map_err(|e| edge_error(e, target, "User to unfollow not found"))?;

    tracing::info!(user_id = %caller, target_id = %target, "User unfollowed");
    Ok(())
}

fn edge_error(err: NewcomerError, target: &UserId, missing_target: &str) -> ServerError {
    match err {
        NewcomerError::UserNotFound(ref id) if id == target => {
            ServerError::NotFound(missing_target.to_string())
        }
        NewcomerError::UserNotFound(_) => ServerError::NotFound("User not found".to_string()),
        NewcomerError::AlreadyFollowing { .. } => {
            ServerError::Conflict("You are already following this user".to_string())
        }
        NewcomerError::NotFollowing { .. } => {
            ServerError::Conflict("You are not following this user".to_string())
        }
        NewcomerError::SelfFollow(_) => {
            ServerError::InvalidOperation("You cannot follow yourself".to_string())
        }
        other => ServerError::Database(other),
    }
}
