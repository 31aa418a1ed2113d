//! Profile reads and self-updates

use crate::error::{Result, ServerError};
use newcomer_core::{UpdateProfile, User, UserId, UserStore};

/// Every user; callers must have checked for the admin role
pub async fn get_all(store: &dyn UserStore) -> Result<Vec<User>> {
    Ok(store.get_all_users().await?)
}

pub async fn get_one(store: &dyn UserStore, id: &UserId) -> Result<User> {
    store
        .get_user(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))
}

/// Update `target`'s profile on behalf of `caller`
///
/// Only the owner may update a profile; the store is not touched otherwise.
pub async fn update_self(
    store: &dyn UserStore,
    caller: &UserId,
    target: &UserId,
    update: UpdateProfile,
) -> Result<User> {
    if caller != target {
        return Err(ServerError::Forbidden(
            "Not authorized to update this user".to_string(),
        ));
    }

    if update.is_empty() {
        return get_one(store, target).await;
    }

    let user = store.update_profile(target, update).await.map_err(|e| {
        if e.is_not_found() {
            ServerError::NotFound("User not found".to_string())
        } else {
            ServerError::Database(e)
        }
    })?;

    tracing::debug!(user_id = %target, "Profile updated");
    Ok(user)
}
