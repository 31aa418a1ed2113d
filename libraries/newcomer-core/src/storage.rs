//! Storage trait for user accounts and the follow graph

use crate::error::Result;
use crate::types::{Credentials, NewUser, Role, TokenId, UpdateProfile, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistent user store
///
/// Handlers receive this as an injected `Arc<dyn UserStore>`; nothing reaches
/// the database any other way.
#[async_trait]
pub trait UserStore: Send + Sync {
    // ========================================================================
    // Accounts
    // ========================================================================

    /// Create a new account with its credentials
    ///
    /// Fails with `Duplicate` when the username or email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get user by ID, including follower and following lists
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Get every user
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Get only the role of a user, `None` if the user does not exist
    async fn get_role(&self, id: &UserId) -> Result<Option<Role>>;

    /// Look up login material by (normalized) email
    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<Credentials>>;

    /// Apply a partial profile update and return the updated record
    async fn update_profile(&self, id: &UserId, update: UpdateProfile) -> Result<User>;

    // ========================================================================
    // Follow graph
    // ========================================================================

    /// Record that `follower` follows `followee`
    ///
    /// The edge and the followee's follower count change together or not at
    /// all.
    async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<()>;

    /// Remove the edge from `follower` to `followee`
    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<()>;

    /// Recompute every cached follower count from the edges
    ///
    /// Returns the number of users whose count was wrong.
    async fn reconcile_follower_counts(&self) -> Result<u64>;

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Reject the given credential until it would have expired anyway
    async fn revoke_token(&self, token: &TokenId, expires_at: DateTime<Utc>) -> Result<()>;

    /// Whether the credential was revoked by a logout
    async fn is_token_revoked(&self, token: &TokenId) -> Result<bool>;
}
