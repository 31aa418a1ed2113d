use crate::{follows, sessions, users, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newcomer_core::{error::Result, storage::UserStore, types::*};
use sqlx::SqlitePool;

/// User store backed by a local `SQLite` database
#[derive(Clone)]
pub struct LocalUserStore {
    pool: SqlitePool,
}

impl LocalUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database at `database_url` and bring its schema up to date
    pub async fn connect(database_url: &str) -> std::result::Result<Self, StorageError> {
        let pool = crate::create_pool(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        crate::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection; used on graceful shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserStore for LocalUserStore {
    // Accounts
    async fn create_user(&self, user: NewUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    async fn get_role(&self, id: &UserId) -> Result<Option<Role>> {
        users::get_role(&self.pool, id).await
    }

    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<Credentials>> {
        crate::credentials::find_by_email(&self.pool, email).await
    }

    async fn update_profile(&self, id: &UserId, update: UpdateProfile) -> Result<User> {
        users::update_profile(&self.pool, id, update).await
    }

    // Follow graph
    async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<()> {
        follows::follow(&self.pool, follower, followee).await
    }

    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<()> {
        follows::unfollow(&self.pool, follower, followee).await
    }

    async fn reconcile_follower_counts(&self) -> Result<u64> {
        follows::reconcile_counts(&self.pool).await
    }

    // Sessions
    async fn revoke_token(&self, token: &TokenId, expires_at: DateTime<Utc>) -> Result<()> {
        sessions::revoke(&self.pool, token, expires_at).await
    }

    async fn is_token_revoked(&self, token: &TokenId) -> Result<bool> {
        sessions::is_revoked(&self.pool, token).await
    }
}
