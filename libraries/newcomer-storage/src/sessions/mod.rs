//! Revoked credential bookkeeping for logout

use crate::now_timestamp;
use chrono::{DateTime, Utc};
use newcomer_core::{error::Result, types::TokenId};
use sqlx::SqlitePool;

/// Mark a token as revoked until `expires_at`
///
/// Entries whose token has already expired are purged on the way, since the
/// signature check rejects those tokens anyway.
pub async fn revoke(pool: &SqlitePool, token: &TokenId, expires_at: DateTime<Utc>) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO revoked_tokens (jti, expires_at) VALUES (?, ?) ON CONFLICT(jti) DO NOTHING",
    )
    .bind(token.as_str())
    .bind(expires_at.timestamp())
    .execute(&mut *tx)
    .await?;

    let purged = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
        .bind(now_timestamp())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    if purged > 0 {
        tracing::debug!(purged, "Purged expired revoked tokens");
    }

    Ok(())
}

/// Whether a token has been revoked
pub async fn is_revoked(pool: &SqlitePool, token: &TokenId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM revoked_tokens WHERE jti = ?")
        .bind(token.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}
