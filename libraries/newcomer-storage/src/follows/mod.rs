//! Follow graph queries
//!
//! Each edge is one row in `follows`. A user's `followers` and `following`
//! lists are both read from that table, and the denormalized
//! `users.follower_count` is changed in the same transaction as the edge.

use crate::{now_timestamp, users};
use newcomer_core::{error::Result, types::UserId, NewcomerError};
use sqlx::{Row, SqliteExecutor, SqlitePool};

/// Add the edge `follower -> followee`
///
/// The insert runs first so the transaction holds the write lock before any
/// existence checks; the primary key on `(follower_id, followee_id)` is what
/// rejects a concurrent duplicate.
pub async fn follow(pool: &SqlitePool, follower: &UserId, followee: &UserId) -> Result<()> {
    if follower == followee {
        return Err(NewcomerError::SelfFollow(follower.clone()));
    }

    let now = now_timestamp();
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followee_id, created_at)
        SELECT ?, ?, ?
        WHERE EXISTS (SELECT 1 FROM users WHERE id = ?)
          AND EXISTS (SELECT 1 FROM users WHERE id = ?)
        ON CONFLICT (follower_id, followee_id) DO NOTHING
        "#,
    )
    .bind(follower.as_str())
    .bind(followee.as_str())
    .bind(now)
    .bind(followee.as_str())
    .bind(follower.as_str())
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 0 {
        if !users::exists(&mut *tx, followee).await? {
            return Err(NewcomerError::UserNotFound(followee.clone()));
        }
        if !users::exists(&mut *tx, follower).await? {
            return Err(NewcomerError::UserNotFound(follower.clone()));
        }
        return Err(NewcomerError::AlreadyFollowing {
            follower: follower.clone(),
            followee: followee.clone(),
        });
    }

    sqlx::query(
        "UPDATE users SET follower_count = follower_count + 1, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(followee.as_str())
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(follower.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Remove the edge `follower -> followee`
pub async fn unfollow(pool: &SqlitePool, follower: &UserId, followee: &UserId) -> Result<()> {
    if follower == followee {
        return Err(NewcomerError::SelfFollow(follower.clone()));
    }

    let now = now_timestamp();
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
        .bind(follower.as_str())
        .bind(followee.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        if !users::exists(&mut *tx, followee).await? {
            return Err(NewcomerError::UserNotFound(followee.clone()));
        }
        return Err(NewcomerError::NotFollowing {
            follower: follower.clone(),
            followee: followee.clone(),
        });
    }

    sqlx::query(
        "UPDATE users SET follower_count = follower_count - 1, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(followee.as_str())
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(follower.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// IDs of users following `id`, oldest edge first
pub async fn followers_of<'e, E>(executor: E, id: &UserId) -> Result<Vec<UserId>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("SELECT follower_id FROM follows WHERE followee_id = ? ORDER BY rowid")
        .bind(id.as_str())
        .fetch_all(executor)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| UserId::new(row.get::<String, _>("follower_id")))
        .collect())
}

/// IDs of users `id` follows, oldest edge first
pub async fn following_of<'e, E>(executor: E, id: &UserId) -> Result<Vec<UserId>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("SELECT followee_id FROM follows WHERE follower_id = ? ORDER BY rowid")
        .bind(id.as_str())
        .fetch_all(executor)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| UserId::new(row.get::<String, _>("followee_id")))
        .collect())
}

/// Every edge as `(follower, followee)`, oldest first
pub async fn all_edges<'e, E>(executor: E) -> Result<Vec<(UserId, UserId)>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("SELECT follower_id, followee_id FROM follows ORDER BY rowid")
        .fetch_all(executor)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            (
                UserId::new(row.get::<String, _>("follower_id")),
                UserId::new(row.get::<String, _>("followee_id")),
            )
        })
        .collect())
}

/// Reset every `follower_count` that disagrees with the edge table
///
/// Returns how many users were corrected.
pub async fn reconcile_counts(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET follower_count = (SELECT COUNT(*) FROM follows f WHERE f.followee_id = users.id),
            updated_at = ?
        WHERE follower_count <> (SELECT COUNT(*) FROM follows f WHERE f.followee_id = users.id)
        "#,
    )
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    let fixed = result.rows_affected();
    if fixed > 0 {
        tracing::warn!(fixed, "Corrected drifted follower counts");
    }

    Ok(fixed)
}
