//! Password credential queries

use newcomer_core::{error::Result, types::*};
use sqlx::{Row, SqliteExecutor, SqlitePool};

/// Store the password hash for a freshly created user
pub async fn insert<'e, E>(executor: E, user_id: &UserId, password_hash: &str, now: i64) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id.as_str())
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Look up credentials by email
///
/// The email is normalized before the lookup, so callers may pass it as typed.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Credentials>> {
    let row = sqlx::query(
        r#"
        SELECT c.user_id, c.password_hash
        FROM user_credentials c
        INNER JOIN users u ON u.id = c.user_id
        WHERE u.email = ?
        "#,
    )
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Credentials {
        user_id: UserId::new(row.get::<String, _>("user_id")),
        password_hash: row.get("password_hash"),
    }))
}
