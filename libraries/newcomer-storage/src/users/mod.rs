//! User account queries

use crate::{credentials, follows, from_timestamp, now_timestamp};
use newcomer_core::{error::Result, types::*, NewcomerError};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use std::collections::HashMap;

const USER_COLUMNS: &str = r#"
    id, full_name, username, email, role, bio, profile_image_url,
    skills, interests, follower_count, created_at, updated_at
"#;

/// Create a user together with its credentials
///
/// Username and email uniqueness is enforced by the schema; a collision comes
/// back as `NewcomerError::Duplicate` naming the offending field.
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let id = UserId::generate();
    let email = normalize_email(&user.email);
    let now = now_timestamp();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, full_name, username, email, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(&user.full_name)
    .bind(&user.username)
    .bind(&email)
    .bind(user.role.as_str())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(duplicate_field)?;

    credentials::insert(&mut *tx, &id, &user.password_hash, now).await?;

    tx.commit().await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| NewcomerError::UserNotFound(id))
}

/// Get user by ID with follower and following lists populated
///
/// The row and both edge lists are read inside one transaction, so they come
/// from the same snapshot and `follower_count` always matches `followers`.
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let row = sqlx::query(&sql)
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let followers = follows::followers_of(&mut *tx, id).await?;
    let following = follows::following_of(&mut *tx, id).await?;

    tx.commit().await?;

    user_from_row(&row, followers, following).map(Some)
}

/// Get all users in registration order
///
/// Edges are loaded in one pass and grouped in memory rather than queried
/// per user. Both reads share a transaction for a consistent snapshot.
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid");
    let rows = sqlx::query(&sql).fetch_all(&mut *tx).await?;
    let edges = follows::all_edges(&mut *tx).await?;

    tx.commit().await?;

    let mut followers: HashMap<String, Vec<UserId>> = HashMap::new();
    let mut following: HashMap<String, Vec<UserId>> = HashMap::new();
    for (follower, followee) in edges {
        followers
            .entry(followee.as_str().to_string())
            .or_default()
            .push(follower.clone());
        following
            .entry(follower.as_str().to_string())
            .or_default()
            .push(followee);
    }

    rows.iter()
        .map(|row| {
            let id: String = row.get("id");
            user_from_row(
                row,
                followers.remove(&id).unwrap_or_default(),
                following.remove(&id).unwrap_or_default(),
            )
        })
        .collect()
}

/// Get a user's role without loading the follow graph
pub async fn get_role(pool: &SqlitePool, id: &UserId) -> Result<Option<Role>> {
    let row = sqlx::query("SELECT role FROM users WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.map(|row| parse_role(row.get("role"))).transpose()
}

/// Whether a user with this ID exists
pub async fn exists<'e, E>(executor: E, id: &UserId) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT 1 FROM users WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}

/// Apply a partial profile update
///
/// Fields left as `None` keep their stored value.
pub async fn update_profile(pool: &SqlitePool, id: &UserId, update: UpdateProfile) -> Result<User> {
    let skills = update
        .skills
        .map(|s| serde_json::to_string(&normalize_set(s)))
        .transpose()?;
    let interests = update
        .interests
        .map(|s| serde_json::to_string(&normalize_set(s)))
        .transpose()?;

    let result = sqlx::query(
        r#"
        UPDATE users
        SET full_name = COALESCE(?, full_name),
            bio = COALESCE(?, bio),
            profile_image_url = COALESCE(?, profile_image_url),
            skills = COALESCE(?, skills),
            interests = COALESCE(?, interests),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.full_name)
    .bind(update.bio)
    .bind(update.profile_image_url)
    .bind(skills)
    .bind(interests)
    .bind(now_timestamp())
    .bind(id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(NewcomerError::UserNotFound(id.clone()));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| NewcomerError::UserNotFound(id.clone()))
}

fn user_from_row(row: &SqliteRow, followers: Vec<UserId>, following: Vec<UserId>) -> Result<User> {
    let skills: String = row.get("skills");
    let interests: String = row.get("interests");

    Ok(User {
        id: UserId::new(row.get::<String, _>("id")),
        full_name: row.get("full_name"),
        username: row.get("username"),
        email: row.get("email"),
        role: parse_role(row.get("role"))?,
        bio: row.get("bio"),
        profile_image_url: row.get("profile_image_url"),
        skills: serde_json::from_str(&skills)?,
        interests: serde_json::from_str(&interests)?,
        followers,
        following,
        follower_count: row.get("follower_count"),
        created_at: from_timestamp(row.get("created_at"))?,
        updated_at: from_timestamp(row.get("updated_at"))?,
    })
}

fn parse_role(value: String) -> Result<Role> {
    value
        .parse()
        .map_err(|e: ParseRoleError| NewcomerError::storage(e.to_string()))
}

fn duplicate_field(err: sqlx::Error) -> NewcomerError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            let field = if db.message().contains("users.email") {
                "email"
            } else if db.message().contains("users.username") {
                "username"
            } else {
                "user"
            };
            return NewcomerError::Duplicate(field.to_string());
        }
    }
    err.into()
}
