/// User domain types
use super::{Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account as returned by the API
///
/// The password hash is deliberately absent; it only ever travels inside
/// [`Credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: Role,

    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,

    /// Users following this account, oldest edge first
    pub followers: Vec<UserId>,

    /// Users this account follows, oldest edge first
    pub following: Vec<UserId>,

    /// Cached `followers.len()`
    pub follower_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub email: String,
    /// Already-hashed password
    pub password_hash: String,
    pub role: Role,
}

/// Partial profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

impl UpdateProfile {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.bio.is_none()
            && self.profile_image_url.is_none()
            && self.skills.is_none()
            && self.interests.is_none()
    }
}

/// Stored login material for one account
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub password_hash: String,
}

/// Trim and lower-case an email so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Deduplicate a string set, keeping first-seen order
pub fn normalize_set(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
