//! Account roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role attached to every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Startup,
    Developer,
    Investor,
    Mentor,
    #[default]
    User,
    /// Operator role; never accepted from the registration endpoint
    Admin,
}

/// Returned when a string does not name a known role
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl Role {
    /// Roles a caller may pick for themselves at registration
    pub const SELF_ASSIGNABLE: [Role; 5] = [
        Role::Startup,
        Role::Developer,
        Role::Investor,
        Role::Mentor,
        Role::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Startup => "startup",
            Role::Developer => "developer",
            Role::Investor => "investor",
            Role::Mentor => "mentor",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_self_assignable(&self) -> bool {
        Self::SELF_ASSIGNABLE.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startup" => Ok(Role::Startup),
            "developer" => Ok(Role::Developer),
            "investor" => Ok(Role::Investor),
            "mentor" => Ok(Role::Mentor),
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}
