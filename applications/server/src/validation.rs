//! Typed request schemas
//!
//! Every JSON body is deserialized into a request struct and validated
//! before a handler runs. Failures are collected per field and returned
//! together as a 400.

use crate::error::ServerError;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use newcomer_core::types::{Role, UpdateProfile};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

pub const MAX_FULL_NAME_CHARS: usize = 50;
pub const MAX_BIO_CHARS: usize = 500;
pub const MIN_PASSWORD_CHARS: usize = 6;

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A request schema that can be checked and turned into handler input
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, Vec<FieldError>>;
}

/// JSON body extractor that runs [`Validate`] before the handler
pub struct ValidatedJson<T: Validate>(pub T::Output);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
    T::Output: Send,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;

        payload
            .validate()
            .map(ValidatedJson)
            .map_err(ServerError::Validation)
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Registration input after validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Validate for RegisterRequest {
    type Output = Registration;

    fn validate(self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("fullName", "Full name is required"));
        }
        if self.username.trim().is_empty() {
            errors.push(FieldError::new("username", "Username is required"));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Please include a valid email"));
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push(FieldError::new(
                "password",
                "Please enter a password with 6 or more characters",
            ));
        }

        let role = match self.role.as_deref() {
            None => Some(Role::default()),
            Some(value) => value.parse::<Role>().ok().filter(Role::is_self_assignable),
        };
        if role.is_none() {
            errors.push(FieldError::new(
                "role",
                "Role must be one of: startup, developer, investor, mentor, user",
            ));
        }

        match role {
            Some(role) if errors.is_empty() => Ok(Registration {
                full_name: self.full_name.trim().to_string(),
                username: self.username.trim().to_string(),
                email: self.email,
                password: self.password,
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: Option<String>,
}

/// Login input after validation
#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    type Output = Login;

    fn validate(self) -> Result<Login, Vec<FieldError>> {
        let mut errors = Vec::new();

        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Please include a valid email"));
        }
        if self.password.is_none() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        match self.password {
            Some(password) if errors.is_empty() => Ok(Login {
                email: self.email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Profile update body; `null` and missing fields are both "leave unchanged"
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub skills: Option<Value>,
    pub interests: Option<Value>,
}

impl Validate for UpdateProfileRequest {
    type Output = UpdateProfile;

    fn validate(self) -> Result<UpdateProfile, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(name) = &self.full_name {
            if name.chars().count() > MAX_FULL_NAME_CHARS {
                errors.push(FieldError::new(
                    "fullName",
                    "Full name must be less than 50 characters",
                ));
            }
        }
        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO_CHARS {
                errors.push(FieldError::new("bio", "Bio must be less than 500 characters"));
            }
        }

        let skills = string_list(self.skills, "skills", "Skills must be an array", &mut errors);
        let interests = string_list(
            self.interests,
            "interests",
            "Interests must be an array",
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpdateProfile {
            full_name: self.full_name,
            bio: self.bio,
            profile_image_url: self.profile_image_url,
            skills,
            interests,
        })
    }
}

/// Accept a JSON array of strings; anything else is a field error
fn string_list(
    value: Option<Value>,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            let strings: Option<Vec<String>> = items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            if strings.is_none() {
                errors.push(FieldError::new(field, format!("{message} of strings")));
            }
            strings
        }
        Some(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

/// Minimal address check: one `@`, a non-empty local part, and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
