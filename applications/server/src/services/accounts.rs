//! Registration, login and logout

use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::auth::{AuthService, IssuedToken},
    validation::{Login, Registration},
};
use newcomer_core::{NewUser, NewcomerError, User, UserStore};

/// Create an account and sign a token for it
pub async fn register(
    store: &dyn UserStore,
    auth: &AuthService,
    registration: Registration,
) -> Result<(User, IssuedToken)> {
    let password_hash = hash_blocking(auth, registration.password).await?;

    let user = store
        .create_user(NewUser {
            full_name: registration.full_name,
            username: registration.username,
            email: registration.email,
            password_hash,
            role: registration.role,
        })
        .await
        .map_err(|e| match e {
            NewcomerError::Duplicate(field) => {
                tracing::debug!(field = %field, "Registration rejected, duplicate");
                ServerError::Conflict("User already exists".to_string())
            }
            other => ServerError::Database(other),
        })?;

    let issued = auth.issue_token(&user.id)?;
    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok((user, issued))
}

/// Check email and password and sign a token
///
/// Unknown emails and wrong passwords produce the same error.
pub async fn login(store: &dyn UserStore, auth: &AuthService, login: Login) -> Result<IssuedToken> {
    let invalid = || ServerError::Auth("Invalid credentials".to_string());

    let credentials = store
        .find_credentials_by_email(&login.email)
        .await?
        .ok_or_else(invalid)?;

    let valid = verify_blocking(auth, login.password, credentials.password_hash).await?;
    if !valid {
        return Err(invalid());
    }

    let issued = auth.issue_token(&credentials.user_id)?;
    tracing::info!(user_id = %credentials.user_id, "User logged in");

    Ok(issued)
}

/// Revoke the caller's current token
pub async fn logout(store: &dyn UserStore, identity: &AuthenticatedUser) -> Result<()> {
    store
        .revoke_token(&identity.token_id, identity.expires_at)
        .await?;

    tracing::info!(user_id = %identity.user_id, "User logged out");
    Ok(())
}

// bcrypt is CPU-bound; keep it off the async workers
async fn hash_blocking(auth: &AuthService, password: String) -> Result<String> {
    let auth = auth.clone();
    tokio::task::spawn_blocking(move || auth.hash_password(&password))
        .await
        .map_err(|e| ServerError::Internal(format!("password hashing task failed: {e}")))?
}

async fn verify_blocking(auth: &AuthService, password: String, hash: String) -> Result<bool> {
    let auth = auth.clone();
    tokio::task::spawn_blocking(move || auth.verify_password(&password, &hash))
        .await
        .map_err(|e| ServerError::Internal(format!("password check task failed: {e}")))?
}
