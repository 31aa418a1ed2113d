/// Authentication middleware
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use newcomer_core::{types::TokenId, Role, UserId};
use tower_cookies::Cookies;

/// Cookie carrying the session token for browser clients
pub const TOKEN_COOKIE: &str = "token";

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Identity attached to a request once its token checks out
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
    pub token_id: TokenId,
    pub expires_at: DateTime<Utc>,
}

/// Middleware that validates the session token and resolves the caller
///
/// The token comes from `Authorization: Bearer <token>`, or from the
/// `token` cookie when the header is absent.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())
        .or_else(|| cookie_token(&cookies))
        .ok_or_else(not_authorized)?;

    let claims = app_state.auth_service.verify_token(&token).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        not_authorized()
    })?;

    let token_id = claims.token_id();
    if app_state.store.is_token_revoked(&token_id).await? {
        tracing::debug!(token_id = %token_id, "Revoked token presented");
        return Err(not_authorized());
    }

    // The account may be gone even though the token is still valid
    let user_id = claims.user_id();
    let role = app_state
        .store
        .get_role(&user_id)
        .await?
        .ok_or_else(not_authorized)?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        role,
        token_id,
        expires_at: claims.expires_at()?,
    });

    Ok(next.run(request).await)
}

/// Fails with `Forbidden` unless the caller holds `required`
pub fn authorize(identity: &AuthenticatedUser, required: Role) -> Result<()> {
    if identity.role == required {
        Ok(())
    } else {
        Err(ServerError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            identity.role
        )))
    }
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn cookie_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|token| !token.is_empty())
}

fn not_authorized() -> ServerError {
    ServerError::Auth(NOT_AUTHORIZED.to_string())
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(not_authorized)
    }
}
