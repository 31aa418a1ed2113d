/// Authentication API routes
use crate::{
    envelope::Envelope,
    error::Result,
    middleware::{AuthenticatedUser, TOKEN_COOKIE},
    services::{accounts, auth::IssuedToken, profiles},
    state::AppState,
    validation::{LoginRequest, RegisterRequest, ValidatedJson},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use newcomer_core::User;
use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    cookies: Cookies,
    ValidatedJson(registration): ValidatedJson<RegisterRequest>,
) -> Result<Response> {
    let (_, issued) = accounts::register(
        app_state.store.as_ref(),
        &app_state.auth_service,
        registration,
    )
    .await?;

    Ok(token_response(&app_state, &cookies, StatusCode::CREATED, issued))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    cookies: Cookies,
    ValidatedJson(login): ValidatedJson<LoginRequest>,
) -> Result<Response> {
    let issued = accounts::login(app_state.store.as_ref(), &app_state.auth_service, login).await?;

    Ok(token_response(&app_state, &cookies, StatusCode::OK, issued))
}

/// GET /api/auth/me
pub async fn me(
    State(app_state): State<AppState>,
    identity: AuthenticatedUser,
) -> Result<Json<Envelope<User>>> {
    let user = profiles::get_one(app_state.store.as_ref(), &identity.user_id).await?;
    Ok(Json(Envelope::data(user)))
}

/// GET /api/auth/logout
pub async fn logout(
    State(app_state): State<AppState>,
    cookies: Cookies,
    identity: AuthenticatedUser,
) -> Result<Json<Envelope<serde_json::Value>>> {
    accounts::logout(app_state.store.as_ref(), &identity).await?;

    // Always sent, even when the caller authenticated with a header
    let mut cookie = session_cookie(&app_state, String::new(), 0);
    cookie.make_removal();
    cookies.add(cookie);

    Ok(Json(Envelope::data(serde_json::json!({}))))
}

fn token_response(
    app_state: &AppState,
    cookies: &Cookies,
    status: StatusCode,
    issued: IssuedToken,
) -> Response {
    let max_age = (issued.claims.exp - Utc::now().timestamp()).max(0);
    cookies.add(session_cookie(app_state, issued.token.clone(), max_age));

    (status, Json(Envelope::token(issued.token))).into_response()
}

fn session_cookie(app_state: &AppState, token: String, max_age: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(app_state.secure_cookies)
        .max_age(Duration::seconds(max_age))
        .build()
}
