/// API route modules
pub mod auth;
pub mod health;
pub mod users;

use crate::{
    error::ServerError,
    middleware::auth_middleware,
    state::AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", get(auth::logout))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        .route("/users/:id/follow", put(users::follow_user))
        .route("/users/:id/unfollow", put(users::unfollow_user))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .route("/", get(health::welcome))
        .nest("/api", public_routes.merge(protected_routes))
        .fallback(not_found)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn not_found() -> ServerError {
    ServerError::NotFound("Route not found".to_string())
}
