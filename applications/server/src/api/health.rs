/// Health check API routes
use crate::envelope::Envelope;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /api/health - Health check endpoint
pub async fn health() -> Json<Envelope<HealthResponse>> {
    Json(Envelope::data(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET / - Welcome message
pub async fn welcome() -> Json<Envelope<()>> {
    Json(Envelope::message("Welcome to Newcomer API"))
}
