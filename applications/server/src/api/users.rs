/// User and follow API routes
use crate::{
    envelope::Envelope,
    error::Result,
    middleware::{authorize, AuthenticatedUser},
    services::{profiles, relationships},
    state::AppState,
    validation::{UpdateProfileRequest, ValidatedJson},
};
use axum::{
    extract::{Path, State},
    Json,
};
use newcomer_core::{Role, User, UserId};

/// GET /api/users (admin only)
pub async fn list_users(
    State(app_state): State<AppState>,
    identity: AuthenticatedUser,
) -> Result<Json<Envelope<Vec<User>>>> {
    authorize(&identity, Role::Admin)?;

    let users = profiles::get_all(app_state.store.as_ref()).await?;
    Ok(Json(Envelope::list(users)))
}

/// GET /api/users/:id
pub async fn get_user(
    State(app_state): State<AppState>,
    _identity: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<User>>> {
    let user = profiles::get_one(app_state.store.as_ref(), &UserId::new(id)).await?;
    Ok(Json(Envelope::data(user)))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(app_state): State<AppState>,
    identity: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<Envelope<User>>> {
    let user = profiles::update_self(
        app_state.store.as_ref(),
        &identity.user_id,
        &UserId::new(id),
        update,
    )
    .await?;

    Ok(Json(Envelope::data(user)))
}

/// PUT /api/users/:id/follow
pub async fn follow_user(
    State(app_state): State<AppState>,
    identity: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>> {
    relationships::follow(
        app_state.store.as_ref(),
        &identity.user_id,
        &UserId::new(id),
    )
    .await?;

    Ok(Json(Envelope::message("User followed successfully")))
}

/// PUT /api/users/:id/unfollow
pub async fn unfollow_user(
    State(app_state): State<AppState>,
    identity: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>> {
    relationships::unfollow(
        app_state.store.as_ref(),
        &identity.user_id,
        &UserId::new(id),
    )
    .await?;

    Ok(Json(Envelope::message("User unfollowed successfully")))
}
