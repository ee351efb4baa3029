//! Admin login and moderation endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{Ack, ApiResult};
use crate::auth::verify_credentials;
use crate::errors::AppError;
use crate::models::{Credentials, LoginResponse, Shelter};
use crate::AppState;

/// POST /api/admin/login - Exchange admin credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    if !verify_credentials(
        state.config.admin_credentials(),
        &credentials.username,
        &credentials.password,
    ) {
        tracing::warn!("Failed admin login for {:?}", credentials.username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.repo.create_session(&credentials.username).await?;
    tracing::info!("Admin {} logged in", credentials.username);
    Ok(Json(LoginResponse { token }))
}

/// GET /api/admin/shelters/pending - List shelters awaiting moderation.
pub async fn list_pending(State(state): State<AppState>) -> ApiResult<Json<Vec<Shelter>>> {
    let shelters = state.repo.list_pending().await?;
    Ok(Json(shelters))
}

/// PATCH /api/admin/shelters/approve/{id} - Approve a pending shelter.
pub async fn approve_shelter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    state.repo.approve_shelter(&id).await?;
    tracing::info!("Shelter {} approved", id);
    Ok(Json(Ack::new(id)))
}

/// DELETE /api/admin/shelters/reject/{id} - Reject (delete) a pending shelter.
pub async fn reject_shelter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    state.repo.reject_shelter(&id).await?;
    tracing::info!("Shelter {} rejected", id);
    Ok(Json(Ack::new(id)))
}
