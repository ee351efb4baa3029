//! Public shelter endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{CreateShelterRequest, Shelter};
use crate::AppState;

/// GET /api/shelters - List approved shelters.
pub async fn list_shelters(State(state): State<AppState>) -> ApiResult<Json<Vec<Shelter>>> {
    let shelters = state.repo.list_approved().await?;
    Ok(Json(shelters))
}

/// POST /api/shelters - Submit a shelter for moderation.
pub async fn submit_shelter(
    State(state): State<AppState>,
    Json(request): Json<CreateShelterRequest>,
) -> ApiResult<(StatusCode, Json<Shelter>)> {
    let coordinates = request.validate().map_err(AppError::Validation)?;

    let shelter = state
        .repo
        .create_shelter(request.name.trim(), coordinates)
        .await?;
    tracing::info!("Shelter {} submitted for moderation", shelter.id);

    Ok((StatusCode::CREATED, Json(shelter)))
}
