use axum::{extract::State, Json};
use tracing::instrument;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{ApiError, Result, ValidatedJson},
    middleware::UserIdentity,
    models::places::{AddPlaceRequest, AddPlaceResponse},
};

/// POST /add-place
#[instrument(skip(state, request))]
pub async fn add_place(
    State(state): State<AppState>,
    identity: UserIdentity,
    ValidatedJson(request): ValidatedJson<AddPlaceRequest>,
) -> Result<Json<AddPlaceResponse>> {
    request.validate().map_err(ApiError::from_validation)?;

    let place = state
        .place_service
        .create_place(identity.user_id, identity.user_type, request)
        .await?;

    Ok(Json(AddPlaceResponse { place }))
}
