use axum::{extract::State, Json};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{ApiError, Result, ValidatedJson},
    middleware::UserIdentity,
    models::premium::{TogglePremiumRequest, TogglePremiumResponse},
};

/// POST /toggle-premium
#[instrument(skip(state, request))]
pub async fn toggle_premium(
    State(state): State<AppState>,
    identity: UserIdentity,
    ValidatedJson(request): ValidatedJson<TogglePremiumRequest>,
) -> Result<Json<TogglePremiumResponse>> {
    let place_id = Uuid::parse_str(&request.place_id)
        .map_err(|_| ApiError::Validation(vec!["placeId: Invalid place ID".to_string()]))?;

    let outcome = state
        .premium_service
        .toggle_premium(identity.user_id, place_id, request.is_premium)
        .await?;

    let expires_at = outcome.place.premium_expires_at;

    Ok(Json(TogglePremiumResponse {
        place: outcome.place,
        message: outcome.message,
        expires_at,
    }))
}
