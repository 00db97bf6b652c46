use axum::{extract::State, Json};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{ApiError, Result, ValidatedJson},
    middleware::UserIdentity,
    models::tours::{PurchaseTourRequest, PurchaseTourResponse},
};

/// POST /purchase-tour
#[instrument(skip(state, request))]
pub async fn purchase_tour(
    State(state): State<AppState>,
    identity: UserIdentity,
    ValidatedJson(request): ValidatedJson<PurchaseTourRequest>,
) -> Result<Json<PurchaseTourResponse>> {
    let tour_id = Uuid::parse_str(&request.tour_id)
        .map_err(|_| ApiError::Validation(vec!["tourId: Invalid tour ID".to_string()]))?;

    let purchase = state
        .tour_service
        .purchase_tour(identity.user_id, tour_id)
        .await?;

    Ok(Json(PurchaseTourResponse { purchase }))
}
