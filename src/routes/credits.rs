use axum::{extract::State, Json};
use tracing::instrument;

use crate::{
    app_state::AppState, error::Result, middleware::UserIdentity, models::credits::CreditsResponse,
};

/// GET /credits
#[instrument(skip(state, identity))]
pub async fn get_credits(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> Result<Json<CreditsResponse>> {
    let credits = state.credits_service.balance(identity.user_id).await?;
    let transactions = state.credits_service.history(identity.user_id).await?;

    Ok(Json(CreditsResponse {
        credits,
        transactions,
    }))
}
