use serde::{Deserialize, Serialize};

/// Request to enable or disable premium status for an owned place.
///
/// Unknown fields are rejected up front; the id is checked for shape in the
/// handler before any business logic runs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TogglePremiumRequest {
    pub place_id: String,
    pub is_premium: bool,
}

/// Response for a premium toggle: the updated place projection plus a
/// human-readable description of the transition that occurred, if any.
#[derive(Debug, Serialize)]
pub struct TogglePremiumResponse {
    pub place: entity::places::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<time::OffsetDateTime>,
}
