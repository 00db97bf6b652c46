use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a new place listing (business accounts only).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddPlaceRequest {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub category: String,

    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct AddPlaceResponse {
    pub place: entity::places::Model,
}
