use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PurchaseTourRequest {
    pub tour_id: String,
}

#[derive(Debug, Serialize)]
pub struct PurchaseTourResponse {
    pub purchase: entity::purchased_tours::Model,
}
