use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account type of a profile. Business accounts may own places.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "business")]
    Business,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Business => "business",
        }
    }
}
