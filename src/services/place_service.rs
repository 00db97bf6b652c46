use crate::{
    error::{ApiError, Result},
    models::places::AddPlaceRequest,
    services::CreditsService,
};
use entity::sea_orm_active_enums::UserType;
use sea_orm::{entity::*, DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

/// Place creation for business accounts, paid for in credits.
pub struct PlaceService {
    db: DatabaseConnection,
    credits: Arc<CreditsService>,
    creation_cost: i32,
}

impl PlaceService {
    pub fn new(db: DatabaseConnection, credits: Arc<CreditsService>, creation_cost: i32) -> Self {
        Self {
            db,
            credits,
            creation_cost,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_place(
        &self,
        user_id: Uuid,
        user_type: UserType,
        request: AddPlaceRequest,
    ) -> Result<entity::places::Model> {
        if user_type != UserType::Business {
            return Err(ApiError::Forbidden(
                "Only business owners can add places".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let now = OffsetDateTime::now_utc();

        let place = entity::places::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(Some(user_id)),
            name: Set(request.name.clone()),
            category: Set(request.category),
            description: Set(request.description),
            latitude: Set(request.latitude),
            longitude: Set(request.longitude),
            is_premium: Set(false),
            premium_expires_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        self.credits
            .debit_in_txn(
                user_id,
                self.creation_cost,
                "place_added",
                &format!("Added place: {}", request.name),
                &txn,
            )
            .await?;

        txn.commit().await?;

        info!(
            "User {} added place {} for {} credits",
            user_id, place.id, self.creation_cost
        );

        Ok(place)
    }
}
