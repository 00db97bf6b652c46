use crate::{
    error::{ApiError, Result},
    services::CreditsService,
};
use sea_orm::{entity::*, query::*, sea_query::OnConflict, DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

/// Tour purchases: one credit debit per (user, tour), enforced by the unique
/// index on `purchased_tours` and detected race-safely at insert time.
pub struct TourService {
    db: DatabaseConnection,
    credits: Arc<CreditsService>,
}

impl TourService {
    pub fn new(db: DatabaseConnection, credits: Arc<CreditsService>) -> Self {
        Self { db, credits }
    }

    #[instrument(skip(self))]
    pub async fn purchase_tour(
        &self,
        user_id: Uuid,
        tour_id: Uuid,
    ) -> Result<entity::purchased_tours::Model> {
        let txn = self.db.begin().await?;

        let tour = entity::tours::Entity::find_by_id(tour_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound("Tour not found".to_string()))?;

        let purchase_id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let new_purchase = entity::purchased_tours::ActiveModel {
            id: Set(purchase_id),
            user_id: Set(user_id),
            tour_id: Set(tour_id),
            created_at: Set(now),
        };

        // Insert atomically; if the (user, tour) pair already exists, do
        // nothing instead of erroring, then check which row won.
        entity::purchased_tours::Entity::insert(new_purchase)
            .on_conflict(
                OnConflict::columns([
                    entity::purchased_tours::Column::UserId,
                    entity::purchased_tours::Column::TourId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let persisted = entity::purchased_tours::Entity::find()
            .filter(entity::purchased_tours::Column::UserId.eq(user_id))
            .filter(entity::purchased_tours::Column::TourId.eq(tour_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::Internal(anyhow::anyhow!(
                    "Failed to read purchase after insert for tour {}",
                    tour_id
                ))
            })?;

        if persisted.id != purchase_id {
            // Another request already bought this tour for the user
            txn.rollback().await?;
            return Err(ApiError::Conflict(
                "You have already purchased this tour".to_string(),
            ));
        }

        self.credits
            .debit_in_txn(
                user_id,
                tour.price_credits,
                "tour_purchased",
                &format!("Purchased tour: {}", tour.name),
                &txn,
            )
            .await?;

        txn.commit().await?;

        info!(
            "User {} purchased tour {} for {} credits",
            user_id, tour_id, tour.price_credits
        );

        Ok(persisted)
    }
}
