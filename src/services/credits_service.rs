use crate::error::{ApiError, Result};
use sea_orm::{entity::*, query::*, DatabaseConnection, DatabaseTransaction};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

/// Shared ledger primitive. Every balance mutation goes through here so the
/// invariant holds: the balance never goes negative, and each change writes
/// exactly one `credit_transactions` row with the same signed amount.
pub struct CreditsService {
    db: DatabaseConnection,
}

impl CreditsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Debit `amount` credits from a user within an existing transaction.
    ///
    /// Locks the profile row, checks the balance, updates it, and appends the
    /// matching ledger row. Callers compose this with their own row updates so
    /// the whole operation commits or rolls back as one.
    ///
    /// Returns the balance after the debit.
    #[instrument(skip(self, txn))]
    pub async fn debit_in_txn(
        &self,
        user_id: Uuid,
        amount: i32,
        transaction_type: &str,
        description: &str,
        txn: &DatabaseTransaction,
    ) -> Result<i32> {
        debug_assert!(amount > 0);

        let profile = entity::profiles::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

        if profile.credits < amount {
            return Err(ApiError::InsufficientCredits {
                required: amount,
                available: profile.credits,
            });
        }

        let now = OffsetDateTime::now_utc();
        let new_balance = profile.credits - amount;

        let mut profile_active: entity::profiles::ActiveModel = profile.into();
        profile_active.credits = Set(new_balance);
        profile_active.updated_at = Set(now);
        profile_active.update(txn).await?;

        let ledger_row = entity::credit_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            amount: Set(-amount),
            transaction_type: Set(transaction_type.to_string()),
            description: Set(description.to_string()),
            created_at: Set(now),
        };
        entity::credit_transactions::Entity::insert(ledger_row)
            .exec(txn)
            .await?;

        info!(
            "Debited {} credits from user {} ({}): balance now {}",
            amount, user_id, transaction_type, new_balance
        );

        Ok(new_balance)
    }

    /// Current balance for a user.
    #[instrument(skip(self))]
    pub async fn balance(&self, user_id: Uuid) -> Result<i32> {
        let profile = entity::profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

        Ok(profile.credits)
    }

    /// Ledger history for a user, newest first.
    #[instrument(skip(self))]
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<entity::credit_transactions::Model>> {
        let rows = entity::credit_transactions::Entity::find()
            .filter(entity::credit_transactions::Column::UserId.eq(user_id))
            .order_by_desc(entity::credit_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}
