use crate::{
    error::{ApiError, Result},
    services::CreditsService,
};
use sea_orm::{entity::*, query::*, DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

/// Observed state of a (place, subscription) pair.
///
/// A premium place whose cancellation grace window has already lapsed (the
/// recurring billing job hasn't caught up yet) is classified as `Free`: the
/// old period no longer covers it, so re-enabling charges again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumState {
    Free,
    Active,
    PendingCancellation,
}

impl PremiumState {
    pub fn classify(
        place: &entity::places::Model,
        subscription: &entity::user_subscriptions::Model,
        now: OffsetDateTime,
    ) -> Self {
        if !place.is_premium {
            return Self::Free;
        }
        if subscription.cancel_at_period_end {
            match place.premium_expires_at {
                Some(expires_at) if expires_at > now => Self::PendingCancellation,
                _ => Self::Free,
            }
        } else {
            Self::Active
        }
    }
}

/// The action a toggle request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First enable: charge the plan price, set the premium flag, stamp the
    /// expiry from the subscription's next billing date.
    Enable,
    /// Re-enable during a paid-for grace window: clear the cancellation flag,
    /// charge nothing, keep the existing expiry.
    Resume,
    /// Disable: flag cancel-at-period-end, keep access until the period ends,
    /// refund nothing.
    ScheduleCancel,
    /// Request matches the current state; nothing to do.
    NoOp,
}

impl Transition {
    /// Pure transition decision. `credits` and `price` only matter for the
    /// charging branch; the check happens here so a failed request provably
    /// mutates nothing.
    pub fn decide(state: PremiumState, enable: bool, credits: i32, price: i32) -> Result<Self> {
        match (state, enable) {
            (PremiumState::Free, true) => {
                if credits < price {
                    Err(ApiError::InsufficientCredits {
                        required: price,
                        available: credits,
                    })
                } else {
                    Ok(Self::Enable)
                }
            }
            (PremiumState::PendingCancellation, true) => Ok(Self::Resume),
            (PremiumState::Active, true) => Ok(Self::NoOp),
            (PremiumState::Active, false) => Ok(Self::ScheduleCancel),
            (PremiumState::Free, false) | (PremiumState::PendingCancellation, false) => {
                Ok(Self::NoOp)
            }
        }
    }

    fn message(&self) -> Option<&'static str> {
        match self {
            Self::Enable => Some("Premium enabled"),
            Self::Resume => Some("Premium re-enabled for current period"),
            Self::ScheduleCancel => Some("Premium will be cancelled at period end"),
            Self::NoOp => None,
        }
    }
}

/// Result of a toggle: the place row as committed, plus the transition taken.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub place: entity::places::Model,
    pub transition: Transition,
    pub message: Option<String>,
}

/// Premium subscription lifecycle for places.
///
/// All writes for one request happen in a single database transaction; the
/// place row is locked first, so concurrent toggles for the same place
/// serialize and cannot double-debit against a stale balance.
pub struct PremiumService {
    db: DatabaseConnection,
    credits: Arc<CreditsService>,
}

impl PremiumService {
    pub fn new(db: DatabaseConnection, credits: Arc<CreditsService>) -> Self {
        Self { db, credits }
    }

    #[instrument(skip(self))]
    pub async fn toggle_premium(
        &self,
        user_id: Uuid,
        place_id: Uuid,
        enable: bool,
    ) -> Result<ToggleOutcome> {
        let txn = self.db.begin().await?;

        // Lock the place row first; this is the serialization point for
        // concurrent toggles of the same place.
        let place = entity::places::Entity::find_by_id(place_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        // Absent and not-owned are reported identically so callers cannot
        // probe for the existence of other users' places.
        let place = match place {
            Some(p) if p.owner_id == Some(user_id) => p,
            _ => {
                txn.rollback().await?;
                return Err(ApiError::NotFoundOrForbidden);
            }
        };

        let subscription = entity::user_subscriptions::Entity::find()
            .filter(entity::user_subscriptions::Column::PlaceId.eq(place_id))
            .filter(entity::user_subscriptions::Column::IsActive.eq(true))
            .lock_exclusive()
            .one(&txn)
            .await?;

        let subscription = match subscription {
            Some(s) => s,
            None => {
                txn.rollback().await?;
                return Err(ApiError::NoActiveSubscription);
            }
        };

        let plan = entity::subscription_plans::Entity::find_by_id(subscription.plan_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ApiError::Internal(anyhow::anyhow!(
                    "Subscription {} references missing plan {}",
                    subscription.id,
                    subscription.plan_id
                ))
            })?;

        let profile = entity::profiles::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

        let now = OffsetDateTime::now_utc();
        let state = PremiumState::classify(&place, &subscription, now);
        let transition = match Transition::decide(state, enable, profile.credits, plan.price_credits)
        {
            Ok(t) => t,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        let place = match transition {
            Transition::Enable => {
                self.credits
                    .debit_in_txn(
                        user_id,
                        plan.price_credits,
                        "premium_enabled",
                        &format!("Enabled premium for place {}", place.name),
                        &txn,
                    )
                    .await?;

                let mut sub_active: entity::user_subscriptions::ActiveModel =
                    subscription.clone().into();
                sub_active.cancel_at_period_end = Set(false);
                sub_active.updated_at = Set(now);
                sub_active.update(&txn).await?;

                let mut place_active: entity::places::ActiveModel = place.into();
                place_active.is_premium = Set(true);
                place_active.premium_expires_at = Set(Some(subscription.next_billing_date));
                place_active.updated_at = Set(now);
                place_active.update(&txn).await?
            }
            Transition::Resume => {
                // The already-paid period still covers the place: clear the
                // cancellation flag, charge nothing, keep the expiry.
                let mut sub_active: entity::user_subscriptions::ActiveModel = subscription.into();
                sub_active.cancel_at_period_end = Set(false);
                sub_active.updated_at = Set(now);
                sub_active.update(&txn).await?;

                place
            }
            Transition::ScheduleCancel => {
                // No refund; access runs until the end of the paid period.
                let mut sub_active: entity::user_subscriptions::ActiveModel =
                    subscription.clone().into();
                sub_active.cancel_at_period_end = Set(true);
                sub_active.updated_at = Set(now);
                sub_active.update(&txn).await?;

                if place.premium_expires_at.is_none() {
                    let mut place_active: entity::places::ActiveModel = place.into();
                    place_active.premium_expires_at = Set(Some(subscription.next_billing_date));
                    place_active.updated_at = Set(now);
                    place_active.update(&txn).await?
                } else {
                    place
                }
            }
            Transition::NoOp => place,
        };

        txn.commit().await?;

        info!(
            "Toggled premium for place {} (user {}): {:?} -> {:?}",
            place_id, user_id, state, transition
        );

        Ok(ToggleOutcome {
            place,
            transition,
            message: transition.message().map(str::to_string),
        })
    }
}
