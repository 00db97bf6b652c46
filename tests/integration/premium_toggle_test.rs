//! End-to-end coverage of the premium toggle state machine against a real
//! database: the four transitions, idempotence, and the ownership guard.

use crate::common::*;
use entity::sea_orm_active_enums::UserType;
use placevia::services::{premium_service::Transition, CreditsService, PremiumService};
use placevia::ApiError;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

fn premium_service(db: &sea_orm::DatabaseConnection) -> PremiumService {
    PremiumService::new(db.clone(), Arc::new(CreditsService::new(db.clone())))
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn enable_from_free_debits_and_stamps_expiry() {
    let db = setup_test_db().await;
    let service = premium_service(&db);

    // Scenario A: credits=10, place FREE, plan price 8
    let user_id = seed_profile(&db, 10, UserType::Business).await;
    let (place_id, sub_id) = seed_subscribed_place(&db, user_id, 8, false, false, None).await;

    let outcome = service
        .toggle_premium(user_id, place_id, true)
        .await
        .expect("enable should succeed");

    assert_eq!(outcome.transition, Transition::Enable);

    let profile = fetch_profile(&db, user_id).await;
    assert_eq!(profile.credits, 2);

    let place = fetch_place(&db, place_id).await;
    assert!(place.is_premium);
    let subscription = fetch_subscription(&db, sub_id).await;
    assert_eq!(
        place.premium_expires_at,
        Some(subscription.next_billing_date)
    );

    let rows = ledger_rows(&db, user_id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, -8);
    assert_eq!(rows[0].transaction_type, "premium_enabled");
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn enable_without_credits_mutates_nothing() {
    let db = setup_test_db().await;
    let service = premium_service(&db);

    // Scenario B: credits=2, place FREE
    let user_id = seed_profile(&db, 2, UserType::Business).await;
    let (place_id, _) = seed_subscribed_place(&db, user_id, 8, false, false, None).await;

    let err = service
        .toggle_premium(user_id, place_id, true)
        .await
        .expect_err("enable should fail");

    match err {
        ApiError::InsufficientCredits {
            required,
            available,
        } => {
            assert_eq!(required, 8);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientCredits, got {:?}", other),
    }

    assert_eq!(fetch_profile(&db, user_id).await.credits, 2);
    assert!(!fetch_place(&db, place_id).await.is_premium);
    assert!(ledger_rows(&db, user_id).await.is_empty());
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn disable_from_active_schedules_cancellation_without_refund() {
    let db = setup_test_db().await;
    let service = premium_service(&db);

    // Scenario C: place PREMIUM_ACTIVE, credits=5
    let user_id = seed_profile(&db, 5, UserType::Business).await;
    let expires = OffsetDateTime::now_utc() + Duration::days(30);
    let (place_id, sub_id) =
        seed_subscribed_place(&db, user_id, 8, true, false, Some(expires)).await;

    let outcome = service
        .toggle_premium(user_id, place_id, false)
        .await
        .expect("disable should succeed");

    assert_eq!(outcome.transition, Transition::ScheduleCancel);

    assert_eq!(fetch_profile(&db, user_id).await.credits, 5);

    let place = fetch_place(&db, place_id).await;
    assert!(place.is_premium, "access is not revoked immediately");

    let subscription = fetch_subscription(&db, sub_id).await;
    assert!(subscription.cancel_at_period_end);

    // No refund means no ledger row either
    assert!(ledger_rows(&db, user_id).await.is_empty());
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn reenable_within_grace_window_is_free_of_charge() {
    let db = setup_test_db().await;
    let service = premium_service(&db);

    // Scenario D: pending cancellation, expiry tomorrow, credits=3 < price
    let user_id = seed_profile(&db, 3, UserType::Business).await;
    let expires = OffsetDateTime::now_utc() + Duration::days(1);
    let (place_id, sub_id) = seed_subscribed_place(&db, user_id, 8, true, true, Some(expires)).await;

    let outcome = service
        .toggle_premium(user_id, place_id, true)
        .await
        .expect("re-enable should succeed");

    assert_eq!(outcome.transition, Transition::Resume);

    assert_eq!(fetch_profile(&db, user_id).await.credits, 3);

    let place = fetch_place(&db, place_id).await;
    assert!(place.is_premium);
    // timestamptz round-trips at microsecond precision
    let stored = place.premium_expires_at.expect("expiry must be kept");
    assert!((stored - expires).abs() < Duration::milliseconds(1));

    let subscription = fetch_subscription(&db, sub_id).await;
    assert!(!subscription.cancel_at_period_end);

    assert!(ledger_rows(&db, user_id).await.is_empty());
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn repeated_enable_is_idempotent() {
    let db = setup_test_db().await;
    let service = premium_service(&db);

    let user_id = seed_profile(&db, 20, UserType::Business).await;
    let (place_id, _) = seed_subscribed_place(&db, user_id, 8, false, false, None).await;

    service
        .toggle_premium(user_id, place_id, true)
        .await
        .expect("first enable should succeed");

    let outcome = service
        .toggle_premium(user_id, place_id, true)
        .await
        .expect("second enable should succeed");

    assert_eq!(outcome.transition, Transition::NoOp);
    assert!(outcome.message.is_none());

    // Still only one debit and one ledger row
    assert_eq!(fetch_profile(&db, user_id).await.credits, 12);
    assert_eq!(ledger_rows(&db, user_id).await.len(), 1);
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn non_owner_is_rejected_without_leaking_existence() {
    let db = setup_test_db().await;
    let service = premium_service(&db);

    let owner_id = seed_profile(&db, 50, UserType::Business).await;
    let stranger_id = seed_profile(&db, 50, UserType::Business).await;
    let (place_id, _) = seed_subscribed_place(&db, owner_id, 8, false, false, None).await;

    let err = service
        .toggle_premium(stranger_id, place_id, true)
        .await
        .expect_err("stranger must be rejected");
    assert!(matches!(err, ApiError::NotFoundOrForbidden));

    // A missing place reports the same error
    let err = service
        .toggle_premium(stranger_id, Uuid::new_v4(), true)
        .await
        .expect_err("missing place must be rejected");
    assert!(matches!(err, ApiError::NotFoundOrForbidden));

    assert_eq!(fetch_profile(&db, stranger_id).await.credits, 50);
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn place_without_subscription_is_rejected() {
    let db = setup_test_db().await;
    let service = premium_service(&db);

    let user_id = seed_profile(&db, 50, UserType::Business).await;
    let place_id = seed_place(&db, Some(user_id), false, None).await;

    let err = service
        .toggle_premium(user_id, place_id, true)
        .await
        .expect_err("toggle without subscription must fail");
    assert!(matches!(err, ApiError::NoActiveSubscription));
}
