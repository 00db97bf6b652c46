//! Concurrent toggle requests for the same place must serialize on the place
//! row lock: no double-debit, exactly one ledger row.

use crate::common::*;
use entity::sea_orm_active_enums::UserType;
use placevia::services::{CreditsService, PremiumService};
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test]
#[ignore] // Run only when database is available
async fn concurrent_enables_debit_exactly_once() {
    let db = setup_test_db().await;
    let service = Arc::new(PremiumService::new(
        db.clone(),
        Arc::new(CreditsService::new(db.clone())),
    ));

    let user_id = seed_profile(&db, 10, UserType::Business).await;
    let (place_id, _) = seed_subscribed_place(&db, user_id, 8, false, false, None).await;

    // Spawn 5 concurrent enables for the SAME place
    let mut tasks = JoinSet::new();
    for i in 0..5 {
        let service = service.clone();
        tasks.spawn(async move {
            let result = service.toggle_premium(user_id, place_id, true).await;
            (i, result)
        });
    }

    let mut ok_count = 0;
    let mut err_count = 0;
    while let Some(result) = tasks.join_next().await {
        let (task_id, toggle_result) = result.expect("task panicked");
        match toggle_result {
            Ok(outcome) => {
                println!("Task {} completed: {:?}", task_id, outcome.transition);
                ok_count += 1;
            }
            Err(e) => {
                println!("Task {} failed: {}", task_id, e);
                err_count += 1;
            }
        }
    }

    // Whichever request wins the lock performs the debit; the rest observe
    // the place as already premium and no-op.
    assert_eq!(ok_count, 5, "no request should fail");
    assert_eq!(err_count, 0);

    assert_eq!(
        fetch_profile(&db, user_id).await.credits,
        2,
        "balance must be debited exactly once"
    );

    let rows = ledger_rows(&db, user_id).await;
    assert_eq!(rows.len(), 1, "exactly one ledger row");
    assert_eq!(rows[0].amount, -8);
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn concurrent_enable_disable_pair_leaves_consistent_state() {
    let db = setup_test_db().await;
    let service = Arc::new(PremiumService::new(
        db.clone(),
        Arc::new(CreditsService::new(db.clone())),
    ));

    let user_id = seed_profile(&db, 10, UserType::Business).await;
    let (place_id, sub_id) = seed_subscribed_place(&db, user_id, 8, false, false, None).await;

    let mut tasks = JoinSet::new();
    for enable in [true, false] {
        let service = service.clone();
        tasks.spawn(async move { service.toggle_premium(user_id, place_id, enable).await });
    }
    while let Some(result) = tasks.join_next().await {
        result.expect("task panicked").expect("toggle failed");
    }

    // Either lock order is valid. The enable always commits (disable on a
    // free place is a no-op), so premium ends up true with exactly one debit;
    // the cancel flag depends on which request ran second.
    let place = fetch_place(&db, place_id).await;
    let subscription = fetch_subscription(&db, sub_id).await;
    let profile = fetch_profile(&db, user_id).await;
    let rows = ledger_rows(&db, user_id).await;

    assert!(place.is_premium);
    assert_eq!(profile.credits, 2);
    assert_eq!(rows.len(), 1);
    if subscription.cancel_at_period_end {
        // disable ran after the enable; access still runs to period end
        assert!(place.premium_expires_at.is_some());
    }
}
