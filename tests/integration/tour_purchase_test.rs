use crate::common::*;
use entity::sea_orm_active_enums::UserType;
use placevia::services::{CreditsService, TourService};
use placevia::ApiError;
use std::sync::Arc;

fn tour_service(db: &sea_orm::DatabaseConnection) -> TourService {
    TourService::new(db.clone(), Arc::new(CreditsService::new(db.clone())))
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn purchase_debits_and_records_ledger_row() {
    let db = setup_test_db().await;
    let service = tour_service(&db);

    let user_id = seed_profile(&db, 25, UserType::Regular).await;
    let tour_id = seed_tour(&db, 10).await;

    let purchase = service
        .purchase_tour(user_id, tour_id)
        .await
        .expect("purchase should succeed");
    assert_eq!(purchase.user_id, user_id);
    assert_eq!(purchase.tour_id, tour_id);

    assert_eq!(fetch_profile(&db, user_id).await.credits, 15);

    let rows = ledger_rows(&db, user_id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, -10);
    assert_eq!(rows[0].transaction_type, "tour_purchased");
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn duplicate_purchase_is_rejected_without_second_debit() {
    let db = setup_test_db().await;
    let service = tour_service(&db);

    let user_id = seed_profile(&db, 25, UserType::Regular).await;
    let tour_id = seed_tour(&db, 10).await;

    service
        .purchase_tour(user_id, tour_id)
        .await
        .expect("first purchase should succeed");

    let err = service
        .purchase_tour(user_id, tour_id)
        .await
        .expect_err("second purchase must fail");
    assert!(matches!(err, ApiError::Conflict(_)));

    assert_eq!(fetch_profile(&db, user_id).await.credits, 15);
    assert_eq!(ledger_rows(&db, user_id).await.len(), 1);
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn insufficient_credits_rolls_back_the_purchase_row() {
    let db = setup_test_db().await;
    let service = tour_service(&db);

    let user_id = seed_profile(&db, 3, UserType::Regular).await;
    let tour_id = seed_tour(&db, 10).await;

    let err = service
        .purchase_tour(user_id, tour_id)
        .await
        .expect_err("purchase must fail");
    assert!(matches!(err, ApiError::InsufficientCredits { .. }));

    assert_eq!(fetch_profile(&db, user_id).await.credits, 3);
    assert!(ledger_rows(&db, user_id).await.is_empty());

    // The purchase row inserted before the debit must not survive
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    let purchases = entity::purchased_tours::Entity::find()
        .filter(entity::purchased_tours::Column::UserId.eq(user_id))
        .all(&db)
        .await
        .expect("Failed to query purchases");
    assert!(purchases.is_empty());
}
