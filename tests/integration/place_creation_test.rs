use crate::common::*;
use entity::sea_orm_active_enums::UserType;
use placevia::models::places::AddPlaceRequest;
use placevia::services::{CreditsService, PlaceService};
use placevia::ApiError;
use std::sync::Arc;

const PLACE_CREATION_COST: i32 = 15;

fn place_service(db: &sea_orm::DatabaseConnection) -> PlaceService {
    PlaceService::new(
        db.clone(),
        Arc::new(CreditsService::new(db.clone())),
        PLACE_CREATION_COST,
    )
}

fn request() -> AddPlaceRequest {
    AddPlaceRequest {
        name: "Cafe Verde".to_string(),
        category: "cafe".to_string(),
        description: Some("Quiet terrace".to_string()),
        latitude: 41.39,
        longitude: 2.17,
    }
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn business_account_pays_for_new_place() {
    let db = setup_test_db().await;
    let service = place_service(&db);

    let user_id = seed_profile(&db, 20, UserType::Business).await;

    let place = service
        .create_place(user_id, UserType::Business, request())
        .await
        .expect("creation should succeed");

    assert_eq!(place.owner_id, Some(user_id));
    assert!(!place.is_premium);

    assert_eq!(fetch_profile(&db, user_id).await.credits, 5);

    let rows = ledger_rows(&db, user_id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, -PLACE_CREATION_COST);
    assert_eq!(rows[0].transaction_type, "place_added");
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn regular_account_is_rejected() {
    let db = setup_test_db().await;
    let service = place_service(&db);

    let user_id = seed_profile(&db, 100, UserType::Regular).await;

    let err = service
        .create_place(user_id, UserType::Regular, request())
        .await
        .expect_err("regular accounts cannot add places");
    assert!(matches!(err, ApiError::Forbidden(_)));

    assert_eq!(fetch_profile(&db, user_id).await.credits, 100);
}
