use crate::{
    config::Config,
    services::{CreditsService, JWTService, PlaceService, PremiumService, TourService},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: Arc<redis::Client>,
    pub jwt_service: Arc<JWTService>,
    pub credits_service: Arc<CreditsService>,
    pub premium_service: Arc<PremiumService>,
    pub tour_service: Arc<TourService>,
    pub place_service: Arc<PlaceService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        // Connect to database
        let db = sea_orm::Database::connect(&config.database.url).await?;

        // Connect to Redis
        let redis = Arc::new(redis::Client::open(config.redis.url.as_str())?);

        // Initialize services
        let jwt_service = Arc::new(JWTService::new(Arc::new(config.auth.clone())));
        let credits_service = Arc::new(CreditsService::new(db.clone()));
        let premium_service = Arc::new(PremiumService::new(db.clone(), credits_service.clone()));
        let tour_service = Arc::new(TourService::new(db.clone(), credits_service.clone()));
        let place_service = Arc::new(PlaceService::new(
            db.clone(),
            credits_service.clone(),
            config.pricing.place_creation_cost,
        ));

        Ok(Self {
            db,
            redis,
            jwt_service,
            credits_service,
            premium_service,
            tour_service,
            place_service,
            config: Arc::new(config),
        })
    }
}
