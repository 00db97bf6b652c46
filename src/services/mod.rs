// Service modules
pub mod credits_service;
pub mod jwt_service;
pub mod place_service;
pub mod premium_service;
pub mod tour_service;

pub use credits_service::CreditsService;
pub use jwt_service::JWTService;
pub use place_service::PlaceService;
pub use premium_service::PremiumService;
pub use tour_service::TourService;
