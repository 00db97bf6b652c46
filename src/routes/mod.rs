// Route modules
pub mod credits;
pub mod places;
pub mod premium;
pub mod tours;

use crate::{
    app_state::AppState,
    middleware::{create_rate_limiter, jwt_auth_middleware, logging_middleware},
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the main API router
///
/// Paths mirror the platform function names the mobile and web clients
/// already call.
pub fn create_router(state: AppState) -> Router {
    // Credit-mutating routes get both authentication and rate limiting
    let rate_limiter = create_rate_limiter(state.redis.clone());
    let mutating_routes = Router::new()
        .route("/toggle-premium", post(premium::toggle_premium))
        .route("/purchase-tour", post(tours::purchase_tour))
        .route("/add-place", post(places::add_place))
        .route_layer(middleware::from_fn(rate_limiter))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    // Auth-only routes (no rate limiting, require JWT)
    let auth_only_routes = Router::new()
        .route("/credits", get(credits::get_credits))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    // Browser clients call these endpoints cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(mutating_routes)
        .merge(auth_only_routes)
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
        .with_state(state)
}
