use std::sync::Arc;

use axum::{routing::get, Router};

use provider_cell::router::provider_routes;
use scheduling_cell::router::scheduling_routes;
use shared_config::AppConfig;
use travel_cell::router::travel_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Doorstep API is running!" }))
        .nest("/providers", provider_routes(state.clone()))
        .nest("/scheduling", scheduling_routes(state.clone()))
        .nest("/travel", travel_routes(state))
}
