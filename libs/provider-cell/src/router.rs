use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn provider_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/{provider_id}/working-hours",
            get(handlers::get_working_hours).put(handlers::update_working_hours),
        )
        .route(
            "/{provider_id}/working-hours/open-intervals",
            get(handlers::get_open_intervals),
        )
        .route(
            "/{provider_id}/travel-profile",
            get(handlers::get_travel_profile).put(handlers::update_travel_profile),
        )
        .with_state(state)
}
