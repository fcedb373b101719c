use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn travel_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/estimate", get(handlers::get_estimate))
        .with_state(state)
}
