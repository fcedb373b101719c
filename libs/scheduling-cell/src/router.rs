use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    // The intake endpoint is public (booking-request form); everything
    // else forwards the caller's bearer token to PostgREST.
    Router::new()
        .route(
            "/{provider_id}/bookings",
            post(handlers::create_booking_request),
        )
        .route(
            "/{provider_id}/bookings/validate",
            post(handlers::validate_booking),
        )
        .route("/{provider_id}/appointments", get(handlers::get_appointments))
        .route(
            "/{provider_id}/appointments/{appointment_id}/status",
            patch(handlers::update_appointment_status),
        )
        .with_state(state)
}
