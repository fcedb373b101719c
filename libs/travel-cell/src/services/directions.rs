// libs/travel-cell/src/services/directions.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{DirectionsPayload, TransportMode, TravelError, TravelEstimate};

/// Seam between the scheduling validator and the external mapping
/// service. One lookup per call, no caching, no retries at this layer.
#[async_trait]
pub trait TravelEstimator: Send + Sync {
    async fn estimate(
        &self,
        origin: &str,
        destination: &str,
        mode: TransportMode,
    ) -> Result<TravelEstimate, TravelError>;
}

/// Client for the external directions/geocoding API.
/// GET {base_url}/directions?origin=..&destination=..&mode=..
#[derive(Debug)]
pub struct DirectionsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(config: &AppConfig) -> Result<Self, TravelError> {
        if !config.is_travel_configured() {
            return Err(TravelError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.maps_base_url.clone(),
            api_key: config.maps_api_key.clone(),
        })
    }
}

#[async_trait]
impl TravelEstimator for DirectionsClient {
    async fn estimate(
        &self,
        origin: &str,
        destination: &str,
        mode: TransportMode,
    ) -> Result<TravelEstimate, TravelError> {
        info!("Estimating {} travel time: {} -> {}", mode, origin, destination);

        let url = format!("{}/directions", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", &mode.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Directions response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("Directions lookup failed: {} - {}", status, response_text);
            return Err(TravelError::Api {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        let payload: DirectionsPayload =
            serde_json::from_str(&response_text).map_err(|e| TravelError::Api {
                message: format!("Failed to parse directions response: {}", e),
            })?;

        if payload.status != "ok" {
            return Err(TravelError::Api {
                message: payload
                    .message
                    .unwrap_or_else(|| format!("status: {}", payload.status)),
            });
        }

        match (payload.duration_seconds, payload.distance_meters) {
            (Some(duration_seconds), Some(distance_meters)) => {
                // seconds rounded up to whole minutes
                let duration_minutes = (duration_seconds + 59) / 60;
                Ok(TravelEstimate {
                    duration_minutes,
                    distance_meters,
                })
            }
            _ => Err(TravelError::NoRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            }),
        }
    }
}
