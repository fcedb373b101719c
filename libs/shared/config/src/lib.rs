use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub maps_base_url: String,
    pub maps_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            maps_base_url: env::var("MAPS_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("MAPS_BASE_URL not set, using default");
                    "https://router.project-osrm.org/v1".to_string()
                }),
            maps_api_key: env::var("MAPS_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("MAPS_API_KEY not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    pub fn is_travel_configured(&self) -> bool {
        !self.maps_base_url.is_empty() && !self.maps_api_key.is_empty()
    }
}
