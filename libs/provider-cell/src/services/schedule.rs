// libs/provider-cell/src/services/schedule.rs
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    ProviderError, TravelProfile, UpdateTravelProfileRequest, UpdateWorkingHoursRequest,
    WeekSchedule, WorkingHoursRecord,
};

pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Raw working-hours rows, ordered by day.
    pub async fn get_working_hours(
        &self,
        provider_id: &str,
        auth_token: Option<&str>,
    ) -> Result<Vec<WorkingHoursRecord>, ProviderError> {
        debug!("Fetching working hours for provider: {}", provider_id);

        let path = format!(
            "/rest/v1/working_hours?provider_id=eq.{}&order=day_of_week.asc",
            provider_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let records = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<WorkingHoursRecord>, _>>()
            .map_err(|e| ProviderError::Database(format!("Failed to parse working hours: {}", e)))?;

        Ok(records)
    }

    /// Parsed weekly schedule. Malformed rows fail here with a
    /// configuration error rather than defaulting.
    pub async fn get_week_schedule(
        &self,
        provider_id: &str,
        auth_token: Option<&str>,
    ) -> Result<WeekSchedule, ProviderError> {
        let records = self.get_working_hours(provider_id, auth_token).await?;
        WeekSchedule::from_records(&records)
    }

    /// Replace the provider's weekly schedule. The payload is parsed up
    /// front so malformed days are rejected before anything is written.
    pub async fn update_working_hours(
        &self,
        provider_id: &str,
        request: UpdateWorkingHoursRequest,
        auth_token: Option<&str>,
    ) -> Result<Vec<WorkingHoursRecord>, ProviderError> {
        debug!("Updating working hours for provider: {}", provider_id);

        WeekSchedule::from_records(&request.days)?;

        let rows: Vec<Value> = request
            .days
            .iter()
            .map(|day| {
                json!({
                    "provider_id": provider_id,
                    "day_of_week": day.day_of_week,
                    "enabled": day.enabled,
                    "start_time": day.start_time,
                    "end_time": day.end_time,
                    "breaks": day.breaks,
                })
            })
            .collect();

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static(
                "resolution=merge-duplicates,return=representation",
            ),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/working_hours?on_conflict=provider_id,day_of_week",
                auth_token,
                Some(Value::Array(rows)),
                Some(headers),
            )
            .await?;

        let records = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<WorkingHoursRecord>, _>>()
            .map_err(|e| ProviderError::Database(format!("Failed to parse working hours: {}", e)))?;

        Ok(records)
    }

    /// The provider's travel profile. A provider that never touched
    /// travel settings gets the documented defaults (no home base,
    /// driving, zero grace).
    pub async fn get_travel_profile(
        &self,
        provider_id: &str,
        auth_token: Option<&str>,
    ) -> Result<TravelProfile, ProviderError> {
        debug!("Fetching travel profile for provider: {}", provider_id);

        let path = format!("/rest/v1/travel_profiles?provider_id=eq.{}", provider_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        match result.into_iter().next() {
            Some(row) => serde_json::from_value(row).map_err(|e| {
                ProviderError::Database(format!("Failed to parse travel profile: {}", e))
            }),
            None => {
                debug!("No travel profile for provider {}, using defaults", provider_id);
                Ok(TravelProfile::default())
            }
        }
    }

    pub async fn update_travel_profile(
        &self,
        provider_id: &str,
        request: UpdateTravelProfileRequest,
        auth_token: Option<&str>,
    ) -> Result<TravelProfile, ProviderError> {
        debug!("Updating travel profile for provider: {}", provider_id);

        if request.grace_minutes < 0 {
            return Err(ProviderError::InvalidProfile(
                "grace_minutes must not be negative".to_string(),
            ));
        }

        let profile_data = json!({
            "provider_id": provider_id,
            "home_base_address": request.home_base_address,
            "transportation_mode": request.transportation_mode,
            "grace_minutes": request.grace_minutes,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static(
                "resolution=merge-duplicates,return=representation",
            ),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/travel_profiles?on_conflict=provider_id",
                auth_token,
                Some(profile_data),
                Some(headers),
            )
            .await?;

        match result.into_iter().next() {
            Some(row) => serde_json::from_value(row).map_err(|e| {
                ProviderError::Database(format!("Failed to parse travel profile: {}", e))
            }),
            None => Err(ProviderError::Database(
                "Failed to update travel profile".to_string(),
            )),
        }
    }
}
