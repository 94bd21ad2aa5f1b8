//! Bus tracker backend HTTP client.
//!
//! Provides async methods for the five `/cta/bus/*` endpoints and converts
//! their envelopes to domain types.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Direction, Prediction, Route, RouteId, Stop, StopId, VehiclePosition};

use super::api::TransitApi;
use super::convert::{
    convert_directions, convert_predictions, convert_routes, convert_stops, convert_vehicles,
};
use super::error::CtaError;
use super::types::unwrap_envelope;

/// Default base URL for the backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct CtaConfig {
    /// Base URL the `/cta/bus/*` paths are appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CtaConfig {
    /// Create a config pointing at the default local backend.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for CtaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for the bus tracker backend.
#[derive(Debug, Clone)]
pub struct CtaClient {
    http: reqwest::Client,
    base_url: String,
}

impl CtaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CtaConfig) -> Result<Self, CtaError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// GET `path` and unwrap `bustime-response.<field>`.
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        field: &'static str,
    ) -> Result<Vec<T>, CtaError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "backend request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CtaError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        unwrap_envelope(&body, field)
    }
}

impl TransitApi for CtaClient {
    async fn routes(&self) -> Result<Vec<Route>, CtaError> {
        let dtos = self.get_list("/cta/bus/routes", &[], "routes").await?;
        Ok(convert_routes(dtos))
    }

    async fn directions(&self, route: &RouteId) -> Result<Vec<Direction>, CtaError> {
        let dtos = self
            .get_list("/cta/bus/directions", &[("rt", route.as_str())], "directions")
            .await?;
        Ok(convert_directions(dtos))
    }

    async fn stops(&self, route: &RouteId, direction: &Direction) -> Result<Vec<Stop>, CtaError> {
        let dtos = self
            .get_list(
                "/cta/bus/stops",
                &[("rt", route.as_str()), ("direction", direction.as_str())],
                "stops",
            )
            .await?;
        Ok(convert_stops(dtos))
    }

    async fn vehicles(&self, route: &RouteId) -> Result<Vec<VehiclePosition>, CtaError> {
        let dtos = self
            .get_list("/cta/bus/vehicles", &[("rt", route.as_str())], "vehicle")
            .await?;
        Ok(convert_vehicles(dtos))
    }

    async fn predictions(
        &self,
        route: &RouteId,
        stop: &StopId,
    ) -> Result<Vec<Prediction>, CtaError> {
        let dtos = self
            .get_list(
                "/cta/bus/predictions",
                &[("stop_id", stop.as_str()), ("rt", route.as_str())],
                "prd",
            )
            .await?;
        Ok(convert_predictions(dtos))
    }
}
