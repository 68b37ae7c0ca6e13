//! Today's temperature range for a coordinate pair.
//!
//! [`Forecaster`] is the capability the airport search uses. The production
//! implementation, [`OpenMeteoClient`], calls the Open-Meteo daily forecast
//! API once per request with a bounded timeout and no retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::Coordinates;

/// Public Open-Meteo endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com";

/// Default request timeout for forecast lookups.
pub const DEFAULT_WEATHER_TIMEOUT: Duration = Duration::from_secs(10);

/// Today's forecast high and low, in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub high: f64,
    pub low: f64,
}

/// Source of daily temperature forecasts.
#[async_trait]
pub trait Forecaster: Send + Sync {
    async fn todays_range(&self, at: Coordinates) -> Result<TemperatureRange>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailySeries>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
}

impl ForecastResponse {
    fn into_range(self) -> Result<TemperatureRange> {
        let daily = self
            .daily
            .ok_or_else(|| Error::upstream("forecast response has no daily block"))?;

        let high = daily.temperature_2m_max.first().copied().flatten();
        let low = daily.temperature_2m_min.first().copied().flatten();
        match (high, low) {
            (Some(high), Some(low)) => Ok(TemperatureRange { high, low }),
            _ => Err(Error::upstream("forecast response has an empty daily series")),
        }
    }
}

/// [`Forecaster`] backed by the Open-Meteo HTTP API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Build a client for `base_url` (scheme and host, no trailing path).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("skylane/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }
}

#[async_trait]
impl Forecaster for OpenMeteoClient {
    async fn todays_range(&self, at: Coordinates) -> Result<TemperatureRange> {
        let url = self.forecast_url();
        debug!(url = %url, latitude = at.latitude, longitude = at.longitude, "requesting forecast");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min".to_string(),
                ),
                ("timezone", "auto".to_string()),
                ("forecast_days", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "forecast request failed");
            return Err(Error::upstream(format!(
                "forecast provider answered with status {status}"
            )));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|err| Error::upstream(format!("malformed forecast payload: {err}")))?;
        body.into_range()
    }
}
