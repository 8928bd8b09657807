//! Weather data served to authenticated callers
//!
//! Handlers only reach a [`WeatherProvider`] after the auth gate has
//! attached an identity to the request.

pub mod handlers;
mod open_meteo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

pub use open_meteo::OpenMeteoProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub weather_code: i32,
    pub observed_at: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, account_id: i64) -> Result<WeatherReport, UpstreamError>;
}

/// Canned report behind `/api/get-mock`.
#[derive(Debug, Default, Clone)]
pub struct MockWeatherProvider;

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn current(&self, _account_id: i64) -> Result<WeatherReport, UpstreamError> {
        Ok(WeatherReport {
            temperature_c: 21.5,
            wind_speed_kmh: 12.0,
            wind_direction_deg: 270.0,
            weather_code: 1,
            observed_at: "2024-01-01T12:00".to_string(),
        })
    }
}
