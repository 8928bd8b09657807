use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::config::WeatherConfig;
use crate::error::UpstreamError;
use crate::weather::{WeatherProvider, WeatherReport};

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i32,
    time: String,
}

/// Current conditions for a fixed location from the Open-Meteo forecast API.
pub struct OpenMeteoProvider {
    client: reqwest::Client,
    forecast_url: Url,
}

impl OpenMeteoProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, UpstreamError> {
        let mut forecast_url = Url::parse(&config.base_url)
            .and_then(|base| base.join("/v1/forecast"))
            .map_err(|e| UpstreamError::RequestFailed(format!("Invalid weather URL: {}", e)))?;

        forecast_url
            .query_pairs_mut()
            .append_pair("latitude", &config.latitude.to_string())
            .append_pair("longitude", &config.longitude.to_string())
            .append_pair("current_weather", "true");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, forecast_url })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, account_id: i64) -> Result<WeatherReport, UpstreamError> {
        debug!("Fetching current weather for account {}", account_id);

        let res = self.client.get(self.forecast_url.clone()).send().await?;

        let status = res.status();
        if !status.is_success() {
            error!("Weather API returned status {}", status);
            return Err(UpstreamError::ResponseError(format!("status {}", status)));
        }

        let body: ForecastResponse = res.json().await?;
        let current = body.current_weather;

        Ok(WeatherReport {
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            wind_direction_deg: current.winddirection,
            weather_code: current.weathercode,
            observed_at: current.time,
        })
    }
}
