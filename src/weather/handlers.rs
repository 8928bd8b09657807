use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::weather::{MockWeatherProvider, WeatherProvider, WeatherReport};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub account_id: i64,
    pub report: WeatherReport,
}

pub async fn get_weather(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Weather requested by account {}", user.account_id);
    let report = state.weather.current(user.account_id).await?;

    Ok(HttpResponse::Ok().json(WeatherResponse {
        account_id: user.account_id,
        report,
    }))
}

pub async fn get_mock(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let report = MockWeatherProvider.current(user.account_id).await?;

    Ok(HttpResponse::Ok().json(WeatherResponse {
        account_id: user.account_id,
        report,
    }))
}
