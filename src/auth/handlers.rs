use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use crate::AppState;
use crate::error::AppError;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

pub async fn sign_up(
    req: web::Json<SignUpRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received sign-up request for username: {}", req.username);
    match state.auth_service.sign_up(&req.username, &req.email, &req.password).await {
        Ok(id) => Ok(HttpResponse::Created().json(SignUpResponse { id })),
        Err(e) => {
            log_rejection("Sign-up", &req.username, &e);
            Err(e)
        }
    }
}

pub async fn sign_in(
    req: web::Json<SignInRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received sign-in request for username: {}", req.username);
    match state.auth_service.sign_in(&req.username, &req.password).await {
        Ok(token) => Ok(HttpResponse::Ok().json(AuthResponse { token })),
        Err(e) => {
            log_rejection("Sign-in", &req.username, &e);
            Err(e)
        }
    }
}

// Server-side failures are logged by `AppError::error_response`.
fn is_caller_error(err: &AppError) -> bool {
    err.status_code().is_client_error()
}

fn log_rejection(action: &str, username: &str, err: &AppError) {
    if is_caller_error(err) {
        warn!("{} failed for username: {}: {}", action, username, err);
    }
}
