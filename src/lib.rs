pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod weather;

use std::sync::Arc;
use actix_web::web;
use tracing::{info, warn};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use crate::config::Settings;

pub use auth::{AuthGate, AuthService, AuthenticatedUser, PasswordHasher, TokenIssuer, TokenVerifier};
pub use db::{Account, CredentialStore, InMemoryCredentialStore, PgCredentialStore};
pub use weather::{MockWeatherProvider, OpenMeteoProvider, WeatherProvider};

/// Application state shared across all workers. Everything here is read-only
/// after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth_service: Arc<AuthService>,
    pub verifier: Arc<TokenVerifier>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    /// Connects to Postgres, applies migrations and wires the live weather provider.
    pub async fn new(config: Settings) -> Result<Self> {
        config.validate()?;

        let store = PgCredentialStore::connect(&config.database).await?;
        store.run_migrations().await?;

        let weather = OpenMeteoProvider::new(&config.weather)?;

        Self::from_parts(config, Arc::new(store), Arc::new(weather))
    }

    pub fn from_parts(
        config: Settings,
        store: Arc<dyn CredentialStore>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Result<Self> {
        config.validate()?;
        if config.uses_default_secret() {
            warn!("Using the built-in development JWT secret; set APP_AUTH__JWT_SECRET in production");
        }

        let issuer = TokenIssuer::from_config(&config.auth)?;
        let verifier = TokenVerifier::from_config(&config.auth);
        let hasher = PasswordHasher::from_config(&config.auth)?;
        let auth_service = AuthService::new(store, hasher, issuer)?;

        info!("Tokens expire after {} minutes", config.auth.token_ttl_minutes);

        Ok(Self {
            config: Arc::new(config),
            auth_service: Arc::new(auth_service),
            verifier: Arc::new(verifier),
            weather,
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        // Close database connections
        self.auth_service.store().close().await;
        Ok(())
    }
}

/// JSON bodies that fail to parse are reported in the standard error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// Registers the public auth routes and the gated `/api` routes.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let gate = AuthGate::new(state.verifier.clone());

        cfg.app_data(state)
            .app_data(json_config())
            .service(
                web::scope("/auth")
                    .route("/sign-up", web::post().to(auth::handlers::sign_up))
                    .route("/sign-in", web::post().to(auth::handlers::sign_in)),
            )
            .service(
                web::scope("/api")
                    .wrap(gate)
                    .route("/get-weather", web::get().to(weather::handlers::get_weather))
                    .route("/get-mock", web::get().to(weather::handlers::get_mock)),
            );
    }
}
