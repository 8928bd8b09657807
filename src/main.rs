use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use std::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weatherman::config::CorsConfig;
use weatherman::{configure, AppState, Settings};

fn cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        // CORS disabled - use most restrictive settings
        return Cors::default();
    }

    let cors = if config.allow_any_origin {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
    } else {
        Cors::default()
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["Authorization", "Content-Type"])
    };

    cors.max_age(config.max_age as usize)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = Settings::new().context("Error while loading configuration")?;
    info!("Configuration loaded successfully ({})", config.environment);

    let state = AppState::new(config.clone())
        .await
        .context("Error while initialising application state")?;
    let state = web::Data::new(state);

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
        .context("Error while binding listener")?;
    info!("Starting server at {}:{}", config.server.host, config.server.port);

    let app_state = state.clone();
    let cors_config = config.cors.clone();

    // Stops accepting on SIGINT/SIGTERM and drains in-flight requests before returning
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&cors_config))
            .configure(configure(app_state.clone()))
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .context("Error raised while server run")?;

    info!("Closing db connect...");
    state.shutdown().await?;
    info!("Closing db connect... Done");

    Ok(())
}
