use dotenvy::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use simreports::config::AppConfig;
use simreports::drive::init_drive;
use simreports::reports::{configure_report_routes, handle_not_found};
use simreports::shared::state::AppState;
use simreports::shared::utils::create_conn;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Failed to load config: {}", e),
        )
    })?;

    let pool = match create_conn() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to create database pool: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("Database pool creation failed: {}", e),
            ));
        }
    };

    let drive = match init_drive(&config.drive).await {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Drive client unavailable, presigned uploads disabled: {}", e);
            None
        }
    };

    let app_state = Arc::new(AppState {
        drive,
        bucket_name: config.drive.bucket.clone(),
        config: Some(config.clone()),
        conn: pool,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = configure_report_routes()
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(app_state);

    info!(
        "Starting HTTP server on {}:{}",
        config.server.host, config.server.port
    );
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    axum::serve(listener, app).await
}
