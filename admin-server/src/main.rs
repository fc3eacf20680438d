//! admin-server - HTTP backend for the writers marketplace admin panel

use admin_server::notify::NotificationWorker;
use admin_server::utils::{logger, shutdown};
use admin_server::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    logger::init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );

    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "Starting admin-server"
    );
    if config.is_development() && std::env::var("JWT_SECRET").is_err() {
        tracing::warn!("JWT_SECRET not set, signing login tokens with the development placeholder");
    }

    let state = AppState::new(&config).await?;

    let worker = NotificationWorker::new(state.pool.clone());
    tokio::spawn(worker.run(state.orders.subscribe()));

    let app = api::build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("admin-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_shutdown(tokio::signal::ctrl_c()))
        .await?;

    tracing::info!("admin-server stopped");
    Ok(())
}
