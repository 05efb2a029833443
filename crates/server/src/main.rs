use anyhow::Context;
use db::DBService;
use server::{AppState, router};
use services::services::{config::WorkOrderServiceConfig, work_order_service::WorkOrderService};
use tracing::info;
use utils::{logging::init_tracing, sentry::init_once};

const DEFAULT_DATABASE_URL: &str = "sqlite://shop.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_once(std::env::var("SENTRY_DSN").ok());
    init_tracing("info,server=info,services=info,db=info");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = DBService::new(&database_url)
        .await
        .with_context(|| format!("failed to open database at {database_url}"))?;

    let config = WorkOrderServiceConfig::from_env();
    info!(
        validity_window = ?config.validity_window,
        sentinel_fallback = config.sentinel_fallback,
        coalesce_in_flight = config.coalesce_in_flight,
        "Work order service configured"
    );
    let state = AppState::new(db.clone(), WorkOrderService::new(db, config));

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("BACKEND_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|p| p.trim().parse::<u16>().ok())
        .unwrap_or(3001);

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
    }
    info!("Shutting down");
}
