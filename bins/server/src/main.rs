//! VetBill API server.
//!
//! Entry point for the billing backend: loads the layered configuration,
//! opens the database pool, and serves the Axum router.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vetbill_api::{AppState, create_router};
use vetbill_db::connect;
use vetbill_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vetbill=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    let app = create_router(AppState { db: Arc::new(db) });

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
