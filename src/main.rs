//! SOC-in-a-Box Gateway
//!
//! Triage gateway between packet capture agents and the analysis pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SOC GATEWAY                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /check ──► BatchValidator ──► VerdictDispatcher ──► bus│
//! │                                                   (topic)    │
//! │  GET /update ──► VerdictQuery ◄──────────────── verdict store│
//! │                    (timestamp ≥ bound, ids stripped)         │
//! └──────────────────────────────────────────────────────────────┘
//!            bus ──► analysis pipeline ──► verdict store
//! ```

mod bus;
mod config;
mod db;
mod dispatch;
mod error;
mod handlers;
mod models;
mod store;
mod validator;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{GatewayError, GatewayResult};

use bus::{BusProvider, InMemoryBus};
use store::{PgVerdictStore, VerdictStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "soc_gateway=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("SOC Gateway starting...");
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));
    tracing::info!("Bus topic: {} ({})", config.bus_topic, config.bus_routing_key);

    // Initialize verdict store
    let pool = db::create_pool(&config.database_url)
        .await
        .context("failed to create database pool")?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await.context("failed to run migrations")?;

    let store: Arc<dyn VerdictStore> = Arc::new(PgVerdictStore::new(pool));

    // In-process bus; a broker-backed BusProvider slots in here when the
    // analysis pipeline runs out of process.
    let bus: Arc<dyn BusProvider> = Arc::new(InMemoryBus::new());

    // Build application state
    let state = AppState {
        config: config.clone(),
        bus,
        store,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub bus: Arc<dyn BusProvider>,
    pub store: Arc<dyn VerdictStore>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/check", post(handlers::check::check))
        .route("/update", get(handlers::update::update))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
