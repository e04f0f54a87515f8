//! # HTTP API
//!
//! One aggregate endpoint per dashboard page, the console command endpoint,
//! settings, health and metrics.
//!
//! ## Endpoints
//!
//! - `GET /api/dashboard`, `/api/arr`, `/api/arr/full`, `/api/jellyfin`,
//!   `/api/jellyfin/power`, `/api/minecraft/status`, `/api/nas`,
//!   `/api/network` - page view models
//! - `POST /api/minecraft/command` (also `POST /api/minecraft`) - forward a
//!   console command
//! - `GET /api/settings`, `PUT /api/settings` - user preferences
//! - `GET /health` - process liveness
//! - `GET /metrics` - Prometheus exposition
//!
//! ## Example
//!
//! ```no_run
//! use homelab::api::{create_router, AppState};
//! use homelab::config::HubConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(HubConfig::default());
//! let state = Arc::new(AppState::from_config(config)?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Failures
//!
//! A page whose Critical target fails answers 500 with that page's fixed
//! `{ "error": "..." }` body. Optional failures only show up as defaulted
//! fields in a 200 response.

mod console;
mod error;
mod health;
pub mod pages;
mod settings;


pub use console::CommandRequest;
pub use error::ApiError;
pub use health::HealthResponse;
pub use pages::POLL_INTERVAL_HEADER;
pub use settings::SettingsResponse;

use crate::aggregate::Aggregator;
use crate::catalog::TargetCatalog;
use crate::config::HubConfig;
use crate::logging::request_context;
use crate::metrics::MetricsCollector;
use crate::pages::Page;
use crate::settings::{JsonFileStore, MemoryStore, SettingsService, SettingsStore};
use crate::telemetry::SysinfoProbe;
use crate::upstream::{Upstream, UpstreamClient};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<HubConfig>,
    pub catalog: TargetCatalog,
    pub upstream: Arc<dyn Upstream>,
    pub aggregator: Aggregator,
    pub settings: Arc<SettingsService>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub metrics: MetricsCollector,
}

impl AppState {
    /// Assemble state around an explicit upstream and settings service.
    pub fn new(
        config: Arc<HubConfig>,
        upstream: Arc<dyn Upstream>,
        settings: SettingsService,
    ) -> Self {
        let start_time = Instant::now();

        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Metrics recorder unavailable, using a detached handle");
            PrometheusBuilder::new().build_recorder().handle()
        });

        Self {
            catalog: TargetCatalog::from_config(&config),
            aggregator: Aggregator::new(Arc::clone(&upstream)),
            upstream,
            config,
            settings: Arc::new(settings),
            start_time,
            metrics: MetricsCollector::new(start_time, prometheus_handle),
        }
    }

    /// Production state: HTTP/RCON client, local host probe, and the
    /// configured settings store.
    pub fn from_config(config: Arc<HubConfig>) -> Result<Self, reqwest::Error> {
        let client = UpstreamClient::new(
            config.services.minecraft.clone(),
            Arc::new(SysinfoProbe::new()),
        )?;
        let settings = SettingsService::load(settings_store(&config));
        Ok(Self::new(config, Arc::new(client), settings))
    }
}

/// The store named by `[settings] path`, or memory when unset.
pub fn settings_store(config: &HubConfig) -> Box<dyn SettingsStore> {
    match &config.settings.path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Persisting settings to file");
            Box::new(JsonFileStore::new(path))
        }
        None => {
            tracing::info!("No settings path configured, settings are kept in memory");
            Box::new(MemoryStore::new())
        }
    }
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Page::ALL
        .into_iter()
        .fold(Router::new(), |router, page| {
            router.route(page.route(), pages::route(page))
        });

    router
        .route("/api/minecraft/command", post(console::execute))
        .route("/api/minecraft", post(console::execute))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_context))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
