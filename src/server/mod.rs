//! HTTP server for the CryptoGuard dashboard.
//!
//! Serves the single-page dashboard and a small JSON API over the loaded
//! artifact bundle:
//! - Panel descriptor endpoint the page builds its sliders from
//! - Scan endpoint running the assemble-and-score pipeline
//! - Health and stats endpoints
//!
//! When the artifacts fail to load the server still comes up, surfaces the
//! failure message on every endpoint and refuses scans; restarting after the
//! training export is re-run is the only recovery. Structured logging via
//! [`tracing`].

pub mod handlers;
pub mod logging;
pub mod types;

// Re-export commonly used items
pub use handlers::MAX_BODY_BYTES;
pub use logging::UsageMetrics;
pub use types::{
    EndpointStats, HealthResponse, PanelDescriptor, PanelResponse, RequestStats, ScanRequest,
    ScanResponse, ServerConfig, StatsResponse, VerdictStats, DEFAULT_ARTIFACTS_DIR,
};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use eyre::Result;
use tracing::{info, warn};

use crate::artifacts::{self, ArtifactBundle};

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

pub struct ServerState {
    pub config: ServerConfig,
    /// Loaded bundle, or the load failure message shown on every surface.
    pub artifacts: Result<Arc<ArtifactBundle>, String>,
    pub start_time: Instant,
    pub usage: UsageMetrics,
}

impl ServerState {
    /// Assemble state around an already-resolved artifact load.
    pub fn build(config: ServerConfig, artifacts: Result<Arc<ArtifactBundle>, String>) -> Self {
        Self {
            config,
            artifacts,
            start_time: Instant::now(),
            usage: UsageMetrics::new(),
        }
    }

    /// Load the artifacts from the configured directory (uncached) and build
    /// state around the outcome.
    pub fn new(config: ServerConfig) -> Self {
        let artifacts = ArtifactBundle::load_from(&config.artifacts_dir)
            .map(Arc::new)
            .map_err(|e| format!("{e:#}"));
        Self::build(config, artifacts)
    }
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Run the HTTP server (blocking)
pub async fn run_server(config: ServerConfig) -> Result<()> {
    use axum::{
        extract::DefaultBodyLimit,
        routing::{get, post},
        Router,
    };
    use tower_http::cors::{Any, CorsLayer};

    let bind_addr = config.bind_addr;
    let artifacts = artifacts::load(&config.artifacts_dir);
    let state = Arc::new(ServerState::build(config, artifacts));

    // Allow any origin so the dashboard API can be exercised from browsers
    // and curl alike
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(crate::ui::index_handler))
        .route("/health", get(handlers::health_handler))
        .route("/stats", get(handlers::stats_handler))
        .route("/api/v1/panel", get(handlers::panel_handler))
        .route("/api/v1/scan", post(handlers::scan_handler))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(bind = %bind_addr, "CryptoGuard dashboard listening");
    info!("Endpoints: GET / (dashboard), GET /health, GET /stats, GET /api/v1/panel, POST /api/v1/scan");
    match &state.artifacts {
        Ok(bundle) => info!(
            model_id = %bundle.model.model_id,
            model_hash = %bundle.model_hash,
            features = bundle.feature_columns.len(),
            top_features = bundle.top_features.len(),
            "artifact bundle ready"
        ),
        Err(e) => warn!(error = %e, "artifact bundle unavailable, scans disabled until restart"),
    }

    // Graceful shutdown on SIGTERM/SIGINT
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        #[cfg(unix)]
        let sigterm_recv = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_recv = std::future::pending::<Option<()>>();

        tokio::select! {
            _ = ctrl_c => info!("received SIGINT, shutting down gracefully"),
            _ = sigterm_recv => info!("received SIGTERM, shutting down gracefully"),
        }
    })
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            model_hash: "sha256:abc".to_string(),
            uptime_seconds: 100,
            artifacts_loaded: true,
            feature_count: 166,
            top_feature_count: 10,
            artifacts_error: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"artifacts_loaded\":true"));
        assert!(!json.contains("artifacts_error"));
    }

    #[test]
    fn test_stats_response_serialization() {
        let response = StatsResponse {
            uptime_seconds: 3600,
            model_hash: "sha256:abc".to_string(),
            requests: RequestStats {
                total: 100,
                errors: 2,
            },
            verdicts: VerdictStats {
                licit: 80,
                illicit: 18,
            },
            endpoints: EndpointStats {
                panel: 5,
                scan: 98,
                stats: 3,
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"total\":100"));
        assert!(json.contains("\"illicit\":18"));
    }

    #[test]
    fn test_scan_request_full_deserialization() {
        let json = r#"{"attack_mode": true, "slider_values": {"f1": -5.0, "f3": 50.0}}"#;
        let req: ScanRequest = serde_json::from_str(json).unwrap();
        assert!(req.attack_mode);
        assert_eq!(req.slider_values.len(), 2);
        assert_eq!(req.slider_values["f3"], 50.0);
    }

    #[test]
    fn test_scan_request_minimal() {
        let req: ScanRequest = serde_json::from_str("{}").unwrap();
        assert!(!req.attack_mode);
        assert!(req.slider_values.is_empty());
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.artifacts_dir, std::path::PathBuf::from("."));
    }

    #[test]
    fn test_degraded_state_exposes_load_error() {
        let state = ServerState::build(
            ServerConfig::default(),
            Err("missing artifact file(s)".to_string()),
        );
        assert!(state.artifacts.is_err());
    }
}
