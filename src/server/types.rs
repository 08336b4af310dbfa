//! Request/response types and configuration for the CryptoGuard server.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::panel::PanelControl;
use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default artifacts directory: the working directory, where the training
/// export drops its files.
pub const DEFAULT_ARTIFACTS_DIR: &str = ".";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (defaults to 127.0.0.1:8080; use 0.0.0.0 to expose externally)
    pub bind_addr: SocketAddr,
    /// Directory holding fraud_model.json, top_features.json and
    /// feature_columns.json.
    pub artifacts_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080"
                .parse()
                .expect("valid default bind address"),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request for a transaction scan.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Attack-simulation toggle; decides the background value for every
    /// feature without a slider.
    #[serde(default)]
    pub attack_mode: bool,
    /// One value per top feature, keyed by feature name.
    #[serde(default)]
    pub slider_values: HashMap<String, f64>,
}

/// Unified response for the scan endpoint.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    pub processing_time_ms: u64,
    /// RFC 3339 scan timestamp.
    pub timestamp: String,
}

/// Everything the page needs to build the control panel.
#[derive(Debug, Serialize)]
pub struct PanelDescriptor {
    /// One slider descriptor per top feature, in display order.
    pub controls: Vec<PanelControl>,
    /// Slider default when the attack toggle is off.
    pub safe_default: f64,
    /// Slider default when the attack toggle is on.
    pub attack_default: f64,
    pub feature_count: usize,
    pub top_feature_count: usize,
    pub model_id: String,
    pub model_version: String,
    pub model_hash: String,
}

/// Response from the panel descriptor endpoint.
#[derive(Debug, Serialize)]
pub struct PanelResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<PanelDescriptor>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_hash: String,
    pub uptime_seconds: u64,
    pub artifacts_loaded: bool,
    pub feature_count: usize,
    pub top_feature_count: usize,
    /// Load failure message when the server came up degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts_error: Option<String>,
}

/// Stats response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    pub model_hash: String,
    pub requests: RequestStats,
    pub verdicts: VerdictStats,
    pub endpoints: EndpointStats,
}

#[derive(Debug, Serialize)]
pub struct RequestStats {
    pub total: u64,
    pub errors: u64,
}

#[derive(Debug, Serialize)]
pub struct VerdictStats {
    pub licit: u64,
    pub illicit: u64,
}

#[derive(Debug, Serialize)]
pub struct EndpointStats {
    pub panel: u64,
    pub scan: u64,
    pub stats: u64,
}
