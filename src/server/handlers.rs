//! HTTP endpoint handler functions.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::panel;

use super::types::*;
use super::ServerState;

/// Maximum request body size in bytes (64 KB). Scan payloads are a handful
/// of slider values.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn health_handler(
    axum::extract::State(state): axum::extract::State<Arc<ServerState>>,
) -> impl axum::response::IntoResponse {
    let response = match &state.artifacts {
        Ok(bundle) => HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_hash: bundle.model_hash.clone(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            artifacts_loaded: true,
            feature_count: bundle.feature_columns.len(),
            top_feature_count: bundle.top_features.len(),
            artifacts_error: None,
        },
        Err(e) => HealthResponse {
            status: "degraded".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_hash: "unavailable".to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            artifacts_loaded: false,
            feature_count: 0,
            top_feature_count: 0,
            artifacts_error: Some(e.clone()),
        },
    };
    axum::Json(response)
}

pub async fn panel_handler(
    axum::extract::State(state): axum::extract::State<Arc<ServerState>>,
) -> impl axum::response::IntoResponse {
    state.usage.ep_panel.fetch_add(1, Ordering::Relaxed);

    let response = match &state.artifacts {
        Ok(bundle) => PanelResponse {
            success: true,
            error: None,
            panel: Some(PanelDescriptor {
                controls: panel::controls_for(&bundle.top_features),
                safe_default: panel::background_value(false),
                attack_default: panel::background_value(true),
                feature_count: bundle.feature_columns.len(),
                top_feature_count: bundle.top_features.len(),
                model_id: bundle.model.model_id.clone(),
                model_version: bundle.model.model_version.clone(),
                model_hash: bundle.model_hash.clone(),
            }),
        },
        Err(e) => PanelResponse {
            success: false,
            error: Some(e.clone()),
            panel: None,
        },
    };
    axum::Json(response)
}

pub async fn scan_handler(
    axum::extract::State(state): axum::extract::State<Arc<ServerState>>,
    request: axum::extract::Request,
) -> impl axum::response::IntoResponse {
    let start = Instant::now();

    let body = request.into_body();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            return axum::Json(ScanResponse {
                success: false,
                error: Some(format!("Failed to read request body: {}", e)),
                verdict: None,
                processing_time_ms: start.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now().to_rfc3339(),
            });
        }
    };
    let scan_request: ScanRequest = match serde_json::from_slice(&bytes) {
        Ok(r) => r,
        Err(e) => {
            return axum::Json(ScanResponse {
                success: false,
                error: Some(format!("Invalid JSON: {}", e)),
                verdict: None,
                processing_time_ms: start.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now().to_rfc3339(),
            });
        }
    };

    state.usage.ep_scan.fetch_add(1, Ordering::Relaxed);

    let bundle = match &state.artifacts {
        Ok(b) => b,
        Err(e) => {
            state.usage.record_error();
            return axum::Json(ScanResponse {
                success: false,
                error: Some(format!("Scanning disabled: {}", e)),
                verdict: None,
                processing_time_ms: start.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now().to_rfc3339(),
            });
        }
    };

    // The panel clamps sliders to their range; a raw API caller can skip
    // that, so the bounds are enforced again here.
    if let Err(e) = panel::validate_slider_values(&scan_request.slider_values) {
        state.usage.record_error();
        return axum::Json(ScanResponse {
            success: false,
            error: Some(e.to_string()),
            verdict: None,
            processing_time_ms: start.elapsed().as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    let verdict = match crate::run_scan(
        bundle,
        scan_request.attack_mode,
        &scan_request.slider_values,
    ) {
        Ok(v) => v,
        Err(e) => {
            state.usage.record_error();
            return axum::Json(ScanResponse {
                success: false,
                error: Some(format!("Scan failed: {}", e)),
                verdict: None,
                processing_time_ms: start.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now().to_rfc3339(),
            });
        }
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;
    state
        .usage
        .record_scan(verdict.label, verdict.probability, processing_time_ms);

    axum::Json(ScanResponse {
        success: true,
        error: None,
        verdict: Some(verdict),
        processing_time_ms,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn stats_handler(
    axum::extract::State(state): axum::extract::State<Arc<ServerState>>,
) -> impl axum::response::IntoResponse {
    state.usage.ep_stats.fetch_add(1, Ordering::Relaxed);

    let model_hash = match &state.artifacts {
        Ok(bundle) => bundle.model_hash.clone(),
        Err(_) => "unavailable".to_string(),
    };

    let response = StatsResponse {
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model_hash,
        requests: RequestStats {
            total: state.usage.total_requests.load(Ordering::Relaxed),
            errors: state.usage.total_errors.load(Ordering::Relaxed),
        },
        verdicts: VerdictStats {
            licit: state.usage.licit.load(Ordering::Relaxed),
            illicit: state.usage.illicit.load(Ordering::Relaxed),
        },
        endpoints: EndpointStats {
            panel: state.usage.ep_panel.load(Ordering::Relaxed),
            scan: state.usage.ep_scan.load(Ordering::Relaxed),
            stats: state.usage.ep_stats.load(Ordering::Relaxed),
        },
    };
    axum::Json(response)
}
