//! Artifact loading: the classifier and its feature lists, all or nothing.
//!
//! Three JSON files produced by the training export live in the artifacts
//! directory (the working directory by default):
//! - `fraud_model.json`: serialized classifier parameters
//! - `top_features.json`: ordered names of the slider-exposed features
//! - `feature_columns.json`: the full ordered feature schema
//!
//! A missing or inconsistent file fails the whole load with one message
//! naming everything wrong plus the regenerate instruction; no partial
//! bundle ever escapes. `load` memoizes the first outcome for the process
//! lifetime. There is no invalidation path, restart is the only refresh.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use eyre::{bail, Result, WrapErr};
use tracing::info;

use crate::model::FraudModel;

/// Classifier artifact file name.
pub const MODEL_FILE: &str = "fraud_model.json";

/// Top-feature list artifact file name.
pub const TOP_FEATURES_FILE: &str = "top_features.json";

/// Full feature schema artifact file name.
pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";

/// Operator guidance appended to every load failure.
pub const REGENERATE_HINT: &str = "re-run the training export to regenerate \
     fraud_model.json, top_features.json and feature_columns.json, then \
     restart the dashboard";

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// The three artifacts, loaded and cross-validated.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub model: FraudModel,
    /// Slider-exposed feature names, in display order. Each is a schema column.
    pub top_features: Vec<String>,
    /// The full feature schema: every column the classifier expects, in
    /// training-time order.
    pub feature_columns: Vec<String>,
    /// SHA-256 content hash of the classifier parameters.
    pub model_hash: String,
}

impl ArtifactBundle {
    /// Load and validate the bundle from `dir`. Uncached; see [`load`] for
    /// the process-lifetime singleton.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let missing: Vec<&str> = [MODEL_FILE, TOP_FEATURES_FILE, FEATURE_COLUMNS_FILE]
            .into_iter()
            .filter(|name| !dir.join(name).exists())
            .collect();
        if !missing.is_empty() {
            bail!(
                "missing artifact file(s) in {}: {}; {}",
                dir.display(),
                missing.join(", "),
                REGENERATE_HINT
            );
        }

        let model_text = fs::read_to_string(dir.join(MODEL_FILE))
            .wrap_err_with(|| format!("reading {MODEL_FILE}"))?;
        let model =
            FraudModel::from_json(&model_text).wrap_err_with(|| format!("parsing {MODEL_FILE}"))?;

        let top_text = fs::read_to_string(dir.join(TOP_FEATURES_FILE))
            .wrap_err_with(|| format!("reading {TOP_FEATURES_FILE}"))?;
        let top_features: Vec<String> = serde_json::from_str(&top_text)
            .wrap_err_with(|| format!("parsing {TOP_FEATURES_FILE}"))?;

        let schema_text = fs::read_to_string(dir.join(FEATURE_COLUMNS_FILE))
            .wrap_err_with(|| format!("reading {FEATURE_COLUMNS_FILE}"))?;
        let feature_columns: Vec<String> = serde_json::from_str(&schema_text)
            .wrap_err_with(|| format!("parsing {FEATURE_COLUMNS_FILE}"))?;

        validate_feature_lists(&top_features, &feature_columns)?;
        model
            .validate(&feature_columns)
            .wrap_err_with(|| format!("validating {MODEL_FILE}"))?;

        let model_hash = model.content_hash();
        info!(
            dir = %dir.display(),
            model_id = %model.model_id,
            model_version = %model.model_version,
            features = feature_columns.len(),
            top_features = top_features.len(),
            "artifact bundle loaded"
        );

        Ok(Self {
            model,
            top_features,
            feature_columns,
            model_hash,
        })
    }
}

/// Uphold the invariants of the two feature lists. Both must be
/// duplicate-free and the schema must be non-empty. Every top feature must
/// name a schema column.
fn validate_feature_lists(top_features: &[String], feature_columns: &[String]) -> Result<()> {
    if feature_columns.is_empty() {
        bail!("{FEATURE_COLUMNS_FILE} lists no feature columns; {REGENERATE_HINT}");
    }

    let mut seen = HashSet::new();
    for name in feature_columns {
        if !seen.insert(name.as_str()) {
            bail!("duplicate column `{name}` in {FEATURE_COLUMNS_FILE}");
        }
    }

    let mut seen_top = HashSet::new();
    for name in top_features {
        if !seen_top.insert(name.as_str()) {
            bail!("duplicate feature `{name}` in {TOP_FEATURES_FILE}");
        }
        if !seen.contains(name.as_str()) {
            bail!(
                "top feature `{name}` is not a column of {FEATURE_COLUMNS_FILE}; \
                 the two exports are out of sync, {REGENERATE_HINT}"
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Process-lifetime cache
// ---------------------------------------------------------------------------

static CACHE: OnceLock<Result<Arc<ArtifactBundle>, String>> = OnceLock::new();

/// Load the artifact bundle once per process.
///
/// The first call fixes the directory and the outcome, success or failure
/// alike; every later call returns the cached result for free. Failures are
/// flattened to their display string so they stay cloneable.
pub fn load(dir: &Path) -> Result<Arc<ArtifactBundle>, String> {
    CACHE
        .get_or_init(|| {
            ArtifactBundle::load_from(dir)
                .map(Arc::new)
                .map_err(|e| format!("{e:#}"))
        })
        .clone()
}
