//! Illicit-transaction classifier: logistic model over the full feature schema.
//!
//! The training pipeline exports the fitted model as JSON: one weight per
//! schema column (in schema order), an intercept, and a decision threshold.
//! Two query operations, both read-only and deterministic:
//! - `predict_proba`: sigmoid(w · x + b), the probability of the illicit
//!   class (label 1)
//! - `predict`: thresholds that probability into a binary label
//!
//! The classifier is order-sensitive and column-name-blind at call time: it
//! trusts that the input vector is in training-time column order. Shape is
//! the only thing checked per call; anything else is the caller's contract.

use eyre::{bail, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version prefix for model hashes. Bump when the artifact format changes.
const MODEL_HASH_VERSION: &str = "v1";

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

/// Serialized classifier parameters, loaded from `fraud_model.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudModel {
    /// Human-readable model identifier (e.g. "cryptoguard-elliptic").
    pub model_id: String,
    /// Version of the model export.
    pub model_version: String,
    /// Weight vector, one entry per schema column, in schema order.
    pub weights: Vec<f64>,
    /// Bias (intercept) term.
    pub bias: f64,
    /// Decision threshold: probability >= threshold -> label 1 (illicit).
    pub threshold: f64,
    /// Training-time column names. Optional in the artifact; when present,
    /// must match the loaded feature schema exactly (order included).
    #[serde(default)]
    pub feature_names: Vec<String>,
}

/// Result of one classifier query.
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    /// True when the illicit-class probability reached the threshold (label 1).
    pub illicit: bool,
    /// Illicit-class probability in [0, 1].
    pub probability: f64,
}

impl FraudModel {
    /// Parse a model from its JSON artifact text.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        Ok(model)
    }

    /// Check the model is structurally sound against the loaded schema.
    ///
    /// Called once at artifact-load time; per-call inference only re-checks
    /// vector shape.
    pub fn validate(&self, schema: &[String]) -> Result<()> {
        if self.weights.len() != schema.len() {
            bail!(
                "classifier has {} weights but the feature schema lists {} columns",
                self.weights.len(),
                schema.len()
            );
        }
        if !(0.0..=1.0).contains(&self.threshold) || !self.threshold.is_finite() {
            bail!("classifier threshold {} not in [0, 1]", self.threshold);
        }
        if let Some((i, w)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite())
        {
            bail!("non-finite classifier weight at index {}: {}", i, w);
        }
        if !self.bias.is_finite() {
            bail!("non-finite classifier bias: {}", self.bias);
        }
        if !self.feature_names.is_empty() && self.feature_names != schema {
            bail!(
                "classifier feature names disagree with the feature schema \
                 (training-time column order must match the schema exactly)"
            );
        }
        Ok(())
    }

    /// Illicit-class probability for one feature vector in schema order.
    ///
    /// The only guarded failure is a shape mismatch; it is returned, never
    /// swallowed, so a bad vector fails that scan loudly.
    pub fn predict_proba(&self, vector: &[f64]) -> Result<f64> {
        if vector.len() != self.weights.len() {
            bail!(
                "feature vector has {} values, classifier expects {}",
                vector.len(),
                self.weights.len()
            );
        }
        Ok(sigmoid(dot(&self.weights, vector) + self.bias))
    }

    /// Binary label plus illicit-class probability for one feature vector.
    pub fn predict(&self, vector: &[f64]) -> Result<Prediction> {
        let probability = self.predict_proba(vector)?;
        Ok(Prediction {
            illicit: probability >= self.threshold,
            probability,
        })
    }

    /// SHA-256 content hash of the model parameters.
    pub fn content_hash(&self) -> String {
        let serialized =
            serde_json::to_vec(self).unwrap_or_else(|_| format!("{:?}", self).into_bytes());
        let mut hasher = Sha256::new();
        hasher.update(MODEL_HASH_VERSION.as_bytes());
        hasher.update(&serialized);
        let hash = hasher.finalize();
        format!("sha256:{}", hex::encode(hash))
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(ai, bi)| ai * bi).sum()
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    }
}
