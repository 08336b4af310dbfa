//! CryptoGuard AI: transaction forensics dashboard over a pre-trained
//! illicit-activity classifier.
//!
//! Loads three training-export artifacts at startup (classifier parameters,
//! the slider-exposed top features, the full ordered feature schema), drives
//! a control panel from them, and scores one simulated transaction per scan:
//! - **ILLICIT**: flagged, high-alert verdict (label 1)
//! - **LICIT**: cleared, all-clear verdict (label 0)
//!
//! Every scan assembles a full-width feature vector in schema order: the
//! panel background value everywhere, slider values overriding the top
//! features.
//!
//! Uses structured logging via [`tracing`]. Set the `RUST_LOG` environment
//! variable to control log verbosity (e.g., `RUST_LOG=cryptoguard=debug`).

pub mod artifacts;
pub mod assembler;
pub mod model;
pub mod panel;
pub mod server;
pub mod ui;
pub mod verdict;

use std::collections::HashMap;

use eyre::Result;

use crate::artifacts::ArtifactBundle;
use crate::verdict::{ScanLabel, Verdict};

/// Score one simulated transaction against a loaded artifact bundle.
///
/// Runs the whole pipeline: the full feature vector is assembled, scored by
/// the classifier and shaped into renderer-facing verdict data.
pub fn run_scan(
    bundle: &ArtifactBundle,
    attack_mode: bool,
    slider_values: &HashMap<String, f64>,
) -> Result<Verdict> {
    let vector = assembler::assemble(
        attack_mode,
        slider_values,
        &bundle.top_features,
        &bundle.feature_columns,
    )?;
    let prediction = bundle.model.predict(&vector)?;

    tracing::debug!(
        attack_mode,
        vector_len = vector.len(),
        probability = prediction.probability,
        illicit = prediction.illicit,
        "scan scored"
    );

    Ok(Verdict::new(
        ScanLabel::from_illicit(prediction.illicit),
        prediction.probability,
    ))
}
