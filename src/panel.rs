//! Control panel: operator-facing controls and their mode-driven defaults.
//!
//! The panel is one toggle ("SIMULATE MASSIVE ATTACK") plus one slider per
//! top feature. The page builds the widgets from these descriptors and the
//! widgets themselves clamp input to the slider bounds. Slider values that
//! arrive from anywhere else go through [`validate_slider_values`] first.

use std::collections::HashMap;

use eyre::{bail, Result};
use serde::Serialize;

/// Lower bound for every top-feature slider.
pub const SLIDER_MIN: f64 = -5.0;

/// Upper bound for every top-feature slider.
pub const SLIDER_MAX: f64 = 50.0;

/// Drag granularity served to the page. Values stay continuous floats; the
/// step only affects how the range input moves.
pub const SLIDER_STEP: f64 = 0.1;

/// Background value when attack simulation is on: saturates every hidden
/// feature well above baseline so the classifier sees coordinated stress.
pub const ATTACK_BACKGROUND: f64 = 10.0;

/// Background value when attack simulation is off: quiet baseline activity.
pub const SAFE_BACKGROUND: f64 = -1.0;

/// Background value for the given mode.
///
/// Doubles as the default for every slider at render time, so flipping the
/// toggle visibly moves the whole panel. Recomputed from the current mode on
/// each render; nothing is stored.
pub fn background_value(attack_mode: bool) -> f64 {
    if attack_mode {
        ATTACK_BACKGROUND
    } else {
        SAFE_BACKGROUND
    }
}

/// One slider descriptor. The page renders it as a bounded range input
/// labelled "Feature {name}".
#[derive(Debug, Clone, Serialize)]
pub struct PanelControl {
    /// Feature name, exactly as it appears in the schema.
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Check every supplied slider value against the slider bounds.
///
/// The page's range inputs clamp by construction; values arriving from any
/// other surface (a raw scan request, a values file) are checked here
/// before they reach the assembler.
pub fn validate_slider_values(slider_values: &HashMap<String, f64>) -> Result<()> {
    for (name, value) in slider_values {
        if !(SLIDER_MIN..=SLIDER_MAX).contains(value) {
            bail!("Slider value {value} for '{name}' is outside [{SLIDER_MIN}, {SLIDER_MAX}]");
        }
    }
    Ok(())
}

/// Build slider descriptors for each top feature, in top-feature order.
pub fn controls_for(top_features: &[String]) -> Vec<PanelControl> {
    top_features
        .iter()
        .map(|name| PanelControl {
            name: name.clone(),
            min: SLIDER_MIN,
            max: SLIDER_MAX,
            step: SLIDER_STEP,
        })
        .collect()
}
