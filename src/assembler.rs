//! Feature vector assembly: sparse slider values over a constant background.
//!
//! The classifier expects a value for every schema column, in training-time
//! order. The panel only collects the top features, so the assembler fills
//! every other column with the mode's background value and emits the merged
//! result in strict schema order. That ordering is the one invariant that
//! matters here: the classifier is column-name-blind, so any deviation
//! silently corrupts inference instead of failing.
//!
//! This is a pure data merge with no scaling and no feature engineering.
//! Range checks live at the scan endpoint, not here.

use std::collections::HashMap;

use eyre::{eyre, Result};

use crate::panel::background_value;

/// Build the full feature vector for one scan.
///
/// Every schema column starts at the background value for `attack_mode`;
/// top-feature columns are then overwritten with their slider values. The
/// result comes out in exact `schema` order. The panel contractually
/// supplies a slider value for every top feature, so a missing entry is a
/// contract violation that fails the scan rather than defaulting.
pub fn assemble(
    attack_mode: bool,
    slider_values: &HashMap<String, f64>,
    top_features: &[String],
    schema: &[String],
) -> Result<Vec<f64>> {
    let background = background_value(attack_mode);

    let mut merged: HashMap<&str, f64> = schema
        .iter()
        .map(|name| (name.as_str(), background))
        .collect();

    for name in top_features {
        let value = slider_values
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("no slider value supplied for top feature `{name}`"))?;
        merged.insert(name.as_str(), value);
    }

    Ok(schema
        .iter()
        .map(|name| {
            merged
                .get(name.as_str())
                .copied()
                .expect("every schema column was initialized from the background")
        })
        .collect())
}
