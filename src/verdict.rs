//! Scan verdict: everything the result panel renders, computed as data.
//!
//! Exactly one of two mutually exclusive panels appears per scan. The page
//! applies these fields to the DOM and adds nothing of its own, so the
//! display format ("87.30%") and the progress position are testable here
//! without a browser.

use serde::{Deserialize, Serialize};

/// Image shown on the high-alert panel when a transaction is flagged.
pub const ILLICIT_IMAGE_URL: &str = "https://media.giphy.com/media/l2Je3qSgD6Ipa9hQK/giphy.gif";

/// Image shown on the all-clear panel.
pub const LICIT_IMAGE_URL: &str = "https://media.giphy.com/media/3o7btQ8jDTPLAm6Wf6/giphy.gif";

/// Binary scan label: label 1 is illicit, label 0 licit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanLabel {
    Licit,
    Illicit,
}

impl ScanLabel {
    pub fn from_illicit(illicit: bool) -> Self {
        if illicit {
            Self::Illicit
        } else {
            Self::Licit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Licit => "LICIT",
            Self::Illicit => "ILLICIT",
        }
    }

    pub fn is_illicit(&self) -> bool {
        matches!(self, Self::Illicit)
    }
}

/// Renderer-facing result of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub label: ScanLabel,
    /// Illicit-class probability in [0, 1].
    pub probability: f64,
    /// Probability formatted for the metric readout, e.g. "87.30%".
    pub probability_display: String,
    /// Progress bar position: round(probability * 100), in [0, 100].
    pub progress: u8,
    pub headline: &'static str,
    pub image_url: &'static str,
    /// Styling hook for the page: "alert" or "clear".
    pub tone: &'static str,
}

impl Verdict {
    pub fn new(label: ScanLabel, probability: f64) -> Self {
        let (headline, image_url, tone) = match label {
            ScanLabel::Illicit => ("FLAGGED: ILLICIT", ILLICIT_IMAGE_URL, "alert"),
            ScanLabel::Licit => ("CLEARED: LICIT", LICIT_IMAGE_URL, "clear"),
        };

        Self {
            label,
            probability,
            probability_display: format!("{:.2}%", probability * 100.0),
            progress: (probability * 100.0).round().clamp(0.0, 100.0) as u8,
            headline,
            image_url,
            tone,
        }
    }
}
