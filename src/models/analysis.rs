use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DiagnosticLabel, LabelSource};

/// Per-class probabilities. All three classes are always present.
///
/// Values are individually kept in `[0, 1]`; they are not required to sum
/// to one because the classifier does not guarantee it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceMap {
    #[serde(rename = "NORMAL")]
    pub normal: f64,
    #[serde(rename = "BACTERIAL")]
    pub bacterial: f64,
    #[serde(rename = "VIRUS")]
    pub virus: f64,
}

impl ConfidenceMap {
    pub fn get(&self, label: DiagnosticLabel) -> f64 {
        match label {
            DiagnosticLabel::Normal => self.normal,
            DiagnosticLabel::Bacterial => self.bacterial,
            DiagnosticLabel::Virus => self.virus,
        }
    }

    pub fn set(&mut self, label: DiagnosticLabel, value: f64) {
        match label {
            DiagnosticLabel::Normal => self.normal = value,
            DiagnosticLabel::Bacterial => self.bacterial = value,
            DiagnosticLabel::Virus => self.virus = value,
        }
    }

    pub fn max(&self) -> f64 {
        self.normal.max(self.bacterial).max(self.virus)
    }

    /// Class with the highest probability. Ties go to the earlier class in
    /// canonical order.
    pub fn argmax(&self) -> DiagnosticLabel {
        DiagnosticLabel::ALL
            .into_iter()
            .fold(DiagnosticLabel::Normal, |best, label| {
                if self.get(label) > self.get(best) {
                    label
                } else {
                    best
                }
            })
    }

    /// Rounded percentage for one class, as shown on the result bars.
    pub fn percent(&self, label: DiagnosticLabel) -> u32 {
        to_percent(self.get(label))
    }
}

/// Round a `[0, 1]` probability to a whole percentage.
pub fn to_percent(probability: f64) -> u32 {
    (probability.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Something the browser can put in an `<img src>`: a `data:` URL or a
/// remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Inline the raw bytes of an image as a data URL.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime_type};base64,{encoded}"))
    }

    /// Wrap an already base64-encoded JPEG, as sent by the classifier.
    pub fn from_base64_jpeg(encoded: &str) -> Self {
        Self(format!("data:image/jpeg;base64,{}", encoded.trim()))
    }

    pub fn remote(url: &str) -> Self {
        Self(url.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_url(&self) -> bool {
        self.0.starts_with("data:")
    }
}

/// The canonical outcome of one completed upload.
///
/// Produced only by the normalizer and never mutated afterwards; history and
/// the current selection share it through `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub label: DiagnosticLabel,
    pub label_source: LabelSource,
    pub top_confidence: f64,
    pub confidence_per_class: ConfidenceMap,
    pub image: ImageRef,
    pub overlay: Option<ImageRef>,
    /// Captured when the response was normalized, not the server's clock.
    pub timestamp: DateTime<Utc>,
    pub details: String,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    pub fn top_confidence_percent(&self) -> u32 {
        to_percent(self.top_confidence)
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            id: self.id,
            label: self.label,
            caption: self.label.caption().to_string(),
            confidence_percent: self.top_confidence_percent(),
            timestamp: self.timestamp,
        }
    }

    #[cfg(test)]
    pub(crate) fn fixture(label: DiagnosticLabel, top_confidence: f64) -> Self {
        let mut confidence_per_class = ConfidenceMap::default();
        confidence_per_class.set(label, top_confidence);
        Self {
            id: Uuid::new_v4(),
            label,
            label_source: LabelSource::Reported,
            top_confidence,
            confidence_per_class,
            image: ImageRef::from_bytes("image/jpeg", b"fixture"),
            overlay: None,
            timestamp: Utc::now(),
            details: String::from("fixture details"),
            recommendations: vec![String::from("fixture recommendation")],
        }
    }
}

/// One row of the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub id: Uuid,
    pub label: DiagnosticLabel,
    pub caption: String,
    pub confidence_percent: u32,
    pub timestamp: DateTime<Utc>,
}
