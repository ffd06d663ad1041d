use chrono::Utc;
use uuid::Uuid;

use super::advice::resolve_advice;
use super::confidence::resolve_confidence;
use super::image::{resolve_images, ImageSource};
use super::label::{canonicalize_label, raw_label};
use crate::models::{AnalysisResult, LabelSource};
use crate::pipeline::classifier::ClassifierResponse;

/// Convert a successful classifier payload into an `AnalysisResult`.
///
/// Never fails: every missing or malformed field has a defined fallback.
/// An unrecognized label is replaced by the most probable class and marked
/// `LabelSource::Inferred`.
pub fn normalize(response: &ClassifierResponse, source: &ImageSource) -> AnalysisResult {
    let confidence = resolve_confidence(response);

    let raw = raw_label(response);
    let (label, label_source) = match canonicalize_label(&raw) {
        Some(label) => (label, LabelSource::Reported),
        None => {
            let inferred = confidence.per_class.argmax();
            tracing::warn!(
                raw_label = %raw,
                inferred = %inferred,
                "Unrecognized classifier label, inferring from probabilities"
            );
            (inferred, LabelSource::Inferred)
        }
    };

    let advice = resolve_advice(label, response);
    let images = resolve_images(source, response);

    let result = AnalysisResult {
        id: Uuid::new_v4(),
        label,
        label_source,
        top_confidence: confidence.top,
        confidence_per_class: confidence.per_class,
        image: images.image,
        overlay: images.overlay,
        timestamp: Utc::now(),
        details: advice.details,
        recommendations: advice.recommendations,
    };

    tracing::debug!(
        id = %result.id,
        label = %result.label,
        top_confidence = result.top_confidence,
        has_overlay = result.overlay.is_some(),
        "Normalized classifier response"
    );

    result
}
