//! Classifier payload → `AnalysisResult`.
//!
//! This is the only place that interprets the classifier's loosely-shaped
//! JSON. Everything downstream works with the closed domain model.

pub mod advice;
pub mod confidence;
pub mod image;
pub mod label;
pub mod orchestrator;

pub use advice::{fallback_details, fallback_recommendations, resolve_advice, AdvisoryContent};
pub use confidence::{resolve_confidence, ResolvedConfidence};
pub use image::{resolve_images, ImageSource, ResolvedImages};
pub use label::canonicalize_label;
pub use orchestrator::normalize;
