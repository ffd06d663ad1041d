//! Shared types for the local API layer.

use std::sync::Arc;

use serde::Deserialize;

use crate::core_state::CoreState;
use crate::pipeline::classifier::PredictOptions;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Query string of `POST /api/analyses`. Omitted flags default to on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisQuery {
    pub return_overlay: Option<bool>,
    pub return_image: Option<bool>,
    pub last_conv: Option<String>,
}

impl AnalysisQuery {
    pub fn into_options(self) -> PredictOptions {
        let defaults = PredictOptions::default();
        PredictOptions {
            return_overlay: self.return_overlay.unwrap_or(defaults.return_overlay),
            return_image: self.return_image.unwrap_or(defaults.return_image),
            last_conv: self.last_conv.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Body of `POST /api/chat/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSubmitRequest {
    pub text: String,
}
