pub mod client;
pub mod mock;
pub mod types;

pub use client::*;
pub use mock::*;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::pipeline::upload::ImageUpload;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier is not reachable at {0}")]
    Connection(String),

    #[error("Classifier request timed out after {0}s")]
    Timeout(u64),

    #[error("Classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed classifier response: {0}")]
    MalformedBody(String),

    #[error("HTTP client error: {0}")]
    Transport(String),
}

impl ClassifierError {
    /// Text shown to the user for a failed attempt. For HTTP failures this is
    /// the classifier's own response body.
    pub fn detail(&self) -> String {
        match self {
            Self::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// The remote chest X-ray classifier.
///
/// Implementations only return a `ClassifierResponse` for a 2xx reply whose
/// body is a JSON object; everything else is an error.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// `POST /predict/file` with the image as multipart field `file`.
    async fn predict_file(
        &self,
        upload: &ImageUpload,
        options: &PredictOptions,
    ) -> Result<ClassifierResponse, ClassifierError>;

    /// `POST /predict/url`: the classifier downloads the image itself.
    async fn predict_url(
        &self,
        request: &UrlPredictRequest,
    ) -> Result<ClassifierResponse, ClassifierError>;

    /// `GET /` model status.
    async fn health(&self) -> Result<ClassifierHealth, ClassifierError>;
}
