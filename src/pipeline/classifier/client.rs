use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::types::{ClassifierHealth, ClassifierResponse, PredictOptions, UrlPredictRequest};
use super::{Classifier, ClassifierError};
use crate::pipeline::upload::ImageUpload;

/// Multipart field name the classifier reads the image from.
pub const UPLOAD_FIELD: &str = "file";

/// HTTP client for the remote classifier service.
pub struct HttpClassifier {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send_error(&self, e: reqwest::Error) -> ClassifierError {
        if e.is_connect() {
            ClassifierError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ClassifierError::Timeout(self.timeout_secs)
        } else {
            ClassifierError::Transport(e.to_string())
        }
    }

    /// Turn a reply into its body text, failing on non-2xx statuses.
    async fn success_body(&self, response: reqwest::Response) -> Result<String, ClassifierError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body
            };
            tracing::warn!(status = status.as_u16(), "Classifier rejected the request");
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(|e| self.send_error(e))
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn predict_file(
        &self,
        upload: &ImageUpload,
        options: &PredictOptions,
    ) -> Result<ClassifierResponse, ClassifierError> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::debug!(
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "Sending image to classifier"
        );

        let response = self
            .client
            .post(self.endpoint("/predict/file"))
            .query(&options.query_pairs())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let body = self.success_body(response).await?;
        ClassifierResponse::from_json(&body)
    }

    async fn predict_url(
        &self,
        request: &UrlPredictRequest,
    ) -> Result<ClassifierResponse, ClassifierError> {
        let response = self
            .client
            .post(self.endpoint("/predict/url"))
            .json(request)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let body = self.success_body(response).await?;
        ClassifierResponse::from_json(&body)
    }

    async fn health(&self) -> Result<ClassifierHealth, ClassifierError> {
        let response = self
            .client
            .get(self.endpoint("/"))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let body = self.success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ClassifierError::MalformedBody(e.to_string()))
    }
}
