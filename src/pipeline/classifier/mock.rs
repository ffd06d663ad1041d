use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{ClassifierHealth, ClassifierResponse, PredictOptions, UrlPredictRequest};
use super::{Classifier, ClassifierError};
use crate::pipeline::upload::ImageUpload;

/// Mock classifier for testing: returns a configurable payload.
pub struct MockClassifier {
    outcome: Result<Value, (u16, String)>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new(payload: Value) -> Self {
        Self {
            outcome: Ok(payload),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every request fails with this HTTP status and body.
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            outcome: Err((status, body.to_string())),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Hold every request for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(&self) -> Result<ClassifierResponse, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            Ok(payload) => ClassifierResponse::from_value(payload.clone()),
            Err((status, body)) => Err(ClassifierError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn predict_file(
        &self,
        _upload: &ImageUpload,
        _options: &PredictOptions,
    ) -> Result<ClassifierResponse, ClassifierError> {
        self.answer().await
    }

    async fn predict_url(
        &self,
        _request: &UrlPredictRequest,
    ) -> Result<ClassifierResponse, ClassifierError> {
        self.answer().await
    }

    async fn health(&self) -> Result<ClassifierHealth, ClassifierError> {
        match &self.outcome {
            Ok(_) => Ok(ClassifierHealth {
                status: "ok".into(),
                ..ClassifierHealth::default()
            }),
            Err((status, body)) => Err(ClassifierError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
