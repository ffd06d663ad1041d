//! Transport-agnostic application state.
//!
//! `CoreState` owns everything the browser session needs: the classifier
//! collaborator, the session history with its current selection, and the
//! chat conversation. The axum router holds it in an `Arc`. Locks are
//! never held across an `.await`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::chat::{ChatError, ChatSession, ChatSnapshot};
use crate::config::AppConfig;
use crate::models::{AnalysisResult, AnalysisSummary, ChatMessage};
use crate::pipeline::classifier::{
    Classifier, ClassifierError, ClassifierHealth, PredictOptions, UrlPredictRequest,
};
use crate::pipeline::normalize::{normalize, ImageSource};
use crate::pipeline::upload::{validate_image_url, validate_upload, ImageUpload, UploadError};
use crate::session_history::{HistoryError, SessionHistory};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Why an analysis attempt produced no result. History, current selection
/// and chat are untouched in every case.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("Another analysis is already in progress")]
    Busy,
    #[error(transparent)]
    Core(#[from] CoreError),
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    config: AppConfig,
    classifier: Arc<dyn Classifier>,
    history: RwLock<SessionHistory>,
    chat: ChatSession,
    /// Set while a classifier request is in flight.
    analyzing: AtomicBool,
}

impl CoreState {
    pub fn new(config: AppConfig, classifier: Arc<dyn Classifier>) -> Self {
        let history = SessionHistory::new(config.history_capacity);
        let chat = ChatSession::new(config.chat_reply_delay, config.chat_busy_policy, None);
        Self {
            config,
            classifier,
            history: RwLock::new(history),
            chat,
            analyzing: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::SeqCst)
    }

    // ── Analysis ────────────────────────────────────────────

    /// Validate, classify and record an uploaded image.
    pub async fn analyze_upload(
        &self,
        upload: ImageUpload,
        options: &PredictOptions,
    ) -> Result<Arc<AnalysisResult>, AnalysisError> {
        validate_upload(&upload, self.config.max_upload_bytes)?;
        let _guard = self.begin_analysis()?;

        tracing::info!(
            file_name = %upload.file_name,
            mime_type = %upload.mime_type,
            size = upload.bytes.len(),
            "Analyzing uploaded image"
        );

        let response = self
            .classifier
            .predict_file(&upload, options)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Classifier request failed"))?;

        let result = normalize(&response, &ImageSource::Upload(upload.local_ref()));
        Ok(self.record(result)?)
    }

    /// Ask the classifier to fetch and classify an image by URL.
    pub async fn analyze_url(
        &self,
        request: &UrlPredictRequest,
    ) -> Result<Arc<AnalysisResult>, AnalysisError> {
        validate_image_url(&request.url)?;
        let _guard = self.begin_analysis()?;

        tracing::info!(url = %request.url, "Analyzing image by URL");

        let response = self
            .classifier
            .predict_url(request)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Classifier request failed"))?;

        let result = normalize(&response, &ImageSource::Url(request.url.trim().to_string()));
        Ok(self.record(result)?)
    }

    pub async fn classifier_health(&self) -> Result<ClassifierHealth, ClassifierError> {
        self.classifier.health().await
    }

    fn begin_analysis(&self) -> Result<AnalysisGuard<'_>, AnalysisError> {
        self.analyzing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AnalysisError::Busy)?;
        Ok(AnalysisGuard {
            flag: &self.analyzing,
        })
    }

    // ── History ─────────────────────────────────────────────

    /// Prepend a normalized result, make it current and re-seed the chat.
    pub fn record(&self, result: AnalysisResult) -> Result<Arc<AnalysisResult>, CoreError> {
        let recorded = {
            let mut history = self.history.write().map_err(|_| CoreError::LockPoisoned)?;
            history.record(result)
        };
        tracing::info!(
            id = %recorded.id,
            label = %recorded.label,
            confidence = recorded.top_confidence_percent(),
            "Analysis recorded"
        );
        self.chat.reset(Some(recorded.as_ref()))?;
        Ok(recorded)
    }

    /// Make a history entry current. Re-selecting the current entry keeps
    /// the conversation.
    pub fn select(&self, index: usize) -> Result<Arc<AnalysisResult>, CoreError> {
        let (previous, selected) = {
            let mut history = self.history.write().map_err(|_| CoreError::LockPoisoned)?;
            let previous = history.current();
            (previous, history.select(index)?)
        };

        let unchanged = previous.is_some_and(|p| Arc::ptr_eq(&p, &selected));
        if !unchanged {
            tracing::info!(index, id = %selected.id, "History entry selected");
            self.chat.reset(Some(selected.as_ref()))?;
        }
        Ok(selected)
    }

    pub fn current(&self) -> Result<Option<Arc<AnalysisResult>>, CoreError> {
        let history = self.history.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(history.current())
    }

    pub fn summaries(&self) -> Result<Vec<AnalysisSummary>, CoreError> {
        let history = self.history.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(history.summaries())
    }

    // ── Chat ────────────────────────────────────────────────

    /// Submit a chat turn answered against the current result.
    pub fn send_chat_message(&self, text: &str) -> Result<ChatMessage, CoreError> {
        let current = self.current()?;
        Ok(self.chat.submit(text, current)?)
    }

    pub fn chat_snapshot(&self) -> Result<ChatSnapshot, CoreError> {
        Ok(self.chat.snapshot()?)
    }
}

/// Clears the in-flight flag when the attempt ends, however it ends.
struct AnalysisGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
