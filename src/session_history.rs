//! In-memory history of the analyses made in this session.
//!
//! Newest first. Nothing is persisted: restarting the process clears it.
//! Entries are shared with the current selection through `Arc`, so
//! selecting an entry returns the stored result itself, not a copy.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::{AnalysisResult, AnalysisSummary};

/// Default number of retained analyses.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History index {index} out of range (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

// ═══════════════════════════════════════════════════════════
// SessionHistory
// ═══════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SessionHistory {
    entries: VecDeque<Arc<AnalysisResult>>,
    current: Option<Arc<AnalysisResult>>,
    /// Zero means unbounded.
    capacity: usize,
}

impl SessionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current: None,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepend a fresh result and make it current.
    ///
    /// When full, the oldest entry is evicted. An evicted result that is
    /// still current stays current until something else replaces it.
    pub fn record(&mut self, result: AnalysisResult) -> Arc<AnalysisResult> {
        let result = Arc::new(result);
        self.entries.push_front(Arc::clone(&result));
        if self.capacity > 0 {
            while self.entries.len() > self.capacity {
                if let Some(evicted) = self.entries.pop_back() {
                    tracing::debug!(id = %evicted.id, "Evicted oldest analysis from history");
                }
            }
        }
        self.current = Some(Arc::clone(&result));
        result
    }

    /// Make the entry at `index` (0 = newest) current.
    pub fn select(&mut self, index: usize) -> Result<Arc<AnalysisResult>, HistoryError> {
        let entry = self
            .entries
            .get(index)
            .cloned()
            .ok_or(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })?;
        self.current = Some(Arc::clone(&entry));
        Ok(entry)
    }

    pub fn current(&self) -> Option<Arc<AnalysisResult>> {
        self.current.clone()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<AnalysisResult>> {
        self.entries.iter()
    }

    pub fn summaries(&self) -> Vec<AnalysisSummary> {
        self.entries.iter().map(|r| r.summary()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
