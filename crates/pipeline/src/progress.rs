//! Per-file results and batch progress snapshots.

use crate::gateway::UploadReceipt;
use snapsku_matcher::MatchResult;
use std::sync::Arc;
use time::UtcDateTime;

/// The outcome of one input file. Immutable once appended to a
/// [`BatchProgress`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProcessingResult {
    pub original_filename: String,
    /// Name the image was stored under. For a failed file, the name it
    /// would have had (the allocated name, or the original filename).
    pub final_filename: String,
    pub matched_sku: Option<String>,
    pub confidence: Option<f32>,
    pub uploaded_url: Option<String>,
    /// Human-readable reason this file failed.
    pub error: Option<String>,
}

impl ProcessingResult {
    pub fn uploaded(original_filename: String, receipt: UploadReceipt, matched: Option<&MatchResult>) -> Self {
        Self {
            original_filename,
            final_filename: receipt.final_filename,
            matched_sku: matched.map(|m| m.sku.clone()),
            confidence: matched.map(|m| m.confidence),
            uploaded_url: Some(receipt.url),
            error: None,
        }
    }

    pub fn failed(
        original_filename: String,
        final_filename: Option<String>,
        matched: Option<&MatchResult>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            final_filename: final_filename.unwrap_or_else(|| original_filename.clone()),
            original_filename,
            matched_sku: matched.map(|m| m.sku.clone()),
            confidence: matched.map(|m| m.confidence),
            uploaded_url: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_matched(&self) -> bool {
        self.matched_sku.is_some()
    }
}

/// A snapshot of a batch in flight.
///
/// `processed` only ever increases, one step per input file, and `results`
/// holds one entry per processed file in input order. Every failed result
/// also contributes one line to `errors`.
///
/// `results` and `errors` are shared between snapshots, so cloning a
/// snapshot does not copy them. Appending only copies the lists when an
/// earlier snapshot is still alive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BatchProgress {
    pub total: usize,
    pub processed: usize,
    /// The file being worked on; cleared once the batch completes.
    pub current_filename: Option<String>,
    pub results: Arc<Vec<ProcessingResult>>,
    pub errors: Arc<Vec<String>>,
    pub started_at: UtcDateTime,
    pub finished_at: Option<UtcDateTime>,
    /// Whether the batch was cancelled before every file was processed.
    pub cancelled: bool,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            current_filename: None,
            results: Arc::new(Vec::with_capacity(total)),
            errors: Arc::default(),
            started_at: UtcDateTime::now(),
            finished_at: None,
            cancelled: false,
        }
    }

    pub(crate) fn record(&mut self, result: ProcessingResult) {
        if let Some(error) = &result.error {
            Arc::make_mut(&mut self.errors).push(format!("{}: {error}", result.original_filename));
        }
        Arc::make_mut(&mut self.results).push(result);
        self.processed += 1;
    }

    pub(crate) fn finish(&mut self) {
        self.current_filename = None;
        self.finished_at = Some(UtcDateTime::now());
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Successfully processed files that were matched to a SKU.
    pub fn matched(&self) -> usize {
        self.results.iter().filter(|r| r.is_success() && r.is_matched()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// Receives a read-only [`BatchProgress`] snapshot at batch start, before
/// and after every file, and at batch end.
///
/// Implemented for any `Fn(&BatchProgress) + Send + Sync`.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, snapshot: &BatchProgress);
}

impl<F> ProgressObserver for F
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    fn on_progress(&self, snapshot: &BatchProgress) {
        self(snapshot);
    }
}

/// Ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _snapshot: &BatchProgress) {}
}
