use super::{Pipeline, SourceFile};
use crate::allocate::FilenameAllocator;
use crate::error::ErrorKind;
use crate::progress::{BatchProgress, ProcessingResult, ProgressObserver};
use async_stream::stream;
use futures::{Stream, StreamExt};
use snapsku_catalog::IndexBuilder;
use tokio_util::sync::CancellationToken;

/// Progress events emitted by [`Pipeline::stream`]. Each one carries a full
/// snapshot of the batch at that point; snapshots share their result lists.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`FileStarted`](Self::FileStarted) then
///    [`FileProcessed`](Self::FileProcessed), once each per input file, in
///    input order.
/// 3. [`Complete`](Self::Complete), exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Nothing processed yet; the SKU index hasn't been built.
    Started(BatchProgress),
    /// `current_filename` names the file about to be processed.
    FileStarted(BatchProgress),
    /// The last entry of `results` belongs to the file just processed.
    FileProcessed(BatchProgress),
    /// `processed == total` and `current_filename` is cleared.
    Complete(BatchProgress),
}

impl BatchEvent {
    pub fn progress(&self) -> &BatchProgress {
        match self {
            Self::Started(p) | Self::FileStarted(p) | Self::FileProcessed(p) | Self::Complete(p) => p,
        }
    }

    pub fn into_progress(self) -> BatchProgress {
        match self {
            Self::Started(p) | Self::FileStarted(p) | Self::FileProcessed(p) | Self::Complete(p) => p,
        }
    }
}

impl Pipeline {
    /// Streams [`BatchEvent`]s while processing `files` for `brand`.
    ///
    /// The SKU index and brand pattern are resolved once, after
    /// [`BatchEvent::Started`]. Files are then processed strictly one at a
    /// time in input order, with the configured delay between consecutive
    /// files. A failure in one file is recorded in its
    /// [`ProcessingResult`] and never stops the batch.
    ///
    /// `cancel` is checked before each file. Once it fires, every remaining
    /// file is recorded as failed without being encoded or uploaded, and no
    /// further delay is taken.
    pub fn stream<'a>(
        &'a self,
        files: Vec<SourceFile>,
        brand: &'a str,
        cancel: CancellationToken,
    ) -> impl Stream<Item = BatchEvent> + Send + 'a {
        // `rustfmt` does not format macros that use braces. Wrap in parentheses!
        stream!({
            let mut progress = BatchProgress::new(files.len());
            tracing::info!(brand, files = progress.total, "Starting batch");
            yield BatchEvent::Started(progress.clone());

            let index = IndexBuilder::new(self.catalog.as_ref())
                .page_size(self.page_size)
                .max_pages(self.max_pages)
                .build(Some(brand))
                .await;
            let pattern = self.pattern_cache.resolve(self.patterns.as_ref(), brand).await;
            let mut allocator = FilenameAllocator::new(self.encoder.format().extension());

            for (position, file) in files.into_iter().enumerate() {
                if position > 0 && !cancel.is_cancelled() {
                    tokio::select! {
                        () = self.sleeper.sleep(self.inter_file_delay) => {},
                        () = cancel.cancelled() => {},
                    }
                }
                progress.current_filename = Some(file.filename.clone());
                yield BatchEvent::FileStarted(progress.clone());

                let result = if cancel.is_cancelled() {
                    progress.cancelled = true;
                    ProcessingResult::failed(file.filename, None, None, ErrorKind::Cancelled.to_string())
                } else {
                    self.process_file(file, brand, &index, pattern.as_ref(), &mut allocator).await
                };
                progress.record(result);
                yield BatchEvent::FileProcessed(progress.clone());
            }

            progress.finish();
            tracing::info!(
                brand,
                processed = progress.processed,
                succeeded = progress.succeeded(),
                matched = progress.matched(),
                failed = progress.failed(),
                cancelled = progress.cancelled,
                "Batch complete"
            );
            yield BatchEvent::Complete(progress);
        })
    }

    /// Process a batch to completion, passing every event's snapshot to
    /// `observer`, and return the final [`BatchProgress`].
    pub async fn run(
        &self,
        files: Vec<SourceFile>,
        brand: &str,
        observer: &dyn ProgressObserver,
        cancel: CancellationToken,
    ) -> BatchProgress {
        let events = self.stream(files, brand, cancel);
        futures::pin_mut!(events);
        // Keep no snapshot across an await, so appending never copies the
        // accumulated results.
        let mut last = None;
        while let Some(event) = events.next().await {
            observer.on_progress(event.progress());
            if let BatchEvent::Complete(progress) = event {
                last = Some(progress);
            }
        }
        last.unwrap_or_else(|| BatchProgress::new(0))
    }
}
