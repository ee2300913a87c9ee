//! Batch ingestion of product photography.
//!
//! A batch is an ordered list of image files submitted for one brand. For
//! each file, strictly in order, the [`Pipeline`]:
//!
//! 1. matches the filename to a catalog SKU,
//! 2. re-encodes the image,
//! 3. allocates a batch-unique filename if the file matched,
//! 4. hands the result to the [`UploadGateway`],
//!
//! and records a [`ProcessingResult`]. Progress is reported as a stream of
//! [`BatchEvent`]s, or through a [`ProgressObserver`] when using
//! [`Pipeline::run`].
//!
//! Nothing that goes wrong with a single file stops the batch. Catalog and
//! pattern lookups that fail during setup degrade to "nothing matches", and
//! every file is still uploaded.

mod allocate;
mod batch;
pub mod error;
pub mod gateway;
mod progress;
pub mod sleep;

pub use crate::allocate::FilenameAllocator;
pub use crate::batch::{BatchEvent, Pipeline, PipelineBuilder, SourceFile};
pub use crate::gateway::{UploadGateway, UploadReceipt, UploadRequest};
pub use crate::progress::{BatchProgress, NoProgress, ProcessingResult, ProgressObserver};
pub use crate::sleep::{Sleeper, TokioSleeper};
use std::sync::Arc;

pub type GatewayHandle = Arc<dyn UploadGateway + Send + Sync>;
