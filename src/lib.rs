//! snapsku: match bulk-uploaded product photography to catalog SKUs.
//!
//! This crate re-exports the workspace crates under short module names and
//! lifts the types most callers need to the top level:
//!
//! - [`catalog`]: catalog and brand pattern sources, the per-batch
//!   [`SkuIndex`] and the shared [`PatternCache`].
//! - [`matcher`]: filename tokenization and SKU matching.
//! - [`encode`]: fixed-quality image re-encoding.
//! - [`config`]: layered configuration.
//! - [`pipeline`]: the batch orchestrator, upload gateway and progress model.
//!
//! ```
//! use snapsku::{CatalogHandle, Config, GatewayHandle, NoProgress, PatternSourceHandle, Pipeline, SourceFile};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn ingest(
//!     catalog: CatalogHandle,
//!     patterns: PatternSourceHandle,
//!     gateway: GatewayHandle,
//!     files: Vec<SourceFile>,
//! ) -> Vec<String> {
//!     let config = Config::load(None).unwrap_or_default();
//!     let pipeline = Pipeline::builder(catalog, patterns, gateway).config(&config).build();
//!     let progress = pipeline.run(files, "Acme", &NoProgress, CancellationToken::new()).await;
//!     progress.errors.to_vec()
//! }
//! ```

pub use snapsku_catalog as catalog;
pub use snapsku_config as config;
pub use snapsku_encode as encode;
pub use snapsku_matcher as matcher;
pub use snapsku_pipeline as pipeline;

pub use snapsku_catalog::{
    CatalogHandle, CatalogSource, PatternCache, PatternSource, PatternSourceHandle, ProductRecord, SkuIndex,
    SkuPattern,
};
pub use snapsku_config::Config;
pub use snapsku_encode::{Encoder, OutputFormat};
pub use snapsku_matcher::{MatchResult, MatchStrategy, Matcher, StrategyTable};
pub use snapsku_pipeline::{
    BatchEvent, BatchProgress, GatewayHandle, NoProgress, Pipeline, ProcessingResult, ProgressObserver, SourceFile,
    UploadGateway, UploadReceipt, UploadRequest,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::{MockCatalog, MockPatternSource};
    use crate::pipeline::gateway::MockGateway;
    use crate::pipeline::sleep::RecordingSleeper;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    fn png() -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 2, Rgba([255, 255, 255, 128])));
        let mut buffer = Vec::new();
        image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png).unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_acme_red_mug() {
        let catalog = Arc::new(MockCatalog::with_products([("7788", "Red Mug", "Acme")]));
        let gateway = Arc::new(MockGateway::default());
        let pipeline = Pipeline::builder(catalog, Arc::new(MockPatternSource::default()), gateway.clone())
            .config(&Config::default())
            .sleeper(Arc::new(RecordingSleeper::default()))
            .build();

        let progress = pipeline
            .run(vec![SourceFile::new("acme_red_7788.png", png())], "Acme", &NoProgress, CancellationToken::new())
            .await;

        assert!(progress.is_complete());
        let result = &progress.results[0];
        assert_eq!(result.matched_sku.as_deref(), Some("7788"));
        assert_eq!(result.confidence, Some(1.0));
        assert_eq!(result.final_filename, "7788.webp");
        assert_eq!(result.error, None);

        let uploaded = &gateway.requests().await[0];
        let decoded = image::load_from_memory_with_format(&uploaded.data, ImageFormat::WebP).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 2));
    }
}
