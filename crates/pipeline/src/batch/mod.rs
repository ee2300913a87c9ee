//! The batch orchestrator.

mod file;
mod stream;

pub use self::stream::BatchEvent;
use crate::GatewayHandle;
use crate::sleep::{Sleeper, TokioSleeper};
use snapsku_catalog::{CatalogHandle, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, PatternCache, PatternSourceHandle};
use snapsku_config::{Config, DEFAULT_INTER_FILE_DELAY_MS};
use snapsku_encode::Encoder;
use snapsku_matcher::{Matcher, StrategyTable};
use std::sync::Arc;
use std::time::Duration;

/// An image submitted as part of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub filename: String,
    pub data: Vec<u8>,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Matches, encodes and uploads batches of product images.
///
/// A `Pipeline` holds no batch state and can run any number of batches,
/// concurrently or one after another. Each batch builds its own
/// [`SkuIndex`](snapsku_catalog::SkuIndex) and filename allocation set; the
/// only state shared between batches is the [`PatternCache`].
///
/// # Examples
///
/// ```
/// use snapsku_catalog::{CatalogHandle, PatternSourceHandle};
/// use snapsku_config::Config;
/// use snapsku_pipeline::{GatewayHandle, NoProgress, Pipeline, SourceFile};
/// use tokio_util::sync::CancellationToken;
///
/// async fn ingest(
///     catalog: CatalogHandle,
///     patterns: PatternSourceHandle,
///     gateway: GatewayHandle,
///     config: &Config,
///     files: Vec<SourceFile>,
/// ) -> usize {
///     let pipeline = Pipeline::builder(catalog, patterns, gateway).config(config).build();
///     let progress = pipeline.run(files, "Acme", &NoProgress, CancellationToken::new()).await;
///     progress.failed()
/// }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    catalog: CatalogHandle,
    patterns: PatternSourceHandle,
    gateway: GatewayHandle,
    pattern_cache: Arc<PatternCache>,
    matcher: Matcher,
    encoder: Encoder,
    sleeper: Arc<dyn Sleeper>,
    inter_file_delay: Duration,
    page_size: usize,
    max_pages: usize,
}

impl Pipeline {
    pub fn builder(catalog: CatalogHandle, patterns: PatternSourceHandle, gateway: GatewayHandle) -> PipelineBuilder {
        PipelineBuilder {
            pipeline: Self {
                catalog,
                patterns,
                gateway,
                pattern_cache: Arc::new(PatternCache::new()),
                matcher: Matcher::default(),
                encoder: Encoder::default(),
                sleeper: Arc::new(TokioSleeper),
                inter_file_delay: Duration::from_millis(DEFAULT_INTER_FILE_DELAY_MS),
                page_size: DEFAULT_PAGE_SIZE,
                max_pages: DEFAULT_MAX_PAGES,
            },
        }
    }

    /// The pattern cache this pipeline reads from. Call
    /// [`invalidate`](PatternCache::invalidate) on it after a brand pattern
    /// changes.
    pub fn pattern_cache(&self) -> &Arc<PatternCache> {
        &self.pattern_cache
    }
}

/// Configures a [`Pipeline`]. Every setting has a default, so
/// `Pipeline::builder(..).build()` is a working pipeline.
pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    /// Share a pattern cache with other pipelines. By default each pipeline
    /// gets a cache of its own.
    pub fn pattern_cache(mut self, cache: Arc<PatternCache>) -> Self {
        self.pipeline.pattern_cache = cache;
        self
    }

    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.pipeline.matcher = matcher;
        self
    }

    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.pipeline.encoder = encoder;
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.pipeline.sleeper = sleeper;
        self
    }

    pub fn inter_file_delay(mut self, delay: Duration) -> Self {
        self.pipeline.inter_file_delay = delay;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.pipeline.page_size = page_size.max(1);
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.pipeline.max_pages = max_pages.max(1);
        self
    }

    /// Apply every setting a [`Config`] carries: matcher strategies and token
    /// length, encoder format and quality, pacing and catalog paging.
    pub fn config(self, config: &Config) -> Self {
        let strategies = StrategyTable::with_numeric_fallback(&config.matcher.numeric_fallback_brands);
        self.matcher(Matcher::new(strategies).min_token_len(config.matcher.min_token_len))
            .encoder(Encoder::new(config.encoder.format, config.encoder.quality))
            .inter_file_delay(config.pipeline.inter_file_delay())
            .page_size(config.catalog.page_size)
            .max_pages(config.catalog.max_pages)
    }

    pub fn build(self) -> Pipeline {
        self.pipeline
    }
}
