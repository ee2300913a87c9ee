//! In-memory catalog and pattern sources for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{ProductPage, ProductRecord, SkuPattern};
use crate::source::{CatalogSource, PatternSource};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// A recorded `list_products` call: `(brand, limit, offset)`.
pub type CatalogCall = (Option<String>, usize, usize);

/// In-memory catalog for testing.
///
/// Brand filtering is a case-insensitive comparison against
/// [`ProductRecord::brand_name`]. Every call is recorded so tests can assert
/// on the paging and brand-fallback behaviour of callers.
///
/// # Examples
///
/// ```
/// use snapsku_catalog::CatalogSource;
/// use snapsku_catalog::source::MockCatalog;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = MockCatalog::with_products([
///     ("7788", "Red Mug", "Acme"),
///     ("ZX-1", "Blue Mug", "Other"),
/// ]);
/// let page = catalog.list_products(Some("acme"), 200, 0).await?;
/// assert_eq!(page.items.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockCatalog {
    products: Vec<ProductRecord>,
    failing: bool,
    calls: RwLock<Vec<CatalogCall>>,
}

impl MockCatalog {
    /// Create a mock catalog from `(sku, name, brand)` triples.
    pub fn with_products<S: Into<String>>(products: impl IntoIterator<Item = (S, S, S)>) -> Self {
        Self::with_records(products.into_iter().map(|(sku, name, brand)| ProductRecord::new(sku, name, brand)))
    }

    pub fn with_records(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        Self {
            products: records.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Make every call fail with [`ErrorKind::Network`].
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Every `list_products` call received so far, in order.
    pub async fn calls(&self) -> Vec<CatalogCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn list_products(&self, brand: Option<&str>, limit: usize, offset: usize) -> Result<ProductPage> {
        self.calls.write().await.push((brand.map(str::to_string), limit, offset));
        if self.failing {
            exn::bail!(ErrorKind::Network("mock catalog unavailable".to_string()));
        }
        let matching: Vec<&ProductRecord> = self
            .products
            .iter()
            .filter(|p| match brand {
                Some(brand) => p.brand_name.trim().eq_ignore_ascii_case(brand.trim()),
                None => true,
            })
            .collect();
        let items: Vec<ProductRecord> = matching.iter().skip(offset).take(limit).map(|p| (*p).clone()).collect();
        let has_more = offset + items.len() < matching.len();
        Ok(ProductPage { items, has_more })
    }
}

/// In-memory pattern config store for testing.
#[derive(Default)]
pub struct MockPatternSource {
    patterns: Vec<SkuPattern>,
    failing: bool,
    calls: RwLock<usize>,
}

impl MockPatternSource {
    /// Create a mock pattern store from `(brand, pattern)` pairs.
    pub fn with_patterns<S: Into<String>>(patterns: impl IntoIterator<Item = (S, S)>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|(brand, pattern)| SkuPattern::new(brand, pattern)).collect(),
            ..Default::default()
        }
    }

    /// Make every call fail with [`ErrorKind::Network`].
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Number of `list_sku_patterns` calls received so far.
    pub async fn calls(&self) -> usize {
        *self.calls.read().await
    }
}

#[async_trait]
impl PatternSource for MockPatternSource {
    async fn list_sku_patterns(&self) -> Result<Vec<SkuPattern>> {
        *self.calls.write().await += 1;
        if self.failing {
            exn::bail!(ErrorKind::Network("mock pattern store unavailable".to_string()));
        }
        Ok(self.patterns.clone())
    }
}
