//! External catalog interfaces.
//!
//! The catalog query service and the brand pattern config store live outside
//! this crate. Both are reached through the object-safe async traits defined
//! here, so that the surrounding application can plug in its HTTP/database
//! clients and tests can plug in the in-memory mocks.

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::{MockCatalog, MockPatternSource};
use crate::error::Result;
use crate::models::{ProductPage, SkuPattern};
use async_trait::async_trait;

/// Paginated read access to the product catalog.
///
/// # Examples
///
/// ```
/// use snapsku_catalog::{CatalogSource, error::Result};
///
/// async fn count_acme_products(catalog: &dyn CatalogSource) -> Result<usize> {
///     let page = catalog.list_products(Some("Acme"), 200, 0).await?;
///     Ok(page.items.len())
/// }
/// ```
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List active products, optionally filtered by brand.
    ///
    /// Returns at most `limit` records starting at `offset`. Implementations
    /// should set [`ProductPage::has_more`] when further pages exist; callers
    /// also treat a page shorter than `limit` as the final page.
    async fn list_products(&self, brand: Option<&str>, limit: usize, offset: usize) -> Result<ProductPage>;
}

/// Read access to the brand → SKU pattern config store.
#[async_trait]
pub trait PatternSource: Send + Sync {
    /// List every configured (brand, pattern) pair.
    async fn list_sku_patterns(&self) -> Result<Vec<SkuPattern>>;
}
