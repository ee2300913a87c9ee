use crate::error::{ErrorKind, Result};
use crate::index::SkuIndex;
use crate::models::ProductRecord;
use crate::source::CatalogSource;
use exn::ResultExt;
use tracing::instrument;

/// Number of records requested per catalog page.
pub const DEFAULT_PAGE_SIZE: usize = 200;
/// Maximum pages fetched for a single brand before bailing with
/// [`ErrorKind::InvalidResponse`]. Guards against a catalog service that
/// never stops reporting `has_more`.
pub const DEFAULT_MAX_PAGES: usize = 500;

/// Builds a batch's [`SkuIndex`] by paging through a [`CatalogSource`].
///
/// **Fetch strategy:**
/// 1. Request pages of `page_size` active products, filtered by brand when one
///    is given, until a short page or `has_more == false`.
/// 2. If the brand filter produced zero records, retry **once** without any
///    filter. The brand label on an upload doesn't always match the brand
///    field stored in the catalog, and an unfiltered index is better than an
///    empty one.
///
/// # Examples
///
/// ```
/// use snapsku_catalog::{CatalogSource, IndexBuilder, SkuIndex};
///
/// async fn index_for(catalog: &dyn CatalogSource, brand: &str) -> SkuIndex {
///     // Never fails: a catalog outage produces an empty index.
///     IndexBuilder::new(catalog).page_size(100).build(Some(brand)).await
/// }
/// ```
pub struct IndexBuilder<'a> {
    source: &'a dyn CatalogSource,
    page_size: usize,
    max_pages: usize,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(source: &'a dyn CatalogSource) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Records per page. Zero is bumped to one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Build the index, degrading to an empty index if the catalog can't be
    /// fetched. An empty index just means nothing in the batch will match.
    #[instrument(skip(self))]
    pub async fn build(&self, brand: Option<&str>) -> SkuIndex {
        match self.fetch_products(brand).await {
            Ok(products) => {
                let index = SkuIndex::from_products(products);
                tracing::info!(brand, skus = index.len(), "Built SKU index");
                index
            },
            Err(e) => {
                let kind: &ErrorKind = &e;
                tracing::warn!(brand, error = %kind, "Catalog fetch failed; continuing with an empty SKU index");
                SkuIndex::default()
            },
        }
    }

    /// Fetch every active product for `brand`, applying the unfiltered
    /// fallback when the brand yields nothing. A blank brand is treated as no
    /// brand at all.
    ///
    /// # Errors
    /// Returns the first error reported by the [`CatalogSource`], or
    /// [`ErrorKind::InvalidResponse`] if pagination exceeds `max_pages`.
    pub async fn fetch_products(&self, brand: Option<&str>) -> Result<Vec<ProductRecord>> {
        let brand = brand.map(str::trim).filter(|b| !b.is_empty());
        let products = self.fetch_all(brand).await?;
        if products.is_empty()
            && let Some(brand) = brand
        {
            tracing::info!(brand, "Brand filter matched no catalog products; retrying without filter");
            return self.fetch_all(None).await;
        }
        Ok(products)
    }

    async fn fetch_all(&self, brand: Option<&str>) -> Result<Vec<ProductRecord>> {
        let mut products = Vec::new();
        for page_number in 0..self.max_pages {
            let offset = page_number * self.page_size;
            let page = self
                .source
                .list_products(brand, self.page_size, offset)
                .await
                .or_raise(|| ErrorKind::Fetch(format!("page at offset {offset}")))?;
            let received = page.items.len();
            products.extend(page.items);
            if received < self.page_size || !page.has_more {
                return Ok(products);
            }
        }
        exn::bail!(ErrorKind::InvalidResponse(format!("catalog still paging after {} pages", self.max_pages)));
    }
}
