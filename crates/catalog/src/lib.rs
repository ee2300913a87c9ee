//! Catalog reference data for SKU matching.
//!
//! This crate owns everything the matcher needs to know about the product
//! catalog, fetched fresh for every batch:
//!
//! - **[`SkuIndex`]**: normalized SKU → [`ProductRecord`] lookup table, built
//!   by an [`IndexBuilder`] paging through a [`CatalogSource`]. Discarded at
//!   the end of a batch; never shared between batches.
//! - **[`BrandPattern`]**: per-brand regular expressions constraining which
//!   filename tokens are plausible SKUs. Held in a [`PatternCache`] which
//!   outlives any single batch and is shared between concurrent batches.
//!
//! Neither the catalog query service nor the pattern config store are
//! implemented here; they are external collaborators reached through the
//! [`CatalogSource`] and [`PatternSource`] traits.

mod builder;
pub mod error;
mod index;
mod models;
mod pattern;
pub mod source;

pub use crate::builder::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, IndexBuilder};
pub use crate::index::{SkuIndex, normalize, strip_leading_zeros};
pub use crate::models::{ProductPage, ProductRecord, SkuPattern};
pub use crate::pattern::{BrandPattern, PatternCache, PatternSet};
pub use crate::source::{CatalogSource, PatternSource};
use std::sync::Arc;

pub type CatalogHandle = Arc<dyn CatalogSource + Send + Sync>;
pub type PatternSourceHandle = Arc<dyn PatternSource + Send + Sync>;
