//! Catalog models.
//!
//! Read-only reference data as returned by the external catalog query
//! service and brand pattern config store.

/// A single active product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProductRecord {
    /// Catalog identifier, as stored (not normalized).
    pub sku: String,
    /// Display name
    pub name: String,
    /// Brand the catalog files this product under.
    pub brand_name: String,
}
impl ProductRecord {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, brand_name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            brand_name: brand_name.into(),
        }
    }
}

/// One page of a paginated product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProductPage {
    pub items: Vec<ProductRecord>,
    /// Explicit "more pages follow" signal from the catalog service.
    pub has_more: bool,
}

/// A raw (uncompiled) brand → SKU pattern pair from the config store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SkuPattern {
    pub brand_name: String,
    /// Regular expression source, unanchored; anchoring happens at compile time.
    pub pattern: String,
}
impl SkuPattern {
    pub fn new(brand_name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            pattern: pattern.into(),
        }
    }
}
