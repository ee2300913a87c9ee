//! Normalized SKU lookup table.

use crate::models::ProductRecord;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Reduce a string to its matching key: ASCII alphanumerics only, uppercased.
///
/// Used for both catalog SKUs and filename tokens, so that `abc-123`,
/// `ABC_123` and `Abc123` all compare equal.
///
/// ```
/// use snapsku_catalog::normalize;
/// assert_eq!(normalize("abc-123"), "ABC123");
/// assert_eq!(normalize(" Zx 9/b "), "ZX9B");
/// assert_eq!(normalize("--"), "");
/// ```
pub fn normalize(value: &str) -> String {
    value.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_uppercase()).collect()
}

/// Strip leading zeros from a run of digits. Returns `None` when nothing is
/// left (all zeros, or empty input).
///
/// ```
/// use snapsku_catalog::strip_leading_zeros;
/// assert_eq!(strip_leading_zeros("05514"), Some("5514"));
/// assert_eq!(strip_leading_zeros("000"), None);
/// ```
pub fn strip_leading_zeros(digits: &str) -> Option<&str> {
    let stripped = digits.trim_start_matches('0');
    (!stripped.is_empty()).then_some(stripped)
}

/// In-memory lookup table from normalized SKU to [`ProductRecord`].
///
/// Built once at the start of a batch and discarded at the end of it.
///
/// # Duplicate keys
/// At most one record is held per normalized key. When two catalog SKUs
/// normalize to the same key (`AB-12` and `AB12`), the record seen **later**
/// in the source list wins and the collision is logged at `debug` level.
///
/// # Numeric lookup
/// Every SKU whose normalized form is entirely digits is also indexed with
/// its leading zeros stripped, for the numeric fallback matching strategy.
#[derive(Debug, Clone, Default)]
pub struct SkuIndex {
    by_key: HashMap<String, ProductRecord>,
    numeric: HashMap<String, ProductRecord>,
}

impl SkuIndex {
    /// Build an index from catalog records. Records with a SKU that
    /// normalizes to nothing are skipped.
    pub fn from_products(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        let mut index = Self::default();
        for product in products {
            index.insert(product);
        }
        index
    }

    /// Insert a single record, returning the record it displaced (if any).
    pub fn insert(&mut self, product: ProductRecord) -> Option<ProductRecord> {
        let key = normalize(&product.sku);
        if key.is_empty() {
            return None;
        }
        if key.bytes().all(|b| b.is_ascii_digit())
            && let Some(digits) = strip_leading_zeros(&key)
        {
            self.numeric.insert(digits.to_string(), product.clone());
        }
        match self.by_key.entry(key) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(
                    key = %entry.key(),
                    kept = %product.sku,
                    replaced = %entry.get().sku,
                    "Duplicate normalized SKU in catalog; keeping the later record"
                );
                Some(entry.insert(product))
            },
            Entry::Vacant(entry) => {
                entry.insert(product);
                None
            },
        }
    }

    /// Look up a record by an already-normalized key.
    pub fn get(&self, key: &str) -> Option<&ProductRecord> {
        self.by_key.get(key)
    }

    /// Look up a purely numeric SKU by its digits with leading zeros stripped.
    pub fn get_numeric(&self, digits: &str) -> Option<&ProductRecord> {
        self.numeric.get(digits)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Number of distinct normalized keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Iterate over `(normalized key, record)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductRecord)> {
        self.by_key.iter().map(|(key, record)| (key.as_str(), record))
    }
}

impl FromIterator<ProductRecord> for SkuIndex {
    fn from_iter<T: IntoIterator<Item = ProductRecord>>(iter: T) -> Self {
        Self::from_products(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(sku: &str) -> ProductRecord {
        ProductRecord::new(sku, format!("Product {sku}"), "Acme")
    }

    #[rstest]
    #[case("abc-123", "ABC123")]
    #[case("ABC_123", "ABC123")]
    #[case("  7788 ", "7788")]
    #[case("é-x1", "X1")]
    #[case("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_lookup_by_normalized_key() {
        let index = SkuIndex::from_products([record("abc-123"), record("7788")]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("ABC123").unwrap().sku, "abc-123");
        assert_eq!(index.get("7788").unwrap().sku, "7788");
        assert!(index.get("abc-123").is_none());
    }

    #[test]
    fn test_skips_empty_skus() {
        let index = SkuIndex::from_products([record(""), record("--"), record("A1")]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let mut index = SkuIndex::default();
        assert!(index.insert(record("AB-12")).is_none());
        let displaced = index.insert(record("ab12")).unwrap();
        assert_eq!(displaced.sku, "AB-12");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("AB12").unwrap().sku, "ab12");
    }

    #[test]
    fn test_numeric_index_strips_leading_zeros() {
        let index = SkuIndex::from_products([record("05514"), record("A100"), record("000")]);
        assert_eq!(index.get_numeric("5514").unwrap().sku, "05514");
        assert!(index.get_numeric("100").is_none());
        assert!(index.get_numeric("0").is_none());
        // Exact lookups still use the zero-padded key.
        assert!(index.get("05514").is_some());
    }
}
