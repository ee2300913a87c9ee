//! Brand SKU patterns and their process-wide cache.

use crate::error::{ErrorKind, Result};
use crate::models::SkuPattern;
use crate::source::PatternSource;
use exn::ResultExt;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

/// A compiled, anchored, case-insensitive regular expression describing the
/// shape of a brand's valid SKUs.
///
/// The configured pattern string is wrapped as `^(?:pattern)$`, so it must
/// match a whole token rather than any substring of it.
///
/// ```
/// use snapsku_catalog::BrandPattern;
///
/// let pattern = BrandPattern::compile("Acme", r"[a-z]{2}\d{3}").unwrap();
/// assert!(pattern.is_match("AB123"));
/// assert!(!pattern.is_match("XAB123"));
/// ```
#[derive(Debug, Clone)]
pub struct BrandPattern {
    brand: String,
    regex: Regex,
}

impl BrandPattern {
    /// Compile a pattern string for `brand`.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidPattern`] if the string is not a valid
    /// regular expression.
    pub fn compile(brand: impl Into<String>, pattern: &str) -> Result<Self> {
        let brand = brand.into();
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$")).case_insensitive(true).build().or_raise(|| {
            ErrorKind::InvalidPattern {
                brand: brand.clone(),
                pattern: pattern.to_string(),
            }
        })?;
        Ok(Self { brand, regex })
    }

    pub fn is_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// The anchored regular expression source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn brand_key(brand: &str) -> String {
    brand.trim().to_lowercase()
}

/// Every successfully compiled brand pattern, keyed case-insensitively by
/// brand name.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: HashMap<String, BrandPattern>,
}

impl PatternSet {
    /// Compile raw patterns. Invalid pattern strings are logged and skipped;
    /// the affected brand is simply treated as having no pattern. A later
    /// entry for the same brand replaces an earlier one.
    pub fn compile(raw: impl IntoIterator<Item = SkuPattern>) -> Self {
        let mut patterns = HashMap::new();
        for SkuPattern { brand_name, pattern } in raw {
            if brand_name.trim().is_empty() || pattern.trim().is_empty() {
                tracing::debug!(brand = %brand_name, "Skipping blank SKU pattern entry");
                continue;
            }
            match BrandPattern::compile(brand_name.trim(), pattern.trim()) {
                Ok(compiled) => {
                    patterns.insert(brand_key(&brand_name), compiled);
                },
                Err(e) => {
                    let kind: &ErrorKind = &e;
                    tracing::warn!(error = %kind, "Ignoring invalid SKU pattern");
                },
            }
        }
        Self { patterns }
    }

    /// Pattern for `brand`, or `None` when the brand has no (valid) pattern.
    pub fn get(&self, brand: &str) -> Option<&BrandPattern> {
        self.patterns.get(&brand_key(brand))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Process-wide cache of compiled brand patterns.
///
/// The full pattern set is fetched from a [`PatternSource`] on first use and
/// reused until [`invalidate`](Self::invalidate) is called (for example after
/// a pattern has been edited elsewhere). The cache is meant to be created
/// once, wrapped in an [`Arc`], and handed to every batch.
///
/// # Concurrency
/// - Readers clone an `Arc<PatternSet>` snapshot under a read lock, so they
///   never observe a partially built set.
/// - Rebuilds are serialized: concurrent cold readers wait for the single
///   in-flight fetch instead of each hitting the pattern store.
/// - A rebuild that straddles an `invalidate()` returns its result to its own
///   caller but doesn't install it, so the next reader refetches.
///
/// A failed fetch is not cached; the caller gets an empty set (every brand
/// pattern-less) and the next call tries again.
#[derive(Debug, Default)]
pub struct PatternCache {
    current: RwLock<Option<Arc<PatternSet>>>,
    rebuild: Mutex<()>,
    generation: AtomicU64,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current pattern set, fetching and compiling it if necessary.
    #[instrument(skip_all)]
    pub async fn patterns(&self, source: &dyn PatternSource) -> Arc<PatternSet> {
        if let Some(set) = self.current.read().await.as_ref() {
            return Arc::clone(set);
        }
        let _rebuilding = self.rebuild.lock().await;
        // Another task may have finished a rebuild while we waited.
        if let Some(set) = self.current.read().await.as_ref() {
            return Arc::clone(set);
        }
        let generation = self.generation.load(Ordering::Acquire);
        let raw = match source.list_sku_patterns().await {
            Ok(raw) => raw,
            Err(e) => {
                let kind: &ErrorKind = &e;
                tracing::warn!(error = %kind, "Could not fetch SKU patterns; matching without brand patterns");
                return Arc::new(PatternSet::default());
            },
        };
        let set = Arc::new(PatternSet::compile(raw));
        let mut current = self.current.write().await;
        if self.generation.load(Ordering::Acquire) == generation {
            tracing::debug!(patterns = set.len(), "Cached SKU patterns");
            *current = Some(Arc::clone(&set));
        } else {
            tracing::debug!("Pattern cache invalidated during rebuild; result not cached");
        }
        set
    }

    /// Resolve the pattern for a single brand. `None` means the brand has no
    /// pattern and every token is pattern-eligible.
    pub async fn resolve(&self, source: &dyn PatternSource, brand: &str) -> Option<BrandPattern> {
        self.patterns(source).await.get(brand).cloned()
    }

    /// Drop the cached set; the next lookup refetches from the source.
    pub async fn invalidate(&self) {
        let mut current = self.current.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        *current = None;
        tracing::debug!("SKU pattern cache invalidated");
    }

    /// Whether a pattern set is currently cached.
    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }
}
