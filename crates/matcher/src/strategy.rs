use derive_more::Display;
use std::collections::HashMap;

/// Confidence reported for an exact token match.
pub const EXACT_CONFIDENCE: f32 = 1.0;
/// Confidence reported for a numeric-digit fallback match.
pub const NUMERIC_CONFIDENCE: f32 = 0.95;

/// A single matching pass.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    /// Exact index lookup over tokens that satisfy the brand pattern (all
    /// tokens when the brand has none), preferring the longest hit.
    #[display("pattern-exact")]
    PatternExact,
    /// Exact index lookup over every token, ignoring the brand pattern.
    /// Skipped when it would repeat an unconstrained pass already made.
    #[display("unconstrained-exact")]
    UnconstrainedExact,
    /// Digit runs from the raw filename, leading zeros stripped, against the
    /// numeric SKUs of the index. First hit wins.
    #[display("numeric-digits")]
    NumericDigits,
}

impl MatchStrategy {
    pub fn confidence(self) -> f32 {
        match self {
            Self::PatternExact | Self::UnconstrainedExact => EXACT_CONFIDENCE,
            Self::NumericDigits => NUMERIC_CONFIDENCE,
        }
    }
}

/// Ranked strategies per brand.
///
/// Brands not listed use the default ranking
/// `[PatternExact, UnconstrainedExact]`. Brand names compare
/// case-insensitively after trimming.
///
/// ```
/// use snapsku_matcher::{MatchStrategy, StrategyTable};
///
/// let table = StrategyTable::with_numeric_fallback(["Legacy Co"]);
/// assert_eq!(table.strategies_for(Some("legacy co")).last(), Some(&MatchStrategy::NumericDigits));
/// assert_eq!(table.strategies_for(Some("Acme")).len(), 2);
/// assert_eq!(table.strategies_for(None).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StrategyTable {
    default: Vec<MatchStrategy>,
    brands: HashMap<String, Vec<MatchStrategy>>,
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self {
            default: vec![MatchStrategy::PatternExact, MatchStrategy::UnconstrainedExact],
            brands: HashMap::new(),
        }
    }
}

fn brand_key(brand: &str) -> String {
    brand.trim().to_lowercase()
}

impl StrategyTable {
    /// Default ranking for every brand, plus [`MatchStrategy::NumericDigits`]
    /// as a last resort for the listed brands (whose SKUs are purely numeric).
    pub fn with_numeric_fallback<S: AsRef<str>>(brands: impl IntoIterator<Item = S>) -> Self {
        let mut table = Self::default();
        let mut ranking = table.default.clone();
        ranking.push(MatchStrategy::NumericDigits);
        for brand in brands {
            table = table.with_brand(brand.as_ref(), ranking.clone());
        }
        table
    }

    /// Override the ranking for one brand. An empty ranking disables
    /// matching for that brand.
    pub fn with_brand(mut self, brand: &str, strategies: Vec<MatchStrategy>) -> Self {
        self.brands.insert(brand_key(brand), strategies);
        self
    }

    /// Replace the ranking used by brands without an override.
    pub fn with_default(mut self, strategies: Vec<MatchStrategy>) -> Self {
        self.default = strategies;
        self
    }

    pub fn strategies_for(&self, brand: Option<&str>) -> &[MatchStrategy] {
        brand.and_then(|b| self.brands.get(&brand_key(b))).unwrap_or(&self.default)
    }
}
