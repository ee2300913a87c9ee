use crate::strategy::{MatchStrategy, StrategyTable};
use crate::tokenize::{digit_runs, tokenize};
use snapsku_catalog::{BrandPattern, ProductRecord, SkuIndex, strip_leading_zeros};
use std::collections::BTreeSet;
use tracing::instrument;

/// Tokens shorter than this are never looked up. Single characters match
/// far too many things by accident.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// A successful match of a filename against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The product's SKU as stored in the catalog (not normalized).
    pub sku: String,
    /// `1.0` for exact matches, `0.95` for the numeric fallback.
    pub confidence: f32,
    pub product: ProductRecord,
    /// The strategy that produced the match.
    pub strategy: MatchStrategy,
    /// The normalized token (or stripped digit run) that hit the index.
    pub token: String,
}

/// Runs the ranked [`MatchStrategy`]s of a [`StrategyTable`] against a
/// filename and stops at the first strategy that finds a product.
///
/// Matching is deterministic and side-effect free: the same filename, index
/// and pattern always produce the same result.
///
/// ```
/// use snapsku_catalog::{ProductRecord, SkuIndex};
/// use snapsku_matcher::Matcher;
///
/// let index = SkuIndex::from_products([ProductRecord::new("7788", "Red Mug", "Acme")]);
/// let result = Matcher::default().match_filename("acme_red_7788.png", &index, None, Some("Acme")).unwrap();
/// assert_eq!(result.sku, "7788");
/// assert_eq!(result.confidence, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    strategies: StrategyTable,
    min_token_len: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(StrategyTable::default())
    }
}

impl Matcher {
    pub fn new(strategies: StrategyTable) -> Self {
        Self {
            strategies,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }

    /// Minimum token length for exact lookups. Zero is bumped to one.
    pub fn min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len.max(1);
        self
    }

    pub fn strategies(&self) -> &StrategyTable {
        &self.strategies
    }

    /// Match a filename against the index.
    ///
    /// `brand` selects the strategy ranking; `pattern` constrains the
    /// [`PatternExact`](MatchStrategy::PatternExact) pass. Returns `None`
    /// when no strategy finds a product.
    #[instrument(level = "trace", skip(self, index, pattern))]
    pub fn match_filename(
        &self,
        filename: &str,
        index: &SkuIndex,
        pattern: Option<&BrandPattern>,
        brand: Option<&str>,
    ) -> Option<MatchResult> {
        if index.is_empty() {
            return None;
        }
        let tokens = tokenize(filename);
        // Tracks whether an exact pass has already looked at every token.
        let mut unconstrained_done = false;
        for &strategy in self.strategies.strategies_for(brand) {
            let hit = match strategy {
                MatchStrategy::PatternExact => {
                    unconstrained_done |= pattern.is_none();
                    self.longest_exact(&tokens, index, pattern)
                },
                MatchStrategy::UnconstrainedExact if unconstrained_done => continue,
                MatchStrategy::UnconstrainedExact => {
                    unconstrained_done = true;
                    self.longest_exact(&tokens, index, None)
                },
                MatchStrategy::NumericDigits => first_numeric(filename, index),
            };
            if let Some((token, product)) = hit {
                tracing::debug!(filename, sku = %product.sku, %strategy, "Matched filename to SKU");
                return Some(MatchResult {
                    sku: product.sku.clone(),
                    confidence: strategy.confidence(),
                    product: product.clone(),
                    strategy,
                    token,
                });
            }
        }
        None
    }

    /// Longest eligible token present in the index. Ties go to the
    /// lexicographically smallest token.
    fn longest_exact<'i>(
        &self,
        tokens: &BTreeSet<String>,
        index: &'i SkuIndex,
        pattern: Option<&BrandPattern>,
    ) -> Option<(String, &'i ProductRecord)> {
        let mut best: Option<(&String, &ProductRecord)> = None;
        for token in tokens {
            if token.len() < self.min_token_len || pattern.is_some_and(|p| !p.is_match(token)) {
                continue;
            }
            if let Some(product) = index.get(token)
                && best.is_none_or(|(current, _)| token.len() > current.len())
            {
                best = Some((token, product));
            }
        }
        best.map(|(token, product)| (token.clone(), product))
    }
}

fn first_numeric<'i>(filename: &str, index: &'i SkuIndex) -> Option<(String, &'i ProductRecord)> {
    digit_runs(filename).into_iter().filter_map(strip_leading_zeros).find_map(|digits| {
        index.get_numeric(digits).map(|product| (digits.to_string(), product))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn index_of(skus: &[&str]) -> SkuIndex {
        SkuIndex::from_products(skus.iter().map(|sku| ProductRecord::new(*sku, format!("Product {sku}"), "Acme")))
    }

    fn pattern(source: &str) -> BrandPattern {
        BrandPattern::compile("Acme", source).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let index = index_of(&["7788"]);
        let result = Matcher::default().match_filename("acme_red_7788.png", &index, None, Some("Acme")).unwrap();
        assert_eq!(result.sku, "7788");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.strategy, MatchStrategy::PatternExact);
    }

    #[rstest]
    #[case("ABC123_1234.jpg", &["123", "1234"], "1234")]
    #[case("ABC_123_1234.jpg", &["123", "1234"], "1234")]
    #[case("ABC_123_1234.jpg", &["123", "1234", "ABC123"], "ABC123")]
    #[case("x_ab_cd.jpg", &["AB", "CD"], "AB")]
    fn test_longest_match_wins(#[case] filename: &str, #[case] skus: &[&str], #[case] expected: &str) {
        let result = Matcher::default().match_filename(filename, &index_of(skus), None, None).unwrap();
        assert_eq!(result.sku, expected);
    }

    #[rstest]
    #[case("BRAND_ABC-123.jpg", "ABC-123")]
    #[case("brand abc 123.jpg", "ABC-123")]
    #[case("ABC123.png", "ABC-123")]
    fn test_split_skus_are_recovered(#[case] filename: &str, #[case] expected: &str) {
        let result = Matcher::default().match_filename(filename, &index_of(&["ABC-123"]), None, None).unwrap();
        assert_eq!(result.sku, expected);
    }

    #[test]
    fn test_pattern_restricts_candidates() {
        // Without a pattern the longer (accidental) "RED7788" would win.
        let index = index_of(&["7788", "RED7788"]);
        let result =
            Matcher::default().match_filename("acme_red_7788.png", &index, Some(&pattern(r"\d{4}")), None).unwrap();
        assert_eq!(result.sku, "7788");
        assert_eq!(result.strategy, MatchStrategy::PatternExact);
    }

    #[test]
    fn test_pattern_never_causes_false_negative() {
        let index = index_of(&["RED7788"]);
        let result =
            Matcher::default().match_filename("acme_red_7788.png", &index, Some(&pattern(r"\d{4}")), None).unwrap();
        assert_eq!(result.sku, "RED7788");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.strategy, MatchStrategy::UnconstrainedExact);
    }

    #[test]
    fn test_short_tokens_are_ignored() {
        assert!(Matcher::default().match_filename("a_b.png", &index_of(&["A", "B"]), None, None).is_none());
        let relaxed = Matcher::default().min_token_len(1);
        assert!(relaxed.match_filename("a_b.png", &index_of(&["A"]), None, None).is_some());
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let index = index_of(&["7789", "778", "ACMERED7788X"]);
        assert!(Matcher::default().match_filename("acme_red_7788.png", &index, None, None).is_none());
    }

    #[test]
    fn test_empty_index_never_matches() {
        assert!(Matcher::default().match_filename("7788.png", &SkuIndex::default(), None, None).is_none());
    }

    #[rstest]
    #[case(&["05514"])]
    #[case(&["5514"])]
    fn test_numeric_fallback(#[case] skus: &[&str]) {
        let matcher = Matcher::new(StrategyTable::with_numeric_fallback(["Legacy"]));
        let index = index_of(skus);
        let result = matcher.match_filename("_MG_5514.jpg", &index, None, Some("Legacy")).unwrap();
        assert_eq!(result.sku, skus[0]);
        if skus[0] == "05514" {
            assert_eq!(result.confidence, 0.95);
            assert_eq!(result.strategy, MatchStrategy::NumericDigits);
            assert_eq!(result.token, "5514");
        } else {
            assert_eq!(result.confidence, 1.0);
        }
    }

    #[test]
    fn test_numeric_fallback_is_brand_scoped() {
        let matcher = Matcher::new(StrategyTable::with_numeric_fallback(["Legacy"]));
        let index = index_of(&["05514"]);
        assert!(matcher.match_filename("_MG_5514.jpg", &index, None, Some("Acme")).is_none());
        assert!(matcher.match_filename("_MG_5514.jpg", &index, None, None).is_none());
    }

    #[test]
    fn test_numeric_fallback_first_run_wins() {
        let matcher = Matcher::new(StrategyTable::with_numeric_fallback(["Legacy"]));
        let index = index_of(&["0100", "0200"]);
        let result = matcher.match_filename("shot-00200_x_100.jpg", &index, None, Some("Legacy")).unwrap();
        assert_eq!(result.sku, "0200");
    }

    #[test]
    fn test_unconstrained_pass_runs_without_pattern_pass() {
        let table = StrategyTable::default().with_default(vec![MatchStrategy::UnconstrainedExact]);
        let result = Matcher::new(table).match_filename("acme_7788.png", &index_of(&["7788"]), None, None).unwrap();
        assert_eq!(result.strategy, MatchStrategy::UnconstrainedExact);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let index = index_of(&["AB", "CD", "7788"]);
        let pattern = pattern(r"[a-z]{2}");
        let matcher = Matcher::default();
        let first = matcher.match_filename("ab_cd_7788.png", &index, Some(&pattern), None);
        for _ in 0..10 {
            assert_eq!(matcher.match_filename("ab_cd_7788.png", &index, Some(&pattern), None), first);
        }
        assert_eq!(first.unwrap().sku, "AB");
    }
}
