//! Filename → SKU matching.
//!
//! Given an image filename, a batch's [`SkuIndex`](snapsku_catalog::SkuIndex)
//! and (optionally) the brand's [`BrandPattern`](snapsku_catalog::BrandPattern),
//! decide which catalog product the image belongs to.
//!
//! 1. The [tokenizer](tokenize) breaks the filename into normalized candidate
//!    tokens: single segments plus adjacent windows of two and three segments.
//! 2. The [`Matcher`] runs a ranked list of [`MatchStrategy`]s (configurable
//!    per brand via a [`StrategyTable`]) and stops at the first hit.
//!
//! Matching is strictly exact at the token level. There is no edit-distance
//! or substring scoring. An unmatched filename is a normal outcome, not an
//! error.

mod consts;
mod matcher;
mod strategy;
mod tokenize;

pub use crate::matcher::{DEFAULT_MIN_TOKEN_LEN, MatchResult, Matcher};
pub use crate::strategy::{EXACT_CONFIDENCE, MatchStrategy, NUMERIC_CONFIDENCE, StrategyTable};
pub use crate::tokenize::{MAX_WINDOW, MIN_DIGIT_RUN, digit_runs, file_name, strip_extension, tokenize};
