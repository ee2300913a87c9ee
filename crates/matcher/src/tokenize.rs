//! Filename tokenization.

use crate::consts::{DIGIT_RUN_REGEX, SEGMENT_DELIMITER_REGEX};
use snapsku_catalog::normalize;
use std::collections::BTreeSet;

/// Widest window of adjacent segments joined into a single candidate.
///
/// Recovers SKUs split across delimiters (`BRAND_ABC-123` → `ABC123`) without
/// considering every combination of segments.
pub const MAX_WINDOW: usize = 3;
/// Shortest run of digits considered by [`digit_runs`].
pub const MIN_DIGIT_RUN: usize = 3;

/// The final component of a path, accepting either separator.
///
/// ```
/// use snapsku_matcher::file_name;
/// assert_eq!(file_name("shoot/day-2\\IMG_0001.JPG"), "IMG_0001.JPG");
/// assert_eq!(file_name("plain.png"), "plain.png");
/// ```
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Remove the last dot-delimited suffix, if there is a non-empty one.
///
/// ```
/// use snapsku_matcher::strip_extension;
/// assert_eq!(strip_extension("acme_red_7788.png"), "acme_red_7788");
/// assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
/// assert_eq!(strip_extension("no-extension"), "no-extension");
/// assert_eq!(strip_extension("trailing."), "trailing.");
/// ```
pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((base, extension)) if !extension.is_empty() => base,
        _ => filename,
    }
}

/// Extract the normalized candidate tokens of a filename.
///
/// 1. Any directory components and the extension are removed.
/// 2. The remaining basename is split on runs of `_`, `-`, `.` or whitespace.
/// 3. Each segment is [normalized](normalize); segments that normalize to
///    nothing are dropped.
/// 4. Every contiguous window of 1 to [`MAX_WINDOW`] segments is joined into
///    a candidate.
/// 5. The whole normalized basename is added, for filenames that are a bare
///    SKU.
///
/// The result is a set (deduplicated, deterministic iteration order).
///
/// ```
/// use snapsku_matcher::tokenize;
///
/// let tokens = tokenize("acme_ABC-123.jpg");
/// assert!(tokens.contains("ABC"));
/// assert!(tokens.contains("ABC123"));
/// assert!(tokens.contains("ACMEABC123"));
/// assert!(!tokens.contains("ACME123"));
/// ```
pub fn tokenize(filename: &str) -> BTreeSet<String> {
    let basename = strip_extension(file_name(filename));
    let segments: Vec<String> =
        SEGMENT_DELIMITER_REGEX.split(basename).map(normalize).filter(|segment| !segment.is_empty()).collect();

    let mut tokens = BTreeSet::new();
    for width in 1..=MAX_WINDOW {
        for window in segments.windows(width) {
            tokens.insert(window.concat());
        }
    }
    let whole = normalize(basename);
    if !whole.is_empty() {
        tokens.insert(whole);
    }
    tokens
}

/// Every run of at least [`MIN_DIGIT_RUN`] ASCII digits in the filename
/// (extension included), in order of appearance.
///
/// ```
/// use snapsku_matcher::digit_runs;
/// assert_eq!(digit_runs("_MG_5514.jpg"), vec!["5514"]);
/// assert_eq!(digit_runs("IMG_0042-12-00777.png"), vec!["0042", "00777"]);
/// ```
pub fn digit_runs(filename: &str) -> Vec<&str> {
    DIGIT_RUN_REGEX.find_iter(file_name(filename)).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(filename: &str) -> Vec<String> {
        tokenize(filename).into_iter().collect()
    }

    #[test]
    fn test_windows_of_one_to_three_segments() {
        assert_eq!(
            tokens("a_b_c_d.jpg"),
            vec!["A", "AB", "ABC", "ABCD", "B", "BC", "BCD", "C", "CD", "D"]
        );
    }

    #[test]
    fn test_no_window_wider_than_three() {
        // ABCD only appears because it is the whole basename.
        let all = tokenize("a_b_c_d_e.jpg");
        assert!(all.contains("ABCDE"));
        assert!(!all.contains("ABCD"));
        assert!(!all.contains("BCDE"));
    }

    #[test]
    fn test_deduplicates() {
        assert_eq!(tokens("7788.png"), vec!["7788"]);
        assert_eq!(tokens("x_x.png"), vec!["X", "XX"]);
    }

    #[rstest]
    #[case("acme_red_7788.png", &["7788", "ACME", "ACMERED", "ACMERED7788", "RED", "RED7788"])]
    #[case("Acme  Red--7788 .webp", &["7788", "ACME", "ACMERED", "ACMERED7788", "RED", "RED7788"])]
    #[case("BRAND_ABC-123.jpg", &["123", "ABC", "ABC123", "BRAND", "BRANDABC", "BRANDABC123"])]
    #[case("photos/2024/ab.12.JPG", &["12", "AB", "AB12"])]
    fn test_tokenize(#[case] filename: &str, #[case] expected: &[&str]) {
        assert_eq!(tokens(filename), expected);
    }

    #[test]
    fn test_symbols_are_stripped_not_split() {
        let all = tokenize("ab(1)+c.png");
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec!["AB1C"]);
    }

    #[rstest]
    #[case("", &[])]
    #[case(".png", &[])]
    #[case("___.jpg", &[])]
    fn test_empty_tokenizations(#[case] filename: &str, #[case] expected: &[&str]) {
        assert_eq!(tokens(filename), expected);
    }

    #[test]
    fn test_digit_runs_need_three_digits() {
        assert!(digit_runs("a12_b3.png").is_empty());
        assert_eq!(digit_runs("DSC00123.jpg"), vec!["00123"]);
    }
}
