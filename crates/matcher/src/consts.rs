use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Runs of underscore, hyphen, dot or whitespace separate filename segments.
regex!(SEGMENT_DELIMITER_REGEX, r"[_\-.\s]+");
// ASCII only: `\d` would also accept other Unicode decimal digits.
regex!(DIGIT_RUN_REGEX, r"[0-9]{3,}");
