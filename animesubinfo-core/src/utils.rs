//! Small helpers shared by the parsers.

use regex::Regex;

/// Compiles a regex literal known to be valid at build time.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regex. Only used with string literals
/// covered by unit tests.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
