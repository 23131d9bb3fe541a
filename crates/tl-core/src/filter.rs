//! Line filtering by a user-supplied regular expression.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Compiles a case-insensitive filter pattern.
pub fn compile(pattern: &str) -> Result<Regex, FilterError> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Keeps the lines of `text` matching `pattern` anywhere, case-insensitively.
///
/// Every kept line is terminated by a newline.
pub fn filter(text: &str, pattern: &str) -> Result<String, FilterError> {
    let re = compile(pattern)?;
    Ok(filter_lines(text, &re))
}

/// Keeps the lines of `text` matched by `re`.
pub fn filter_lines(text: &str, re: &Regex) -> String {
    let mut out = String::new();
    for line in text.lines().filter(|line| re.is_match(line)) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_line_granular() {
        assert_eq!(filter("a\nb\nabc\n", "a").unwrap(), "a\nabc\n");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let text = "09:00 → 09:15 Standup\n09:15 → 10:00 review\n";
        assert_eq!(
            filter(text, "STANDUP").unwrap(),
            "09:00 → 09:15 Standup\n"
        );
    }

    #[test]
    fn test_filter_supports_regex_syntax() {
        let text = "[nvim] fix\n[lsp] hover\nplain\n";
        assert_eq!(filter(text, r"^\[(nvim|lsp)\]").unwrap(), "[nvim] fix\n[lsp] hover\n");
    }

    #[test]
    fn test_filter_without_matches_is_empty() {
        assert_eq!(filter("a\nb\n", "z").unwrap(), "");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = filter("a\n", "(unclosed").unwrap_err();
        assert!(err.to_string().starts_with("invalid filter pattern"));
    }
}
