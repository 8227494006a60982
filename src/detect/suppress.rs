//! Inline suppression of violations via `noqa` comments.
//!
//! Supports suppression comments like:
//! - `# noqa` suppresses every violation reported on the line
//! - `# noqa: DCO020,DCO023` suppresses only the listed codes
//!
//! A directive after the closing quotes of a multi-line string applies to
//! every line of that string.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::Comment;

use super::Violation;

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Codes to suppress (upper case); empty suppresses all codes.
    pub codes: Vec<String>,
    /// File containing the suppression
    pub file: String,
    /// Line number of the comment
    pub line: usize,
    /// First line covered; earlier than `line` for a trailing multi-line string.
    pub first_line: usize,
}

impl Suppression {
    pub fn is_blanket(&self) -> bool {
        self.codes.is_empty()
    }
}

/// A violation that was suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedViolation {
    pub violation: Violation,
    pub suppression: Suppression,
}

lazy_static! {
    /// `# noqa` optionally followed by `: CODE[,CODE...]`.
    static ref NOQA: Regex =
        Regex::new(r"(?i)#\s*noqa(?::\s*(?P<codes>[A-Z]+[0-9]+(?:[,\s]+[A-Z]+[0-9]+)*))?")
            .unwrap();
    static ref CODE: Regex = Regex::new(r"[A-Za-z]+[0-9]+").unwrap();
}

/// Parse one comment. Returns the suppressed codes (empty for all codes), or
/// `None` when the comment is not a `noqa` directive.
pub fn parse_noqa(comment: &str) -> Option<Vec<String>> {
    let caps = NOQA.captures(comment)?;
    let codes = caps
        .name("codes")
        .map(|m| {
            CODE.find_iter(m.as_str())
                .map(|c| c.as_str().to_ascii_uppercase())
                .collect()
        })
        .unwrap_or_default();
    Some(codes)
}

/// Parse suppression directives from a file's comments.
pub fn parse_suppressions(file_path: &str, comments: &[Comment]) -> Vec<Suppression> {
    comments
        .iter()
        .filter_map(|comment| {
            parse_noqa(&comment.text).map(|codes| Suppression {
                codes,
                file: file_path.to_string(),
                line: comment.line,
                first_line: comment.first_line,
            })
        })
        .collect()
}

/// Check if a violation matches a suppression.
pub fn matches_suppression(violation: &Violation, suppression: &Suppression) -> bool {
    if violation.file != suppression.file
        || !(suppression.first_line..=suppression.line).contains(&violation.line)
    {
        return false;
    }

    suppression.is_blanket() || suppression.codes.iter().any(|c| c == violation.code.as_str())
}

/// Separate violations into active and suppressed based on suppressions.
pub fn filter_suppressed(
    violations: Vec<Violation>,
    suppressions: &[Suppression],
) -> (Vec<Violation>, Vec<SuppressedViolation>) {
    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for violation in violations {
        match suppressions
            .iter()
            .find(|s| matches_suppression(&violation, s))
        {
            Some(suppression) => suppressed.push(SuppressedViolation {
                violation,
                suppression: suppression.clone(),
            }),
            None => active.push(violation),
        }
    }

    (active, suppressed)
}
