//! Task reference extraction
//!
//! A reference is the tracker prefix `WEEEK` (the historical `WEEK` spelling
//! is also accepted), case-insensitive, an optional `-`, and one or more
//! digits. The digit run is the task identifier.

use regex::Regex;
use std::sync::LazyLock;

static TASK_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)weee?k-?(\d+)").expect("TASK_REF is a compile-time constant"));

/// Extract every task identifier referenced in `text`.
///
/// Duplicates are collapsed; the first occurrence decides enumeration order.
#[must_use]
pub fn extract_refs(text: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for captures in TASK_REF.captures_iter(text) {
        if let Some(id) = captures.get(1) {
            let id = id.as_str();
            if !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
    }
    ids
}

/// Extract the first task identifier referenced in `text`, if any.
///
/// Branch names carry at most one meaningful reference; extra matches are
/// ignored.
#[must_use]
pub fn first_ref(text: &str) -> Option<String> {
    TASK_REF
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}
