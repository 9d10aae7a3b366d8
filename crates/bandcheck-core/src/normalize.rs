//! Answer normalization.
//!
//! Both user answers and accepted answers go through [`normalize`] before
//! they are compared, so matching ignores case and spacing.

use serde_json::Value;

/// Lowercase, trim, and collapse internal whitespace runs to a single space.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a loosely-typed JSON value. Anything other than a string
/// normalizes to the empty string.
pub fn normalize_json(value: &Value) -> String {
    match value {
        Value::String(s) => normalize(s),
        _ => String::new(),
    }
}

/// Normalize every entry and sort the result, for order-independent
/// comparison of multi-select answers.
pub fn normalized_sorted<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut out: Vec<String> = items.iter().map(|s| normalize(s.as_ref())).collect();
    out.sort();
    out
}
