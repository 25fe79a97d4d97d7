//! Trigger detection: case-insensitive keyword containment.

/// True when `keyword` occurs in `content`, ignoring case. No tokenization,
/// no whitespace normalization; empty content never triggers.
pub fn keyword_present(content: &str, keyword: &str) -> bool {
    if content.is_empty() {
        return false;
    }
    content.to_lowercase().contains(&keyword.to_lowercase())
}
