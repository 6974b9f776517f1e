//! Display formatting helpers.

/// How many leading characters of a key stay visible when masked.
const KEY_VISIBLE_CHARS: usize = 8;

/// Mask an API key for display, keeping a short identifying prefix.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= KEY_VISIBLE_CHARS {
        return "*".repeat(chars.len());
    }
    let prefix: String = chars[..KEY_VISIBLE_CHARS].iter().collect();
    format!("{prefix}...")
}

/// Truncate text to `max` characters, appending an ellipsis when cut.
#[must_use]
pub fn ellipsize(text: &str, max: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return text.to_string();
    }
    let kept: String = chars[..max.saturating_sub(3)].iter().collect();
    format!("{kept}...")
}

/// Count whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
