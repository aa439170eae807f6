//! Skill tokenizer: turns free-text skill input into the normalized token
//! sequence the relevance scorer works on.

/// Tokens of this many chars or fewer are dropped ("c", "go", "ai").
pub const MIN_TOKEN_CHARS: usize = 2;

/// Lower-cases `text`, splits on runs of commas and whitespace, and keeps
/// tokens longer than [`MIN_TOKEN_CHARS`]. Order and duplicates are kept.
pub fn skill_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Comma-separated entries of the raw input, trimmed, for echoing back to
/// the caller. No length filter and no case folding.
pub fn display_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
