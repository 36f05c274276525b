// src/core/sanitize.rs

/// Collapse whitespace runs into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop the first `n` characters (not bytes).
pub fn skip_chars(s: &str, n: usize) -> String {
    s.chars().skip(n).collect()
}

/// Lowercase and squash anything that isn't alphanumeric, so
/// "Multi-cache", "multi cache" and "Multi Cache" compare equal.
pub fn label_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
