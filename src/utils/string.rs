pub fn unquote_string(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\''))
            || (s.starts_with('`') && s.ends_with('`')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

pub fn extract_last_segment(path: &str) -> String {
    path.rsplit(['/', '.', ':'])
        .next()
        .unwrap_or(path)
        .to_string()
}

/// Comparable form of an identifier: unquoted, qualifier and call parens
/// dropped, lowercased, separators removed. `elliptic.P256()`, `"P-256"` and
/// `p256` all map to `p256`.
pub fn canonical_identifier(identifier: &str) -> String {
    let unquoted = unquote_string(identifier);
    let bare = unquoted.trim().trim_end_matches("()");
    extract_last_segment(bare)
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
