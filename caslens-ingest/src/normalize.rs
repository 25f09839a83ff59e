//! Page text normalization.
//!
//! The extraction layer does not keep table-cell boundaries, so fragments are
//! joined with a single space. That keeps a value and the ISIN after it on one
//! line (`45,230.50 INF...`) without fusing adjacent words.

/// Join one page's ordered text fragments into a single string.
pub fn normalize_page<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max_chars` characters of a page, used for header checks.
pub fn header_window(page_text: &str, max_chars: usize) -> &str {
    match page_text.char_indices().nth(max_chars) {
        Some((idx, _)) => &page_text[..idx],
        None => page_text,
    }
}
