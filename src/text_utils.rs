// File: src/text_utils.rs

/// Marker appended to text cut by [`truncate_text`].
pub const ELLIPSIS: &str = "..";

/// Cuts `text` to `max_len` characters and appends [`ELLIPSIS`] when it is longer.
/// Works on chars so multi-byte text is never split mid-codepoint.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
