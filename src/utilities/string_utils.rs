//! String utility functions.
//!
//! All lengths here are counted in characters, never bytes, so slicing is
//! safe on any UTF-8 input.

/// Keep at most `max_chars` leading characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Upper-case the first character and lower-case the rest.
///
/// `"SpezFan_99"` becomes `"Spezfan_99"`.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
