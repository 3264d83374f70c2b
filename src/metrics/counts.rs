/// Average glyph advance as a fraction of the font size.
pub const AVG_CHAR_WIDTH_EM: f64 = 0.6;

/// Unicode scalar values, not bytes.
pub fn count_characters(text: &str) -> usize {
    text.chars().count()
}

/// Whitespace-delimited segments; blank text has no words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Characters that fit on one line, never less than 1.
///
/// Zero, negative and NaN inputs all fall through to the floor.
pub fn chars_per_line(font_size_px: i32, container_width_px: f64) -> f64 {
    let avg_char_width = f64::from(font_size_px) * AVG_CHAR_WIDTH_EM;
    (container_width_px / avg_char_width).floor().max(1.0)
}

/// Estimated rendered line count, never less than 1.
///
/// Ignores word-wrap boundaries and glyph widths; explicit newlines only
/// count through their contribution to `characters`.
pub fn estimate_lines(characters: usize, font_size_px: i32, container_width_px: f64) -> usize {
    let per_line = chars_per_line(font_size_px, container_width_px);
    (characters as f64 / per_line).ceil().max(1.0) as usize
}
