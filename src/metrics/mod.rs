//! Metrics engine: counts and the heuristic layout score.
//!
//! Everything here is a pure function of `(text, ControlState, width)`:
//! - Character / word counts
//! - Estimated line count (average glyph width heuristic)
//! - Layout score (0-100) built from independent rules
//! - Active OpenType feature count

mod counts;
mod score;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::controls::ControlState;

pub use counts::{
    chars_per_line, count_characters, count_words, estimate_lines, AVG_CHAR_WIDTH_EM,
};
pub use score::{
    layout_score, score_adjustments, ScoreAdjustment, ScoreRule, BASE_SCORE,
    COMFORTABLE_LINE_HEIGHT, LETTER_SPACING_LIMIT_PX, LIGATURE_SEQUENCES,
    MAX_AVERAGE_LINE_LENGTH,
};

/// Numbers shown next to the preview. Recomputed from scratch every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub characters: usize,
    pub words: usize,
    /// Always at least 1.
    pub lines: usize,
    /// Clamped to 0..=100.
    pub layout_score: u8,
    pub active_feature_count: usize,
}

/// Computes every derived metric for `text` rendered with `state` into a
/// container `container_width_px` wide.
pub fn compute_metrics(text: &str, state: &ControlState, container_width_px: f64) -> DerivedMetrics {
    let characters = count_characters(text);
    DerivedMetrics {
        characters,
        words: count_words(text),
        lines: estimate_lines(characters, state.font_size_px, container_width_px),
        layout_score: layout_score(text, state),
        active_feature_count: state.active_features.len(),
    }
}
