use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::controls::{ControlState, FeatureTag};

use super::counts::count_characters;

pub const BASE_SCORE: i32 = 100;
pub const MAX_AVERAGE_LINE_LENGTH: f64 = 80.0;
pub const COMFORTABLE_LINE_HEIGHT: RangeInclusive<f64> = 1.4..=1.6;
pub const LIGATURE_SEQUENCES: [&str; 5] = ["fi", "fl", "ff", "ffi", "ffl"];
pub const LETTER_SPACING_LIMIT_PX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreRule {
    LongLines,
    ComfortableLineHeight,
    LigatureOpportunity,
    WideLetterSpacing,
}

impl ScoreRule {
    pub const fn all() -> [ScoreRule; 4] {
        [
            ScoreRule::LongLines,
            ScoreRule::ComfortableLineHeight,
            ScoreRule::LigatureOpportunity,
            ScoreRule::WideLetterSpacing,
        ]
    }

    pub const fn delta(self) -> i32 {
        match self {
            ScoreRule::LongLines => -10,
            ScoreRule::ComfortableLineHeight => 5,
            ScoreRule::LigatureOpportunity => 5,
            ScoreRule::WideLetterSpacing => -5,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ScoreRule::LongLines => "Average line length exceeds 80 characters",
            ScoreRule::ComfortableLineHeight => "Line height sits in the 1.4-1.6 comfort range",
            ScoreRule::LigatureOpportunity => "Ligatures are enabled and the text has ligature pairs",
            ScoreRule::WideLetterSpacing => "Letter spacing exceeds 2px in magnitude",
        }
    }

    fn applies(self, text: &str, characters: usize, state: &ControlState) -> bool {
        match self {
            ScoreRule::LongLines => {
                let newlines = text.chars().filter(|c| *c == '\n').count();
                let average = characters as f64 / (newlines + 1).max(1) as f64;
                average > MAX_AVERAGE_LINE_LENGTH
            }
            ScoreRule::ComfortableLineHeight => COMFORTABLE_LINE_HEIGHT.contains(&state.line_height),
            ScoreRule::LigatureOpportunity => {
                state.active_features.contains(FeatureTag::Ligatures)
                    && LIGATURE_SEQUENCES.iter().any(|seq| text.contains(seq))
            }
            ScoreRule::WideLetterSpacing => state.letter_spacing_px.abs() > LETTER_SPACING_LIMIT_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAdjustment {
    pub rule: ScoreRule,
    pub delta: i32,
}

/// Rules that fire for this snapshot, in rule order.
pub fn score_adjustments(text: &str, state: &ControlState) -> Vec<ScoreAdjustment> {
    let characters = count_characters(text);
    ScoreRule::all()
        .into_iter()
        .filter(|rule| rule.applies(text, characters, state))
        .map(|rule| ScoreAdjustment {
            rule,
            delta: rule.delta(),
        })
        .collect()
}

/// Heuristic layout quality, clamped to 0..=100.
pub fn layout_score(text: &str, state: &ControlState) -> u8 {
    let total: i32 = BASE_SCORE
        + score_adjustments(text, state)
            .iter()
            .map(|adj| adj.delta)
            .sum::<i32>();
    total.clamp(0, 100) as u8
}
