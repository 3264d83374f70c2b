use super::*;
use crate::controls::{ControlState, FeatureSet, FeatureTag};

fn ligature_state() -> ControlState {
    ControlState {
        active_features: [FeatureTag::Kerning, FeatureTag::Ligatures]
            .into_iter()
            .collect(),
        ..ControlState::default()
    }
}

#[test]
fn empty_and_blank_text_have_no_words() {
    let state = ControlState::default();
    assert_eq!(compute_metrics("", &state, 600.0).words, 0);
    assert_eq!(compute_metrics("   ", &state, 600.0).words, 0);
    assert_eq!(compute_metrics("\n\t ", &state, 600.0).words, 0);
}

#[test]
fn words_ignore_whitespace_run_length() {
    let state = ControlState::default();
    assert_eq!(compute_metrics("hello world", &state, 600.0).words, 2);
    assert_eq!(compute_metrics("hello   world", &state, 600.0).words, 2);
    assert_eq!(compute_metrics("  hello \n\t world  ", &state, 600.0).words, 2);
}

#[test]
fn characters_count_scalar_values_not_bytes() {
    let state = ControlState::default();
    let metrics = compute_metrics("ﬁne café 🙂", &state, 600.0);
    assert_eq!(metrics.characters, 10);
    assert_eq!(count_characters(""), 0);
}

#[test]
fn lines_follow_average_width_heuristic() {
    // 16px * 0.6 = 9.6px per glyph; 96px fits 10 glyphs per line.
    let state = ControlState::default();
    assert_eq!(chars_per_line(16, 96.0), 10.0);
    assert_eq!(compute_metrics("abcdefghij", &state, 96.0).lines, 1);
    assert_eq!(compute_metrics("abcdefghijk", &state, 96.0).lines, 2);
    assert_eq!(compute_metrics(&"x".repeat(25), &state, 96.0).lines, 3);
}

#[test]
fn lines_never_drop_below_one() {
    let state = ControlState::default();
    assert_eq!(compute_metrics("", &state, 600.0).lines, 1);
    assert_eq!(compute_metrics("abc", &state, 0.0).lines, 3);
    assert_eq!(compute_metrics("abc", &state, -50.0).lines, 3);
    assert_eq!(compute_metrics("abc", &state, f64::NAN).lines, 3);
}

#[test]
fn degenerate_font_sizes_do_not_panic() {
    let zero = ControlState {
        font_size_px: 0,
        ..ControlState::default()
    };
    assert_eq!(compute_metrics("hello", &zero, 600.0).lines, 1);

    let negative = ControlState {
        font_size_px: -12,
        ..ControlState::default()
    };
    assert_eq!(compute_metrics("hello", &negative, 600.0).lines, 5);
}

#[test]
fn newlines_only_contribute_characters_to_line_estimate() {
    let state = ControlState::default();
    let metrics = compute_metrics("a\nb\nc", &state, 600.0);
    assert_eq!(metrics.characters, 5);
    assert_eq!(metrics.lines, 1);
}

#[test]
fn default_state_scores_line_height_bonus_clamped() {
    let state = ControlState::default();
    assert_eq!(
        score_adjustments("plain text", &state),
        vec![ScoreAdjustment {
            rule: ScoreRule::ComfortableLineHeight,
            delta: 5
        }]
    );
    assert_eq!(layout_score("plain text", &state), 100);
}

#[test]
fn long_lines_penalized_by_newline_average() {
    let state = ControlState {
        line_height: 2.0,
        ..ControlState::default()
    };
    let long = "a".repeat(81);
    assert_eq!(layout_score(&long, &state), 90);

    let exactly_eighty = "a".repeat(80);
    assert_eq!(layout_score(&exactly_eighty, &state), 100);

    let split = format!("{}\n{}", "a".repeat(60), "a".repeat(60));
    assert_eq!(layout_score(&split, &state), 100);
}

#[test]
fn line_height_bonus_is_inclusive() {
    for (lh, expected) in [(1.39, false), (1.4, true), (1.5, true), (1.6, true), (1.61, false)] {
        let state = ControlState {
            line_height: lh,
            ..ControlState::default()
        };
        let fired = score_adjustments("x", &state)
            .iter()
            .any(|adj| adj.rule == ScoreRule::ComfortableLineHeight);
        assert_eq!(fired, expected, "line height {lh}");
    }
}

#[test]
fn ligature_bonus_requires_feature_and_sequence() {
    let text = "The quick brown fox...office traffic";
    let fired = |state: &ControlState, text: &str| {
        score_adjustments(text, state)
            .iter()
            .any(|adj| adj.rule == ScoreRule::LigatureOpportunity)
    };

    assert!(fired(&ligature_state(), text));
    assert!(!fired(&ControlState::default(), text));
    assert!(!fired(&ligature_state(), "The quick brown dog"));
    assert!(fired(&ligature_state(), "flat"));
}

#[test]
fn ligature_bonus_offsets_penalty() {
    let state = ControlState {
        letter_spacing_px: -3.0,
        line_height: 1.0,
        ..ligature_state()
    };
    assert_eq!(layout_score("office", &state), 100);
    assert_eq!(layout_score("orange", &state), 95);
}

#[test]
fn negative_letter_spacing_penalized_by_magnitude() {
    let state = ControlState {
        letter_spacing_px: -3.0,
        line_height: 1.0,
        ..ControlState::default()
    };
    assert_eq!(layout_score("text", &state), 95);

    let within = ControlState {
        letter_spacing_px: 2.0,
        line_height: 1.0,
        ..ControlState::default()
    };
    assert_eq!(layout_score("text", &within), 100);
}

#[test]
fn score_stays_in_range_for_extreme_inputs() {
    let extremes = [
        ControlState {
            letter_spacing_px: 1000.0,
            line_height: 99.0,
            font_size_px: i32::MAX,
            ..ControlState::default()
        },
        ControlState {
            letter_spacing_px: f64::NEG_INFINITY,
            line_height: f64::NAN,
            font_size_px: i32::MIN,
            active_features: FeatureSet::new(),
            ..ControlState::default()
        },
    ];
    let long_text = "x".repeat(10_000);
    for state in &extremes {
        for text in ["", "ffi", long_text.as_str()] {
            for width in [0.0, 1.0, 1e12, f64::INFINITY] {
                let metrics = compute_metrics(text, state, width);
                assert!(metrics.layout_score <= 100);
                assert!(metrics.lines >= 1);
            }
        }
    }
    assert_eq!(layout_score(&long_text, &extremes[0]), 85);
}

#[test]
fn active_feature_count_matches_set_size() {
    assert_eq!(
        compute_metrics("", &ligature_state(), 600.0).active_feature_count,
        2
    );
    let none = ControlState {
        active_features: FeatureSet::new(),
        ..ControlState::default()
    };
    assert_eq!(compute_metrics("", &none, 600.0).active_feature_count, 0);
}

#[test]
fn compute_metrics_is_idempotent() {
    let state = ligature_state();
    let text = "Difficult fluffy affairs\nof the office";
    let first = compute_metrics(text, &state, 480.0);
    let second = compute_metrics(text, &state, 480.0);
    assert_eq!(first, second);
}

#[test]
fn derived_metrics_serialize_camel_case() {
    let metrics = compute_metrics("hello world", &ControlState::default(), 600.0);
    let json = serde_json::to_string(&metrics).expect("serialize metrics");
    assert!(json.contains("\"layoutScore\":100"));
    assert!(json.contains("\"activeFeatureCount\":1"));
}
