//! Thin presentation adapter over the pure core.
//!
//! A [`PreviewSession`] owns the current snapshot and rebuilds it for every
//! [`ControlEdit`]; [`PreviewSession::frame`] runs the projector and metrics
//! engine against it and times the pass.

use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::controls::{Alignment, ControlParseError, ControlState, FeatureTag};
use crate::metrics::{compute_metrics, score_adjustments, DerivedMetrics, ScoreAdjustment};
use crate::style::{project_live_style, StyleMap};

/// Shown in place of empty input by display surfaces. Never counted.
pub const PLACEHOLDER_TEXT: &str = "The quick brown fox jumps over the lazy dog";

pub fn display_text(text: &str) -> &str {
    if text.is_empty() {
        PLACEHOLDER_TEXT
    } else {
        text
    }
}

/// One user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEdit {
    SetText(String),
    AppendLine(String),
    FontFamily(String),
    FontSize(i32),
    FontWeight(u32),
    LetterSpacing(f64),
    WordSpacing(f64),
    LineHeight(f64),
    Align(Alignment),
    Feature(FeatureTag, bool),
    Hyphenation(bool),
    LayoutOptimization(bool),
    ContainerWidth(f64),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditParseError {
    #[error("Unknown command ':{0}'")]
    UnknownCommand(String),
    #[error("Missing value for ':{0}'")]
    MissingValue(String),
    #[error("Invalid value '{value}' for ':{command}'")]
    InvalidValue { command: String, value: String },
    #[error(transparent)]
    Control(#[from] ControlParseError),
}

fn parse_value<T: FromStr>(command: &str, value: &str) -> Result<T, EditParseError> {
    value.parse().map_err(|_| EditParseError::InvalidValue {
        command: command.to_string(),
        value: value.to_string(),
    })
}

fn parse_switch(command: &str, value: &str) -> Result<bool, EditParseError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(EditParseError::InvalidValue {
            command: command.to_string(),
            value: value.to_string(),
        }),
    }
}

impl FromStr for ControlEdit {
    type Err = EditParseError;

    /// Lines starting with `:` are commands (`:size 24`, `:feature +liga`...);
    /// anything else is a line of text.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(command_line) = line.strip_prefix(':') else {
            return Ok(ControlEdit::AppendLine(line.to_string()));
        };
        let mut parts = command_line.trim().splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default().to_ascii_lowercase();
        let value = parts.next().map(str::trim).unwrap_or_default();

        if command == "reset" {
            return Ok(ControlEdit::Reset);
        }
        if command == "clear" {
            return Ok(ControlEdit::SetText(String::new()));
        }
        if value.is_empty() {
            return Err(match command.as_str() {
                "family" | "size" | "weight" | "letter" | "word" | "line-height" | "align"
                | "feature" | "hyphens" | "optimize" | "width" => {
                    EditParseError::MissingValue(command)
                }
                _ => EditParseError::UnknownCommand(command),
            });
        }

        let edit = match command.as_str() {
            "family" => ControlEdit::FontFamily(value.to_string()),
            "size" => ControlEdit::FontSize(parse_value(&command, value)?),
            "weight" => ControlEdit::FontWeight(parse_value(&command, value)?),
            "letter" => ControlEdit::LetterSpacing(parse_value(&command, value)?),
            "word" => ControlEdit::WordSpacing(parse_value(&command, value)?),
            "line-height" => ControlEdit::LineHeight(parse_value(&command, value)?),
            "align" => ControlEdit::Align(value.parse()?),
            "feature" => {
                let (enabled, name) = match value.strip_prefix('-') {
                    Some(rest) => (false, rest),
                    None => (true, value.strip_prefix('+').unwrap_or(value)),
                };
                ControlEdit::Feature(name.parse()?, enabled)
            }
            "hyphens" => ControlEdit::Hyphenation(parse_switch(&command, value)?),
            "optimize" => ControlEdit::LayoutOptimization(parse_switch(&command, value)?),
            "width" => ControlEdit::ContainerWidth(parse_value(&command, value)?),
            _ => return Err(EditParseError::UnknownCommand(command)),
        };
        Ok(edit)
    }
}

/// Everything a display surface needs for one rendering pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFrame {
    pub style: StyleMap,
    pub metrics: DerivedMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<ScoreAdjustment>,
    pub render_time_ms: f64,
}

#[derive(Debug, Clone)]
pub struct PreviewSession {
    initial: ControlState,
    state: ControlState,
    initial_width_px: f64,
    container_width_px: f64,
    /// Whether the text holds at least one line, possibly blank.
    has_lines: bool,
}

impl PreviewSession {
    pub fn new(state: ControlState, container_width_px: f64) -> Self {
        let state = state.normalized();
        Self {
            has_lines: !state.text.is_empty(),
            initial: state.clone(),
            state,
            initial_width_px: container_width_px,
            container_width_px,
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn container_width_px(&self) -> f64 {
        self.container_width_px
    }

    /// Rebuilds the snapshot with one edit applied.
    pub fn apply(&mut self, edit: ControlEdit) {
        debug!(?edit, "applying control edit");
        let mut next = self.state.clone();
        match edit {
            ControlEdit::SetText(text) => {
                self.has_lines = !text.is_empty();
                next.text = text;
            }
            ControlEdit::AppendLine(line) => {
                if self.has_lines {
                    next.text.push('\n');
                }
                next.text.push_str(&line);
                self.has_lines = true;
            }
            ControlEdit::FontFamily(family) => next.font_family = family,
            ControlEdit::FontSize(size) => next.font_size_px = size,
            ControlEdit::FontWeight(weight) => next.font_weight = weight,
            ControlEdit::LetterSpacing(px) => next.letter_spacing_px = px,
            ControlEdit::WordSpacing(px) => next.word_spacing_px = px,
            ControlEdit::LineHeight(lh) => next.line_height = lh,
            ControlEdit::Align(alignment) => next.alignment = alignment,
            ControlEdit::Feature(tag, true) => {
                next.active_features.insert(tag);
            }
            ControlEdit::Feature(tag, false) => {
                next.active_features.remove(tag);
            }
            ControlEdit::Hyphenation(on) => next.hyphenation = on,
            ControlEdit::LayoutOptimization(on) => next.layout_optimization = on,
            ControlEdit::ContainerWidth(width) => self.container_width_px = width,
            ControlEdit::Reset => {
                next = self.initial.clone();
                self.has_lines = !next.text.is_empty();
                self.container_width_px = self.initial_width_px;
            }
        }
        self.state = next.normalized();
    }

    pub fn frame(&self) -> PreviewFrame {
        let started = Instant::now();
        let style = project_live_style(&self.state);
        let metrics = compute_metrics(&self.state.text, &self.state, self.container_width_px);
        let adjustments = score_adjustments(&self.state.text, &self.state);
        let render_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        PreviewFrame {
            style,
            metrics,
            adjustments,
            render_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_append_text() {
        assert_eq!(
            "hello".parse::<ControlEdit>(),
            Ok(ControlEdit::AppendLine("hello".to_string()))
        );
        let mut session = PreviewSession::new(ControlState::default(), 640.0);
        session.apply(ControlEdit::AppendLine("first".into()));
        session.apply(ControlEdit::AppendLine("second".into()));
        assert_eq!(session.state().text, "first\nsecond");
        assert_eq!(session.frame().metrics.words, 2);
    }

    #[test]
    fn leading_blank_lines_keep_their_newline() {
        let mut session = PreviewSession::new(ControlState::default(), 640.0);
        session.apply(ControlEdit::AppendLine(String::new()));
        session.apply(ControlEdit::AppendLine("abc".into()));
        assert_eq!(session.state().text, "\nabc");
        assert_eq!(session.frame().metrics.characters, 4);

        session.apply(ControlEdit::SetText(String::new()));
        session.apply(ControlEdit::AppendLine(String::new()));
        session.apply(ControlEdit::AppendLine(String::new()));
        session.apply(ControlEdit::AppendLine("x".into()));
        assert_eq!(session.state().text, "\n\nx");

        session.apply(ControlEdit::Reset);
        session.apply(ControlEdit::AppendLine("first".into()));
        assert_eq!(session.state().text, "first");
    }

    #[test]
    fn parses_commands() {
        assert_eq!(":size 24".parse(), Ok(ControlEdit::FontSize(24)));
        assert_eq!(":letter -1.5".parse(), Ok(ControlEdit::LetterSpacing(-1.5)));
        assert_eq!(
            ":align justify".parse(),
            Ok(ControlEdit::Align(Alignment::Justify))
        );
        assert_eq!(
            ":feature +ligatures".parse(),
            Ok(ControlEdit::Feature(FeatureTag::Ligatures, true))
        );
        assert_eq!(
            ":feature -kerning".parse(),
            Ok(ControlEdit::Feature(FeatureTag::Kerning, false))
        );
        assert_eq!(":hyphens on".parse(), Ok(ControlEdit::Hyphenation(true)));
        assert_eq!(":reset".parse(), Ok(ControlEdit::Reset));
        assert_eq!(":clear".parse(), Ok(ControlEdit::SetText(String::new())));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            ":bogus 1".parse::<ControlEdit>(),
            Err(EditParseError::UnknownCommand("bogus".to_string()))
        );
        assert_eq!(
            ":size".parse::<ControlEdit>(),
            Err(EditParseError::MissingValue("size".to_string()))
        );
        assert!(matches!(
            ":size big".parse::<ControlEdit>(),
            Err(EditParseError::InvalidValue { .. })
        ));
        assert!(matches!(
            ":feature +swsh".parse::<ControlEdit>(),
            Err(EditParseError::Control(ControlParseError::InvalidFeatureTag(_)))
        ));
    }

    #[test]
    fn edits_rebuild_state_and_reset_restores_initial() {
        let mut session = PreviewSession::new(ControlState::default(), 640.0);
        session.apply(ControlEdit::FontSize(32));
        session.apply(ControlEdit::Feature(FeatureTag::Ligatures, true));
        session.apply(ControlEdit::ContainerWidth(320.0));
        session.apply(ControlEdit::FontFamily(" ".into()));

        assert_eq!(session.state().font_size_px, 32);
        assert_eq!(session.state().font_family, "serif");
        assert_eq!(session.container_width_px(), 320.0);
        assert_eq!(session.frame().style.get("font-size"), Some("32px"));
        assert_eq!(session.frame().metrics.active_feature_count, 2);

        session.apply(ControlEdit::Reset);
        assert_eq!(session.state(), &ControlState::default());
        assert_eq!(session.container_width_px(), 640.0);
    }

    #[test]
    fn frame_reports_fired_rules_and_timing() {
        let state = ControlState::default().with_text("office");
        let frame = PreviewSession::new(state, 640.0).frame();
        assert_eq!(frame.metrics.layout_score, 100);
        assert_eq!(frame.adjustments.len(), 1);
        assert!(frame.render_time_ms >= 0.0);
    }

    #[test]
    fn placeholder_only_for_empty_text() {
        assert_eq!(display_text(""), PLACEHOLDER_TEXT);
        assert_eq!(display_text(" "), " ");
    }
}
