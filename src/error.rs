use crate::controls::ControlParseError;
use crate::render::RenderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TpvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid feature tag: {0}")]
    InvalidFeatureTag(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl TpvError {
    pub fn config(message: impl Into<String>) -> Self {
        TpvError::Config(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            TpvError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            TpvError::Image(e) => ErrorPayload::new(
                ErrorCategory::Render,
                e.to_string(),
                "Verify the output path ends in .png and is writable.",
            ),
            TpvError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON inputs; run with --verbose for details.",
            ),
            TpvError::InvalidFeatureTag(tag) => ErrorPayload::new(
                ErrorCategory::Controls,
                format!("Unknown feature tag '{tag}'"),
                "Use one of: kerning, ligatures, smallCaps, oldstyleNums, tabularNums, fractions.",
            ),
            TpvError::Render(msg) => ErrorPayload::new(
                ErrorCategory::Render,
                msg.to_string(),
                "Use a positive --width and --png-width; run with --verbose for details.",
            ),
            TpvError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("debounce") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a humantime duration up to 10s (e.g., debounce = \"150ms\").",
                    )
                } else if lower.contains("failed to read config") || lower.contains("toml") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Fix the TOML syntax; sections are [controls], [preview] and [export].",
                    )
                } else if lower.contains("file not found") || lower.contains("input file") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the --input file exists, or pass --text / pipe text on stdin.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths (e.g., --width 640) and the config file.",
                    )
                }
            }
            TpvError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

impl From<ControlParseError> for TpvError {
    fn from(err: ControlParseError) -> Self {
        match err {
            ControlParseError::InvalidFeatureTag(tag) => TpvError::InvalidFeatureTag(tag),
            other => TpvError::Config(other.to_string()),
        }
    }
}

impl From<RenderError> for TpvError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Save(e) => TpvError::Image(e),
            RenderError::Io(e) => TpvError::Io(e),
            other => TpvError::Render(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TpvError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Controls,
    Io,
    Render,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_tag_payload_lists_known_tags() {
        let err = TpvError::InvalidFeatureTag("swsh".to_string());
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Controls);
        assert!(payload.message.contains("swsh"));
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("ligatures") && remediation.contains("fractions"),
            "expected remediation to list feature tags, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = TpvError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn config_payload_includes_debounce_hint() {
        let err = TpvError::Config("debounce must not exceed 10s".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("150ms"),
            "expected debounce remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_input_hint() {
        let err = TpvError::Config("Input file not found: notes.txt".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("--text"),
            "expected input remediation, got: {remediation}"
        );
    }

    #[test]
    fn control_parse_error_maps_feature_tag_variant() {
        let err: TpvError = ControlParseError::InvalidFeatureTag("zzz".into()).into();
        assert!(matches!(err, TpvError::InvalidFeatureTag(tag) if tag == "zzz"));

        let err: TpvError = ControlParseError::InvalidAlignment("middle".into()).into();
        assert!(matches!(err, TpvError::Config(_)));
    }

    #[test]
    fn render_error_maps_to_render_category() {
        let err: TpvError = RenderError::EmptyCanvas.into();
        assert_eq!(err.to_payload().category, ErrorCategory::Render);
    }
}
