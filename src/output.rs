use crate::error::ErrorPayload;
use crate::metrics::{DerivedMetrics, ScoreAdjustment};
use crate::session::PreviewFrame;
use crate::style::StyleMap;
use serde::Serialize;
use std::path::PathBuf;

/// Schema version for output payloads.
pub const TPV_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum TpvOutput {
    Metrics(MetricsOutput),
    Style(StyleOutput),
    Css(CssOutput),
    Png(PngOutput),
    WatchFrame(WatchFrameOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsOutput {
    pub version: String,
    pub container_width_px: f64,
    pub metrics: DerivedMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<ScoreAdjustment>,
    pub render_time_ms: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOutput {
    pub version: String,
    pub style: StyleMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssOutput {
    pub version: String,
    pub mime_type: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PngOutput {
    pub version: String,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub lines: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchFrameOutput {
    pub version: String,
    pub sequence: u64,
    #[serde(flatten)]
    pub frame: PreviewFrame,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
