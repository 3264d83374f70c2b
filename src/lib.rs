//! Typography Preview (TPV) Library
//!
//! Pure typography core for a live font preview: a control snapshot is
//! projected onto CSS (live style map and exported stylesheet) and measured
//! (character/word/line counts and a heuristic layout score).
//!
//! # Module Overview
//!
//! - [`controls`] - Control snapshot, feature tags and alignment
//! - [`style`] - Live style projection and CSS export with breakpoints
//! - [`metrics`] - Counts, line estimate and layout score
//! - [`render`] - PNG layout proof export
//! - [`session`] - Edit-driven preview session (presentation adapter)
//! - [`adapter`] - Debouncing and counter animation helpers
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```
//! use tpv_lib::{compute_metrics, export_css, project_live_style, ControlState, FeatureTag};
//!
//! let mut state = ControlState::default().with_text("Affluent office traffic");
//! state.active_features.insert(FeatureTag::Ligatures);
//!
//! let style = project_live_style(&state);
//! assert_eq!(style.get("font-feature-settings"), Some(r#""kern" 1, "liga" 1, "clig" 1"#));
//!
//! let css = export_css(&state);
//! assert!(css.starts_with(".custom-typography {"));
//!
//! let metrics = compute_metrics(&state.text, &state, 640.0);
//! assert_eq!(metrics.words, 3);
//! assert_eq!(metrics.layout_score, 100);
//! ```

pub mod adapter;
pub mod config;
pub mod controls;
pub mod error;
pub mod metrics;
pub mod output;
pub mod render;
pub mod session;
pub mod style;

pub use config::Config;
pub use controls::{Alignment, ControlState, DomainWarning, FeatureSet, FeatureTag};
pub use error::{Result, TpvError};
pub use metrics::{compute_metrics, layout_score, DerivedMetrics, ScoreAdjustment, ScoreRule};
pub use output::{
    CssOutput, ErrorOutput, MetricsOutput, PngOutput, StyleOutput, TpvOutput, WatchFrameOutput,
    TPV_OUTPUT_VERSION,
};
pub use render::{render_layout_proof, save_layout_proof, ProofOptions};
pub use session::{ControlEdit, PreviewFrame, PreviewSession};
pub use style::{export_css, project_live_style, StyleMap};
