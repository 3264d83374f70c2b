//! Projection of a [`ControlState`] onto CSS.
//!
//! Two outputs share one declaration list: the live [`StyleMap`] applied to a
//! preview surface, and the exported stylesheet with its responsive
//! breakpoints.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt::Write as FmtWrite;

use crate::controls::ControlState;

/// Class name of the exported rule.
pub const EXPORT_SELECTOR: &str = ".custom-typography";
pub const CSS_MIME_TYPE: &str = "text/css";
pub const DEFAULT_CSS_FILE_NAME: &str = "font-styles.css";

/// A responsive override block appended to the exported rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub max_width_px: u32,
    pub font_scale: f64,
    pub min_font_size_px: f64,
    pub line_height: Option<(f64, f64)>,
    pub letter_spacing: Option<(f64, f64)>,
}

/// Breakpoints in emission order. Each scales from the base values.
pub const BREAKPOINTS: [Breakpoint; 2] = [
    Breakpoint {
        max_width_px: 768,
        font_scale: 0.9,
        min_font_size_px: 14.0,
        line_height: Some((0.95, 1.2)),
        letter_spacing: None,
    },
    Breakpoint {
        max_width_px: 480,
        font_scale: 0.8,
        min_font_size_px: 12.0,
        line_height: None,
        letter_spacing: Some((0.8, 0.0)),
    },
];

/// Ordered property-name to value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleMap {
    entries: Vec<(&'static str, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing an earlier value in place.
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// `property: value;` lines with the given indentation.
    pub fn to_declarations(&self, indent: &str) -> String {
        let mut buf = String::new();
        for (property, value) in self.iter() {
            writeln!(buf, "{indent}{property}: {value};").ok();
        }
        buf
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (property, value) in &self.entries {
            map.serialize_entry(property, value)?;
        }
        map.end()
    }
}

/// Formats a number for a CSS value: at most three decimals, no trailing
/// zeros, never `-0`. Magnitudes too large to scale pass through unrounded.
pub fn format_number(value: f64) -> String {
    let scaled = value * 1000.0;
    if !scaled.is_finite() {
        return format!("{}", value + 0.0);
    }
    let rounded = scaled.round() / 1000.0 + 0.0;
    format!("{rounded}")
}

pub fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// `font-feature-settings` value for the active features.
pub fn feature_settings(state: &ControlState) -> String {
    if state.active_features.is_empty() {
        return "normal".to_string();
    }
    state
        .active_features
        .iter()
        .flat_map(|tag| tag.settings().iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Style mapping applied to the live preview surface.
pub fn project_live_style(state: &ControlState) -> StyleMap {
    let mut style = StyleMap::new();
    style.set("font-family", state.font_family.clone());
    style.set("font-size", px(f64::from(state.font_size_px)));
    style.set("font-weight", state.font_weight.to_string());
    style.set("letter-spacing", px(state.letter_spacing_px));
    style.set("line-height", format_number(state.line_height));
    style.set("word-spacing", px(state.word_spacing_px));
    style.set("text-align", state.alignment.as_css());
    style.set("font-feature-settings", feature_settings(state));
    style.set(
        "hyphens",
        if state.hyphenation { "auto" } else { "manual" },
    );

    if state.layout_optimization {
        style.set("text-rendering", "optimizeLegibility");
        style.set("font-optical-sizing", "auto");
        style.set("font-variant-ligatures", "common-ligatures contextual");
    } else {
        style.set("text-rendering", "auto");
        style.set("font-optical-sizing", "none");
        style.set("font-variant-ligatures", "normal");
    }
    style
}

/// Overrides a breakpoint applies on top of the base rule.
pub fn breakpoint_style(state: &ControlState, breakpoint: &Breakpoint) -> StyleMap {
    let mut style = StyleMap::new();
    let font_size = (f64::from(state.font_size_px) * breakpoint.font_scale)
        .max(breakpoint.min_font_size_px);
    style.set("font-size", px(font_size));
    if let Some((scale, floor)) = breakpoint.line_height {
        style.set(
            "line-height",
            format_number((state.line_height * scale).max(floor)),
        );
    }
    if let Some((scale, floor)) = breakpoint.letter_spacing {
        style.set("letter-spacing", px((state.letter_spacing_px * scale).max(floor)));
    }
    style
}

/// Stylesheet text for export: the base rule followed by one media block per
/// breakpoint.
pub fn export_css(state: &ControlState) -> String {
    let mut css = String::new();
    writeln!(css, "{EXPORT_SELECTOR} {{").ok();
    css.push_str(&project_live_style(state).to_declarations("  "));
    css.push_str("}\n");

    for breakpoint in &BREAKPOINTS {
        css.push('\n');
        writeln!(css, "@media (max-width: {}px) {{", breakpoint.max_width_px).ok();
        writeln!(css, "  {EXPORT_SELECTOR} {{").ok();
        css.push_str(&breakpoint_style(state, breakpoint).to_declarations("    "));
        css.push_str("  }\n}\n");
    }
    css
}
