//! Control state: the immutable snapshot of every typography parameter.
//!
//! A [`ControlState`] is rebuilt on every interaction and handed to the pure
//! projector and metrics functions. Nothing here clamps values; out-of-range
//! inputs are reported as [`DomainWarning`]s and passed through untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_FONT_FAMILY: &str = "serif";
pub const DEFAULT_FONT_SIZE_PX: i32 = 16;
pub const DEFAULT_FONT_WEIGHT: u32 = 400;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.4;

/// Documented font-size domain of the size slider.
pub const FONT_SIZE_RANGE: RangeInclusive<i32> = 12..=72;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlParseError {
    #[error("Unknown feature tag '{0}'")]
    InvalidFeatureTag(String),
    #[error("Unknown alignment '{0}' (expected left, center, right or justify)")]
    InvalidAlignment(String),
}

/// Text alignment. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub const fn all() -> [Alignment; 4] {
        [
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::Justify,
        ]
    }

    pub const fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

impl FromStr for Alignment {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Alignment::all()
            .into_iter()
            .find(|a| a.as_css().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ControlParseError::InvalidAlignment(s.to_string()))
    }
}

/// One of the six supported OpenType feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureTag {
    Kerning,
    Ligatures,
    SmallCaps,
    OldstyleNums,
    TabularNums,
    Fractions,
}

impl FeatureTag {
    pub const fn all() -> [FeatureTag; 6] {
        [
            FeatureTag::Kerning,
            FeatureTag::Ligatures,
            FeatureTag::SmallCaps,
            FeatureTag::OldstyleNums,
            FeatureTag::TabularNums,
            FeatureTag::Fractions,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            FeatureTag::Kerning => "kerning",
            FeatureTag::Ligatures => "ligatures",
            FeatureTag::SmallCaps => "smallCaps",
            FeatureTag::OldstyleNums => "oldstyleNums",
            FeatureTag::TabularNums => "tabularNums",
            FeatureTag::Fractions => "fractions",
        }
    }

    /// `font-feature-settings` entries this toggle enables.
    /// `smallCaps` becomes `small-caps`.
    fn kebab_name(self) -> String {
        let mut out = String::new();
        for ch in self.name().chars() {
            if ch.is_ascii_uppercase() {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        }
        out
    }

    pub const fn settings(self) -> &'static [&'static str] {
        match self {
            FeatureTag::Kerning => &["\"kern\" 1"],
            FeatureTag::Ligatures => &["\"liga\" 1", "\"clig\" 1"],
            FeatureTag::SmallCaps => &["\"smcp\" 1"],
            FeatureTag::OldstyleNums => &["\"onum\" 1"],
            FeatureTag::TabularNums => &["\"tnum\" 1", "\"lnum\" 1"],
            FeatureTag::Fractions => &["\"frac\" 1"],
        }
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureTag {
    type Err = ControlParseError;

    /// Case-insensitive; `small-caps` and `small_caps` match `smallCaps`.
    /// Separators are only accepted at word boundaries.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FeatureTag::all()
            .into_iter()
            .find(|tag| {
                let kebab = tag.kebab_name();
                tag.name().eq_ignore_ascii_case(name)
                    || kebab.eq_ignore_ascii_case(name)
                    || kebab.replace('-', "_").eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| ControlParseError::InvalidFeatureTag(s.to_string()))
    }
}

/// Insertion-ordered set of feature tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureSet(Vec<FeatureTag>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw tag names, dropping anything unrecognized.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FeatureSet::new();
        for name in names {
            match name.as_ref().parse::<FeatureTag>() {
                Ok(tag) => {
                    set.insert(tag);
                }
                Err(err) => debug!("ignoring feature: {err}"),
            }
        }
        set
    }

    /// Returns `false` if the tag was already present.
    pub fn insert(&mut self, tag: FeatureTag) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn remove(&mut self, tag: FeatureTag) -> bool {
        let before = self.0.len();
        self.0.retain(|t| *t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: FeatureTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FeatureTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<FeatureTag> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FeatureTag>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(FeatureSet::from_names(names))
    }
}

/// Snapshot of all user-adjustable typography parameters plus the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    pub text: String,
    pub font_family: String,
    pub font_size_px: i32,
    pub font_weight: u32,
    pub letter_spacing_px: f64,
    pub word_spacing_px: f64,
    pub line_height: f64,
    pub alignment: Alignment,
    #[serde(rename = "features")]
    pub active_features: FeatureSet,
    pub hyphenation: bool,
    pub layout_optimization: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size_px: DEFAULT_FONT_SIZE_PX,
            font_weight: DEFAULT_FONT_WEIGHT,
            letter_spacing_px: 0.0,
            word_spacing_px: 0.0,
            line_height: DEFAULT_LINE_HEIGHT,
            alignment: Alignment::Left,
            active_features: std::iter::once(FeatureTag::Kerning).collect(),
            hyphenation: false,
            layout_optimization: false,
        }
    }
}

impl ControlState {
    /// Replaces a blank font family with the default stack.
    pub fn normalized(mut self) -> Self {
        if self.font_family.trim().is_empty() {
            self.font_family = DEFAULT_FONT_FAMILY.to_string();
        }
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Values outside the documented control domains. Never fatal.
    pub fn domain_warnings(&self) -> Vec<DomainWarning> {
        let mut warnings = Vec::new();
        if !FONT_SIZE_RANGE.contains(&self.font_size_px) {
            warnings.push(DomainWarning::FontSizeOutOfRange(self.font_size_px));
        }
        if self.font_weight == 0 || self.font_weight % 100 != 0 || self.font_weight > 900 {
            warnings.push(DomainWarning::NonCanonicalWeight(self.font_weight));
        }
        if self.line_height.is_nan() || self.line_height <= 0.0 {
            warnings.push(DomainWarning::NonPositiveLineHeight(self.line_height));
        }
        warnings
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainWarning {
    FontSizeOutOfRange(i32),
    NonCanonicalWeight(u32),
    NonPositiveLineHeight(f64),
}

impl fmt::Display for DomainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainWarning::FontSizeOutOfRange(size) => write!(
                f,
                "font size {size}px is outside {}-{}px",
                FONT_SIZE_RANGE.start(),
                FONT_SIZE_RANGE.end()
            ),
            DomainWarning::NonCanonicalWeight(weight) => {
                write!(f, "font weight {weight} is not one of 100, 200, ..., 900")
            }
            DomainWarning::NonPositiveLineHeight(lh) => {
                write!(f, "line height {lh} is not positive")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_controls() {
        let state = ControlState::default();
        assert_eq!(state.font_family, "serif");
        assert_eq!(state.font_size_px, 16);
        assert_eq!(state.font_weight, 400);
        assert_eq!(state.line_height, 1.4);
        assert_eq!(state.alignment, Alignment::Left);
        assert_eq!(state.active_features.iter().collect::<Vec<_>>(), vec![FeatureTag::Kerning]);
        assert!(!state.hyphenation);
        assert!(!state.layout_optimization);
        assert!(state.domain_warnings().is_empty());
    }

    #[test]
    fn feature_set_keeps_insertion_order_without_duplicates() {
        let mut set = FeatureSet::new();
        assert!(set.insert(FeatureTag::Fractions));
        assert!(set.insert(FeatureTag::Kerning));
        assert!(!set.insert(FeatureTag::Fractions));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![FeatureTag::Fractions, FeatureTag::Kerning]
        );
        assert!(set.remove(FeatureTag::Fractions));
        assert!(!set.remove(FeatureTag::Fractions));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![FeatureTag::Kerning]);
    }

    #[test]
    fn from_names_ignores_unknown_tags() {
        let set = FeatureSet::from_names(["ligatures", "swsh", "small-caps", "LIGATURES", ""]);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![FeatureTag::Ligatures, FeatureTag::SmallCaps]
        );
    }

    #[test]
    fn feature_tag_parse_rejects_unknown() {
        assert_eq!("tabular_nums".parse::<FeatureTag>(), Ok(FeatureTag::TabularNums));
        assert_eq!(
            "ss01".parse::<FeatureTag>(),
            Err(ControlParseError::InvalidFeatureTag("ss01".to_string()))
        );
    }

    #[test]
    fn feature_tag_separators_only_at_word_boundaries() {
        assert_eq!("small-caps".parse::<FeatureTag>(), Ok(FeatureTag::SmallCaps));
        assert_eq!("OLDSTYLE_NUMS".parse::<FeatureTag>(), Ok(FeatureTag::OldstyleNums));
        assert_eq!("smallcaps".parse::<FeatureTag>(), Ok(FeatureTag::SmallCaps));
        assert!("l_i_g-a_tures".parse::<FeatureTag>().is_err());
        assert!("small--caps".parse::<FeatureTag>().is_err());
        assert!("kern-ing".parse::<FeatureTag>().is_err());
    }

    #[test]
    fn alignment_parses_case_insensitively() {
        assert_eq!("Justify".parse::<Alignment>(), Ok(Alignment::Justify));
        assert!("middle".parse::<Alignment>().is_err());
        assert_eq!(Alignment::Center.to_string(), "center");
    }

    #[test]
    fn normalized_replaces_blank_family() {
        let state = ControlState {
            font_family: "   ".to_string(),
            ..ControlState::default()
        }
        .normalized();
        assert_eq!(state.font_family, "serif");

        let state = ControlState {
            font_family: "Georgia, serif".to_string(),
            ..ControlState::default()
        }
        .normalized();
        assert_eq!(state.font_family, "Georgia, serif");
    }

    #[test]
    fn domain_warnings_report_without_clamping() {
        let state = ControlState {
            font_size_px: -4,
            font_weight: 450,
            line_height: 0.0,
            ..ControlState::default()
        };
        let warnings = state.domain_warnings();
        assert_eq!(
            warnings,
            vec![
                DomainWarning::FontSizeOutOfRange(-4),
                DomainWarning::NonCanonicalWeight(450),
                DomainWarning::NonPositiveLineHeight(0.0),
            ]
        );
        assert_eq!(state.font_size_px, -4);
        assert!(warnings[0].to_string().contains("12-72px"));
    }

    #[test]
    fn deserializes_partial_state_and_drops_unknown_features() {
        let state: ControlState = serde_json::from_str(
            r#"{"font_size_px": 20, "alignment": "justify", "features": ["kerning", "bogus", "fractions"]}"#,
        )
        .expect("parse control state");
        assert_eq!(state.font_size_px, 20);
        assert_eq!(state.alignment, Alignment::Justify);
        assert_eq!(state.font_family, "serif");
        assert_eq!(
            state.active_features.iter().collect::<Vec<_>>(),
            vec![FeatureTag::Kerning, FeatureTag::Fractions]
        );

        let json = serde_json::to_string(&state).expect("serialize control state");
        assert!(json.contains(r#""features":["kerning","fractions"]"#));
    }
}
