use std::io::{IsTerminal, Read};
use std::path::Path;
use std::time::Duration;

use tpv_lib::config::MAX_DEBOUNCE;
use tpv_lib::{Config, ControlState, FeatureSet, FeatureTag, Result, TpvError};
use tracing::{debug, warn};

use crate::cli::{ControlArgs, TextArgs};

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/tpv/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        TpvError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        TpvError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Parse a `--features` list. Unknown tags are rejected here so that the
/// snapshot handed to the core only ever holds known tags.
pub fn parse_feature_list(names: &[String]) -> Result<FeatureSet> {
    let names: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    if names.len() == 1 && names[0].eq_ignore_ascii_case("none") {
        return Ok(FeatureSet::new());
    }
    let mut set = FeatureSet::new();
    for name in names {
        let tag: FeatureTag = name.parse()?;
        set.insert(tag);
    }
    Ok(set)
}

/// Merge CLI control flags over the config's `[controls]` section.
pub fn resolve_controls(args: &ControlArgs, config: &Config) -> Result<ControlState> {
    let mut state = config.controls.clone();
    if let Some(family) = &args.font_family {
        state.font_family = family.clone();
    }
    if let Some(size) = args.font_size {
        state.font_size_px = size;
    }
    if let Some(weight) = args.font_weight {
        state.font_weight = weight;
    }
    if let Some(spacing) = args.letter_spacing {
        state.letter_spacing_px = spacing;
    }
    if let Some(spacing) = args.word_spacing {
        state.word_spacing_px = spacing;
    }
    if let Some(line_height) = args.line_height {
        state.line_height = line_height;
    }
    if let Some(align) = args.align {
        state.alignment = align.into();
    }
    if let Some(features) = &args.features {
        state.active_features = parse_feature_list(features)?;
    }
    if let Some(on) = args.hyphenation {
        state.hyphenation = on;
    }
    if let Some(on) = args.optimize_layout {
        state.layout_optimization = on;
    }
    Ok(state.normalized())
}

/// Log out-of-domain controls and return them as display strings.
pub fn report_domain_warnings(state: &ControlState) -> Vec<String> {
    state
        .domain_warnings()
        .into_iter()
        .map(|w| {
            warn!("{w}");
            w.to_string()
        })
        .collect()
}

pub fn resolve_width(cli_width: Option<f64>, config: &Config) -> Result<f64> {
    let width = cli_width.unwrap_or(config.preview.container_width_px);
    if !width.is_finite() || width <= 0.0 {
        return Err(TpvError::config(format!(
            "--width must be a positive number of px (got {width})"
        )));
    }
    Ok(width)
}

/// `--debounce-ms` is held to the same cap as `preview.debounce`.
pub fn resolve_debounce(cli_ms: Option<u64>, config: &Config) -> Result<Duration> {
    let Some(ms) = cli_ms else {
        return Ok(config.preview.debounce);
    };
    let debounce = Duration::from_millis(ms);
    if debounce > MAX_DEBOUNCE {
        return Err(TpvError::config(format!(
            "--debounce-ms must not exceed {}s (got {ms}ms)",
            MAX_DEBOUNCE.as_secs()
        )));
    }
    Ok(debounce)
}

/// Text from `--text`, `--input`, piped stdin, or the config, in that order.
pub fn resolve_text(args: &TextArgs, config: &Config) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.input {
        if !path.exists() {
            return Err(TpvError::config(format!(
                "Input file not found: {}",
                path.display()
            )));
        }
        debug!(path = %path.display(), "reading text input");
        return Ok(std::fs::read_to_string(path)?);
    }
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        let mut buf = String::new();
        stdin.lock().read_to_string(&mut buf)?;
        if !buf.is_empty() {
            return Ok(buf);
        }
    }
    Ok(config.controls.text.clone())
}

/// Format effective config as a single-line string.
pub fn format_effective_config(
    state: &ControlState,
    width: f64,
    debounce: Duration,
    config_source: Option<&Path>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let features: Vec<&str> = state.active_features.iter().map(|t| t.name()).collect();
    format!(
        "Effective config [{source}]: family={}, size={}px, weight={}, letter={}px, word={}px, line-height={}, align={}, features=[{}], hyphenation={}, optimize={}, width={}px, debounce={}ms",
        state.font_family,
        state.font_size_px,
        state.font_weight,
        state.letter_spacing_px,
        state.word_spacing_px,
        state.line_height,
        state.alignment,
        features.join(","),
        state.hyphenation,
        state.layout_optimization,
        width,
        debounce.as_millis()
    )
}
