use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use tpv_lib::metrics::score_adjustments;
use tpv_lib::output::TPV_OUTPUT_VERSION;
use tpv_lib::{compute_metrics, MetricsOutput, TpvError, TpvOutput};
use tracing::{debug, info};

use crate::cli::{ControlArgs, OutputFormat, TextArgs};
use crate::formatting::{render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, report_domain_warnings, resolve_controls,
    resolve_text, resolve_width,
};

/// Run the metrics command.
#[allow(clippy::too_many_arguments)]
pub fn run_metrics(
    config_path: Option<PathBuf>,
    verbose: bool,
    text: TextArgs,
    controls: ControlArgs,
    width: Option<f64>,
    explain: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let state = match resolve_controls(&controls, &config) {
        Ok(state) => state,
        Err(err) => return render_error(err, format, output),
    };
    let width = match resolve_width(width, &config) {
        Ok(width) => width,
        Err(err) => return render_error(err, format, output),
    };
    let text = match resolve_text(&text, &config) {
        Ok(text) => text,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        info!(
            "{}",
            format_effective_config(&state, width, config.preview.debounce, config_path.as_deref())
        );
    }
    let warnings = report_domain_warnings(&state);

    let started = Instant::now();
    let metrics = compute_metrics(&text, &state, width);
    let render_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!(?metrics, render_time_ms, "computed metrics");

    let adjustments = if explain {
        score_adjustments(&text, &state)
    } else {
        Vec::new()
    };
    let body = TpvOutput::Metrics(MetricsOutput {
        version: TPV_OUTPUT_VERSION.to_string(),
        container_width_px: width,
        metrics,
        adjustments,
        render_time_ms,
        warnings,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(TpvError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
