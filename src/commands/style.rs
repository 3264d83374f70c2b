use std::path::PathBuf;
use std::process::ExitCode;

use tpv_lib::output::TPV_OUTPUT_VERSION;
use tpv_lib::{project_live_style, StyleOutput, TpvError, TpvOutput};
use tracing::info;

use crate::cli::{ControlArgs, OutputFormat};
use crate::formatting::{render_error, write_output};
use crate::settings::{format_effective_config, load_config, report_domain_warnings, resolve_controls};

/// Run the style command.
pub fn run_style(
    config_path: Option<PathBuf>,
    verbose: bool,
    controls: ControlArgs,
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
    if verbose {
        info!(
            "{}",
            format_effective_config(
                &state,
                config.preview.container_width_px,
                config.preview.debounce,
                config_path.as_deref()
            )
        );
    }
    let warnings = report_domain_warnings(&state);

    let body = TpvOutput::Style(StyleOutput {
        version: TPV_OUTPUT_VERSION.to_string(),
        style: project_live_style(&state),
        warnings,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(TpvError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
