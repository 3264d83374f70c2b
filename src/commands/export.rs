use std::path::PathBuf;
use std::process::ExitCode;

use tpv_lib::output::TPV_OUTPUT_VERSION;
use tpv_lib::render::proof_lines;
use tpv_lib::session::display_text;
use tpv_lib::style::CSS_MIME_TYPE;
use tpv_lib::{
    export_css, render_layout_proof, save_layout_proof, CssOutput, PngOutput, TpvError, TpvOutput,
};
use tracing::{debug, info};

use crate::cli::{ControlArgs, OutputFormat, TextArgs};
use crate::formatting::{render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, report_domain_warnings, resolve_controls, resolve_text,
};

/// Run the export-css command.
pub fn run_export_css(
    config_path: Option<PathBuf>,
    verbose: bool,
    controls: ControlArgs,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    let state = match resolve_controls(&controls, &config) {
        Ok(state) => state,
        Err(err) => return render_error(err, format, None),
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
    report_domain_warnings(&state);

    let css = export_css(&state);
    let inline = match &output {
        Some(path) => {
            if let Err(err) = std::fs::write(path, css.as_bytes()) {
                return render_error(TpvError::Io(err), format, None);
            }
            debug!(path = %path.display(), bytes = css.len(), "wrote stylesheet");
            None
        }
        None => Some(css),
    };

    let body = TpvOutput::Css(CssOutput {
        version: TPV_OUTPUT_VERSION.to_string(),
        mime_type: CSS_MIME_TYPE.to_string(),
        file_name: config.export.css_file_name.clone(),
        output_path: output,
        css: inline,
    });
    if let Err(err) = write_output(&body, format, None) {
        return render_error(TpvError::Unknown(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}

/// Run the export-png command.
#[allow(clippy::too_many_arguments)]
pub fn run_export_png(
    config_path: Option<PathBuf>,
    verbose: bool,
    text: TextArgs,
    controls: ControlArgs,
    output: Option<PathBuf>,
    png_width: Option<u32>,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    let state = match resolve_controls(&controls, &config) {
        Ok(state) => state,
        Err(err) => return render_error(err, format, None),
    };
    let text = match resolve_text(&text, &config) {
        Ok(text) => text,
        Err(err) => return render_error(err, format, None),
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
    report_domain_warnings(&state);

    let mut options = config.export.proof_options();
    if let Some(width) = png_width {
        options.width_px = width;
    }
    let shown = display_text(&text);
    let image = match render_layout_proof(shown, &state, &options) {
        Ok(image) => image,
        Err(err) => return render_error(err.into(), format, None),
    };
    let path = output.unwrap_or_else(|| PathBuf::from(&config.export.png_file_name));
    let output_path = match save_layout_proof(&image, &path) {
        Ok(path) => path,
        Err(err) => return render_error(err.into(), format, None),
    };

    let body = TpvOutput::Png(PngOutput {
        version: TPV_OUTPUT_VERSION.to_string(),
        output_path,
        width: image.width(),
        height: image.height(),
        lines: proof_lines(shown, &state, &options),
    });
    if let Err(err) = write_output(&body, format, None) {
        return render_error(TpvError::Unknown(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
