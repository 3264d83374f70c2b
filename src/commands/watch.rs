use std::path::PathBuf;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tpv_lib::adapter::next_settled;
use tpv_lib::output::TPV_OUTPUT_VERSION;
use tpv_lib::{ControlEdit, PreviewSession, TpvError, TpvOutput, WatchFrameOutput};
use tracing::{debug, info, warn};

use crate::cli::{ControlArgs, OutputFormat};
use crate::formatting::{format_pretty, format_score_transition, render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, report_domain_warnings, resolve_controls,
    resolve_debounce, resolve_width,
};

const INPUT_BUFFER: usize = 256;

/// Run the watch command: every stdin line is an edit; frames are emitted
/// once input has been quiet for the debounce period.
pub async fn run_watch(
    config_path: Option<PathBuf>,
    verbose: bool,
    controls: ControlArgs,
    width: Option<f64>,
    debounce_ms: Option<u64>,
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
    let width = match resolve_width(width, &config) {
        Ok(width) => width,
        Err(err) => return render_error(err, format, None),
    };
    let debounce = match resolve_debounce(debounce_ms, &config) {
        Ok(debounce) => debounce,
        Err(err) => return render_error(err, format, None),
    };
    if verbose {
        info!(
            "{}",
            format_effective_config(&state, width, debounce, config_path.as_deref())
        );
    }
    report_domain_warnings(&state);

    let (tx, mut rx) = mpsc::channel::<String>(INPUT_BUFFER);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
    });

    let mut session = PreviewSession::new(state, width);
    let mut sequence = 0u64;
    let mut last_score: Option<u8> = None;
    while let Some(batch) = next_settled(&mut rx, debounce).await {
        debug!(lines = batch.len(), "input settled");
        for line in batch {
            match line.parse::<ControlEdit>() {
                Ok(edit) => session.apply(edit),
                Err(err) => warn!("ignoring input line: {err}"),
            }
        }
        report_domain_warnings(session.state());

        sequence += 1;
        let frame = session.frame();
        let score = frame.metrics.layout_score;
        let body = TpvOutput::WatchFrame(WatchFrameOutput {
            version: TPV_OUTPUT_VERSION.to_string(),
            sequence,
            frame,
        });
        let result = match format {
            OutputFormat::Pretty => {
                let mut line = format_pretty(&body, false);
                if let Some(previous) = last_score.filter(|p| *p != score) {
                    line.push_str(&format!("  [{}]", format_score_transition(previous, score)));
                }
                println!("{line}");
                Ok(())
            }
            OutputFormat::Json => write_output(&body, format, None),
        };
        if let Err(err) = result {
            return render_error(TpvError::Unknown(err.to_string()), format, None);
        }
        last_score = Some(score);
    }

    if let Err(err) = reader.await {
        return render_error(TpvError::Unknown(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
