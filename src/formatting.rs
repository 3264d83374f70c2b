use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tpv_lib::adapter::counter_frames;
use tpv_lib::output::TPV_OUTPUT_VERSION;
use tpv_lib::{ErrorOutput, TpvError, TpvOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &TpvOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: TpvError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::debug!(error = %err, "command failed");
    let error_payload = err.to_payload();
    let payload = TpvOutput::Error(ErrorOutput {
        version: TPV_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &TpvOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &TpvOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &TpvOutput, colorize: bool) -> String {
    match body {
        TpvOutput::Metrics(out) => {
            let mut buf = String::new();
            let header = color("[METRICS]", "36", colorize);
            let score = color(
                &out.metrics.layout_score.to_string(),
                score_color_code(out.metrics.layout_score),
                colorize,
            );
            writeln!(buf, "{} Layout score {}/100", header, score).ok();
            writeln!(
                buf,
                "Characters: {}  Words: {}  Lines: {}  Features: {}",
                out.metrics.characters,
                out.metrics.words,
                out.metrics.lines,
                out.metrics.active_feature_count
            )
            .ok();
            writeln!(
                buf,
                "Container: {}px  Render: {:.3}ms",
                out.container_width_px, out.render_time_ms
            )
            .ok();
            if !out.adjustments.is_empty() {
                writeln!(buf, "Score rules:").ok();
                for adj in &out.adjustments {
                    writeln!(buf, "- {:+} {}", adj.delta, adj.rule.description()).ok();
                }
            }
            write_warnings(&mut buf, &out.warnings, colorize);
            buf
        }
        TpvOutput::Style(out) => {
            let mut buf = String::new();
            writeln!(buf, "{}", color("[STYLE]", "34", colorize)).ok();
            buf.push_str(&out.style.to_declarations("  "));
            write_warnings(&mut buf, &out.warnings, colorize);
            buf
        }
        TpvOutput::Css(out) => {
            if let Some(css) = &out.css {
                return css.clone();
            }
            let mut buf = String::new();
            let header = color("[CSS]", "32", colorize);
            let target = out
                .output_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| out.file_name.clone());
            writeln!(buf, "{} Stylesheet written to {} ({})", header, target, out.mime_type).ok();
            buf
        }
        TpvOutput::Png(out) => {
            let mut buf = String::new();
            let header = color("[PNG]", "32", colorize);
            writeln!(
                buf,
                "{} Layout proof {}x{} ({} lines) written to {}",
                header,
                out.width,
                out.height,
                out.lines,
                out.output_path.display()
            )
            .ok();
            buf
        }
        TpvOutput::WatchFrame(out) => {
            let mut buf = String::new();
            let header = color(&format!("[#{}]", out.sequence), "36", colorize);
            let metrics = &out.frame.metrics;
            write!(
                buf,
                "{} chars {}  words {}  lines {}  score {}  ({:.3}ms)",
                header,
                metrics.characters,
                metrics.words,
                metrics.lines,
                metrics.layout_score,
                out.frame.render_time_ms
            )
            .ok();
            buf
        }
        TpvOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Eased score readout for consecutive watch frames, e.g. `92 › 97 › 100`.
pub fn format_score_transition(from: u8, to: u8) -> String {
    let mut values = vec![i64::from(from)];
    values.extend(counter_frames(i64::from(from), i64::from(to), 4));
    values.dedup();
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" \u{203a} ")
}

fn write_warnings(buf: &mut String, warnings: &[String], colorize: bool) {
    if warnings.is_empty() {
        return;
    }
    writeln!(buf, "{}", color("Warnings:", "33", colorize)).ok();
    for warning in warnings {
        writeln!(buf, "- {warning}").ok();
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map score to ANSI color code.
fn score_color_code(score: u8) -> &'static str {
    if score >= 90 {
        "32" // green
    } else if score >= 75 {
        "33" // yellow
    } else {
        "31" // red
    }
}
