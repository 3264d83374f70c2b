mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_export_css, run_export_png, run_metrics, run_style, run_watch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Metrics {
            text,
            controls,
            width,
            explain,
            format,
            output,
        } => run_metrics(
            args.config,
            args.verbose,
            text,
            controls,
            width,
            explain,
            format,
            output,
        ),
        Commands::Style {
            controls,
            format,
            output,
        } => run_style(args.config, args.verbose, controls, format, output),
        Commands::ExportCss {
            controls,
            output,
            format,
        } => run_export_css(args.config, args.verbose, controls, output, format),
        Commands::ExportPng {
            text,
            controls,
            output,
            png_width,
            format,
        } => run_export_png(
            args.config,
            args.verbose,
            text,
            controls,
            output,
            png_width,
            format,
        ),
        Commands::Watch {
            controls,
            width,
            debounce_ms,
            format,
        } => run_watch(args.config, args.verbose, controls, width, debounce_ms, format).await,
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "tpv=debug,tpv_lib=debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
