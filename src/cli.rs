use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tpv_lib::Alignment;

#[derive(Parser)]
#[command(name = "tpv")]
#[command(
    version,
    about = "Typography Preview - Live style projection, CSS export and layout metrics",
    long_about = "Typography Preview (TPV)\n\nModes:\n- metrics: character/word/line counts and a heuristic layout score for some text.\n- style: the live style map for the current controls.\n- export-css: a .custom-typography stylesheet with 768px/480px breakpoints.\n- export-png: a PNG layout proof of the text.\n- watch: read text and :commands from stdin and emit debounced preview frames.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) with [controls], [preview] and [export] defaults; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

/// Typography controls. Unset flags fall back to the config file, then to
/// built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ControlArgs {
    #[arg(long, value_name = "STACK", help = "CSS font stack (e.g., \"Georgia, serif\")")]
    pub font_family: Option<String>,

    #[arg(long, value_name = "PX", allow_negative_numbers = true, help = "Font size in px (12-72)")]
    pub font_size: Option<i32>,

    #[arg(long, value_name = "WEIGHT", help = "Font weight (100-900)")]
    pub font_weight: Option<u32>,

    #[arg(long, value_name = "PX", allow_negative_numbers = true, help = "Letter spacing in px")]
    pub letter_spacing: Option<f64>,

    #[arg(long, value_name = "PX", allow_negative_numbers = true, help = "Word spacing in px")]
    pub word_spacing: Option<f64>,

    #[arg(long, value_name = "RATIO", help = "Unitless line height")]
    pub line_height: Option<f64>,

    #[arg(long, value_enum, help = "Text alignment")]
    pub align: Option<AlignArg>,

    #[arg(
        long,
        value_delimiter = ',',
        value_name = "TAGS",
        help = "OpenType features, in order (kerning,ligatures,smallCaps,oldstyleNums,tabularNums,fractions; 'none' clears)"
    )]
    pub features: Option<Vec<String>>,

    #[arg(long, value_name = "BOOL", help = "Enable automatic hyphenation (true/false)")]
    pub hyphenation: Option<bool>,

    #[arg(
        long,
        value_name = "BOOL",
        help = "Enable optimizeLegibility, optical sizing and contextual ligatures (true/false)"
    )]
    pub optimize_layout: Option<bool>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TextArgs {
    #[arg(long, conflicts_with = "input", help = "Text to measure (stdin is read when neither --text nor --input is given)")]
    pub text: Option<String>,

    #[arg(long, value_name = "PATH", help = "Read the text from a file")]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute counts and the layout score for some text
    Metrics {
        #[command(flatten)]
        text: TextArgs,

        #[command(flatten)]
        controls: ControlArgs,

        #[arg(long, value_name = "PX", help = "Container width in px (default 640 or config)")]
        width: Option<f64>,

        #[arg(long, help = "Include the score rules that fired")]
        explain: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Print the live style map for the controls
    Style {
        #[command(flatten)]
        controls: ControlArgs,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Export the controls as a CSS stylesheet
    ExportCss {
        #[command(flatten)]
        controls: ControlArgs,

        #[arg(
            long,
            short,
            help = "Write the stylesheet to this file (JSON status is printed to stdout)"
        )]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },

    /// Export a PNG layout proof of the text
    ExportPng {
        #[command(flatten)]
        text: TextArgs,

        #[command(flatten)]
        controls: ControlArgs,

        #[arg(long, short, help = "PNG path (default typography-preview.png or config)")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "PX", help = "Image width in px (default 800 or config)")]
        png_width: Option<u32>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },

    /// Read text and :commands from stdin and print debounced preview frames
    Watch {
        #[command(flatten)]
        controls: ControlArgs,

        #[arg(long, value_name = "PX", help = "Container width in px (default 640 or config)")]
        width: Option<f64>,

        #[arg(long, value_name = "MS", help = "Quiet period before recomputing (default 150 or config)")]
        debounce_ms: Option<u64>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AlignArg {
    Left,
    Center,
    Right,
    Justify,
}

impl From<AlignArg> for Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => Alignment::Left,
            AlignArg::Center => Alignment::Center,
            AlignArg::Right => Alignment::Right,
            AlignArg::Justify => Alignment::Justify,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{AlignArg, Cli, Commands, OutputFormat};
    use clap::Parser;

    #[test]
    fn metrics_command_uses_defaults() {
        let cli = Cli::parse_from(["tpv", "metrics", "--text", "hello world"]);

        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        match cli.command {
            Commands::Metrics {
                text,
                controls,
                width,
                explain,
                format,
                output,
            } => {
                assert_eq!(text.text.as_deref(), Some("hello world"));
                assert!(text.input.is_none());
                assert!(controls.font_size.is_none());
                assert!(controls.features.is_none());
                assert!(width.is_none());
                assert!(!explain);
                assert!(matches!(format, OutputFormat::Json));
                assert!(output.is_none());
            }
            _ => panic!("expected metrics command"),
        }
    }

    #[test]
    fn control_flags_parse() {
        let cli = Cli::parse_from([
            "tpv",
            "style",
            "--font-family",
            "Georgia, serif",
            "--font-size",
            "24",
            "--font-weight",
            "700",
            "--letter-spacing",
            "-0.5",
            "--line-height",
            "1.5",
            "--align",
            "justify",
            "--features",
            "kerning,ligatures",
            "--hyphenation",
            "true",
            "--optimize-layout",
            "false",
            "--format",
            "pretty",
            "--config",
            "tpv.toml",
        ]);

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("tpv.toml"))
        );
        match cli.command {
            Commands::Style {
                controls, format, ..
            } => {
                assert_eq!(controls.font_family.as_deref(), Some("Georgia, serif"));
                assert_eq!(controls.font_size, Some(24));
                assert_eq!(controls.font_weight, Some(700));
                assert_eq!(controls.letter_spacing, Some(-0.5));
                assert_eq!(controls.line_height, Some(1.5));
                assert!(matches!(controls.align, Some(AlignArg::Justify)));
                assert_eq!(
                    controls.features,
                    Some(vec!["kerning".to_string(), "ligatures".to_string()])
                );
                assert_eq!(controls.hyphenation, Some(true));
                assert_eq!(controls.optimize_layout, Some(false));
                assert!(matches!(format, OutputFormat::Pretty));
            }
            _ => panic!("expected style command"),
        }
    }

    #[test]
    fn export_png_and_watch_parse() {
        let cli = Cli::parse_from([
            "tpv",
            "--verbose",
            "export-png",
            "--input",
            "notes.txt",
            "--png-width",
            "400",
            "-o",
            "proof.png",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::ExportPng {
                text,
                png_width,
                output,
                ..
            } => {
                assert_eq!(text.input.as_deref(), Some(std::path::Path::new("notes.txt")));
                assert_eq!(png_width, Some(400));
                assert_eq!(output.as_deref(), Some(std::path::Path::new("proof.png")));
            }
            _ => panic!("expected export-png command"),
        }

        let cli = Cli::parse_from(["tpv", "watch", "--debounce-ms", "50", "--width", "320"]);
        match cli.command {
            Commands::Watch {
                debounce_ms, width, ..
            } => {
                assert_eq!(debounce_ms, Some(50));
                assert_eq!(width, Some(320.0));
            }
            _ => panic!("expected watch command"),
        }
    }

    #[test]
    fn text_and_input_conflict() {
        let result = Cli::try_parse_from([
            "tpv", "metrics", "--text", "a", "--input", "b.txt",
        ]);
        assert!(result.is_err());
    }
}
