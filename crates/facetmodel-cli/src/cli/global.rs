//! Flags shared by `inspect`, `validate`, `config` and `completions`,
//! flattened into [`super::Cli`].

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Each `-v` lowers the log threshold one level, from WARN down to TRACE.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Warnings (one per validation failure) and errors
    -v      - Info level (build summaries)
    -vv     - Debug level (factory registration, per-type introspection)
    -vvv    - Trace level (very verbose)"
    )]
    pub verbose: u8,

    /// Only errors and JSON reports are written.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Plain reports and logs; also set by `NO_COLOR` or `output.no_color`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Overrides the platform config file. Must exist unless running
    /// `config init`.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Use this configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Also write logs to this file (overrides `logging.file`).
    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        help = "Write logs to a file as well"
    )]
    pub log_file: Option<PathBuf>,

    /// `json` prints specification summaries and failures as one document.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Report format (auto, human, plain, json)"
    )]
    pub output_format: OutputFormat,
}

/// How reports are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise.
    #[default]
    Auto,
    /// Coloured member listings.
    Human,
    /// Same listings without colour, for pipes and tests.
    Plain,
    /// Summaries and failures as pretty JSON.
    Json,
}
