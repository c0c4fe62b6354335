//! CLI errors and how they reach the user: one message, the suggestions
//! that apply, and an exit code derived from the error's category.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use facetmodel_core::error::{ErrorCategory as CoreCategory, MetaModelError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A command was asked to do something it refuses, e.g. overwrite a
    /// config file without `--force`.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The metamodel was built but has validation failures.
    #[error("Metamodel has {} validation failure(s)", failures.len())]
    InvalidModel { failures: Vec<String> },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Loading descriptors or layouts, or building the model, failed.
    #[error("Metamodel build failed: {0}")]
    Core(#[from] MetaModelError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialise output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Use --help for usage information".into()],

            Self::InvalidModel { failures } => {
                let mut suggestions: Vec<String> =
                    failures.iter().map(|f| format!("  • {f}")).collect();
                suggestions.push("Fix the descriptors above and run validate again".into());
                suggestions
            }

            Self::ConfigError { .. } => vec![
                "Show the file in use: facetmodel config path".into(),
                "Write a fresh one: facetmodel config init --force".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { .. } => vec!["Check that the path exists and is writable".into()],

            Self::Serialization(_) => vec!["This appears to be a bug in facetmodel".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::InvalidModel { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Unrecoverable => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// 2 for user errors and invalid models, 3 not found, 4 configuration,
    /// 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// The stderr report: message, causes when `verbose`, then suggestions.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if color { style(text) } else { text.to_owned() }
        };
        let mut out = format!(
            "\n{}\n",
            paint(&format!("Error: {self}"), |t| t.red().bold().to_string())
        );

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                out.push_str(&paint(&format!("  Caused by: {err}"), |t| t.dimmed().to_string()));
                out.push('\n');
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!(
                "\n{}\n",
                paint("Suggestions:", |t| t.yellow().bold().to_string())
            ));
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!(
                "\n{}\n",
                paint("Use -v / --verbose for more details.", |t| t.dimmed().to_string())
            ));
        }
        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound => tracing::warn!("{self}"),
            ErrorCategory::Configuration | ErrorCategory::Internal => tracing::error!("{self}"),
        }
        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {source}");
        }
    }
}

/// Drives exit codes and log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error, including an invalid metamodel.
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
