//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "facetmodel",
    bin_name = "facetmodel",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Build and validate facet metamodels from type descriptors",
    long_about = "facetmodel reads *.types.toml descriptors, runs the facet \
                  factories over every type and reports the resulting object \
                  specifications and validation failures.",
    after_help = "EXAMPLES:\n\
        \x20 facetmodel inspect ./model\n\
        \x20 facetmodel inspect ./model --type Customer --layouts ./model/layouts\n\
        \x20 facetmodel validate ./model --strict\n\
        \x20 facetmodel completions bash > /usr/share/bash-completion/completions/facetmodel",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the metamodel and print its specifications.
    #[command(
        visible_alias = "i",
        about = "Print object specifications and their facets",
        after_help = "EXAMPLES:\n\
            \x20 facetmodel inspect ./model\n\
            \x20 facetmodel inspect ./model --type Customer\n\
            \x20 facetmodel --output-format json inspect ./model"
    )]
    Inspect(InspectArgs),

    /// Build the metamodel and fail if any validation failure is found.
    #[command(
        about = "Validate a metamodel",
        after_help = "EXAMPLES:\n\
            \x20 facetmodel validate ./model\n\
            \x20 facetmodel validate ./model --layouts ./layouts --strict"
    )]
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 facetmodel completions bash > ~/.local/share/bash-completion/completions/facetmodel\n\
            \x20 facetmodel completions zsh  > ~/.zfunc/_facetmodel\n\
            \x20 facetmodel completions fish > ~/.config/fish/completions/facetmodel.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the facetmodel configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 facetmodel config get metamodel.mixins.nature_policy\n\
            \x20 facetmodel config list\n\
            \x20 facetmodel config init"
    )]
    Config(ConfigCommands),
}

// ── model source ──────────────────────────────────────────────────────────────

/// Where the descriptors (and optionally layouts) come from.
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Directory searched recursively for `*.types.toml` files.
    #[arg(value_name = "DIR", help = "Descriptor directory")]
    pub dir: PathBuf,

    /// Directory holding `<Type>.layout.toml` files.
    #[arg(
        short = 'l',
        long = "layouts",
        value_name = "DIR",
        help = "Layout directory (default: descriptors.layouts from config)"
    )]
    pub layouts: Option<PathBuf>,

    /// Fail on malformed descriptor files instead of skipping them.
    #[arg(long = "strict", help = "Fail on malformed descriptor files")]
    pub strict: bool,

    /// Only methods annotated `Action` become actions.
    #[arg(
        long = "require-action-annotation",
        help = "Only treat methods annotated Action as actions"
    )]
    pub require_action_annotation: bool,
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `facetmodel inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Only print this type.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Only show this type"
    )]
    pub type_name: Option<String>,

    /// Print every facet, not only member names.
    #[arg(long = "facets", help = "Show facets of every member")]
    pub facets: bool,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `facetmodel validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `facetmodel completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `facetmodel config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `metamodel.mixins.nature_policy`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
    /// Write the current configuration to the active configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_inspect_command() {
        let cli = Cli::parse_from([
            "facetmodel",
            "inspect",
            "./model",
            "--type",
            "Customer",
            "--layouts",
            "./layouts",
        ]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected Inspect command");
        };
        assert_eq!(args.model.dir, PathBuf::from("./model"));
        assert_eq!(args.type_name.as_deref(), Some("Customer"));
        assert_eq!(args.model.layouts, Some(PathBuf::from("./layouts")));
    }

    #[test]
    fn inspect_alias() {
        let cli = Cli::parse_from(["facetmodel", "i", "./model"]);
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }

    #[test]
    fn validate_takes_strict() {
        let cli = Cli::parse_from(["facetmodel", "validate", "./model", "--strict"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert!(args.model.strict);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["facetmodel", "--quiet", "--verbose", "validate", "."]);
        assert!(result.is_err());
    }
}
