//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! metamodel section is handed to the core crate as a `MetaModelConfig`; the
//! rest belongs to the CLI.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `FACETMODEL_<SECTION>__<KEY>`, e.g.
//!    `FACETMODEL_METAMODEL__ACTIONS__REQUIRE_ANNOTATION=true`
//! 3. Config file (`--config FILE` or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use facetmodel_core::application::MetaModelConfig;

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "FACETMODEL";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings that shape the metamodel build.
    pub metamodel: MetaModelConfig,
    /// Where descriptors and layouts come from.
    pub descriptors: DescriptorsConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log sinks besides stderr.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorsConfig {
    /// Fail on malformed descriptor files instead of skipping them.
    pub strict: bool,
    /// Default layout directory when `--layouts` is not given.
    pub layouts: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append logs to this file in addition to stderr.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist when `must_exist` is set; the
    /// default location is always optional.
    pub fn load(config_file: Option<&PathBuf>, must_exist: bool) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), must_exist),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("failed to encode built-in defaults")?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from '{}'", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in '{}'", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.facetmodel.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "facetmodel", "facetmodel")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".facetmodel.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetmodel_core::domain::ConstructorPolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_carry_core_policies() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.metamodel.mixins.nature_policy, ConstructorPolicy::Strict);
        assert!(!cfg.descriptors.strict);
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn missing_default_file_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&tmp.path().join("absent.toml"), false).unwrap();
        assert_eq!(cfg.metamodel, MetaModelConfig::default());
    }

    #[test]
    fn explicit_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let absent = tmp.path().join("absent.toml");
        assert!(AppConfig::load(Some(&absent), true).is_err());
        assert!(AppConfig::load(Some(&absent), false).is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "[metamodel.mixins]\nmarker_policy = \"strict\"\n\n[descriptors]\nstrict = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path), true).unwrap();
        assert_eq!(cfg.metamodel.mixins.marker_policy, ConstructorPolicy::Strict);
        assert_eq!(cfg.metamodel.mixins.default_main_method, "act");
        assert!(cfg.descriptors.strict);
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
