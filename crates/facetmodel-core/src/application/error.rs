//! Application layer errors.
//!
//! These errors represent failures in orchestration (reading descriptors and
//! layouts, looking up built specifications), not metamodel rules. Metamodel
//! errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while orchestrating a metamodel build.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A descriptor source could not be read.
    #[error("Descriptor source '{source_name}' failed: {reason}")]
    DescriptorSource { source_name: String, reason: String },

    /// A layout could not be read or parsed.
    #[error("Layout for '{type_name}' could not be loaded: {reason}")]
    LayoutSource { type_name: String, reason: String },

    /// The requested specification is not part of the model.
    #[error("No specification for '{type_name}'")]
    SpecificationNotFound { type_name: String },

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },

    /// Configuration rejected while building the metamodel.
    #[error("Invalid metamodel configuration: {0}")]
    InvalidConfiguration(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DescriptorSource { source_name, .. } => vec![
                format!("Failed to read descriptors from: {source_name}"),
                "Check that the directory exists and contains *.types.toml files".into(),
            ],
            Self::LayoutSource { type_name, .. } => vec![
                format!("Check the layout file for '{type_name}'"),
                "Layout files are named <Type>.layout.toml".into(),
            ],
            Self::SpecificationNotFound { type_name } => vec![
                format!("'{type_name}' was not among the loaded descriptors"),
                "Try: facetmodel inspect <DIR> to list known types".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {name}"),
                "This is likely a configuration error".into(),
            ],
            Self::InvalidConfiguration(_) => vec![
                "Check your configuration file".into(),
                "Try: facetmodel config show".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DescriptorSource { .. } | Self::LayoutSource { .. } => ErrorCategory::Validation,
            Self::SpecificationNotFound { .. } => ErrorCategory::NotFound,
            Self::AdapterNotConfigured { .. } | Self::InvalidConfiguration(_) => {
                ErrorCategory::Configuration
            }
        }
    }
}
