//! Adapter-level failures, mapped onto application errors at the port
//! boundary.

use std::path::PathBuf;

use thiserror::Error;

use facetmodel_core::{application::ApplicationError, error::MetaModelError};

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid descriptor in '{}': {reason}", path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl AdapterError {
    /// Report this failure as coming from the descriptor source `source_name`.
    pub fn into_descriptor_error(self, source_name: impl Into<String>) -> MetaModelError {
        ApplicationError::DescriptorSource {
            source_name: source_name.into(),
            reason: self.to_string(),
        }
        .into()
    }

    /// Report this failure as a broken layout for `type_name`.
    pub fn into_layout_error(self, type_name: impl Into<String>) -> MetaModelError {
        ApplicationError::LayoutSource {
            type_name: type_name.into(),
            reason: self.to_string(),
        }
        .into()
    }
}
