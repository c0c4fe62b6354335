// ============================================================================
// domain/error.rs - FATAL METAMODEL ERRORS
// ============================================================================
//
// Model-definition defects (bad mixin shape, orphaned supporting methods) are
// NOT errors: they are accumulated as `ValidationFailure`s. Everything here
// aborts the operation that raised it.

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so they can be stored on the metamodel and re-reported)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Unrecoverable (programming/configuration defects)
    // ========================================================================
    #[error("Unrecoverable: {message}")]
    Unrecoverable { message: String },

    #[error("mixin '{mixin_type}' has no resolved 1-arg constructor")]
    MixinConstructorNotResolved { mixin_type: String },

    #[error(
        "mixin '{mixin_type}' is not a mixin for supplied object '{actual}'; expected an instance of '{expected}'"
    )]
    MixinHolderMismatch {
        mixin_type: String,
        expected: String,
        actual: String,
    },

    #[error("failed to instantiate mixin '{mixin_type}': {reason}")]
    MixinInstantiationFailed { mixin_type: String, reason: String },

    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("required collaborator missing: {name}")]
    MissingCollaborator { name: &'static str },

    // ========================================================================
    // Descriptor / input errors
    // ========================================================================
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("cannot parse '{input}' as a temporal value: {reason}")]
    InvalidTemporal { input: String, reason: String },

    // ========================================================================
    // Accumulated validation, surfaced once
    // ========================================================================
    #[error("metamodel has {count} validation failure(s):\n  {}", .failures.join("\n  "))]
    MetaModelInvalid { count: usize, failures: Vec<String> },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MixinConstructorNotResolved { mixin_type } => vec![
                format!("Give '{mixin_type}' exactly one public constructor taking its holder"),
                "Check the validation report: the mixin shape is reported there first".into(),
            ],
            Self::MixinHolderMismatch { expected, .. } => vec![
                format!("Only instances assignable to '{expected}' can host this mixin"),
                "Use MixinFacet::is_mixin_for before instantiating".into(),
            ],
            Self::MixinInstantiationFailed { mixin_type, .. } => vec![
                format!("Check that '{mixin_type}' is concrete and its constructor is public"),
            ],
            Self::MissingCollaborator { name } => vec![
                format!("Provide the '{name}' collaborator when building the facet processor"),
            ],
            Self::InvalidDescriptor(msg) => vec![
                "Check the type descriptor manifest".into(),
                format!("Details: {msg}"),
            ],
            Self::UnknownType { name } => vec![
                format!("No descriptor was loaded for '{name}'"),
                "Make sure every referenced type is declared in a manifest".into(),
            ],
            Self::InvalidTemporal { .. } => vec![
                "Use one of the configured formats, an ISO-8601 value, or a relative token like +3d"
                    .into(),
            ],
            Self::MetaModelInvalid { count, .. } => vec![
                format!("Fix the {count} problem(s) listed above; all are reported in one pass"),
                "Run `facetmodel validate <DIR>` to re-check".into(),
            ],
            Self::Unrecoverable { .. } => vec!["This indicates a defect in the domain model".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unrecoverable { .. }
            | Self::MixinConstructorNotResolved { .. }
            | Self::MixinHolderMismatch { .. }
            | Self::MixinInstantiationFailed { .. } => ErrorCategory::Unrecoverable,
            Self::MissingCollaborator { .. } => ErrorCategory::Configuration,
            Self::InvalidDescriptor(_)
            | Self::InvalidTemporal { .. }
            | Self::MetaModelInvalid { .. } => ErrorCategory::Validation,
            Self::UnknownType { .. } => ErrorCategory::NotFound,
        }
    }

    /// Unrecoverable errors abort the metamodel build; they are never retried.
    pub fn is_unrecoverable(&self) -> bool {
        self.category() == ErrorCategory::Unrecoverable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Unrecoverable,
    NotFound,
    Configuration,
}
