//! Application layer for facetmodel.
//!
//! This layer contains:
//! - **Facets**: The factory contract, standard factories and the processor
//! - **Services**: Use case orchestration (SpecificationLoader, MetaModelService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Config**: Settings that shape a build
//! - **Errors**: Application-specific error types
//!
//! Metamodel rules (rankings, mixin shape, validation) live in
//! `crate::domain`; this layer decides when they are applied.

pub mod config;
pub mod error;
pub mod facets;
pub mod layout;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{MetaModelService, SpecificationLoader, SpecificationSummary};

// Re-export port traits (for adapter implementation)
pub use ports::{DescriptorSource, LayoutSource, SpecificationLookup};

pub use config::MetaModelConfig;
pub use error::ApplicationError;
pub use facets::{FacetFactory, FacetProcessor, ProgrammingModel};
pub use layout::{Layout, LayoutOutcome, MemberLayout};
