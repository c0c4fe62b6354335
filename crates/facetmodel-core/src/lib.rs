//! facetmodel Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the facet
//! metamodel: type descriptors go in, object specifications whose members
//! carry ranked facets come out.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          facetmodel-cli (CLI)           │
//! │      (inspect, validate, config)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (SpecificationLoader, MetaModelService) │
//! │   FacetProcessor + ProgrammingModel     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (DescriptorSource, LayoutSource, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    facetmodel-adapters (Infrastructure) │
//! │ (DescriptorLoader, FileLayoutSource...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Facet, FacetRanking, FacetHolder,      │
//! │  MixinFacet, validators)                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use facetmodel_core::application::{MetaModelConfig, SpecificationLoader};
//!
//! // `source` is any `DescriptorSource` adapter
//! let loader = SpecificationLoader::new(Arc::new(MetaModelConfig::default()), source);
//! let model = loader.load_all()?;
//! for failure in model.failures() {
//!     eprintln!("{failure}");
//! }
//! ```

// Domain layer (stable, well-defined API)
pub mod domain;

// Application layer (orchestration logic)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Layout, MetaModelConfig, MetaModelService, ProgrammingModel, SpecificationLoader,
        SpecificationSummary,
        facets::{FacetFactory, FacetProcessor},
        ports::{DescriptorSource, LayoutSource, ObjectInstantiator, ServiceInjector},
    };
    pub use crate::domain::{
        Annotation, Facet, FacetHolder, FacetPayload, FacetRanking, FacetType, FeatureType,
        HasFacets, MetaModel, MixinFacet, ObjectSpecification, Pojo, Precedence,
        TypeDescriptor, TypeName, ValidationFailure,
    };
    pub use crate::error::{MetaModelError, MetaModelResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
