//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer, the facet processor and the ports
//! to accomplish high-level use cases like "build the metamodel" or
//! "reload a layout".

pub mod metamodel_service;
pub mod specification_loader;

pub use metamodel_service::{FacetInfo, MemberInfo, MetaModelService, SpecificationSummary};
pub use specification_loader::SpecificationLoader;
