//! Infrastructure adapters for facetmodel.
//!
//! This crate implements the ports defined in `facetmodel-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod descriptor_loader;
pub mod descriptor_store;
pub mod error;
pub mod layout;
pub mod runtime;

// Re-export commonly used adapters
pub use descriptor_loader::DescriptorLoader;
pub use descriptor_store::InMemoryDescriptorSource;
pub use error::AdapterError;
pub use layout::{FileLayoutSource, InMemoryLayoutSource};
pub use runtime::{DescriptorInstantiator, ServiceRegistry};
