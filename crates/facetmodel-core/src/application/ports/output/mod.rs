//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `facetmodel-adapters` crate provides implementations.

use std::sync::Arc;

use crate::application::layout::Layout;
use crate::domain::{TypeDescriptor, TypeName, TypeUniverse};
use crate::error::MetaModelResult;

pub use crate::domain::{ObjectInstantiator, ServiceInjector};

/// Port for the type descriptors a metamodel is built from.
///
/// Implemented by:
/// - `facetmodel_adapters::descriptor_store::InMemoryDescriptorSource` (tests, embedding)
/// - `facetmodel_adapters::descriptor_loader::DescriptorLoader` (`*.types.toml` files)
pub trait DescriptorSource: Send + Sync {
    /// Human-readable origin, used in diagnostics.
    fn name(&self) -> String;

    /// Every descriptor this source knows about.
    fn load(&self) -> MetaModelResult<Vec<TypeDescriptor>>;
}

/// Port for externally supplied per-type member overrides.
///
/// Implemented by:
/// - `facetmodel_adapters::layout::InMemoryLayoutSource`
/// - `facetmodel_adapters::layout::FileLayoutSource` (`<Type>.layout.toml`)
pub trait LayoutSource: Send + Sync {
    /// `Ok(None)` when the type has no layout.
    fn layout_for(&self, type_name: &TypeName) -> MetaModelResult<Option<Layout>>;
}

/// Read access to the descriptors of the build in progress, handed to facet
/// factories on registration.
pub trait SpecificationLookup: Send + Sync {
    fn universe(&self) -> &TypeUniverse;

    fn descriptor(&self, name: &TypeName) -> Option<Arc<TypeDescriptor>> {
        self.universe().get(name).cloned()
    }

    fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
        self.universe().is_assignable(from, to)
    }
}

impl SpecificationLookup for TypeUniverse {
    fn universe(&self) -> &TypeUniverse {
        self
    }
}
