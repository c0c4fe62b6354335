//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `facetmodel-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `DescriptorSource`: Type descriptors to build the metamodel from
//!   - `LayoutSource`: Per-type layout overrides
//!   - `SpecificationLookup`: Descriptor lookup handed to facet factories
//!   - `ObjectInstantiator` / `ServiceInjector`: Mixin instantiation
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    DescriptorSource, LayoutSource, ObjectInstantiator, ServiceInjector, SpecificationLookup,
};
