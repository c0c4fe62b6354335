//! The standard facet factories.

pub mod accessors;
pub mod action;
pub mod annotations;
pub mod mixin;
pub mod programmatic;
pub mod supporting;
pub mod temporal;

pub use accessors::{
    CollectionAccessorFacetFactory, PropertyAccessorFacetFactory, PropertySetterFacetFactory,
    accessor_member_id,
};
pub use action::ActionInvocationFacetFactory;
pub use annotations::{
    DomainObjectNatureFacetFactory, HiddenAnnotationFacetFactory, MemberOrderFacetFactory,
    NamedFacetFactory, ParameterNamedFacetFactory,
};
pub use mixin::{MixinFacetForDomainObjectAnnotationFactory, MixinFacetForMixinAnnotationFactory};
pub use programmatic::ProgrammaticFacetFactory;
pub use supporting::SupportingMethodFacetFactory;
pub use temporal::TemporalValueFacetFactory;
