// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for facetmodel.
//!
//! Pure metamodel logic: descriptors, facets and their rankings, holders,
//! specifications, mixins and validation. Nothing here performs I/O or logs;
//! sources, layouts and runtime collaborators arrive through ports defined
//! in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: Descriptors are values, never reflected from live code
//! - **Shared immutable facets**: `Arc<Facet>`, replaced rather than mutated
//! - **Accumulated validation**: model defects never abort a build
//!
pub mod entities;
pub mod error;
pub mod mixin;
pub mod validation;
pub mod value_objects;
pub mod value_semantics;

pub use entities::{
    descriptor::{
        Annotation, ConstructorDescriptor, MethodDescriptor, TypeDescriptor,
        TypeDescriptorBuilder, annotations,
    },
    facet::{Facet, FacetPayload, FacetType, MemberOrder},
    holder::{FacetHolder, HasFacets},
    pojo::Pojo,
    ranking::FacetRanking,
    specification::{
        ActionParameter, AssociationKind, MetaModel, ObjectAction, ObjectAssociation,
        ObjectSpecification,
    },
    universe::TypeUniverse,
};

pub use error::{DomainError, ErrorCategory};

pub use mixin::{
    ConstructorPolicy, InstantiationError, MixinFacet, MixinOrigin, MixinRuntime,
    ObjectInstantiator, ServiceInjector,
};

pub use validation::{
    MemberIdUniquenessValidator, MetaModelValidator, MetaModelValidatorComposite,
    MetaModelValidatorForMixinTypes, OrphanedSupportingMethodValidator, UnclaimedMethodValidator,
    ValidationFailure, ValidationFailures, ValidationSink,
};

pub use value_objects::{FeatureType, Identifier, Nature, Precedence, TypeName, Visibility};

pub use value_semantics::{TemporalConfig, TemporalValueSemantics};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    // ========================================================================
    // Cross-entity behaviour
    // ========================================================================

    fn customer() -> TypeDescriptor {
        TypeDescriptor::builder("Customer")
            .extends("Party")
            .constructor(|c| c)
            .method("getName", |m| m.returning("String"))
            .build()
            .unwrap()
    }

    #[test]
    fn descriptor_feeds_specification_members() {
        let ty = customer();
        let getter = Arc::new(ty.method_named("getName").unwrap().clone());
        let mut spec = ObjectSpecification::new(ty.name.clone(), ty.supertype.clone(), vec![]);
        spec.add_association(ObjectAssociation::new(
            &ty.name,
            "name",
            AssociationKind::Property,
            getter,
        ));

        let member = spec.member("name").unwrap();
        assert_eq!(member.feature_type(), FeatureType::Property);
        assert_eq!(member.identifier().to_string(), "Customer#name");
    }

    #[test]
    fn layout_reinstall_keeps_one_entry_per_precedence() {
        let holder = FacetHolder::new(
            Identifier::for_member(TypeName::new("Customer"), "name"),
            FeatureType::Property,
        );
        let install = || {
            holder.add_facet(Facet::new(
                FacetType::NAMED,
                Precedence::Layout,
                FacetPayload::Text("Full name".into()),
                holder.identifier().clone(),
            ))
        };

        install();
        let before = holder.get_facet(FacetType::NAMED).unwrap();
        install();
        let after = holder.get_facet(FacetType::NAMED).unwrap();

        assert_eq!(
            holder
                .facets_at_or_below(FacetType::NAMED, Precedence::Layout)
                .len(),
            1
        );
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before, after);
    }

    #[test]
    fn temporal_payload_describes_formats() {
        let payload = FacetPayload::Temporal(Arc::new(TemporalValueSemantics::new(
            TemporalConfig {
                formats: vec!["%Y".into()],
                display_format: "%Y".into(),
            },
        )));
        assert_eq!(payload.describe(), "temporal [%Y]");
    }
}
