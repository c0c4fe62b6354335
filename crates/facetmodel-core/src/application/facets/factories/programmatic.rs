//! `Programmatic` methods: public for code, invisible to the metamodel.

use crate::application::facets::factory::{
    FacetFactory, MethodFilteringFacetFactory, ProcessClassContext,
};
use crate::domain::{
    FacetPayload, FacetType, FeatureType, MethodDescriptor, Precedence, annotations,
};

#[derive(Debug, Default)]
pub struct ProgrammaticFacetFactory;

impl ProgrammaticFacetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FacetFactory for ProgrammaticFacetFactory {
    fn name(&self) -> &'static str {
        "programmatic"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::OBJECT
    }

    /// Claims every `Programmatic` method up front and records their names on
    /// the type.
    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let removed = ctx
            .remover
            .remove_methods(&mut |m| m.has_annotation(annotations::PROGRAMMATIC));
        if removed.is_empty() {
            return;
        }
        let names = removed
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        ctx.facets
            .add(FacetType::PROGRAMMATIC, Precedence::Annotation, FacetPayload::Text(names));
    }

    fn as_method_filtering(&self) -> Option<&dyn MethodFilteringFacetFactory> {
        Some(self)
    }
}

impl MethodFilteringFacetFactory for ProgrammaticFacetFactory {
    fn recognizes(&self, method: &MethodDescriptor) -> bool {
        method.has_annotation(annotations::PROGRAMMATIC)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::facets::method_remover::{CandidateMethods, MethodRemover};
    use crate::domain::{Annotation, FacetHolder, Identifier, TypeDescriptor};

    #[test]
    fn programmatic_methods_are_claimed_and_recorded() {
        let ty = TypeDescriptor::builder("Customer")
            .method("recalculate", |m| m.annotated(Annotation::new("Programmatic")))
            .method("placeOrder", |m| m)
            .build()
            .unwrap();
        let mut remover = CandidateMethods::new(ty.methods.iter().cloned().map(Arc::new));
        let holder = FacetHolder::new(Identifier::for_type(ty.name.clone()), FeatureType::Object);

        let mut ctx = ProcessClassContext::new(&ty, &mut remover, &holder);
        ProgrammaticFacetFactory.process_class(&mut ctx);

        assert!(remover.find_method("recalculate", None).is_none());
        assert!(remover.find_method("placeOrder", None).is_some());
        let facet = holder.get_facet(FacetType::PROGRAMMATIC).unwrap();
        assert_eq!(facet.payload().as_text(), Some("recalculate"));
        assert!(ProgrammaticFacetFactory.recognizes(&ty.methods[0]));
        assert!(!ProgrammaticFacetFactory.recognizes(&ty.methods[1]));
    }
}
