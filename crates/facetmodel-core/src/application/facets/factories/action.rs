use std::sync::Arc;

use crate::application::facets::factory::{FacetFactory, ProcessMethodContext};
use crate::domain::{FacetPayload, FacetType, FeatureType, Precedence};

/// Every action is invoked through the method it was introspected from.
#[derive(Debug, Default)]
pub struct ActionInvocationFacetFactory;

impl ActionInvocationFacetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FacetFactory for ActionInvocationFacetFactory {
    fn name(&self) -> &'static str {
        "action-invocation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::ACTIONS_ONLY
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        ctx.facets.add(
            FacetType::ACTION_INVOCATION,
            Precedence::Default,
            FacetPayload::Method(Arc::clone(ctx.method)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::facets::method_remover::CandidateMethods;
    use crate::domain::{FacetHolder, HasFacets, Identifier, MethodDescriptor, TypeDescriptor};

    #[test]
    fn invocation_facet_carries_the_method() {
        let ty = TypeDescriptor::builder("Customer")
            .method("placeOrder", |m| m.param("Product"))
            .build()
            .unwrap();
        let method: Arc<MethodDescriptor> = Arc::new(ty.methods[0].clone());
        let holder = FacetHolder::new(
            Identifier::for_member(ty.name.clone(), "placeOrder"),
            FeatureType::Action,
        );
        let mut remover = CandidateMethods::default();

        let mut ctx =
            ProcessMethodContext::new(&ty, &method, FeatureType::Action, &mut remover, &holder);
        ActionInvocationFacetFactory.process_method(&mut ctx);

        let facet = holder.get_facet(FacetType::ACTION_INVOCATION).unwrap();
        assert_eq!(facet.payload().as_method(), Some(method.as_ref()));
    }
}
