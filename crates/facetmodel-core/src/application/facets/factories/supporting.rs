//! Supporting methods: `hideX()`, `disableX()`, `validateX(..)` next to the
//! member `X` they qualify.

use crate::application::facets::{
    factory::{FacetFactory, ProcessMethodContext},
    naming::capitalize,
};
use crate::domain::{
    FacetPayload, FacetType, FeatureType, MetaModelValidator, OrphanedSupportingMethodValidator,
    Precedence, TypeName,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Support {
    Hide,
    Disable,
    Validate,
}

/// One factory per supporting prefix.
#[derive(Debug, Clone, Copy)]
pub struct SupportingMethodFacetFactory {
    support: Support,
}

impl SupportingMethodFacetFactory {
    pub fn hide() -> Self {
        Self {
            support: Support::Hide,
        }
    }

    pub fn disable() -> Self {
        Self {
            support: Support::Disable,
        }
    }

    pub fn validate() -> Self {
        Self {
            support: Support::Validate,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self.support {
            Support::Hide => "hide",
            Support::Disable => "disable",
            Support::Validate => "validate",
        }
    }

    fn facet_type(&self) -> FacetType {
        match self.support {
            Support::Hide => FacetType::HIDDEN,
            Support::Disable => FacetType::DISABLED,
            Support::Validate => FacetType::VALIDATE,
        }
    }

    /// Parameter list the supporting method must declare for this member.
    fn expected_parameters(&self, ctx: &ProcessMethodContext<'_>) -> Option<Vec<TypeName>> {
        match (self.support, ctx.feature_type) {
            (Support::Hide | Support::Disable, _) => Some(Vec::new()),
            (Support::Validate, FeatureType::Property) => {
                ctx.method.return_type.clone().map(|t| vec![t])
            }
            (Support::Validate, FeatureType::Action) => Some(ctx.method.parameter_types.clone()),
            (Support::Validate, _) => None,
        }
    }
}

impl FacetFactory for SupportingMethodFacetFactory {
    fn name(&self) -> &'static str {
        match self.support {
            Support::Hide => "supporting-hide",
            Support::Disable => "supporting-disable",
            Support::Validate => "supporting-validate",
        }
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        match self.support {
            Support::Hide | Support::Disable => FeatureType::MEMBERS,
            Support::Validate => FeatureType::PROPERTIES_AND_ACTIONS,
        }
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let Some(parameters) = self.expected_parameters(ctx) else {
            return;
        };
        let name = format!("{}{}", self.prefix(), capitalize(ctx.member_id()));
        let Some(supporting) = ctx.remover.find_method(&name, Some(&parameters)) else {
            return;
        };
        ctx.remover.remove_method(&supporting);
        ctx.facets
            .add(self.facet_type(), Precedence::Default, FacetPayload::Method(supporting));
    }

    fn method_prefixes(&self) -> &'static [&'static str] {
        match self.support {
            Support::Hide => &["hide"],
            Support::Disable => &["disable"],
            Support::Validate => &["validate"],
        }
    }

    fn validators(&self) -> Vec<Box<dyn MetaModelValidator>> {
        vec![Box::new(OrphanedSupportingMethodValidator::new(self.prefix()))]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::facets::method_remover::{CandidateMethods, MethodRemover};
    use crate::domain::{FacetHolder, Identifier, MethodDescriptor, TypeDescriptor};

    fn customer() -> TypeDescriptor {
        TypeDescriptor::builder("Customer")
            .method("getName", |m| m.returning("String"))
            .method("hideName", |m| m.returning("boolean"))
            .method("validateName", |m| m.param("String").returning("String"))
            .method("placeOrder", |m| m.param("Product").param("int"))
            .method("validatePlaceOrder", |m| m.param("Product"))
            .method("disablePlaceOrder", |m| m.returning("String"))
            .build()
            .unwrap()
    }

    fn run(
        factory: SupportingMethodFacetFactory,
        ty: &TypeDescriptor,
        member: &str,
        method: &str,
        feature_type: FeatureType,
        remover: &mut CandidateMethods,
    ) -> FacetHolder {
        let method: Arc<MethodDescriptor> = Arc::new(ty.method_named(method).unwrap().clone());
        let holder =
            FacetHolder::new(Identifier::for_member(ty.name.clone(), member), feature_type);
        let mut ctx = ProcessMethodContext::new(ty, &method, feature_type, remover, &holder);
        factory.process_method(&mut ctx);
        holder
    }

    #[test]
    fn property_supporting_methods_are_claimed() {
        let ty = customer();
        let mut remover = CandidateMethods::new(ty.methods.iter().cloned().map(Arc::new));

        let holder = run(
            SupportingMethodFacetFactory::hide(),
            &ty,
            "name",
            "getName",
            FeatureType::Property,
            &mut remover,
        );
        assert!(holder.contains_facet(FacetType::HIDDEN));

        let holder = run(
            SupportingMethodFacetFactory::validate(),
            &ty,
            "name",
            "getName",
            FeatureType::Property,
            &mut remover,
        );
        let facet = holder.get_facet(FacetType::VALIDATE).unwrap();
        assert_eq!(facet.payload().as_method().unwrap().name, "validateName");
        assert!(remover.find_method("hideName", None).is_none());
        assert!(remover.find_method("validateName", None).is_none());
    }

    #[test]
    fn action_validate_must_match_parameters() {
        let ty = customer();
        let mut remover = CandidateMethods::new(ty.methods.iter().cloned().map(Arc::new));

        let holder = run(
            SupportingMethodFacetFactory::validate(),
            &ty,
            "placeOrder",
            "placeOrder",
            FeatureType::Action,
            &mut remover,
        );
        assert!(!holder.contains_facet(FacetType::VALIDATE));
        assert!(remover.find_method("validatePlaceOrder", None).is_some());

        let holder = run(
            SupportingMethodFacetFactory::disable(),
            &ty,
            "placeOrder",
            "placeOrder",
            FeatureType::Action,
            &mut remover,
        );
        assert!(holder.contains_facet(FacetType::DISABLED));
    }

    #[test]
    fn each_prefix_contributes_an_orphan_validator() {
        let factory = SupportingMethodFacetFactory::disable();
        assert_eq!(factory.method_prefixes(), &["disable"]);
        assert_eq!(factory.validators().len(), 1);
    }
}
