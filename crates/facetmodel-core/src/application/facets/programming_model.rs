//! The ordered set of factories a processor is initialised with.

use crate::application::facets::{factories::*, factory::FacetFactory};

/// Factories in the order they run. Order matters: a later factory sees the
/// methods earlier ones left unclaimed and can override their facets.
#[derive(Default)]
pub struct ProgrammingModel {
    factories: Vec<Box<dyn FacetFactory>>,
}

impl ProgrammingModel {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard factories. Configuration reaches them through the
    /// processor's context on registration.
    pub fn standard() -> Self {
        let mut model = Self::empty();
        model
            .add(ProgrammaticFacetFactory::new())
            .add(CollectionAccessorFacetFactory::new())
            .add(PropertyAccessorFacetFactory::new())
            .add(PropertySetterFacetFactory::new())
            .add(ActionInvocationFacetFactory::new())
            .add(SupportingMethodFacetFactory::hide())
            .add(SupportingMethodFacetFactory::disable())
            .add(SupportingMethodFacetFactory::validate())
            .add(HiddenAnnotationFacetFactory::new())
            .add(NamedFacetFactory::new())
            .add(MemberOrderFacetFactory::new())
            .add(ParameterNamedFacetFactory::new())
            .add(DomainObjectNatureFacetFactory::new())
            .add(MixinFacetForDomainObjectAnnotationFactory::new())
            .add(MixinFacetForMixinAnnotationFactory::new())
            .add(TemporalValueFacetFactory::new());
        model
    }

    pub fn add(&mut self, factory: impl FacetFactory + 'static) -> &mut Self {
        self.factories.push(Box::new(factory));
        self
    }

    pub fn add_boxed(&mut self, factory: Box<dyn FacetFactory>) -> &mut Self {
        self.factories.push(factory);
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.name()).collect()
    }

    pub fn into_factories(self) -> Vec<Box<dyn FacetFactory>> {
        self.factories
    }
}

impl std::fmt::Debug for ProgrammingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_model_order() {
        let model = ProgrammingModel::standard();
        let names = model.names();
        assert_eq!(names.first(), Some(&"programmatic"));
        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
        assert!(pos("collection-accessor") < pos("property-accessor"));
        assert!(pos("property-accessor") < pos("property-setter"));
        assert!(pos("mixin-domain-object") < pos("mixin-marker"));
        assert_eq!(names.last(), Some(&"temporal-value"));
        assert_eq!(model.len(), 16);
    }

    #[test]
    fn empty_model_has_no_factories() {
        assert!(ProgrammingModel::empty().into_factories().is_empty());
    }
}
