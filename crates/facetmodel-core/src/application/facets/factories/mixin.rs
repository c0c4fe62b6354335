//! The two ways a type declares itself a mixin.
//!
//! Both paths share one shape check (`MetaModelValidatorForMixinTypes`) and
//! differ only in the annotation they read and the constructor policy they
//! apply.

use std::sync::Arc;

use crate::application::{
    config::MixinConfig,
    facets::factory::{FacetFactory, FactoryContext, ProcessClassContext},
    ports::SpecificationLookup,
};
use crate::domain::{
    Annotation, ConstructorPolicy, FacetPayload, FacetType, FeatureType, Identifier, MixinFacet,
    MetaModelValidatorForMixinTypes, Nature, Precedence, TypeDescriptor, TypeUniverse,
    ValidationSink, annotations,
};

/// Collaborators both mixin factories receive on registration.
#[derive(Clone)]
struct MixinSupport {
    config: MixinConfig,
    specifications: Arc<dyn SpecificationLookup>,
    validation: ValidationSink,
}

impl Default for MixinSupport {
    fn default() -> Self {
        Self {
            config: MixinConfig::default(),
            specifications: Arc::new(TypeUniverse::new()),
            validation: ValidationSink::new(),
        }
    }
}

impl MixinSupport {
    fn inject(&mut self, context: &FactoryContext) {
        self.config = context.config.mixins.clone();
        self.specifications = Arc::clone(&context.specifications);
        self.validation = context.validation.clone();
    }

    fn ensure_shape(&self, marker: &'static str, cls: &TypeDescriptor, policy: ConstructorPolicy) -> bool {
        MetaModelValidatorForMixinTypes::new(marker, self.validation.clone())
            .ensure_mixin_type_for(cls, policy)
    }

    /// Whether the main method is declared on the mixin type or inherited.
    fn main_method_resolves(&self, facet: &MixinFacet, cls: &TypeDescriptor) -> bool {
        let types = self.specifications.universe();
        if types.get(&cls.name).is_some() {
            types
                .visible_methods(&cls.name)
                .into_iter()
                .any(|m| facet.is_candidate_for_main(m, types))
        } else {
            cls.methods.iter().any(|m| facet.is_candidate_for_main(m, types))
        }
    }

    fn install(&self, ctx: &mut ProcessClassContext<'_>, facet: MixinFacet) {
        if !self.main_method_resolves(&facet, ctx.cls) {
            self.validation.raise(
                Identifier::for_type(ctx.cls.name.clone()),
                format!(
                    "{}: mixin main method '{}' not found",
                    ctx.cls.name,
                    facet.main_method()
                ),
            );
            return;
        }
        ctx.facets.add(
            FacetType::MIXIN,
            Precedence::Annotation,
            FacetPayload::Mixin(Arc::new(facet)),
        );
    }
}

fn is_mixin_nature(annotation: &Annotation) -> bool {
    annotation
        .attribute("nature")
        .and_then(|n| n.parse::<Nature>().ok())
        == Some(Nature::Mixin)
}

/// `DomainObject(nature = "mixin", mixinMethod = ...)`.
#[derive(Default)]
pub struct MixinFacetForDomainObjectAnnotationFactory {
    support: MixinSupport,
}

impl MixinFacetForDomainObjectAnnotationFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FacetFactory for MixinFacetForDomainObjectAnnotationFactory {
    fn name(&self) -> &'static str {
        "mixin-domain-object"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::OBJECT
    }

    fn inject(&mut self, context: &FactoryContext) {
        self.support.inject(context);
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let Some(annotation) = ctx.cls.annotation(annotations::DOMAIN_OBJECT) else {
            return;
        };
        if !is_mixin_nature(annotation) {
            return;
        }
        let policy = self.support.config.nature_policy;
        if !self.support.ensure_shape(annotations::DOMAIN_OBJECT, ctx.cls, policy) {
            return;
        }
        let facet = MixinFacet::for_domain_object_annotation(
            ctx.cls,
            annotation,
            policy,
            &self.support.config.default_main_method,
        );
        if let Some(facet) = facet {
            self.support.install(ctx, facet);
        }
    }
}

/// The `Mixin(method = ...)` marker.
#[derive(Default)]
pub struct MixinFacetForMixinAnnotationFactory {
    support: MixinSupport,
}

impl MixinFacetForMixinAnnotationFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FacetFactory for MixinFacetForMixinAnnotationFactory {
    fn name(&self) -> &'static str {
        "mixin-marker"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::OBJECT
    }

    fn inject(&mut self, context: &FactoryContext) {
        self.support.inject(context);
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let Some(annotation) = ctx.cls.annotation(annotations::MIXIN) else {
            return;
        };
        let policy = self.support.config.marker_policy;
        if !self.support.ensure_shape(annotations::MIXIN, ctx.cls, policy) {
            return;
        }
        let facet = MixinFacet::for_mixin_annotation(
            ctx.cls,
            annotation,
            policy,
            &self.support.config.default_main_method,
        );
        if let Some(facet) = facet {
            self.support.install(ctx, facet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::MetaModelConfig;
    use crate::application::facets::method_remover::CandidateMethods;
    use crate::domain::{FacetHolder, MixinOrigin};

    fn context(sink: &ValidationSink, config: MetaModelConfig) -> FactoryContext {
        FactoryContext {
            config: Arc::new(config),
            validation: sink.clone(),
            ..FactoryContext::default()
        }
    }

    fn run(factory: &dyn FacetFactory, ty: &TypeDescriptor) -> FacetHolder {
        let holder = FacetHolder::new(Identifier::for_type(ty.name.clone()), FeatureType::Object);
        let mut remover = CandidateMethods::default();
        let mut ctx = ProcessClassContext::new(ty, &mut remover, &holder);
        factory.process_class(&mut ctx);
        holder
    }

    fn marker_mixin(constructors: usize) -> TypeDescriptor {
        let mut builder = TypeDescriptor::builder("Customer_placeOrder")
            .annotated(Annotation::new("Mixin").with("method", "exec"))
            .method("exec", |m| m.param("Product").returning("Order"));
        for holder in ["Customer", "Supplier"].into_iter().take(constructors) {
            builder = builder.constructor(|c| c.param(holder));
        }
        builder.build().unwrap()
    }

    #[test]
    fn marker_path_installs_mixin_facet() {
        let sink = ValidationSink::new();
        let mut factory = MixinFacetForMixinAnnotationFactory::new();
        factory.inject(&context(&sink, MetaModelConfig::default()));

        let holder = run(&factory, &marker_mixin(1));
        let facet = holder.get_facet(FacetType::MIXIN).unwrap();
        let mixin = facet.payload().as_mixin().unwrap();
        assert_eq!(mixin.holder_type().as_str(), "Customer");
        assert_eq!(mixin.main_method(), "exec");
        assert_eq!(mixin.origin(), MixinOrigin::MixinMarker);
        assert!(sink.is_empty());
    }

    #[test]
    fn marker_path_first_match_tolerates_two_constructors() {
        let sink = ValidationSink::new();
        let mut factory = MixinFacetForMixinAnnotationFactory::new();
        factory.inject(&context(&sink, MetaModelConfig::default()));

        let holder = run(&factory, &marker_mixin(2));
        assert!(holder.contains_facet(FacetType::MIXIN));
        assert!(sink.is_empty());
    }

    #[test]
    fn strict_marker_policy_rejects_two_constructors() {
        let sink = ValidationSink::new();
        let mut config = MetaModelConfig::default();
        config.mixins.marker_policy = ConstructorPolicy::Strict;
        let mut factory = MixinFacetForMixinAnnotationFactory::new();
        factory.inject(&context(&sink, config));

        let holder = run(&factory, &marker_mixin(2));
        assert!(!holder.contains_facet(FacetType::MIXIN));
        assert_eq!(
            sink.snapshot().messages(),
            vec![
                "Customer_placeOrder: annotated with @Mixin annotation needs a single public \
                 1-arg constructor but has 2"
                    .to_owned()
            ]
        );
    }

    #[test]
    fn missing_constructor_is_reported_once() {
        let sink = ValidationSink::new();
        let mut factory = MixinFacetForMixinAnnotationFactory::new();
        factory.inject(&context(&sink, MetaModelConfig::default()));

        let holder = run(&factory, &marker_mixin(0));
        assert!(!holder.contains_facet(FacetType::MIXIN));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn nature_path_ignores_non_mixin_objects() {
        let sink = ValidationSink::new();
        let mut factory = MixinFacetForDomainObjectAnnotationFactory::new();
        factory.inject(&context(&sink, MetaModelConfig::default()));

        let entity = TypeDescriptor::builder("Customer")
            .annotated(Annotation::new("DomainObject").with("nature", "entity"))
            .build()
            .unwrap();
        assert!(!run(&factory, &entity).contains_facet(FacetType::MIXIN));
        assert!(sink.is_empty());
    }

    #[test]
    fn nature_path_uses_default_main_method() {
        let sink = ValidationSink::new();
        let mut factory = MixinFacetForDomainObjectAnnotationFactory::new();
        factory.inject(&context(&sink, MetaModelConfig::default()));

        let ty = TypeDescriptor::builder("Customer_notes")
            .annotated(Annotation::new("DomainObject").with("nature", "mixin"))
            .constructor(|c| c.param("Customer"))
            .method("act", |m| m.returning("String"))
            .build()
            .unwrap();
        let holder = run(&factory, &ty);
        let facet = holder.get_facet(FacetType::MIXIN).unwrap();
        assert_eq!(facet.payload().as_mixin().unwrap().main_method(), "act");
    }

    #[test]
    fn unresolved_main_method_is_reported() {
        let sink = ValidationSink::new();
        let mut factory = MixinFacetForDomainObjectAnnotationFactory::new();
        factory.inject(&context(&sink, MetaModelConfig::default()));

        let ty = TypeDescriptor::builder("Customer_notes")
            .annotated(
                Annotation::new("DomainObject")
                    .with("nature", "mixin")
                    .with("mixinMethod", "prop"),
            )
            .constructor(|c| c.param("Customer"))
            .build()
            .unwrap();
        assert!(!run(&factory, &ty).contains_facet(FacetType::MIXIN));
        assert_eq!(
            sink.snapshot().messages(),
            vec!["Customer_notes: mixin main method 'prop' not found".to_owned()]
        );
    }
}
