//! Facets read straight off declarative annotations, plus the names inferred
//! when there are none.

use crate::application::facets::{
    factory::{
        FacetFactory, FacetSink, FactoryContext, ProcessClassContext, ProcessMethodContext,
        ProcessParameterContext,
    },
    naming::natural_name,
};
use crate::domain::{
    Annotation, FacetPayload, FacetType, FeatureType, Identifier, MemberOrder, Nature,
    Precedence, ValidationSink, annotations,
};

// ── Hidden ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HiddenAnnotationFacetFactory;

impl HiddenAnnotationFacetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FacetFactory for HiddenAnnotationFacetFactory {
    fn name(&self) -> &'static str {
        "hidden-annotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::OBJECT_AND_MEMBERS
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        if ctx.cls.has_annotation(annotations::HIDDEN) {
            ctx.facets
                .add(FacetType::HIDDEN, Precedence::Annotation, FacetPayload::Flag(true));
        }
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        if ctx.method.has_annotation(annotations::HIDDEN) {
            ctx.facets
                .add(FacetType::HIDDEN, Precedence::Annotation, FacetPayload::Flag(true));
        }
    }
}

// ── Named / DescribedAs ───────────────────────────────────────────────────────

fn add_declared_text(
    facets: &mut FacetSink<'_>,
    annotation: Option<&Annotation>,
    facet_type: FacetType,
) {
    if let Some(value) = annotation.and_then(|a| a.attribute("value")) {
        facets.add(facet_type, Precedence::Annotation, FacetPayload::Text(value.to_owned()));
    }
}

/// Display names: inferred from the identifier, overridden by `Named`.
#[derive(Debug, Default)]
pub struct NamedFacetFactory;

impl NamedFacetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FacetFactory for NamedFacetFactory {
    fn name(&self) -> &'static str {
        "named"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::OBJECT_AND_MEMBERS
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        ctx.facets.add(
            FacetType::NAMED,
            Precedence::Inferred,
            FacetPayload::Text(natural_name(ctx.cls.name.simple_name())),
        );
        add_declared_text(&mut ctx.facets, ctx.cls.annotation(annotations::NAMED), FacetType::NAMED);
        add_declared_text(
            &mut ctx.facets,
            ctx.cls.annotation(annotations::DESCRIBED_AS),
            FacetType::DESCRIBED_AS,
        );
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let inferred = natural_name(ctx.member_id());
        ctx.facets
            .add(FacetType::NAMED, Precedence::Inferred, FacetPayload::Text(inferred));
        add_declared_text(
            &mut ctx.facets,
            ctx.method.annotation(annotations::NAMED),
            FacetType::NAMED,
        );
        add_declared_text(
            &mut ctx.facets,
            ctx.method.annotation(annotations::DESCRIBED_AS),
            FacetType::DESCRIBED_AS,
        );
    }
}

/// Parameter names: `Arg N` (1-based) unless the parameter is `Named`.
#[derive(Debug, Default)]
pub struct ParameterNamedFacetFactory;

impl ParameterNamedFacetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FacetFactory for ParameterNamedFacetFactory {
    fn name(&self) -> &'static str {
        "parameter-named"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::PARAMETERS_ONLY
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        ctx.facets.add(
            FacetType::NAMED,
            Precedence::Inferred,
            FacetPayload::Text(format!("Arg {}", ctx.index + 1)),
        );
        add_declared_text(
            &mut ctx.facets,
            ctx.method.parameter_annotation(ctx.index, annotations::NAMED),
            FacetType::NAMED,
        );
        add_declared_text(
            &mut ctx.facets,
            ctx.method.parameter_annotation(ctx.index, annotations::DESCRIBED_AS),
            FacetType::DESCRIBED_AS,
        );
    }
}

// ── MemberOrder ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemberOrderFacetFactory;

impl MemberOrderFacetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FacetFactory for MemberOrderFacetFactory {
    fn name(&self) -> &'static str {
        "member-order"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::MEMBERS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let Some(annotation) = ctx.method.annotation(annotations::MEMBER_ORDER) else {
            return;
        };
        let order = MemberOrder {
            sequence: annotation.attribute("sequence").unwrap_or_default().to_owned(),
            group: annotation.attribute("name").map(str::to_owned),
        };
        ctx.facets.add(
            FacetType::MEMBER_ORDER,
            Precedence::Annotation,
            FacetPayload::MemberOrder(order),
        );
    }
}

// ── DomainObject nature ───────────────────────────────────────────────────────

/// Records `DomainObject(nature = ...)`; an unknown nature is a model defect.
#[derive(Debug, Default)]
pub struct DomainObjectNatureFacetFactory {
    validation: ValidationSink,
}

impl DomainObjectNatureFacetFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FacetFactory for DomainObjectNatureFacetFactory {
    fn name(&self) -> &'static str {
        "domain-object-nature"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::OBJECT
    }

    fn inject(&mut self, context: &FactoryContext) {
        self.validation = context.validation.clone();
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let Some(annotation) = ctx.cls.annotation(annotations::DOMAIN_OBJECT) else {
            return;
        };
        match annotation.attribute("nature").unwrap_or_default().parse::<Nature>() {
            Ok(nature) => ctx.facets.add(
                FacetType::DOMAIN_OBJECT_NATURE,
                Precedence::Annotation,
                FacetPayload::Nature(nature),
            ),
            Err(err) => self.validation.raise(
                Identifier::for_type(ctx.cls.name.clone()),
                format!("{}: {err}", ctx.cls.name),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::facets::method_remover::CandidateMethods;
    use crate::domain::{FacetHolder, HasFacets, MethodDescriptor, TypeDescriptor, TypeName};

    fn object_holder(name: &str) -> FacetHolder {
        FacetHolder::new(Identifier::for_type(TypeName::new(name)), FeatureType::Object)
    }

    fn run_class(factory: &dyn FacetFactory, ty: &TypeDescriptor) -> FacetHolder {
        let holder = object_holder(ty.name.as_str());
        let mut remover = CandidateMethods::default();
        let mut ctx = ProcessClassContext::new(ty, &mut remover, &holder);
        factory.process_class(&mut ctx);
        holder
    }

    fn run_member(factory: &dyn FacetFactory, method: MethodDescriptor, id: &str) -> FacetHolder {
        let ty = TypeDescriptor::builder(method.declaring_type.clone())
            .build()
            .unwrap();
        let method = Arc::new(method);
        let holder = FacetHolder::new(
            Identifier::for_member(ty.name.clone(), id),
            FeatureType::Property,
        );
        let mut remover = CandidateMethods::default();
        let mut ctx =
            ProcessMethodContext::new(&ty, &method, FeatureType::Property, &mut remover, &holder);
        factory.process_method(&mut ctx);
        holder
    }

    fn text(holder: &FacetHolder, facet_type: FacetType) -> Option<String> {
        holder
            .get_facet(facet_type)
            .and_then(|f| f.payload().as_text().map(str::to_owned))
    }

    #[test]
    fn declared_name_beats_inferred_name() {
        let plain = run_member(
            &NamedFacetFactory,
            MethodDescriptor::new("Customer", "getFirstName").returning("String"),
            "firstName",
        );
        assert_eq!(text(&plain, FacetType::NAMED).as_deref(), Some("First Name"));

        let named = run_member(
            &NamedFacetFactory,
            MethodDescriptor::new("Customer", "getFirstName")
                .returning("String")
                .annotated(Annotation::new("Named").with("value", "Given name"))
                .annotated(Annotation::new("DescribedAs").with("value", "As on the passport")),
            "firstName",
        );
        assert_eq!(text(&named, FacetType::NAMED).as_deref(), Some("Given name"));
        assert_eq!(
            text(&named, FacetType::DESCRIBED_AS).as_deref(),
            Some("As on the passport")
        );
        assert_eq!(named.ranking(FacetType::NAMED).unwrap().len(), 2);
    }

    #[test]
    fn type_names_are_inferred_from_simple_name() {
        let ty = TypeDescriptor::builder("acme.PurchaseOrder").build().unwrap();
        let holder = run_class(&NamedFacetFactory, &ty);
        assert_eq!(text(&holder, FacetType::NAMED).as_deref(), Some("Purchase Order"));
    }

    #[test]
    fn hidden_annotation_sets_flag() {
        let holder = run_member(
            &HiddenAnnotationFacetFactory,
            MethodDescriptor::new("Customer", "getNotes")
                .returning("String")
                .annotated(Annotation::new("Hidden")),
            "notes",
        );
        let facet = holder.get_facet(FacetType::HIDDEN).unwrap();
        assert_eq!(facet.payload().as_flag(), Some(true));
        assert_eq!(facet.precedence(), Precedence::Annotation);
    }

    #[test]
    fn member_order_reads_sequence_and_group() {
        let holder = run_member(
            &MemberOrderFacetFactory,
            MethodDescriptor::new("Customer", "getName")
                .returning("String")
                .annotated(
                    Annotation::new("MemberOrder")
                        .with("sequence", "1.2")
                        .with("name", "Details"),
                ),
            "name",
        );
        let facet = holder.get_facet(FacetType::MEMBER_ORDER).unwrap();
        let order = facet.payload().as_member_order().unwrap();
        assert_eq!(order.sequence, "1.2");
        assert_eq!(order.group.as_deref(), Some("Details"));
    }

    #[test]
    fn parameters_default_to_one_based_arg_names() {
        let method = MethodDescriptor::new("Customer", "placeOrder")
            .param("Product")
            .param_annotated("int", Annotation::new("Named").with("value", "Quantity"));
        let names: Vec<_> = (0..2)
            .map(|index| {
                let holder = FacetHolder::new(
                    Identifier::for_parameter(TypeName::new("Customer"), "placeOrder", index),
                    FeatureType::ActionParameter,
                );
                let mut ctx = ProcessParameterContext::new(&method, index, &holder);
                ParameterNamedFacetFactory.process_param(&mut ctx);
                text(&holder, FacetType::NAMED).unwrap()
            })
            .collect();
        assert_eq!(names, vec!["Arg 1", "Quantity"]);
    }

    #[test]
    fn unknown_nature_is_reported_not_installed() {
        let sink = ValidationSink::new();
        let mut factory = DomainObjectNatureFacetFactory::new();
        factory.inject(&FactoryContext {
            validation: sink.clone(),
            ..FactoryContext::default()
        });

        let gadget = TypeDescriptor::builder("Gadget")
            .annotated(Annotation::new("DomainObject").with("nature", "gadget"))
            .build()
            .unwrap();
        let holder = run_class(&factory, &gadget);
        assert!(!holder.contains_facet(FacetType::DOMAIN_OBJECT_NATURE));
        assert_eq!(sink.len(), 1);

        let entity = TypeDescriptor::builder("Customer")
            .annotated(Annotation::new("DomainObject").with("nature", "entity"))
            .build()
            .unwrap();
        let holder = run_class(&factory, &entity);
        let facet = holder.get_facet(FacetType::DOMAIN_OBJECT_NATURE).unwrap();
        assert_eq!(facet.payload(), &FacetPayload::Nature(Nature::Entity));
    }
}
