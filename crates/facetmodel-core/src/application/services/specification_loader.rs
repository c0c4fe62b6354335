//! Specification Loader - builds the metamodel from type descriptors.
//!
//! One pass per build:
//! 1. Load descriptors and register the programming model
//! 2. Introspect every type: class facets, collections, properties, actions
//! 3. Contribute mixins to the types they mix into
//! 4. Install layouts
//! 5. Run validators and collect every failure
//!
//! Model defects never abort the build; they are recorded on the returned
//! [`MetaModel`]. Only source and layout I/O failures are returned as errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        config::MetaModelConfig,
        facets::{
            CandidateMethods, CollectionTypeRegistry, FacetProcessor, MethodRemover,
            ProgrammingModel, factories::accessor_member_id,
        },
        layout::{self, LayoutOutcome},
        ports::{DescriptorSource, LayoutSource, SpecificationLookup},
    },
    domain::{
        AssociationKind, FacetType, FeatureType, HasFacets, Identifier, MemberIdUniquenessValidator,
        MetaModel, MetaModelValidator, MethodDescriptor, MixinFacet, ObjectAction,
        ObjectAssociation, ObjectSpecification, TypeDescriptor, TypeName, TypeUniverse,
        UnclaimedMethodValidator, ValidationSink, annotations,
    },
    error::MetaModelResult,
};

type ProgrammingModelFactory = dyn Fn() -> ProgrammingModel + Send + Sync;

/// Builds [`MetaModel`]s from a descriptor source.
pub struct SpecificationLoader {
    config: Arc<MetaModelConfig>,
    source: Arc<dyn DescriptorSource>,
    layouts: Option<Arc<dyn LayoutSource>>,
    programming_model: Box<ProgrammingModelFactory>,
}

impl SpecificationLoader {
    /// A loader using the standard programming model and no layouts.
    pub fn new(config: Arc<MetaModelConfig>, source: Arc<dyn DescriptorSource>) -> Self {
        Self {
            config,
            source,
            layouts: None,
            programming_model: Box::new(ProgrammingModel::standard),
        }
    }

    pub fn with_layouts(mut self, layouts: Arc<dyn LayoutSource>) -> Self {
        self.layouts = Some(layouts);
        self
    }

    /// Replace the programming model. Called once per build, since factories
    /// are consumed by registration.
    pub fn with_programming_model(
        mut self,
        model: impl Fn() -> ProgrammingModel + Send + Sync + 'static,
    ) -> Self {
        self.programming_model = Box::new(model);
        self
    }

    pub fn config(&self) -> &MetaModelConfig {
        &self.config
    }

    /// Build the metamodel for every descriptor the source provides.
    #[instrument(skip_all, fields(source = %self.source.name()))]
    pub fn load_all(&self) -> MetaModelResult<MetaModel> {
        let descriptors = self.source.load()?;
        let types = Arc::new(TypeUniverse::from_descriptors(descriptors)?);
        info!(types = types.len(), "Loaded type descriptors");

        let sink = ValidationSink::new();
        let processor = self.processor(&types, &sink)?;

        let mut specs = BTreeMap::new();
        for cls in types.iter() {
            specs.insert(cls.name.clone(), introspect(&processor, &self.config, &types, cls));
        }
        contribute_mixins(&processor, &types, &mut specs);

        let specs = specs
            .into_iter()
            .map(|(name, spec)| (name, Arc::new(spec)))
            .collect();
        let mut model = MetaModel::new(specs).with_types(types);

        if let Some(layouts) = &self.layouts {
            for spec in model.specifications() {
                let Some(layout) = layouts.layout_for(spec.type_name())? else {
                    continue;
                };
                let outcome = layout::install(spec, &layout);
                debug!(
                    type_name = %spec.type_name(),
                    facets = outcome.facets_installed,
                    "Installed layout"
                );
                report_unknown_members(&sink, spec.type_name(), &outcome);
            }
        }

        let mut validators = processor.validators();
        validators.add(Box::new(MemberIdUniquenessValidator));
        validators.add(Box::new(UnclaimedMethodValidator));
        let mut failures = sink.drain();
        validators.validate(&model, &mut failures);

        for failure in &failures {
            warn!(identifier = %failure.identifier, "{}", failure.message);
        }
        model.record_failures(failures);
        info!(
            specifications = model.len(),
            failures = model.failures().len(),
            "Metamodel built"
        );
        Ok(model)
    }

    /// Re-read the layout of one type and reinstall it. Facets from the
    /// previous layout are replaced, never duplicated, and overrides the new
    /// layout no longer declares are removed. A missing layout clears them all.
    #[instrument(skip_all, fields(type_name = %type_name))]
    pub fn reload_layout(
        &self,
        model: &MetaModel,
        type_name: &TypeName,
    ) -> MetaModelResult<LayoutOutcome> {
        let spec = model.specification(type_name).ok_or_else(|| {
            ApplicationError::SpecificationNotFound {
                type_name: type_name.to_string(),
            }
        })?;
        let layouts = self
            .layouts
            .as_ref()
            .ok_or(ApplicationError::AdapterNotConfigured {
                name: "layout source",
            })?;

        let layout = layouts.layout_for(type_name)?.unwrap_or_default();
        let outcome = layout::reinstall(spec, &layout);
        info!(
            facets = outcome.facets_installed,
            removed = outcome.facets_removed,
            "Reloaded layout"
        );
        Ok(outcome)
    }

    fn processor(
        &self,
        types: &Arc<TypeUniverse>,
        sink: &ValidationSink,
    ) -> MetaModelResult<FacetProcessor> {
        let lookup: Arc<dyn SpecificationLookup> = Arc::clone(types) as Arc<dyn SpecificationLookup>;
        let mut processor = FacetProcessor::builder()
            .config(Arc::clone(&self.config))
            .specification_lookup(lookup)
            .collection_types(Arc::new(CollectionTypeRegistry::from_config(
                &self.config.collections,
            )))
            .programming_model((self.programming_model)())
            .validation_sink(sink.clone())
            .build()?;
        processor.init();
        Ok(processor)
    }
}

impl std::fmt::Debug for SpecificationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecificationLoader")
            .field("source", &self.source.name())
            .field("layouts", &self.layouts.is_some())
            .finish()
    }
}

// ── Introspection ─────────────────────────────────────────────────────────────

/// Public instance methods of `name`, inherited ones included unless a
/// nearer type overrides them.
fn candidate_methods(types: &TypeUniverse, name: &TypeName) -> CandidateMethods {
    CandidateMethods::new(
        types
            .visible_methods(name)
            .into_iter()
            .filter(|m| m.is_public_instance())
            .cloned()
            .map(Arc::new),
    )
}

fn introspect(
    processor: &FacetProcessor,
    config: &MetaModelConfig,
    types: &TypeUniverse,
    cls: &TypeDescriptor,
) -> ObjectSpecification {
    let mut spec =
        ObjectSpecification::new(cls.name.clone(), cls.supertype.clone(), cls.interfaces.clone());
    let mut remover = candidate_methods(types, &cls.name);
    processor.process_class(cls, &mut remover, spec.facet_holder());

    // Collections first: a `get*` returning a collection is never a property.
    let mut accessors = Vec::new();
    processor.find_and_remove_collection_accessors(&mut remover, &mut accessors);
    for accessor in accessors.drain(..) {
        let association =
            introspect_association(processor, cls, &mut remover, accessor, AssociationKind::Collection);
        spec.add_association(association);
    }

    processor.find_and_remove_property_accessors(&mut remover, &mut accessors);
    for accessor in accessors {
        let association =
            introspect_association(processor, cls, &mut remover, accessor, AssociationKind::Property);
        spec.add_association(association);
    }

    for method in remover.remaining().to_vec() {
        // Claimed as a supporting method of an action processed earlier.
        if !remover.contains(&method) {
            continue;
        }
        let annotated = method.has_annotation(annotations::ACTION);
        // An explicit @Action wins over a name that merely looks like a prefix.
        if processor.recognizes(&method) && !annotated {
            continue;
        }
        if config.actions.require_annotation && !annotated {
            continue;
        }
        remover.remove_method(&method);
        let action = ObjectAction::new(&cls.name, method.name.clone(), Arc::clone(&method));
        introspect_action(processor, cls, &mut remover, &method, &action);
        spec.add_action(action);
    }

    let unclaimed = remover
        .into_remaining()
        .into_iter()
        .filter(|m| processor.recognizes(m))
        .collect();
    spec.set_unclaimed_methods(unclaimed);
    debug!(
        type_name = %cls.name,
        properties = spec.properties().len(),
        collections = spec.collections().len(),
        actions = spec.actions().len(),
        "Introspected type"
    );
    spec
}

fn introspect_association(
    processor: &FacetProcessor,
    cls: &TypeDescriptor,
    remover: &mut dyn MethodRemover,
    accessor: Arc<MethodDescriptor>,
    kind: AssociationKind,
) -> ObjectAssociation {
    let id = accessor_member_id(&accessor).unwrap_or_else(|| accessor.name.clone());
    let association = ObjectAssociation::new(&cls.name, id, kind, Arc::clone(&accessor));
    processor.process_method(
        cls,
        &accessor,
        remover,
        association.facet_holder(),
        kind.feature_type(),
    );
    association
}

fn introspect_action(
    processor: &FacetProcessor,
    cls: &TypeDescriptor,
    remover: &mut dyn MethodRemover,
    method: &Arc<MethodDescriptor>,
    action: &ObjectAction,
) {
    processor.process_method(cls, method, remover, action.facet_holder(), FeatureType::Action);
    for parameter in action.parameters() {
        processor.process_params(method, parameter.index(), parameter.facet_holder());
    }
}

// ── Mixins ────────────────────────────────────────────────────────────────────

/// Add every resolvable mixin's member to each specification it mixes into.
fn contribute_mixins(
    processor: &FacetProcessor,
    types: &TypeUniverse,
    specs: &mut BTreeMap<TypeName, ObjectSpecification>,
) {
    let mixins: Vec<Arc<MixinFacet>> = specs
        .values()
        .filter_map(|spec| spec.get_facet(FacetType::MIXIN))
        .filter_map(|facet| facet.payload().as_mixin().cloned())
        .collect();

    for mixin in mixins {
        let Some(mixin_cls) = types.get(mixin.mixin_type()) else {
            continue;
        };
        let Some(main) = types
            .visible_methods(mixin.mixin_type())
            .into_iter()
            .find(|m| mixin.is_candidate_for_main(m, types))
            .map(|m| Arc::new(m.clone()))
        else {
            continue;
        };

        for spec in specs.values_mut() {
            if spec.is_mixin() || !mixin.is_mixin_for(Some(spec.type_name()), types) {
                continue;
            }
            let mut remover = candidate_methods(types, &mixin_cls.name);
            remover.remove_method(&main);
            contribute(processor, mixin_cls, &mixin, &main, &mut remover, spec);
        }
    }
}

fn contribute(
    processor: &FacetProcessor,
    mixin_cls: &TypeDescriptor,
    mixin: &MixinFacet,
    main: &Arc<MethodDescriptor>,
    remover: &mut CandidateMethods,
    spec: &mut ObjectSpecification,
) {
    let owner = spec.type_name().clone();
    let id = mixin.member_id();
    let kind = if main.has_annotation(annotations::PROPERTY) {
        Some(AssociationKind::Property)
    } else if main.has_annotation(annotations::COLLECTION) {
        Some(AssociationKind::Collection)
    } else {
        None
    };

    match kind {
        Some(kind) => {
            let association = ObjectAssociation::new(&owner, id, kind, Arc::clone(main))
                .mixed_in_by(mixin.mixin_type().clone());
            processor.process_method(
                mixin_cls,
                main,
                remover,
                association.facet_holder(),
                kind.feature_type(),
            );
            spec.add_association(association);
        }
        None => {
            let action = ObjectAction::new(&owner, id, Arc::clone(main))
                .mixed_in_by(mixin.mixin_type().clone());
            introspect_action(processor, mixin_cls, remover, main, &action);
            spec.add_action(action);
        }
    }
    debug!(mixin = %mixin.mixin_type(), target = %owner, "Contributed mixin member");
}

fn report_unknown_members(sink: &ValidationSink, type_name: &TypeName, outcome: &LayoutOutcome) {
    for member in &outcome.unknown_members {
        sink.raise(
            Identifier::for_member(type_name.clone(), member.clone()),
            format!("{type_name}: layout names unknown member '{member}'"),
        );
    }
}
