//! The facet processor: owns the registered factories and is the only entry
//! point through which introspection attaches facets.
//!
//! ## Lifecycle
//!
//! 1. **Registration**: `init` and `register_factory` take `&mut self`.
//! 2. **Processing**: every `process_*`, `recognizes` and `find_*` call takes
//!    `&self`, so once the processor is shared no further registration can
//!    interleave with introspection.
//!
//! Lookup tables derived from the factory list live in one immutable
//! [`CompiledFactoryIndex`], built lazily by [`compile`] and published
//! atomically. Registration drops the published index; the next reader
//! rebuilds it under a mutex, so concurrent first readers compile once.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use tracing::{debug, trace};

use crate::application::{
    config::MetaModelConfig,
    facets::{
        factory::{
            CollectionTypeRegistry, FacetFactory, FactoryContext, ProcessClassContext,
            ProcessMethodContext, ProcessParameterContext,
        },
        method_remover::MethodRemover,
        programming_model::ProgrammingModel,
    },
    ports::SpecificationLookup,
};
use crate::domain::{
    DomainError, FacetHolder, FeatureType, MetaModelValidatorComposite, MethodDescriptor,
    TypeDescriptor, ValidationSink,
};
use crate::error::MetaModelResult;

// ── Compiled index ────────────────────────────────────────────────────────────

/// Every lookup table derived from one factory list.
pub struct CompiledFactoryIndex {
    generation: u64,
    by_feature_type: BTreeMap<FeatureType, Vec<Arc<dyn FacetFactory>>>,
    method_prefixes: Vec<&'static str>,
    method_filtering: Vec<Arc<dyn FacetFactory>>,
    property_or_collection_identifying: Vec<Arc<dyn FacetFactory>>,
}

impl CompiledFactoryIndex {
    /// Registration count the index was compiled from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn factories_for(&self, feature_type: FeatureType) -> &[Arc<dyn FacetFactory>] {
        self.by_feature_type
            .get(&feature_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn method_prefixes(&self) -> &[&'static str] {
        &self.method_prefixes
    }

    pub fn recognizes(&self, method: &MethodDescriptor) -> bool {
        self.method_prefixes
            .iter()
            .any(|prefix| method.name.starts_with(prefix))
            || self.method_filtering.iter().any(|f| {
                f.as_method_filtering()
                    .is_some_and(|filter| filter.recognizes(method))
            })
    }
}

impl std::fmt::Debug for CompiledFactoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledFactoryIndex")
            .field("generation", &self.generation)
            .field("method_prefixes", &self.method_prefixes)
            .field("method_filtering", &self.method_filtering.len())
            .field(
                "property_or_collection_identifying",
                &self.property_or_collection_identifying.len(),
            )
            .finish()
    }
}

/// Derive every lookup table from `factories`, preserving registration order.
pub fn compile(factories: &[Arc<dyn FacetFactory>], generation: u64) -> CompiledFactoryIndex {
    let mut by_feature_type: BTreeMap<FeatureType, Vec<Arc<dyn FacetFactory>>> = BTreeMap::new();
    let mut method_prefixes = Vec::new();
    let mut method_filtering = Vec::new();
    let mut property_or_collection_identifying = Vec::new();

    for factory in factories {
        for feature_type in factory.feature_types() {
            by_feature_type
                .entry(*feature_type)
                .or_default()
                .push(Arc::clone(factory));
        }
        for prefix in factory.method_prefixes() {
            if !method_prefixes.contains(prefix) {
                method_prefixes.push(*prefix);
            }
        }
        if factory.as_method_filtering().is_some() {
            method_filtering.push(Arc::clone(factory));
        }
        if factory.as_property_or_collection_identifying().is_some() {
            property_or_collection_identifying.push(Arc::clone(factory));
        }
    }

    CompiledFactoryIndex {
        generation,
        by_feature_type,
        method_prefixes,
        method_filtering,
        property_or_collection_identifying,
    }
}

// ── Processor ─────────────────────────────────────────────────────────────────

pub struct FacetProcessor {
    context: FactoryContext,
    programming_model: ProgrammingModel,
    factories: Vec<Arc<dyn FacetFactory>>,
    generation: u64,
    index: ArcSwapOption<CompiledFactoryIndex>,
    rebuild: Mutex<()>,
}

impl FacetProcessor {
    pub fn builder() -> FacetProcessorBuilder {
        FacetProcessorBuilder::default()
    }

    /// Register the programming model's factories, in order.
    pub fn init(&mut self) {
        let factories = std::mem::take(&mut self.programming_model).into_factories();
        debug!(count = factories.len(), "Registering programming model");
        for factory in factories {
            self.register_factory(factory);
        }
    }

    /// Append `factory`, hand it the processor's collaborators and drop the
    /// compiled index.
    pub fn register_factory(&mut self, mut factory: Box<dyn FacetFactory>) {
        factory.inject(&self.context);
        debug!(
            factory = factory.name(),
            feature_types = ?factory.feature_types(),
            "Registered facet factory"
        );
        self.factories.push(Arc::from(factory));
        self.generation += 1;
        self.index.store(None);
    }

    pub fn factories(&self) -> &[Arc<dyn FacetFactory>] {
        &self.factories
    }

    pub fn context(&self) -> &FactoryContext {
        &self.context
    }

    pub fn validation_sink(&self) -> &ValidationSink {
        &self.context.validation
    }

    /// The current compiled index, compiling it first if registration has
    /// invalidated it.
    pub fn index(&self) -> Arc<CompiledFactoryIndex> {
        if let Some(index) = self.index.load_full() {
            return index;
        }
        let _guard = self.rebuild.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = self.index.load_full() {
            return index;
        }
        let index = Arc::new(compile(&self.factories, self.generation));
        trace!(generation = self.generation, "Compiled factory index");
        self.index.store(Some(Arc::clone(&index)));
        index
    }

    /// Registered factories supporting `feature_type`, in registration order.
    pub fn factory_list_by_feature_type(
        &self,
        feature_type: FeatureType,
    ) -> Vec<Arc<dyn FacetFactory>> {
        self.index().factories_for(feature_type).to_vec()
    }

    /// Whether any factory claims `method`: a registered name prefix first,
    /// then every method-filtering factory.
    pub fn recognizes(&self, method: &MethodDescriptor) -> bool {
        self.index().recognizes(method)
    }

    /// Run every object-level factory over `cls`. Returns whether any facet
    /// was added.
    pub fn process_class(
        &self,
        cls: &TypeDescriptor,
        remover: &mut dyn MethodRemover,
        holder: &FacetHolder,
    ) -> bool {
        let index = self.index();
        let mut added = 0;
        for factory in index.factories_for(FeatureType::Object) {
            let mut ctx = ProcessClassContext::new(cls, &mut *remover, holder);
            factory.process_class(&mut ctx);
            added += ctx.facets.added();
        }
        added > 0
    }

    /// Run every factory supporting `feature_type` over one member.
    pub fn process_method(
        &self,
        cls: &TypeDescriptor,
        method: &Arc<MethodDescriptor>,
        remover: &mut dyn MethodRemover,
        holder: &FacetHolder,
        feature_type: FeatureType,
    ) -> bool {
        let index = self.index();
        let mut added = 0;
        for factory in index.factories_for(feature_type) {
            let mut ctx =
                ProcessMethodContext::new(cls, method, feature_type, &mut *remover, holder);
            factory.process_method(&mut ctx);
            added += ctx.facets.added();
        }
        added > 0
    }

    /// Run every parameter-level factory over parameter `index` (0-based).
    pub fn process_params(
        &self,
        method: &MethodDescriptor,
        index: usize,
        holder: &FacetHolder,
    ) -> bool {
        let compiled = self.index();
        let mut added = 0;
        for factory in compiled.factories_for(FeatureType::ActionParameter) {
            let mut ctx = ProcessParameterContext::new(method, index, holder);
            factory.process_param(&mut ctx);
            added += ctx.facets.added();
        }
        added > 0
    }

    /// Add to `candidates` every method some identifying factory considers a
    /// property or collection accessor.
    pub fn find_property_or_collection_candidate_accessors(
        &self,
        methods: &[Arc<MethodDescriptor>],
        candidates: &mut Vec<Arc<MethodDescriptor>>,
    ) {
        let index = self.index();
        for method in methods {
            let claimed = index.property_or_collection_identifying.iter().any(|f| {
                f.as_property_or_collection_identifying()
                    .is_some_and(|id| id.is_property_or_collection_accessor_candidate(method))
            });
            if claimed && !candidates.iter().any(|c| Arc::ptr_eq(c, method)) {
                candidates.push(Arc::clone(method));
            }
        }
    }

    pub fn find_and_remove_property_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<Arc<MethodDescriptor>>,
    ) {
        for factory in &self.index().property_or_collection_identifying {
            if let Some(id) = factory.as_property_or_collection_identifying() {
                id.find_and_remove_property_accessors(remover, out);
            }
        }
    }

    pub fn find_and_remove_collection_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<Arc<MethodDescriptor>>,
    ) {
        for factory in &self.index().property_or_collection_identifying {
            if let Some(id) = factory.as_property_or_collection_identifying() {
                id.find_and_remove_collection_accessors(remover, out);
            }
        }
    }

    /// Every factory's validators, in registration order.
    pub fn validators(&self) -> MetaModelValidatorComposite {
        let mut composite = MetaModelValidatorComposite::new();
        for validator in self.factories.iter().flat_map(|f| f.validators()) {
            composite.add(validator);
        }
        composite
    }
}

impl std::fmt::Debug for FacetProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetProcessor")
            .field("factories", &self.factories.iter().map(|f| f.name()).collect::<Vec<_>>())
            .field("generation", &self.generation)
            .finish()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Collects the processor's required collaborators; `build` fails fast if
/// any is missing.
#[derive(Default)]
pub struct FacetProcessorBuilder {
    config: Option<Arc<MetaModelConfig>>,
    specifications: Option<Arc<dyn SpecificationLookup>>,
    collection_types: Option<Arc<CollectionTypeRegistry>>,
    programming_model: Option<ProgrammingModel>,
    validation: Option<ValidationSink>,
}

impl FacetProcessorBuilder {
    pub fn config(mut self, config: Arc<MetaModelConfig>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn specification_lookup(mut self, lookup: Arc<dyn SpecificationLookup>) -> Self {
        self.specifications = Some(lookup);
        self
    }

    pub fn collection_types(mut self, registry: Arc<CollectionTypeRegistry>) -> Self {
        self.collection_types = Some(registry);
        self
    }

    pub fn programming_model(mut self, model: ProgrammingModel) -> Self {
        self.programming_model = Some(model);
        self
    }

    /// Sink for failures raised during processing; a fresh one if omitted.
    pub fn validation_sink(mut self, sink: ValidationSink) -> Self {
        self.validation = Some(sink);
        self
    }

    pub fn build(self) -> MetaModelResult<FacetProcessor> {
        let missing = |name| DomainError::MissingCollaborator { name };
        let context = FactoryContext {
            config: self.config.ok_or_else(|| missing("configuration"))?,
            specifications: self
                .specifications
                .ok_or_else(|| missing("specification loader"))?,
            collection_types: self
                .collection_types
                .ok_or_else(|| missing("collection type registry"))?,
            validation: self.validation.unwrap_or_default(),
        };
        let programming_model = self
            .programming_model
            .ok_or_else(|| missing("programming model"))?;

        Ok(FacetProcessor {
            context,
            programming_model,
            factories: Vec::new(),
            generation: 0,
            index: ArcSwapOption::empty(),
            rebuild: Mutex::new(()),
        })
    }
}
