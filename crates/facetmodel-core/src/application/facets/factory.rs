//! The facet factory plugin contract.
//!
//! A factory inspects a type, member or parameter descriptor and attaches
//! facets to the holder it is handed. Factories run in registration order,
//! so a later factory can override an earlier one at equal or higher
//! precedence.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::{
    config::{CollectionConfig, MetaModelConfig},
    facets::method_remover::MethodRemover,
    ports::SpecificationLookup,
};
use crate::domain::{
    Facet, FacetHolder, FacetPayload, FacetType, FeatureType, MetaModelValidator,
    MethodDescriptor, Precedence, TypeDescriptor, TypeName, TypeUniverse, ValidationSink,
};

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Return types that mark an accessor as a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTypeRegistry {
    types: BTreeSet<TypeName>,
}

impl CollectionTypeRegistry {
    pub fn new(types: impl IntoIterator<Item = TypeName>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }

    pub fn from_config(config: &CollectionConfig) -> Self {
        Self::new(config.types.iter().cloned())
    }

    /// Matches `List` as well as parameterised forms such as `List<Order>`.
    pub fn is_collection_type(&self, ty: &TypeName) -> bool {
        let raw = ty.as_str().split('<').next().unwrap_or_default().trim();
        self.types.iter().any(|t| t.as_str() == raw)
    }
}

impl Default for CollectionTypeRegistry {
    fn default() -> Self {
        Self::from_config(&CollectionConfig::default())
    }
}

/// What the processor hands every factory on registration.
#[derive(Clone)]
pub struct FactoryContext {
    pub config: Arc<MetaModelConfig>,
    pub specifications: Arc<dyn SpecificationLookup>,
    pub collection_types: Arc<CollectionTypeRegistry>,
    pub validation: ValidationSink,
}

impl Default for FactoryContext {
    fn default() -> Self {
        Self {
            config: Arc::default(),
            specifications: Arc::new(TypeUniverse::new()),
            collection_types: Arc::default(),
            validation: ValidationSink::new(),
        }
    }
}

impl std::fmt::Debug for FactoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryContext")
            .field("config", &self.config)
            .field("types", &self.specifications.universe().len())
            .field("collection_types", &self.collection_types)
            .finish()
    }
}

// ── Processing contexts ───────────────────────────────────────────────────────

/// Installs facets on one holder and remembers whether any was added.
#[derive(Debug)]
pub struct FacetSink<'a> {
    holder: &'a FacetHolder,
    added: usize,
}

impl<'a> FacetSink<'a> {
    fn new(holder: &'a FacetHolder) -> Self {
        Self { holder, added: 0 }
    }

    pub fn holder(&self) -> &'a FacetHolder {
        self.holder
    }

    pub fn add(&mut self, facet_type: FacetType, precedence: Precedence, payload: FacetPayload) {
        self.holder.add_facet(Facet::new(
            facet_type,
            precedence,
            payload,
            self.holder.identifier().clone(),
        ));
        self.added += 1;
    }

    pub fn added(&self) -> usize {
        self.added
    }
}

pub struct ProcessClassContext<'a> {
    pub cls: &'a TypeDescriptor,
    pub remover: &'a mut dyn MethodRemover,
    pub facets: FacetSink<'a>,
}

impl<'a> ProcessClassContext<'a> {
    pub fn new(
        cls: &'a TypeDescriptor,
        remover: &'a mut dyn MethodRemover,
        holder: &'a FacetHolder,
    ) -> Self {
        Self {
            cls,
            remover,
            facets: FacetSink::new(holder),
        }
    }
}

pub struct ProcessMethodContext<'a> {
    pub cls: &'a TypeDescriptor,
    pub method: &'a Arc<MethodDescriptor>,
    pub feature_type: FeatureType,
    pub remover: &'a mut dyn MethodRemover,
    pub facets: FacetSink<'a>,
}

impl<'a> ProcessMethodContext<'a> {
    pub fn new(
        cls: &'a TypeDescriptor,
        method: &'a Arc<MethodDescriptor>,
        feature_type: FeatureType,
        remover: &'a mut dyn MethodRemover,
        holder: &'a FacetHolder,
    ) -> Self {
        Self {
            cls,
            method,
            feature_type,
            remover,
            facets: FacetSink::new(holder),
        }
    }

    /// Id of the member being processed.
    pub fn member_id(&self) -> &str {
        self.facets
            .holder()
            .identifier()
            .member
            .as_deref()
            .unwrap_or(&self.method.name)
    }
}

pub struct ProcessParameterContext<'a> {
    pub method: &'a MethodDescriptor,
    pub index: usize,
    pub facets: FacetSink<'a>,
}

impl<'a> ProcessParameterContext<'a> {
    pub fn new(method: &'a MethodDescriptor, index: usize, holder: &'a FacetHolder) -> Self {
        Self {
            method,
            index,
            facets: FacetSink::new(holder),
        }
    }
}

// ── Factory traits ────────────────────────────────────────────────────────────

/// A pluggable unit of facet discovery.
///
/// Every hook has a no-op default; factories override what they support.
pub trait FacetFactory: Send + Sync {
    fn name(&self) -> &'static str;

    /// The feature types this factory contributes to.
    fn feature_types(&self) -> &'static [FeatureType];

    /// Receive the processor's collaborators. Called once, on registration.
    fn inject(&mut self, _context: &FactoryContext) {}

    fn process_class(&self, _ctx: &mut ProcessClassContext<'_>) {}

    fn process_method(&self, _ctx: &mut ProcessMethodContext<'_>) {}

    fn process_param(&self, _ctx: &mut ProcessParameterContext<'_>) {}

    /// Method-name prefixes this factory claims (`hide`, `set`, ...).
    fn method_prefixes(&self) -> &'static [&'static str] {
        &[]
    }

    fn as_method_filtering(&self) -> Option<&dyn MethodFilteringFacetFactory> {
        None
    }

    fn as_property_or_collection_identifying(
        &self,
    ) -> Option<&dyn PropertyOrCollectionIdentifyingFacetFactory> {
        None
    }

    /// Validators to run over the completed metamodel.
    fn validators(&self) -> Vec<Box<dyn MetaModelValidator>> {
        Vec::new()
    }
}

/// Claims methods by inspection rather than by name prefix.
pub trait MethodFilteringFacetFactory: Send + Sync {
    fn recognizes(&self, method: &MethodDescriptor) -> bool;
}

/// Identifies property and collection accessors so they can be claimed
/// before the remaining methods are considered as actions.
pub trait PropertyOrCollectionIdentifyingFacetFactory: Send + Sync {
    fn is_property_or_collection_accessor_candidate(&self, method: &MethodDescriptor) -> bool;

    fn find_and_remove_property_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<Arc<MethodDescriptor>>,
    );

    fn find_and_remove_collection_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<Arc<MethodDescriptor>>,
    );
}
