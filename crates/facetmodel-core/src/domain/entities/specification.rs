//! Object specifications and their members: the output of a metamodel build.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    entities::{
        descriptor::MethodDescriptor,
        facet::{Facet, FacetType},
        holder::{FacetHolder, HasFacets},
        universe::TypeUniverse,
    },
    error::DomainError,
    validation::{ValidationFailure, ValidationFailures},
    value_objects::{FeatureType, Identifier, TypeName},
};

// ── Members ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationKind {
    Property,
    Collection,
}

impl AssociationKind {
    pub const fn feature_type(self) -> FeatureType {
        match self {
            Self::Property => FeatureType::Property,
            Self::Collection => FeatureType::Collection,
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Property => "property",
            Self::Collection => "collection",
        })
    }
}

/// A property or collection.
#[derive(Debug)]
pub struct ObjectAssociation {
    id: String,
    kind: AssociationKind,
    accessor: Arc<MethodDescriptor>,
    holder: FacetHolder,
    mixed_in: Option<TypeName>,
}

impl ObjectAssociation {
    pub fn new(
        owner: &TypeName,
        id: impl Into<String>,
        kind: AssociationKind,
        accessor: Arc<MethodDescriptor>,
    ) -> Self {
        let id = id.into();
        Self {
            holder: FacetHolder::new(
                Identifier::for_member(owner.clone(), id.clone()),
                kind.feature_type(),
            ),
            id,
            kind,
            accessor,
            mixed_in: None,
        }
    }

    pub fn mixed_in_by(mut self, mixin: TypeName) -> Self {
        self.mixed_in = Some(mixin);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AssociationKind {
        self.kind
    }

    pub fn accessor(&self) -> &MethodDescriptor {
        &self.accessor
    }

    pub fn return_type(&self) -> Option<&TypeName> {
        self.accessor.return_type.as_ref()
    }

    pub fn mixed_in(&self) -> Option<&TypeName> {
        self.mixed_in.as_ref()
    }
}

impl HasFacets for ObjectAssociation {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

#[derive(Debug)]
pub struct ActionParameter {
    index: usize,
    type_name: TypeName,
    holder: FacetHolder,
}

impl ActionParameter {
    pub fn new(owner: &TypeName, action_id: &str, index: usize, type_name: TypeName) -> Self {
        Self {
            index,
            type_name,
            holder: FacetHolder::new(
                Identifier::for_parameter(owner.clone(), action_id, index),
                FeatureType::ActionParameter,
            ),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }
}

impl HasFacets for ActionParameter {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

#[derive(Debug)]
pub struct ObjectAction {
    id: String,
    method: Arc<MethodDescriptor>,
    parameters: Vec<ActionParameter>,
    holder: FacetHolder,
    mixed_in: Option<TypeName>,
}

impl ObjectAction {
    pub fn new(owner: &TypeName, id: impl Into<String>, method: Arc<MethodDescriptor>) -> Self {
        let id = id.into();
        let parameters = method
            .parameter_types
            .iter()
            .enumerate()
            .map(|(i, ty)| ActionParameter::new(owner, &id, i, ty.clone()))
            .collect();
        Self {
            holder: FacetHolder::new(
                Identifier::for_member(owner.clone(), id.clone()),
                FeatureType::Action,
            ),
            id,
            method,
            parameters,
            mixed_in: None,
        }
    }

    pub fn mixed_in_by(mut self, mixin: TypeName) -> Self {
        self.mixed_in = Some(mixin);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    pub fn parameters(&self) -> &[ActionParameter] {
        &self.parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn mixed_in(&self) -> Option<&TypeName> {
        self.mixed_in.as_ref()
    }
}

impl HasFacets for ObjectAction {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

// ── ObjectSpecification ───────────────────────────────────────────────────────

/// The metamodel of one domain type.
#[derive(Debug)]
pub struct ObjectSpecification {
    type_name: TypeName,
    supertype: Option<TypeName>,
    interfaces: Vec<TypeName>,
    holder: FacetHolder,
    properties: Vec<ObjectAssociation>,
    collections: Vec<ObjectAssociation>,
    actions: Vec<ObjectAction>,
    unclaimed: Vec<Arc<MethodDescriptor>>,
}

impl ObjectSpecification {
    pub fn new(type_name: TypeName, supertype: Option<TypeName>, interfaces: Vec<TypeName>) -> Self {
        Self {
            holder: FacetHolder::new(Identifier::for_type(type_name.clone()), FeatureType::Object),
            type_name,
            supertype,
            interfaces,
            properties: Vec::new(),
            collections: Vec::new(),
            actions: Vec::new(),
            unclaimed: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn supertype(&self) -> Option<&TypeName> {
        self.supertype.as_ref()
    }

    pub fn interfaces(&self) -> &[TypeName] {
        &self.interfaces
    }

    pub fn properties(&self) -> &[ObjectAssociation] {
        &self.properties
    }

    pub fn collections(&self) -> &[ObjectAssociation] {
        &self.collections
    }

    pub fn actions(&self) -> &[ObjectAction] {
        &self.actions
    }

    pub fn add_association(&mut self, association: ObjectAssociation) {
        match association.kind() {
            AssociationKind::Property => self.properties.push(association),
            AssociationKind::Collection => self.collections.push(association),
        }
    }

    pub fn add_action(&mut self, action: ObjectAction) {
        self.actions.push(action);
    }

    pub fn association(&self, id: &str) -> Option<&ObjectAssociation> {
        self.properties
            .iter()
            .chain(self.collections.iter())
            .find(|a| a.id() == id)
    }

    pub fn action(&self, id: &str) -> Option<&ObjectAction> {
        self.actions.iter().find(|a| a.id() == id)
    }

    /// Every member holder, in property, collection, action order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &FacetHolder)> {
        self.properties
            .iter()
            .chain(self.collections.iter())
            .map(|a| (a.id(), a.facet_holder()))
            .chain(self.actions.iter().map(|a| (a.id(), a.facet_holder())))
    }

    /// Member holder by id, searching associations then actions.
    pub fn member(&self, id: &str) -> Option<&FacetHolder> {
        self.members().find(|(m, _)| *m == id).map(|(_, h)| h)
    }

    /// Recognised methods no factory claimed while introspecting the type.
    pub fn unclaimed_methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.unclaimed
    }

    pub fn set_unclaimed_methods(&mut self, methods: Vec<Arc<MethodDescriptor>>) {
        self.unclaimed = methods;
    }

    pub fn is_mixin(&self) -> bool {
        self.contains_facet(FacetType::MIXIN)
    }
}

impl HasFacets for ObjectSpecification {
    fn facet_holder(&self) -> &FacetHolder {
        &self.holder
    }
}

// ── MetaModel ─────────────────────────────────────────────────────────────────

/// The result of one build: every specification plus every accumulated
/// validation failure.
#[derive(Debug)]
pub struct MetaModel {
    session_id: Uuid,
    specifications: BTreeMap<TypeName, Arc<ObjectSpecification>>,
    types: Arc<TypeUniverse>,
    failures: ValidationFailures,
}

impl MetaModel {
    pub fn new(specifications: BTreeMap<TypeName, Arc<ObjectSpecification>>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            specifications,
            types: Arc::default(),
            failures: ValidationFailures::new(),
        }
    }

    /// Attach the descriptors the model was built from.
    pub fn with_types(mut self, types: Arc<TypeUniverse>) -> Self {
        self.types = types;
        self
    }

    pub fn types(&self) -> &Arc<TypeUniverse> {
        &self.types
    }

    pub fn with_session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn specification(&self, type_name: &TypeName) -> Option<&Arc<ObjectSpecification>> {
        self.specifications.get(type_name)
    }

    pub fn specifications(&self) -> impl Iterator<Item = &Arc<ObjectSpecification>> {
        self.specifications.values()
    }

    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    /// Winning facet of `facet_type` on `type_name`, falling back to the
    /// nearest supertype (superclass chain before interfaces) that has one.
    pub fn lookup_facet(&self, type_name: &TypeName, facet_type: FacetType) -> Option<Arc<Facet>> {
        let mut seen = std::collections::HashSet::new();
        let mut queue = std::collections::VecDeque::from([type_name.clone()]);
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            let Some(spec) = self.specifications.get(&next) else {
                continue;
            };
            if let Some(facet) = spec.get_facet(facet_type) {
                return Some(facet);
            }
            queue.extend(spec.supertype().cloned());
            queue.extend(spec.interfaces().iter().cloned());
        }
        None
    }

    pub fn failures(&self) -> &ValidationFailures {
        &self.failures
    }

    pub fn record_failures(&mut self, failures: impl IntoIterator<Item = ValidationFailure>) {
        self.failures.extend(failures);
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Surface all accumulated failures at once.
    pub fn into_result(self) -> Result<Self, DomainError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(DomainError::MetaModelInvalid {
                count: self.failures.len(),
                failures: self.failures.messages(),
            })
        }
    }
}
