//! The set of known type descriptors and the assignability relation over them.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::domain::{
    entities::descriptor::{MethodDescriptor, TypeDescriptor},
    error::DomainError,
    value_objects::TypeName,
};

/// All descriptors participating in one metamodel build.
///
/// Iteration order is by type name so builds are deterministic.
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    types: BTreeMap<TypeName, Arc<TypeDescriptor>>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Result<Self, DomainError> {
        let mut universe = Self::new();
        for descriptor in descriptors {
            universe.insert(descriptor)?;
        }
        Ok(universe)
    }

    pub fn insert(&mut self, descriptor: TypeDescriptor) -> Result<(), DomainError> {
        descriptor.validate()?;
        if self.types.contains_key(&descriptor.name) {
            return Err(DomainError::InvalidDescriptor(format!(
                "type '{}' declared more than once",
                descriptor.name
            )));
        }
        self.types
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, name: &TypeName) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Direct supertypes: the superclass first, then interfaces in declaration order.
    pub fn direct_supertypes(&self, name: &TypeName) -> Vec<TypeName> {
        self.types
            .get(name)
            .map(|t| {
                t.supertype
                    .iter()
                    .chain(t.interfaces.iter())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `name` and every transitive supertype, nearest first (breadth-first).
    ///
    /// Types referenced but not described contribute themselves only.
    pub fn hierarchy(&self, name: &TypeName) -> Vec<TypeName> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut queue = std::collections::VecDeque::from([name.clone()]);
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            queue.extend(self.direct_supertypes(&next));
            ordered.push(next);
        }
        ordered
    }

    /// Whether a value of type `from` can be used where `to` is expected.
    pub fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
        from == to || self.hierarchy(from).iter().any(|t| t == to)
    }

    /// Methods visible on `name`: its own first, then inherited ones not
    /// overridden (same name and parameter types) by a nearer type.
    pub fn visible_methods(&self, name: &TypeName) -> Vec<&MethodDescriptor> {
        let mut visible: Vec<&MethodDescriptor> = Vec::new();
        for ty in self.hierarchy(name) {
            let Some(descriptor) = self.types.get(&ty) else {
                continue;
            };
            for m in &descriptor.methods {
                let overridden = visible
                    .iter()
                    .any(|v| v.name == m.name && v.parameter_types == m.parameter_types);
                if !overridden {
                    visible.push(m);
                }
            }
        }
        visible
    }
}
