//! In-memory descriptor source.

use std::sync::{Arc, PoisonError, RwLock};

use facetmodel_core::{
    application::ports::DescriptorSource, domain::TypeDescriptor, error::MetaModelResult,
};

/// Thread-safe in-memory descriptor store.
///
/// Descriptors are returned in insertion order; duplicates are left for the
/// type universe to reject.
#[derive(Debug, Clone)]
pub struct InMemoryDescriptorSource {
    name: String,
    inner: Arc<RwLock<Vec<TypeDescriptor>>>,
}

impl InMemoryDescriptorSource {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store holding `types`.
    pub fn with_types(types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let store = Self::new();
        for ty in types {
            store.insert(ty);
        }
        store
    }

    pub fn insert(&self, descriptor: TypeDescriptor) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(descriptor);
    }

    /// Get the number of descriptors.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all descriptors.
    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for InMemoryDescriptorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorSource for InMemoryDescriptorSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> MetaModelResult<Vec<TypeDescriptor>> {
        Ok(self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_descriptors_in_insertion_order() {
        let store = InMemoryDescriptorSource::with_types([
            TypeDescriptor::builder("B").build().unwrap(),
            TypeDescriptor::builder("A").build().unwrap(),
        ]);
        let names: Vec<_> = store
            .load()
            .unwrap()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["B", "A"]);

        store.clear();
        assert!(store.is_empty());
    }
}
