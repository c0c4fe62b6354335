//! In-memory layout source, used by tests and by hosts that compute layouts.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use facetmodel_core::{
    application::{Layout, ports::LayoutSource},
    domain::TypeName,
    error::MetaModelResult,
};

/// Thread-safe in-memory layout store.
///
/// Clones share the same map, so a test can keep a handle and change a layout
/// after the loader has taken its own copy.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLayoutSource {
    inner: Arc<RwLock<HashMap<TypeName, Layout>>>,
}

impl InMemoryLayoutSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the layout for `type_name`.
    pub fn insert(&self, type_name: impl Into<TypeName>, layout: Layout) -> Option<Layout> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.into(), layout)
    }

    pub fn remove(&self, type_name: &TypeName) -> Option<Layout> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(type_name)
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LayoutSource for InMemoryLayoutSource {
    fn layout_for(&self, type_name: &TypeName) -> MetaModelResult<Option<Layout>> {
        Ok(self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_layouts() {
        let source = InMemoryLayoutSource::new();
        let handle = source.clone();
        handle.insert(
            "Customer",
            Layout {
                named: Some("Client".into()),
                ..Layout::default()
            },
        );

        let layout = source
            .layout_for(&TypeName::new("Customer"))
            .unwrap()
            .unwrap();
        assert_eq!(layout.named.as_deref(), Some("Client"));
        assert!(source.layout_for(&TypeName::new("Order")).unwrap().is_none());

        handle.remove(&TypeName::new("Customer"));
        assert!(source.is_empty());
    }
}
