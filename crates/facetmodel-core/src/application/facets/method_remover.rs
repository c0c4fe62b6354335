//! Tracking which introspected methods are still unclaimed.

use std::sync::Arc;

use crate::domain::{MethodDescriptor, TypeName};

/// Claims methods so later factories and passes do not reinterpret them.
pub trait MethodRemover {
    /// Remove `method` if still present; returns whether it was.
    fn remove_method(&mut self, method: &MethodDescriptor) -> bool;

    /// Remove and return every remaining method matching `predicate`, in order.
    fn remove_methods(
        &mut self,
        predicate: &mut dyn FnMut(&MethodDescriptor) -> bool,
    ) -> Vec<Arc<MethodDescriptor>>;

    /// An unclaimed method by name and, if given, exact parameter types.
    fn find_method(&self, name: &str, parameter_types: Option<&[TypeName]>)
    -> Option<Arc<MethodDescriptor>>;
}

/// The pool of not-yet-claimed public instance methods of one type.
#[derive(Debug, Clone, Default)]
pub struct CandidateMethods {
    methods: Vec<Arc<MethodDescriptor>>,
}

impl CandidateMethods {
    pub fn new(methods: impl IntoIterator<Item = Arc<MethodDescriptor>>) -> Self {
        Self {
            methods: methods.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    pub fn contains(&self, method: &MethodDescriptor) -> bool {
        self.methods.iter().any(|m| **m == *method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn into_remaining(self) -> Vec<Arc<MethodDescriptor>> {
        self.methods
    }
}

impl MethodRemover for CandidateMethods {
    fn remove_method(&mut self, method: &MethodDescriptor) -> bool {
        let before = self.methods.len();
        self.methods.retain(|m| **m != *method);
        self.methods.len() != before
    }

    fn remove_methods(
        &mut self,
        predicate: &mut dyn FnMut(&MethodDescriptor) -> bool,
    ) -> Vec<Arc<MethodDescriptor>> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.methods)
            .into_iter()
            .partition(|m| predicate(m.as_ref()));
        self.methods = kept;
        removed
    }

    fn find_method(
        &self,
        name: &str,
        parameter_types: Option<&[TypeName]>,
    ) -> Option<Arc<MethodDescriptor>> {
        self.methods
            .iter()
            .find(|m| {
                m.name == name
                    && parameter_types.is_none_or(|p| m.parameter_types.as_slice() == p)
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> CandidateMethods {
        CandidateMethods::new(
            [
                MethodDescriptor::new("Customer", "getName").returning("String"),
                MethodDescriptor::new("Customer", "hideName"),
                MethodDescriptor::new("Customer", "placeOrder").param("Product"),
            ]
            .into_iter()
            .map(Arc::new),
        )
    }

    #[test]
    fn removed_methods_are_gone_for_later_passes() {
        let mut pool = pool();
        let getters = pool.remove_methods(&mut |m| m.name.starts_with("get"));
        assert_eq!(getters.len(), 1);
        assert!(pool.find_method("getName", None).is_none());
        assert_eq!(pool.len(), 2);
        assert!(!pool.remove_method(&getters[0]));
    }

    #[test]
    fn find_method_matches_parameters_when_given() {
        let pool = pool();
        let product = [TypeName::new("Product")];
        assert!(pool.find_method("placeOrder", Some(&product[..])).is_some());
        assert!(pool.find_method("placeOrder", Some(&[][..])).is_none());
        assert!(pool.find_method("placeOrder", None).is_some());
    }
}
