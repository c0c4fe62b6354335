//! Runtime collaborators for mixin instantiation.
//!
//! Without live objects the "runtime" is descriptive: instances are
//! [`Pojo`]s that record which constructor built them and which services
//! were injected.

use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use tracing::debug;

use facetmodel_core::{
    application::ports::{ObjectInstantiator, ServiceInjector},
    domain::{ConstructorDescriptor, InstantiationError, Pojo, TypeName, TypeUniverse},
};

// ── Instantiator ──────────────────────────────────────────────────────────────

/// Builds [`Pojo`]s from constructor descriptors, enforcing visibility,
/// arity and (when it knows the types) argument assignability.
#[derive(Debug, Clone, Default)]
pub struct DescriptorInstantiator {
    types: Option<Arc<TypeUniverse>>,
}

impl DescriptorInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also reject abstract types and arguments of the wrong type.
    pub fn with_types(types: Arc<TypeUniverse>) -> Self {
        Self { types: Some(types) }
    }
}

impl ObjectInstantiator for DescriptorInstantiator {
    fn instantiate(
        &self,
        constructor: &ConstructorDescriptor,
        args: Vec<Pojo>,
    ) -> Result<Pojo, InstantiationError> {
        let owner = &constructor.declaring_type;
        if !constructor.visibility.is_public() {
            return Err(InstantiationError::IllegalAccess(format!(
                "{owner} constructor is {:?}",
                constructor.visibility
            )));
        }
        if constructor.parameter_types.len() != args.len() {
            return Err(InstantiationError::Instantiation(format!(
                "{owner} constructor takes {} argument(s), got {}",
                constructor.parameter_types.len(),
                args.len()
            )));
        }
        if let Some(types) = &self.types {
            if types.get(owner).is_some_and(|t| t.is_abstract) {
                return Err(InstantiationError::Instantiation(format!(
                    "{owner} is abstract"
                )));
            }
            let mismatch = constructor
                .parameter_types
                .iter()
                .zip(&args)
                .find(|(expected, arg)| !types.is_assignable(arg.type_name(), expected));
            if let Some((expected, arg)) = mismatch {
                return Err(InstantiationError::Instantiation(format!(
                    "{owner} expects {expected}, got {}",
                    arg.type_name()
                )));
            }
        }
        debug!(type_name = %owner, "instantiated");
        Ok(Pojo::new(owner.clone()).constructed_with(args))
    }
}

// ── Service registry ──────────────────────────────────────────────────────────

/// Named services injected into every freshly built object.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Arc<RwLock<BTreeMap<String, TypeName>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under `slot`, replacing any previous service.
    pub fn register(&self, slot: impl Into<String>, service: impl Into<TypeName>) -> &Self {
        self.services
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot.into(), service.into());
        self
    }

    pub fn len(&self) -> usize {
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ServiceInjector for ServiceRegistry {
    fn inject_services_into(&self, pojo: &mut Pojo) {
        let services = self.services.read().unwrap_or_else(PoisonError::into_inner);
        for (slot, service) in services.iter() {
            pojo.inject_service(slot.clone(), service.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetmodel_core::domain::{TypeDescriptor, Visibility};

    fn universe() -> Arc<TypeUniverse> {
        Arc::new(
            TypeUniverse::from_descriptors(vec![
                TypeDescriptor::builder("Party").abstract_type().build().unwrap(),
                TypeDescriptor::builder("Customer").extends("Party").build().unwrap(),
                TypeDescriptor::builder("Order").build().unwrap(),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn builds_pojo_from_public_constructor() {
        let ctor = ConstructorDescriptor::new("Customer_notes").param("Customer");
        let pojo = DescriptorInstantiator::new()
            .instantiate(&ctor, vec![Pojo::new("Customer")])
            .unwrap();
        assert_eq!(pojo.type_name().as_str(), "Customer_notes");
        assert_eq!(pojo.constructor_args().len(), 1);
    }

    #[test]
    fn rejects_private_constructor_and_wrong_arity() {
        let instantiator = DescriptorInstantiator::new();
        let private = ConstructorDescriptor::new("X")
            .param("Customer")
            .with_visibility(Visibility::Private);
        assert!(matches!(
            instantiator.instantiate(&private, vec![Pojo::new("Customer")]),
            Err(InstantiationError::IllegalAccess(_))
        ));

        let one_arg = ConstructorDescriptor::new("X").param("Customer");
        assert!(matches!(
            instantiator.instantiate(&one_arg, vec![]),
            Err(InstantiationError::Instantiation(_))
        ));
    }

    #[test]
    fn checks_argument_types_against_universe() {
        let instantiator = DescriptorInstantiator::with_types(universe());
        let ctor = ConstructorDescriptor::new("Order").param("Party");

        assert!(instantiator
            .instantiate(&ctor, vec![Pojo::new("Customer")])
            .is_ok());
        let err = instantiator
            .instantiate(&ctor, vec![Pojo::new("Order")])
            .unwrap_err();
        assert!(err.to_string().contains("expects Party, got Order"));

        let abstract_ctor = ConstructorDescriptor::new("Party");
        assert!(instantiator.instantiate(&abstract_ctor, vec![]).is_err());
    }

    #[test]
    fn registry_injects_every_service() {
        let registry = ServiceRegistry::new();
        registry
            .register("clock", "ClockService")
            .register("repository", "CustomerRepository");

        let mut pojo = Pojo::new("Customer_notes");
        registry.inject_services_into(&mut pojo);
        assert_eq!(pojo.injected_services().len(), 2);
        assert_eq!(
            pojo.injected_services().get("clock"),
            Some(&TypeName::new("ClockService"))
        );
    }
}
