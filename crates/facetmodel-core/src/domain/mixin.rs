//! Mixins: types that contribute behaviour to another ("holder") type through
//! a single public one-argument constructor taking the holder.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    entities::{
        descriptor::{Annotation, ConstructorDescriptor, MethodDescriptor, TypeDescriptor},
        pojo::Pojo,
        universe::TypeUniverse,
    },
    error::DomainError,
    value_objects::{Nature, TypeName},
};

/// How a mixin's constructor is chosen when more than one public 1-arg
/// constructor is declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructorPolicy {
    /// Exactly one candidate, otherwise none is resolved.
    #[default]
    Strict,
    /// The first candidate in declaration order.
    FirstMatch,
}

impl ConstructorPolicy {
    fn select<'a>(self, cls: &'a TypeDescriptor) -> Option<&'a ConstructorDescriptor> {
        let mut candidates = cls.public_single_arg_constructors();
        let first = candidates.next()?;
        match self {
            Self::FirstMatch => Some(first),
            Self::Strict => candidates.next().is_none().then_some(first),
        }
    }
}

/// Which declaration made the type a mixin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixinOrigin {
    /// `DomainObject(nature = "mixin")`.
    DomainObjectNature,
    /// The dedicated `Mixin` marker.
    MixinMarker,
}

// ── Runtime collaborators ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstantiationError {
    #[error("constructor threw: {0}")]
    InvocationTarget(String),

    #[error("constructor not accessible: {0}")]
    IllegalAccess(String),

    #[error("type cannot be instantiated: {0}")]
    Instantiation(String),
}

/// Invokes a described constructor.
pub trait ObjectInstantiator: Send + Sync {
    fn instantiate(
        &self,
        constructor: &ConstructorDescriptor,
        args: Vec<Pojo>,
    ) -> Result<Pojo, InstantiationError>;
}

/// Fills a freshly constructed object's service slots.
pub trait ServiceInjector: Send + Sync {
    fn inject_services_into(&self, pojo: &mut Pojo);
}

/// Everything [`MixinFacet::instantiate`] needs at run time.
#[derive(Clone, Copy)]
pub struct MixinRuntime<'a> {
    pub types: &'a TypeUniverse,
    pub instantiator: &'a dyn ObjectInstantiator,
    pub injector: &'a dyn ServiceInjector,
}

// ── MixinFacet ────────────────────────────────────────────────────────────────

/// Marks a type as a mixin and knows how to build it for a holder instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MixinFacet {
    mixin_type: TypeName,
    holder_type: TypeName,
    main_method: String,
    constructor: Option<ConstructorDescriptor>,
    origin: MixinOrigin,
}

impl MixinFacet {
    /// For `DomainObject(nature = "mixin", mixinMethod = ...)`. `None` unless
    /// the nature is mixin and a public 1-arg constructor exists.
    pub fn for_domain_object_annotation(
        cls: &TypeDescriptor,
        annotation: &Annotation,
        policy: ConstructorPolicy,
        default_main: &str,
    ) -> Option<Self> {
        let nature = annotation
            .attribute("nature")
            .and_then(|n| n.parse::<Nature>().ok())
            .unwrap_or_default();
        if nature != Nature::Mixin {
            return None;
        }
        let main = annotation.attribute("mixinMethod").unwrap_or(default_main);
        Self::create(cls, policy, main, MixinOrigin::DomainObjectNature)
    }

    /// For the `Mixin(method = ...)` marker. `None` if no public 1-arg
    /// constructor exists.
    pub fn for_mixin_annotation(
        cls: &TypeDescriptor,
        annotation: &Annotation,
        policy: ConstructorPolicy,
        default_main: &str,
    ) -> Option<Self> {
        let main = annotation.attribute("method").unwrap_or(default_main);
        Self::create(cls, policy, main, MixinOrigin::MixinMarker)
    }

    fn create(
        cls: &TypeDescriptor,
        policy: ConstructorPolicy,
        main: &str,
        origin: MixinOrigin,
    ) -> Option<Self> {
        let holder_type = cls
            .public_single_arg_constructors()
            .next()?
            .first_parameter_type()?
            .clone();
        Some(Self {
            mixin_type: cls.name.clone(),
            holder_type,
            main_method: main.to_owned(),
            constructor: policy.select(cls).cloned(),
            origin,
        })
    }

    pub fn mixin_type(&self) -> &TypeName {
        &self.mixin_type
    }

    pub fn holder_type(&self) -> &TypeName {
        &self.holder_type
    }

    pub fn main_method(&self) -> &str {
        &self.main_method
    }

    pub fn constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructor.as_ref()
    }

    pub fn origin(&self) -> MixinOrigin {
        self.origin
    }

    /// Id of the member this mixin contributes: the part after the last `_`
    /// of the simple type name, or the main method name when there is none.
    pub fn member_id(&self) -> String {
        match self.mixin_type.simple_name().rsplit_once('_') {
            Some((_, suffix)) if !suffix.is_empty() => suffix.to_owned(),
            _ => self.main_method.clone(),
        }
    }

    /// Whether instances of `candidate` can host this mixin.
    pub fn is_mixin_for(&self, candidate: Option<&TypeName>, types: &TypeUniverse) -> bool {
        candidate.is_some_and(|c| types.is_assignable(c, &self.holder_type))
    }

    /// Whether `method` is this mixin's main method: same name, declared on
    /// the mixin type or one of its supertypes.
    pub fn is_candidate_for_main(&self, method: &MethodDescriptor, types: &TypeUniverse) -> bool {
        let Some(constructor) = &self.constructor else {
            return false;
        };
        method.name == self.main_method
            && types.is_assignable(&constructor.declaring_type, &method.declaring_type)
    }

    /// Build the mixin for `holder` and inject its services.
    ///
    /// `Ok(None)` when there is no holder. Every other failure is fatal.
    pub fn instantiate(
        &self,
        holder: Option<&Pojo>,
        runtime: MixinRuntime<'_>,
    ) -> Result<Option<Pojo>, DomainError> {
        let Some(constructor) = &self.constructor else {
            return Err(DomainError::MixinConstructorNotResolved {
                mixin_type: self.mixin_type.to_string(),
            });
        };
        let Some(holder) = holder else {
            return Ok(None);
        };
        if !self.is_mixin_for(Some(holder.type_name()), runtime.types) {
            return Err(DomainError::MixinHolderMismatch {
                mixin_type: self.mixin_type.to_string(),
                expected: self.holder_type.to_string(),
                actual: holder.type_name().to_string(),
            });
        }
        let mut mixin = runtime
            .instantiator
            .instantiate(constructor, vec![holder.clone()])
            .map_err(|e| DomainError::MixinInstantiationFailed {
                mixin_type: self.mixin_type.to_string(),
                reason: e.to_string(),
            })?;
        runtime.injector.inject_services_into(&mut mixin);
        Ok(Some(mixin))
    }
}

impl fmt::Display for MixinFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mixes into {}", self.mixin_type, self.holder_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::descriptor::annotations;
    use mockall::mock;

    mock! {
        Instantiator {}
        impl ObjectInstantiator for Instantiator {
            fn instantiate(
                &self,
                constructor: &ConstructorDescriptor,
                args: Vec<Pojo>,
            ) -> Result<Pojo, InstantiationError>;
        }
    }

    mock! {
        Injector {}
        impl ServiceInjector for Injector {
            fn inject_services_into(&self, pojo: &mut Pojo);
        }
    }

    fn universe() -> TypeUniverse {
        TypeUniverse::from_descriptors([
            TypeDescriptor::builder("Party").abstract_type().build().unwrap(),
            TypeDescriptor::builder("Customer")
                .extends("Party")
                .build()
                .unwrap(),
            TypeDescriptor::builder("Order").build().unwrap(),
        ])
        .unwrap()
    }

    fn mixin_type(ctor_params: &[&str]) -> TypeDescriptor {
        let mut b = TypeDescriptor::builder("Party_notes")
            .annotated(Annotation::new(annotations::MIXIN).with("method", "coll"));
        for p in ctor_params {
            let p = p.to_string();
            b = b.constructor(move |c| c.param(p));
        }
        b.method("coll", |m| m.returning("List")).build().unwrap()
    }

    fn facet() -> MixinFacet {
        let cls = mixin_type(&["Party"]);
        MixinFacet::for_mixin_annotation(
            &cls,
            cls.annotation(annotations::MIXIN).unwrap(),
            ConstructorPolicy::FirstMatch,
            "act",
        )
        .unwrap()
    }

    #[test]
    fn is_mixin_for_follows_assignability() {
        let types = universe();
        let f = facet();
        assert!(!f.is_mixin_for(None, &types));
        assert!(f.is_mixin_for(Some(&TypeName::new("Customer")), &types));
        assert!(f.is_mixin_for(Some(&TypeName::new("Party")), &types));
        assert!(!f.is_mixin_for(Some(&TypeName::new("Order")), &types));
    }

    #[test]
    fn member_id_is_suffix_after_underscore() {
        let f = facet();
        assert_eq!(f.member_id(), "notes");
        assert_eq!(f.main_method(), "coll");
    }

    #[test]
    fn nature_path_ignores_other_natures() {
        let cls = mixin_type(&["Party"]);
        let entity = Annotation::new(annotations::DOMAIN_OBJECT).with("nature", "ENTITY");
        assert!(MixinFacet::for_domain_object_annotation(
            &cls,
            &entity,
            ConstructorPolicy::Strict,
            "act"
        )
        .is_none());

        let mixin = Annotation::new(annotations::DOMAIN_OBJECT).with("nature", "MIXIN");
        let f = MixinFacet::for_domain_object_annotation(&cls, &mixin, ConstructorPolicy::Strict, "act")
            .unwrap();
        assert_eq!(f.origin(), MixinOrigin::DomainObjectNature);
        assert_eq!(f.main_method(), "act");
    }

    #[test]
    fn strict_policy_leaves_ambiguous_constructor_unresolved() {
        let cls = mixin_type(&["Party", "Order"]);
        let marker = cls.annotation(annotations::MIXIN).unwrap();
        let strict =
            MixinFacet::for_mixin_annotation(&cls, marker, ConstructorPolicy::Strict, "act").unwrap();
        assert!(strict.constructor().is_none());

        let first =
            MixinFacet::for_mixin_annotation(&cls, marker, ConstructorPolicy::FirstMatch, "act")
                .unwrap();
        assert_eq!(
            first.constructor().and_then(|c| c.first_parameter_type()),
            Some(&TypeName::new("Party"))
        );
    }

    #[test]
    fn candidate_for_main_checks_name_and_declaring_type() {
        let types = universe();
        let f = facet();
        let main = MethodDescriptor::new("Party_notes", "coll");
        let other_name = MethodDescriptor::new("Party_notes", "act");
        let foreign = MethodDescriptor::new("Order", "coll");
        assert!(f.is_candidate_for_main(&main, &types));
        assert!(!f.is_candidate_for_main(&other_name, &types));
        assert!(!f.is_candidate_for_main(&foreign, &types));
    }

    #[test]
    fn instantiate_without_holder_is_none() {
        let types = universe();
        let (instantiator, injector) = (MockInstantiator::new(), MockInjector::new());
        let runtime = MixinRuntime {
            types: &types,
            instantiator: &instantiator,
            injector: &injector,
        };
        assert_eq!(facet().instantiate(None, runtime).unwrap(), None);
    }

    #[test]
    fn instantiate_rejects_wrong_holder() {
        let types = universe();
        let (instantiator, injector) = (MockInstantiator::new(), MockInjector::new());
        let runtime = MixinRuntime {
            types: &types,
            instantiator: &instantiator,
            injector: &injector,
        };
        let err = facet()
            .instantiate(Some(&Pojo::new("Order")), runtime)
            .unwrap_err();
        assert!(matches!(err, DomainError::MixinHolderMismatch { .. }));
        assert!(err.is_unrecoverable());
    }

    #[test]
    fn instantiate_constructs_with_holder_and_injects_once() {
        let types = universe();
        let holder = Pojo::new("Customer").with_property("name", "Ada");

        let mut instantiator = MockInstantiator::new();
        let expected = holder.clone();
        instantiator
            .expect_instantiate()
            .withf(move |ctor, args| {
                ctor.declaring_type == TypeName::new("Party_notes") && args == &[expected.clone()]
            })
            .times(1)
            .returning(|ctor, args| Ok(Pojo::new(ctor.declaring_type.clone()).constructed_with(args)));

        let mut injector = MockInjector::new();
        injector
            .expect_inject_services_into()
            .times(1)
            .returning(|pojo| pojo.inject_service("clock", TypeName::new("ClockService")));

        let runtime = MixinRuntime {
            types: &types,
            instantiator: &instantiator,
            injector: &injector,
        };
        let mixin = facet().instantiate(Some(&holder), runtime).unwrap().unwrap();
        assert_eq!(mixin.type_name(), &TypeName::new("Party_notes"));
        assert_eq!(mixin.constructor_args(), &[holder]);
        assert!(mixin.injected_services().contains_key("clock"));
    }

    #[test]
    fn instantiation_failures_are_wrapped() {
        let types = universe();
        let mut instantiator = MockInstantiator::new();
        instantiator
            .expect_instantiate()
            .returning(|_, _| Err(InstantiationError::InvocationTarget("boom".into())));
        let mut injector = MockInjector::new();
        injector.expect_inject_services_into().times(0);

        let runtime = MixinRuntime {
            types: &types,
            instantiator: &instantiator,
            injector: &injector,
        };
        let err = facet()
            .instantiate(Some(&Pojo::new("Customer")), runtime)
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn unresolved_constructor_is_fatal_even_without_holder() {
        let types = universe();
        let cls = mixin_type(&["Party", "Order"]);
        let f = MixinFacet::for_mixin_annotation(
            &cls,
            cls.annotation(annotations::MIXIN).unwrap(),
            ConstructorPolicy::Strict,
            "act",
        )
        .unwrap();
        let (instantiator, injector) = (MockInstantiator::new(), MockInjector::new());
        let runtime = MixinRuntime {
            types: &types,
            instantiator: &instantiator,
            injector: &injector,
        };
        assert!(matches!(
            f.instantiate(None, runtime),
            Err(DomainError::MixinConstructorNotResolved { .. })
        ));
    }
}
