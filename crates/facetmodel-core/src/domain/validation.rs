//! Accumulated (never thrown) metamodel validation.
//!
//! Model-definition defects are recorded as [`ValidationFailure`]s while the
//! build carries on; the complete list is surfaced once at the end so a user
//! sees every problem in a single pass.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::domain::{
    entities::{descriptor::TypeDescriptor, specification::MetaModel},
    mixin::ConstructorPolicy,
    value_objects::Identifier,
};

// ── Failures ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub identifier: Identifier,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(identifier: Identifier, message: impl Into<String>) -> Self {
        Self {
            identifier,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered collection of failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationFailures(Vec<ValidationFailure>);

impl ValidationFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, identifier: Identifier, message: impl Into<String>) {
        self.0.push(ValidationFailure::new(identifier, message));
    }

    pub fn push(&mut self, failure: ValidationFailure) {
        self.0.push(failure);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|f| f.message.clone()).collect()
    }

    /// Failures raised against `identifier`.
    pub fn for_identifier<'a>(
        &'a self,
        identifier: &'a Identifier,
    ) -> impl Iterator<Item = &'a ValidationFailure> {
        self.0.iter().filter(move |f| &f.identifier == identifier)
    }
}

impl Extend<ValidationFailure> for ValidationFailures {
    fn extend<T: IntoIterator<Item = ValidationFailure>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ValidationFailures {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationFailures {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ── Sink ──────────────────────────────────────────────────────────────────────

/// Shared handle factories push failures into while facets are processed.
///
/// Cloning shares the underlying list.
#[derive(Debug, Clone, Default)]
pub struct ValidationSink {
    inner: Arc<Mutex<ValidationFailures>>,
}

impl ValidationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self, identifier: Identifier, message: impl Into<String>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add(identifier, message);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> ValidationFailures {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take every failure raised so far, leaving the sink empty.
    pub fn drain(&self) -> ValidationFailures {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

// ── Validators ────────────────────────────────────────────────────────────────

/// A rule run over the completed metamodel.
pub trait MetaModelValidator: Send + Sync {
    fn name(&self) -> &'static str;

    fn validate(&self, model: &MetaModel, failures: &mut ValidationFailures);
}

/// Runs its children in registration order.
#[derive(Default)]
pub struct MetaModelValidatorComposite {
    validators: Vec<Box<dyn MetaModelValidator>>,
}

impl MetaModelValidatorComposite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, validator: Box<dyn MetaModelValidator>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }
}

impl MetaModelValidator for MetaModelValidatorComposite {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn validate(&self, model: &MetaModel, failures: &mut ValidationFailures) {
        for validator in &self.validators {
            validator.validate(model, failures);
        }
    }
}

/// The single shape rule for mixin types: exactly one public 1-arg constructor.
#[derive(Debug, Clone)]
pub struct MetaModelValidatorForMixinTypes {
    marker: &'static str,
    sink: ValidationSink,
}

impl MetaModelValidatorForMixinTypes {
    /// `marker` names the declaration that made the type a mixin candidate
    /// (used in messages).
    pub fn new(marker: &'static str, sink: ValidationSink) -> Self {
        Self { marker, sink }
    }

    /// Raises a failure and returns `false` unless `candidate` has exactly one
    /// public single-argument constructor.
    pub fn ensure_mixin_type(&self, candidate: &TypeDescriptor) -> bool {
        self.ensure_mixin_type_for(candidate, ConstructorPolicy::Strict)
    }

    /// As [`ensure_mixin_type`](Self::ensure_mixin_type), except that
    /// [`ConstructorPolicy::FirstMatch`] accepts several candidates.
    pub fn ensure_mixin_type_for(&self, candidate: &TypeDescriptor, policy: ConstructorPolicy) -> bool {
        let count = candidate.public_single_arg_constructors().count();
        match count {
            1 => true,
            n if n > 1 && policy == ConstructorPolicy::FirstMatch => true,
            0 => {
                self.sink.raise(
                    Identifier::for_type(candidate.name.clone()),
                    format!(
                        "{}: annotated with @{} but does not have a public 1-arg constructor",
                        candidate.name, self.marker
                    ),
                );
                false
            }
            n => {
                self.sink.raise(
                    Identifier::for_type(candidate.name.clone()),
                    format!(
                        "{}: annotated with @{} annotation needs a single public 1-arg constructor but has {n}",
                        candidate.name, self.marker
                    ),
                );
                false
            }
        }
    }
}

/// Two members of one specification must not share an id.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberIdUniquenessValidator;

impl MetaModelValidator for MemberIdUniquenessValidator {
    fn name(&self) -> &'static str {
        "member-id-uniqueness"
    }

    fn validate(&self, model: &MetaModel, failures: &mut ValidationFailures) {
        for spec in model.specifications() {
            let mut seen = std::collections::BTreeSet::new();
            for (id, _) in spec.members() {
                if !seen.insert(id) {
                    failures.add(
                        Identifier::for_member(spec.type_name().clone(), id),
                        format!("{}: more than one member has id '{id}'", spec.type_name()),
                    );
                }
            }
        }
    }
}

/// A supporting method (`hideX`, `disableX`, ...) whose member `X` was never
/// found, so no factory claimed it.
#[derive(Debug, Clone, Copy)]
pub struct OrphanedSupportingMethodValidator {
    prefix: &'static str,
}

impl OrphanedSupportingMethodValidator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }
}

impl MetaModelValidator for OrphanedSupportingMethodValidator {
    fn name(&self) -> &'static str {
        "orphaned-supporting-method"
    }

    fn validate(&self, model: &MetaModel, failures: &mut ValidationFailures) {
        for spec in model.specifications() {
            for method in spec.unclaimed_methods() {
                let Some(rest) = method.name.strip_prefix(self.prefix) else {
                    continue;
                };
                if !rest.starts_with(char::is_uppercase) {
                    continue;
                }
                failures.add(
                    Identifier::for_member(spec.type_name().clone(), method.name.clone()),
                    format!(
                        "{}#{}: supporting method has no matching member",
                        spec.type_name(),
                        method.name
                    ),
                );
            }
        }
    }
}

/// Any other method left unclaimed: its name starts with a recognised prefix
/// (`settle`, `issueInvoice`) but it is neither a member nor a supporting
/// method. Runs last and skips methods an earlier validator already reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnclaimedMethodValidator;

impl MetaModelValidator for UnclaimedMethodValidator {
    fn name(&self) -> &'static str {
        "unclaimed-method"
    }

    fn validate(&self, model: &MetaModel, failures: &mut ValidationFailures) {
        for spec in model.specifications() {
            for method in spec.unclaimed_methods() {
                let identifier =
                    Identifier::for_member(spec.type_name().clone(), method.name.clone());
                if failures.iter().any(|f| f.identifier == identifier) {
                    continue;
                }
                failures.add(
                    identifier,
                    format!(
                        "{}#{}: method is claimed by no member; annotate it with @Action to make it an action",
                        spec.type_name(),
                        method.name
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        descriptor::MethodDescriptor,
        specification::{AssociationKind, ObjectAction, ObjectAssociation, ObjectSpecification},
    };
    use crate::domain::value_objects::{TypeName, Visibility};

    fn validator() -> (MetaModelValidatorForMixinTypes, ValidationSink) {
        let sink = ValidationSink::new();
        (
            MetaModelValidatorForMixinTypes::new("Mixin", sink.clone()),
            sink,
        )
    }

    #[test]
    fn exactly_one_constructor_is_valid() {
        let (v, sink) = validator();
        let ty = TypeDescriptor::builder("Customer_placeOrder")
            .constructor(|c| c.param("Customer"))
            .constructor(|c| c)
            .build()
            .unwrap();

        assert!(v.ensure_mixin_type(&ty));
        assert!(sink.is_empty());
    }

    #[test]
    fn no_constructor_raises_one_failure() {
        let (v, sink) = validator();
        let ty = TypeDescriptor::builder("Customer_placeOrder")
            .constructor(|c| c.param("Customer").with_visibility(Visibility::Private))
            .build()
            .unwrap();

        assert!(!v.ensure_mixin_type(&ty));
        let failures = sink.snapshot();
        assert_eq!(failures.len(), 1);
        assert!(failures.messages()[0].contains("does not have a public 1-arg constructor"));
    }

    #[test]
    fn two_constructors_report_exact_count() {
        let (v, sink) = validator();
        let ty = TypeDescriptor::builder("Notes_add")
            .constructor(|c| c.param("Customer"))
            .constructor(|c| c.param("Order"))
            .build()
            .unwrap();

        assert!(!v.ensure_mixin_type(&ty));
        let failures = sink.drain();
        assert_eq!(failures.len(), 1);
        let failure = failures.iter().next().unwrap();
        assert_eq!(
            failure.identifier,
            Identifier::for_type(TypeName::new("Notes_add"))
        );
        assert!(failure
            .message
            .contains("needs a single public 1-arg constructor but has 2"));
        assert!(sink.is_empty());
    }

    #[test]
    fn first_match_policy_accepts_several_but_not_none() {
        let (v, sink) = validator();
        let several = TypeDescriptor::builder("Notes_add")
            .constructor(|c| c.param("Customer"))
            .constructor(|c| c.param("Order"))
            .build()
            .unwrap();
        let none = TypeDescriptor::builder("Notes_remove").build().unwrap();

        assert!(v.ensure_mixin_type_for(&several, ConstructorPolicy::FirstMatch));
        assert!(!v.ensure_mixin_type_for(&none, ConstructorPolicy::FirstMatch));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn composite_runs_children_in_order() {
        struct Named(&'static str);
        impl MetaModelValidator for Named {
            fn name(&self) -> &'static str {
                self.0
            }
            fn validate(&self, _model: &MetaModel, failures: &mut ValidationFailures) {
                failures.add(Identifier::for_type(TypeName::new("T")), self.0);
            }
        }

        let mut composite = MetaModelValidatorComposite::new();
        composite.add(Box::new(Named("first")));
        composite.add(Box::new(Named("second")));

        let model = MetaModel::new(Default::default());
        let mut failures = ValidationFailures::new();
        composite.validate(&model, &mut failures);
        assert_eq!(failures.messages(), vec!["first", "second"]);
        assert_eq!(composite.names(), vec!["first", "second"]);
    }

    fn model_with(spec: ObjectSpecification) -> MetaModel {
        MetaModel::new(
            [(spec.type_name().clone(), std::sync::Arc::new(spec))]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn duplicate_member_ids_are_reported() {
        let owner = TypeName::new("Customer");
        let getter = std::sync::Arc::new(MethodDescriptor::new("Customer", "getName"));
        let mut spec = ObjectSpecification::new(owner.clone(), None, vec![]);
        spec.add_association(ObjectAssociation::new(
            &owner,
            "name",
            AssociationKind::Property,
            getter.clone(),
        ));
        spec.add_action(ObjectAction::new(&owner, "name", getter));

        let mut failures = ValidationFailures::new();
        MemberIdUniquenessValidator.validate(&model_with(spec), &mut failures);
        assert_eq!(failures.len(), 1);
        assert!(failures.messages()[0].contains("'name'"));
    }

    #[test]
    fn unclaimed_supporting_methods_are_orphans() {
        let mut spec = ObjectSpecification::new(TypeName::new("Customer"), None, vec![]);
        spec.set_unclaimed_methods(vec![
            std::sync::Arc::new(MethodDescriptor::new("Customer", "hideGhost")),
            std::sync::Arc::new(MethodDescriptor::new("Customer", "hideous")),
            std::sync::Arc::new(MethodDescriptor::new("Customer", "disableGhost")),
        ]);

        let mut failures = ValidationFailures::new();
        OrphanedSupportingMethodValidator::new("hide").validate(&model_with(spec), &mut failures);
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures.iter().next().unwrap().identifier.to_string(),
            "Customer#hideGhost"
        );
    }

    #[test]
    fn unclaimed_methods_are_reported_once() {
        let mut spec = ObjectSpecification::new(TypeName::new("Customer"), None, vec![]);
        spec.set_unclaimed_methods(vec![
            std::sync::Arc::new(MethodDescriptor::new("Customer", "hideGhost")),
            std::sync::Arc::new(MethodDescriptor::new("Customer", "settle")),
        ]);
        let model = model_with(spec);

        let mut failures = ValidationFailures::new();
        OrphanedSupportingMethodValidator::new("hide").validate(&model, &mut failures);
        UnclaimedMethodValidator.validate(&model, &mut failures);
        let ids: Vec<_> = failures.iter().map(|f| f.identifier.to_string()).collect();
        assert_eq!(ids, vec!["Customer#hideGhost", "Customer#settle"]);
        assert!(failures.messages()[1].contains("@Action"));
    }
}
