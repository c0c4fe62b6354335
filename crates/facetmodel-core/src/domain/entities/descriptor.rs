//! Language-neutral descriptors of domain types and their members.
//!
//! The metamodel never reflects over live code. Whatever introspection the
//! host has (attributes, decorators, struct tags, explicit registration)
//! produces these descriptors, and facet factories read only them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{TypeName, Visibility},
};

/// Well-known annotation names understood by the standard programming model.
pub mod annotations {
    pub const ACTION: &str = "Action";
    pub const COLLECTION: &str = "Collection";
    pub const DESCRIBED_AS: &str = "DescribedAs";
    pub const DOMAIN_OBJECT: &str = "DomainObject";
    pub const HIDDEN: &str = "Hidden";
    pub const MEMBER_ORDER: &str = "MemberOrder";
    pub const MIXIN: &str = "Mixin";
    pub const NAMED: &str = "Named";
    pub const PROGRAMMATIC: &str = "Programmatic";
    pub const PROPERTY: &str = "Property";
    pub const VALUE: &str = "Value";
}

// ── Annotation ────────────────────────────────────────────────────────────────

/// Declarative metadata attached to a type, member or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attribute value, treating blank strings as absent.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

fn find<'a>(annotations: &'a [Annotation], name: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|a| a.name == name)
}

// ── Methods & constructors ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub declaring_type: TypeName,
    #[serde(default)]
    pub parameter_types: Vec<TypeName>,
    #[serde(default)]
    pub return_type: Option<TypeName>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// One list per parameter; shorter than `parameter_types` when trailing
    /// parameters carry no metadata.
    #[serde(default)]
    pub parameter_annotations: Vec<Vec<Annotation>>,
}

impl MethodDescriptor {
    pub fn new(declaring_type: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type: declaring_type.into(),
            parameter_types: Vec::new(),
            return_type: None,
            visibility: Visibility::Public,
            is_static: false,
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
        }
    }

    pub fn returning(mut self, ty: impl Into<TypeName>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn param(mut self, ty: impl Into<TypeName>) -> Self {
        self.parameter_types.push(ty.into());
        self
    }

    pub fn param_annotated(mut self, ty: impl Into<TypeName>, annotation: Annotation) -> Self {
        let index = self.parameter_types.len();
        self.parameter_types.push(ty.into());
        if self.parameter_annotations.len() <= index {
            self.parameter_annotations.resize_with(index + 1, Vec::new);
        }
        self.parameter_annotations[index].push(annotation);
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn param_count(&self) -> usize {
        self.parameter_types.len()
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find(&self.annotations, name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn parameter_annotation(&self, index: usize, name: &str) -> Option<&Annotation> {
        self.parameter_annotations
            .get(index)
            .and_then(|list| find(list, name))
    }

    /// Public, non-static: the only methods the reflector considers.
    pub fn is_public_instance(&self) -> bool {
        self.visibility.is_public() && !self.is_static
    }

    /// `declaring_type#name(params)`, unique within a type.
    pub fn signature(&self) -> String {
        let params = self
            .parameter_types
            .iter()
            .map(TypeName::as_str)
            .collect::<Vec<_>>()
            .join(",");
        format!("{}#{}({params})", self.declaring_type, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDescriptor {
    pub declaring_type: TypeName,
    #[serde(default)]
    pub parameter_types: Vec<TypeName>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl ConstructorDescriptor {
    pub fn new(declaring_type: impl Into<TypeName>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            parameter_types: Vec::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn param(mut self, ty: impl Into<TypeName>) -> Self {
        self.parameter_types.push(ty.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn is_public_single_arg(&self) -> bool {
        self.visibility.is_public() && self.parameter_types.len() == 1
    }

    pub fn first_parameter_type(&self) -> Option<&TypeName> {
        self.parameter_types.first()
    }
}

// ── TypeDescriptor ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: TypeName,
    #[serde(default)]
    pub supertype: Option<TypeName>,
    #[serde(default)]
    pub interfaces: Vec<TypeName>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<TypeName>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name.into())
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find(&self.annotations, name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn public_single_arg_constructors(&self) -> impl Iterator<Item = &ConstructorDescriptor> {
        self.constructors.iter().filter(|c| c.is_public_single_arg())
    }

    pub fn public_instance_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.is_public_instance())
    }

    pub fn method_named(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.as_str().trim().is_empty() {
            return Err(DomainError::InvalidDescriptor("type name is empty".into()));
        }
        if let Some(m) = self.methods.iter().find(|m| m.declaring_type != self.name) {
            // Inherited methods are described on their own type, not copied here.
            return Err(DomainError::InvalidDescriptor(format!(
                "method '{}' on '{}' declares owner '{}'",
                m.name, self.name, m.declaring_type
            )));
        }
        if let Some(c) = self.constructors.iter().find(|c| c.declaring_type != self.name) {
            return Err(DomainError::InvalidDescriptor(format!(
                "constructor on '{}' declares owner '{}'",
                self.name, c.declaring_type
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for m in &self.methods {
            if !seen.insert(m.signature()) {
                return Err(DomainError::InvalidDescriptor(format!(
                    "duplicate method {}",
                    m.signature()
                )));
            }
        }
        Ok(())
    }
}

/// Fluent builder; methods and constructors added through it are owned by the
/// type being built.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    inner: TypeDescriptor,
}

impl TypeDescriptorBuilder {
    fn new(name: TypeName) -> Self {
        Self {
            inner: TypeDescriptor {
                name,
                supertype: None,
                interfaces: Vec::new(),
                is_abstract: false,
                annotations: Vec::new(),
                constructors: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    pub fn extends(mut self, supertype: impl Into<TypeName>) -> Self {
        self.inner.supertype = Some(supertype.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.inner.interfaces.push(interface.into());
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.inner.is_abstract = true;
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.inner.annotations.push(annotation);
        self
    }

    /// Adds a constructor; `configure` receives one already owned by this type.
    pub fn constructor(
        mut self,
        configure: impl FnOnce(ConstructorDescriptor) -> ConstructorDescriptor,
    ) -> Self {
        let ctor = configure(ConstructorDescriptor::new(self.inner.name.clone()));
        self.inner.constructors.push(ctor);
        self
    }

    /// Adds a method; `configure` receives one already owned by this type.
    pub fn method(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(MethodDescriptor) -> MethodDescriptor,
    ) -> Self {
        let method = configure(MethodDescriptor::new(self.inner.name.clone(), name));
        self.inner.methods.push(method);
        self
    }

    pub fn build(self) -> Result<TypeDescriptor, DomainError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_owner() {
        let ty = TypeDescriptor::builder("Customer")
            .constructor(|c| c)
            .method("getName", |m| m.returning("String"))
            .build()
            .unwrap();

        assert_eq!(ty.methods[0].declaring_type, TypeName::new("Customer"));
        assert_eq!(ty.constructors[0].declaring_type, TypeName::new("Customer"));
    }

    #[test]
    fn duplicate_signatures_rejected() {
        let result = TypeDescriptor::builder("Customer")
            .method("foo", |m| m)
            .method("foo", |m| m)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn overloads_allowed() {
        let result = TypeDescriptor::builder("Customer")
            .method("foo", |m| m)
            .method("foo", |m| m.param("int"))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn public_single_arg_constructors_filtered() {
        let ty = TypeDescriptor::builder("Customer_placeOrder")
            .constructor(|c| c.param("Customer"))
            .constructor(|c| c.param("Customer").with_visibility(Visibility::Private))
            .constructor(|c| c.param("Customer").param("Order"))
            .build()
            .unwrap();

        assert_eq!(ty.public_single_arg_constructors().count(), 1);
    }

    #[test]
    fn parameter_annotations_line_up() {
        let m = MethodDescriptor::new("Customer", "placeOrder")
            .param("Product")
            .param_annotated("int", Annotation::new("Named").with("value", "Quantity"));

        assert!(m.parameter_annotation(0, "Named").is_none());
        assert_eq!(
            m.parameter_annotation(1, "Named")
                .and_then(|a| a.attribute("value")),
            Some("Quantity")
        );
    }

    #[test]
    fn blank_attributes_are_absent() {
        let a = Annotation::new("Mixin").with("method", "  ");
        assert_eq!(a.attribute("method"), None);
    }
}
