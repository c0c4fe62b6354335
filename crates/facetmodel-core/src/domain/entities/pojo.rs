//! Runtime object handles used when the metamodel has to act on instances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::TypeName;

/// An instance of a described type.
///
/// Carries just enough state for the metamodel's own runtime duties (mixin
/// construction and service injection); domain state lives in `properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pojo {
    type_name: TypeName,
    #[serde(default)]
    constructor_args: Vec<Pojo>,
    #[serde(default)]
    injected_services: BTreeMap<String, TypeName>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

impl Pojo {
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            constructor_args: Vec::new(),
            injected_services: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn constructed_with(mut self, args: Vec<Pojo>) -> Self {
        self.constructor_args = args;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn constructor_args(&self) -> &[Pojo] {
        &self.constructor_args
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn inject_service(&mut self, slot: impl Into<String>, service: TypeName) {
        self.injected_services.insert(slot.into(), service);
    }

    pub fn injected_services(&self) -> &BTreeMap<String, TypeName> {
        &self.injected_services
    }
}
