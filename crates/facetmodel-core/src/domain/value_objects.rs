//! Small, copyable value objects shared by the whole metamodel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── TypeName ──────────────────────────────────────────────────────────────────

/// Stable identifier of a domain (or value) type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of a dotted/path-qualified name (`com.acme.Customer` -> `Customer`).
    pub fn simple_name(&self) -> &str {
        self.0
            .rsplit(|c| c == '.' || c == ':')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── Identifier ────────────────────────────────────────────────────────────────

/// Identifies a metamodel element: a type, or a member of a type, or a
/// parameter of an action.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub type_name: TypeName,
    pub member: Option<String>,
    pub parameter: Option<usize>,
}

impl Identifier {
    pub fn for_type(type_name: TypeName) -> Self {
        Self {
            type_name,
            member: None,
            parameter: None,
        }
    }

    pub fn for_member(type_name: TypeName, member: impl Into<String>) -> Self {
        Self {
            type_name,
            member: Some(member.into()),
            parameter: None,
        }
    }

    pub fn for_parameter(type_name: TypeName, member: impl Into<String>, index: usize) -> Self {
        Self {
            type_name,
            member: Some(member.into()),
            parameter: Some(index),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if let Some(member) = &self.member {
            write!(f, "#{member}")?;
        }
        if let Some(index) = self.parameter {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

// ── FeatureType ───────────────────────────────────────────────────────────────

/// The kind of metamodel element a facet factory can contribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureType {
    Object,
    Property,
    Collection,
    Action,
    ActionParameter,
}

impl FeatureType {
    pub const OBJECT: &'static [FeatureType] = &[FeatureType::Object];
    pub const PROPERTIES_ONLY: &'static [FeatureType] = &[FeatureType::Property];
    pub const COLLECTIONS_ONLY: &'static [FeatureType] = &[FeatureType::Collection];
    pub const ACTIONS_ONLY: &'static [FeatureType] = &[FeatureType::Action];
    pub const PARAMETERS_ONLY: &'static [FeatureType] = &[FeatureType::ActionParameter];
    pub const PROPERTIES_AND_COLLECTIONS: &'static [FeatureType] =
        &[FeatureType::Property, FeatureType::Collection];
    pub const MEMBERS: &'static [FeatureType] = &[
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
    ];
    pub const OBJECT_AND_MEMBERS: &'static [FeatureType] = &[
        FeatureType::Object,
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
    ];
    pub const PROPERTIES_AND_ACTIONS: &'static [FeatureType] =
        &[FeatureType::Property, FeatureType::Action];
    pub const ACTIONS_AND_PARAMETERS: &'static [FeatureType] =
        &[FeatureType::Action, FeatureType::ActionParameter];
    pub const EVERYTHING: &'static [FeatureType] = &[
        FeatureType::Object,
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
        FeatureType::ActionParameter,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Property => "property",
            Self::Collection => "collection",
            Self::Action => "action",
            Self::ActionParameter => "action-parameter",
        }
    }

    pub const fn is_property_or_collection(self) -> bool {
        matches!(self, Self::Property | Self::Collection)
    }

    pub const fn is_member(self) -> bool {
        matches!(self, Self::Property | Self::Collection | Self::Action)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Precedence ────────────────────────────────────────────────────────────────

/// How authoritative a facet is. Later variants win over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// Last-resort value when nothing else applies.
    Fallback,
    /// Derived from naming conventions.
    Inferred,
    /// Framework default for the feature.
    Default,
    /// Declared on the descriptor (annotation/attribute).
    Annotation,
    /// Installed from an external layout file.
    Layout,
    /// Programmatic override; beats everything.
    HardOverride,
}

impl Precedence {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fallback => "fallback",
            Self::Inferred => "inferred",
            Self::Default => "default",
            Self::Annotation => "annotation",
            Self::Layout => "layout",
            Self::HardOverride => "hard-override",
        }
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Visibility ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

// ── Nature ────────────────────────────────────────────────────────────────────

/// The declared nature of a domain type (`DomainObject(nature = ...)`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Nature {
    #[default]
    NotSpecified,
    Entity,
    ViewModel,
    Mixin,
    Bean,
}

impl Nature {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotSpecified => "not-specified",
            Self::Entity => "entity",
            Self::ViewModel => "view-model",
            Self::Mixin => "mixin",
            Self::Bean => "bean",
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "" | "not-specified" => Ok(Self::NotSpecified),
            "entity" | "jdo-entity" | "jpa-entity" => Ok(Self::Entity),
            "view-model" | "viewmodel" => Ok(Self::ViewModel),
            "mixin" => Ok(Self::Mixin),
            "bean" => Ok(Self::Bean),
            other => Err(DomainError::InvalidDescriptor(format!(
                "unknown domain object nature '{other}'"
            ))),
        }
    }
}
