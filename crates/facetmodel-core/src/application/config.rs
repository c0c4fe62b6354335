//! Settings that shape a metamodel build.
//!
//! Every section has serde defaults, so a partial TOML table (or none at
//! all) yields a complete configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{ConstructorPolicy, TemporalConfig, TypeName};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaModelConfig {
    pub mixins: MixinConfig,
    pub actions: ActionConfig,
    pub collections: CollectionConfig,
    pub temporal: TemporalConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixinConfig {
    /// Constructor selection for `DomainObject(nature = "mixin")`.
    pub nature_policy: ConstructorPolicy,
    /// Constructor selection for the `Mixin` marker.
    pub marker_policy: ConstructorPolicy,
    /// Main method name when the declaration names none.
    pub default_main_method: String,
}

impl Default for MixinConfig {
    fn default() -> Self {
        Self {
            nature_policy: ConstructorPolicy::Strict,
            marker_policy: ConstructorPolicy::FirstMatch,
            default_main_method: "act".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Only methods annotated `Action` become actions.
    pub require_annotation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Return types that make a `get*` accessor a collection.
    pub types: Vec<TypeName>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            types: ["List", "Set", "SortedSet", "Collection", "Vec"]
                .into_iter()
                .map(TypeName::new)
                .collect(),
        }
    }
}
