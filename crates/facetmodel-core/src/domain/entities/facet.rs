//! Facets: small immutable records of one capability of a metamodel element.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::descriptor::MethodDescriptor,
    mixin::MixinFacet,
    value_objects::{Identifier, Nature, Precedence, TypeName},
    value_semantics::TemporalValueSemantics,
};

// ── FacetType ─────────────────────────────────────────────────────────────────

/// Identifies a capability category; the key of a holder's ranking map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FacetType(&'static str);

impl FacetType {
    pub const ACTION_INVOCATION: FacetType = FacetType("action-invocation");
    pub const COLLECTION_ACCESSOR: FacetType = FacetType("collection-accessor");
    pub const DESCRIBED_AS: FacetType = FacetType("described-as");
    pub const DISABLED: FacetType = FacetType("disabled");
    pub const DOMAIN_OBJECT_NATURE: FacetType = FacetType("domain-object-nature");
    pub const HIDDEN: FacetType = FacetType("hidden");
    pub const MEMBER_ORDER: FacetType = FacetType("member-order");
    pub const MIXIN: FacetType = FacetType("mixin");
    pub const NAMED: FacetType = FacetType("named");
    pub const PROGRAMMATIC: FacetType = FacetType("programmatic");
    pub const PROPERTY_ACCESSOR: FacetType = FacetType("property-accessor");
    pub const PROPERTY_SETTER: FacetType = FacetType("property-setter");
    pub const TEMPORAL_VALUE: FacetType = FacetType("temporal-value");
    pub const VALIDATE: FacetType = FacetType("validate");

    /// Facet type contributed by an extension factory.
    pub const fn custom(id: &'static str) -> Self {
        Self(id)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ── Payload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberOrder {
    pub sequence: String,
    pub group: Option<String>,
}

/// What a facet says. Behaviour-bearing payloads (mixin, temporal) are shared
/// strategy objects.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetPayload {
    Text(String),
    Flag(bool),
    Method(Arc<MethodDescriptor>),
    Type(TypeName),
    MemberOrder(MemberOrder),
    Nature(Nature),
    Mixin(Arc<MixinFacet>),
    Temporal(Arc<TemporalValueSemantics>),
}

impl FacetPayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDescriptor> {
        match self {
            Self::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mixin(&self) -> Option<&Arc<MixinFacet>> {
        match self {
            Self::Mixin(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&Arc<TemporalValueSemantics>> {
        match self {
            Self::Temporal(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_member_order(&self) -> Option<&MemberOrder> {
        match self {
            Self::MemberOrder(o) => Some(o),
            _ => None,
        }
    }

    /// One-line rendering for dumps and diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(s) => format!("{s:?}"),
            Self::Flag(b) => b.to_string(),
            Self::Method(m) => m.signature(),
            Self::Type(t) => t.to_string(),
            Self::MemberOrder(o) => match &o.group {
                Some(g) => format!("{}@{g}", o.sequence),
                None => o.sequence.clone(),
            },
            Self::Nature(n) => n.to_string(),
            Self::Mixin(m) => format!("mixin for {} via {}()", m.holder_type(), m.main_method()),
            Self::Temporal(t) => format!("temporal [{}]", t.config().formats.join(" | ")),
        }
    }
}

// ── Facet ─────────────────────────────────────────────────────────────────────

/// An immutable capability attached to one holder.
///
/// Equality is by value (type, precedence, payload, holder). Use
/// `Arc::ptr_eq` on the shared handle to tell two installations apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    facet_type: FacetType,
    precedence: Precedence,
    payload: FacetPayload,
    holder: Identifier,
}

impl Facet {
    pub fn new(
        facet_type: FacetType,
        precedence: Precedence,
        payload: FacetPayload,
        holder: Identifier,
    ) -> Self {
        Self {
            facet_type,
            precedence,
            payload,
            holder,
        }
    }

    pub fn facet_type(&self) -> FacetType {
        self.facet_type
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn payload(&self) -> &FacetPayload {
        &self.payload
    }

    pub fn holder(&self) -> &Identifier {
        &self.holder
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] = {}",
            self.facet_type,
            self.precedence,
            self.payload.describe()
        )
    }
}
