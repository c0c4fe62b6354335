//! Layout overrides: externally supplied facets installed at
//! [`Precedence::Layout`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Facet, FacetHolder, FacetPayload, FacetType, HasFacets, MemberOrder, ObjectSpecification,
    Precedence,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub named: Option<String>,
    #[serde(default)]
    pub described_as: Option<String>,
    #[serde(default)]
    pub members: BTreeMap<String, MemberLayout>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLayout {
    #[serde(default)]
    pub named: Option<String>,
    #[serde(default)]
    pub described_as: Option<String>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

/// What [`install`] or [`reinstall`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub facets_installed: usize,
    /// Layout facets dropped because the new layout no longer declares them.
    pub facets_removed: usize,
    /// Member ids named by the layout that the specification does not have.
    pub unknown_members: Vec<String>,
}

/// Install `layout` onto `spec` and its members.
///
/// Reinstalling the same layout replaces each facet at `Layout` precedence
/// instead of adding another entry.
pub fn install(spec: &ObjectSpecification, layout: &Layout) -> LayoutOutcome {
    install_tracked(spec, layout).0
}

/// Install `layout` as the only layout of `spec`: afterwards every facet at
/// `Layout` precedence comes from `layout`. Overrides the previous layout
/// declared but this one does not are removed.
pub fn reinstall(spec: &ObjectSpecification, layout: &Layout) -> LayoutOutcome {
    let (mut outcome, written) = install_tracked(spec, layout);
    outcome.facets_removed += spec
        .facet_holder()
        .retain_at(Precedence::Layout, &written.spec);
    for (id, holder) in spec.members() {
        let keep = written.members.get(id).map(Vec::as_slice).unwrap_or_default();
        outcome.facets_removed += holder.retain_at(Precedence::Layout, keep);
    }
    outcome
}

/// Facet types written per holder by one install.
#[derive(Default)]
struct Written {
    spec: Vec<FacetType>,
    members: BTreeMap<String, Vec<FacetType>>,
}

fn install_tracked(spec: &ObjectSpecification, layout: &Layout) -> (LayoutOutcome, Written) {
    let mut outcome = LayoutOutcome::default();
    let mut written = Written::default();
    let holder = spec.facet_holder();
    install_text(holder, FacetType::NAMED, layout.named.as_deref(), &mut written.spec);
    install_text(
        holder,
        FacetType::DESCRIBED_AS,
        layout.described_as.as_deref(),
        &mut written.spec,
    );

    for (id, member) in &layout.members {
        let Some(holder) = spec.member(id) else {
            outcome.unknown_members.push(id.clone());
            continue;
        };
        let types = written.members.entry(id.clone()).or_default();
        install_member(holder, member, types);
    }
    outcome.facets_installed =
        written.spec.len() + written.members.values().map(Vec::len).sum::<usize>();
    (outcome, written)
}

fn install_member(holder: &FacetHolder, member: &MemberLayout, written: &mut Vec<FacetType>) {
    install_text(holder, FacetType::NAMED, member.named.as_deref(), written);
    install_text(holder, FacetType::DESCRIBED_AS, member.described_as.as_deref(), written);
    if let Some(hidden) = member.hidden {
        put(holder, FacetType::HIDDEN, FacetPayload::Flag(hidden), written);
    }
    if let Some(sequence) = &member.sequence {
        put(
            holder,
            FacetType::MEMBER_ORDER,
            FacetPayload::MemberOrder(MemberOrder {
                sequence: sequence.clone(),
                group: member.group.clone(),
            }),
            written,
        );
    }
}

fn install_text(
    holder: &FacetHolder,
    facet_type: FacetType,
    text: Option<&str>,
    written: &mut Vec<FacetType>,
) {
    if let Some(text) = text {
        put(holder, facet_type, FacetPayload::Text(text.to_owned()), written);
    }
}

fn put(holder: &FacetHolder, facet_type: FacetType, payload: FacetPayload, written: &mut Vec<FacetType>) {
    holder.add_facet(Facet::new(
        facet_type,
        Precedence::Layout,
        payload,
        holder.identifier().clone(),
    ));
    written.push(facet_type);
}
