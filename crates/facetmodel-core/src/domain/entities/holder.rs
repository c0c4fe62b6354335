//! Facet holders: every metamodel element that can carry facets.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{
    entities::{
        facet::{Facet, FacetType},
        ranking::FacetRanking,
    },
    value_objects::{FeatureType, Identifier, Precedence},
};

/// Owns one [`FacetRanking`] per facet type, created on first use.
///
/// Holders are filled during the single bootstrap pass and read afterwards.
/// Layout reloads may still add facets later; rankings handle that without
/// exposing partial state.
#[derive(Debug)]
pub struct FacetHolder {
    identifier: Identifier,
    feature_type: FeatureType,
    rankings: RwLock<BTreeMap<FacetType, Arc<FacetRanking>>>,
}

impl FacetHolder {
    pub fn new(identifier: Identifier, feature_type: FeatureType) -> Self {
        Self {
            identifier,
            feature_type,
            rankings: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    /// Add a facet to the ranking for its type. Returns `true` if it became
    /// (or replaced) the winner.
    pub fn add_facet(&self, facet: Facet) -> bool {
        self.add_shared_facet(Arc::new(facet))
    }

    pub fn add_shared_facet(&self, facet: Arc<Facet>) -> bool {
        self.ranking_or_create(facet.facet_type()).add(facet)
    }

    /// Remove the `precedence` entry of every ranking except those in `keep`.
    /// Returns how many facets were dropped.
    pub fn retain_at(&self, precedence: Precedence, keep: &[FacetType]) -> usize {
        self.facet_types()
            .into_iter()
            .filter(|facet_type| !keep.contains(facet_type))
            .filter_map(|facet_type| self.ranking(facet_type))
            .filter(|ranking| ranking.remove_at(precedence).is_some())
            .count()
    }

    /// The winning facet of `facet_type`, if any was added.
    pub fn get_facet(&self, facet_type: FacetType) -> Option<Arc<Facet>> {
        self.ranking(facet_type).and_then(|r| r.winner())
    }

    pub fn contains_facet(&self, facet_type: FacetType) -> bool {
        self.get_facet(facet_type).is_some()
    }

    pub fn ranking(&self, facet_type: FacetType) -> Option<Arc<FacetRanking>> {
        self.rankings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&facet_type)
            .cloned()
    }

    /// Facets of `facet_type` ranked at or below `precedence`.
    pub fn facets_at_or_below(&self, facet_type: FacetType, precedence: Precedence) -> Vec<Arc<Facet>> {
        self.ranking(facet_type)
            .map(|r| r.at_precedence_or_below(precedence))
            .unwrap_or_default()
    }

    pub fn facet_types(&self) -> Vec<FacetType> {
        self.rankings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// The winner of every ranking, ordered by facet type.
    pub fn facets(&self) -> Vec<Arc<Facet>> {
        self.rankings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter_map(|r| r.winner())
            .collect()
    }

    pub fn facet_count(&self) -> usize {
        self.facets().len()
    }

    fn ranking_or_create(&self, facet_type: FacetType) -> Arc<FacetRanking> {
        if let Some(existing) = self.ranking(facet_type) {
            return existing;
        }
        let mut rankings = self.rankings.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            rankings
                .entry(facet_type)
                .or_insert_with(|| Arc::new(FacetRanking::new(facet_type))),
        )
    }
}

/// Uniform facet access for specifications, members and parameters.
pub trait HasFacets {
    fn facet_holder(&self) -> &FacetHolder;

    fn get_facet(&self, facet_type: FacetType) -> Option<Arc<Facet>> {
        self.facet_holder().get_facet(facet_type)
    }

    fn contains_facet(&self, facet_type: FacetType) -> bool {
        self.facet_holder().contains_facet(facet_type)
    }

    fn identifier(&self) -> &Identifier {
        self.facet_holder().identifier()
    }

    /// Winning `NAMED` facet text, if any.
    fn friendly_name(&self) -> Option<String> {
        self.get_facet(FacetType::NAMED)
            .and_then(|f| f.payload().as_text().map(str::to_owned))
    }

    /// Whether a winning `HIDDEN` facet says so. Supporting-method facets
    /// only say "it depends", so they count as not statically hidden.
    fn is_always_hidden(&self) -> bool {
        self.get_facet(FacetType::HIDDEN)
            .and_then(|f| f.payload().as_flag())
            .unwrap_or(false)
    }
}

impl HasFacets for FacetHolder {
    fn facet_holder(&self) -> &FacetHolder {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::facet::FacetPayload;
    use crate::domain::value_objects::TypeName;

    fn holder() -> FacetHolder {
        FacetHolder::new(
            Identifier::for_type(TypeName::new("Customer")),
            FeatureType::Object,
        )
    }

    fn facet(facet_type: FacetType, precedence: Precedence, payload: FacetPayload) -> Facet {
        Facet::new(
            facet_type,
            precedence,
            payload,
            Identifier::for_type(TypeName::new("Customer")),
        )
    }

    #[test]
    fn retain_at_drops_only_unlisted_types() {
        let h = holder();
        h.add_facet(facet(FacetType::NAMED, Precedence::Inferred, FacetPayload::Text("Customer".into())));
        h.add_facet(facet(FacetType::NAMED, Precedence::Layout, FacetPayload::Text("Client".into())));
        h.add_facet(facet(FacetType::HIDDEN, Precedence::Layout, FacetPayload::Flag(true)));
        h.add_facet(facet(
            FacetType::DESCRIBED_AS,
            Precedence::Layout,
            FacetPayload::Text("A buyer".into()),
        ));

        assert_eq!(h.retain_at(Precedence::Layout, &[FacetType::DESCRIBED_AS]), 2);
        assert_eq!(h.friendly_name().as_deref(), Some("Customer"));
        assert!(!h.contains_facet(FacetType::HIDDEN));
        assert!(h.contains_facet(FacetType::DESCRIBED_AS));
    }

    #[test]
    fn ranking_created_lazily_once_per_type() {
        let h = holder();
        assert!(h.ranking(FacetType::NAMED).is_none());

        h.add_facet(facet(
            FacetType::NAMED,
            Precedence::Inferred,
            FacetPayload::Text("Customer".into()),
        ));
        h.add_facet(facet(
            FacetType::NAMED,
            Precedence::Annotation,
            FacetPayload::Text("Client".into()),
        ));
        h.add_facet(facet(
            FacetType::HIDDEN,
            Precedence::Annotation,
            FacetPayload::Flag(true),
        ));

        assert_eq!(h.facet_types(), vec![FacetType::HIDDEN, FacetType::NAMED]);
        assert_eq!(h.ranking(FacetType::NAMED).unwrap().len(), 2);
        assert_eq!(h.friendly_name().as_deref(), Some("Client"));
        assert!(h.is_always_hidden());
        assert_eq!(h.facet_count(), 2);
    }

    #[test]
    fn missing_facet_is_absent_not_error() {
        let h = holder();
        assert!(h.get_facet(FacetType::MIXIN).is_none());
        assert!(!h.contains_facet(FacetType::MIXIN));
        assert!(h
            .facets_at_or_below(FacetType::MIXIN, Precedence::HardOverride)
            .is_empty());
    }
}
