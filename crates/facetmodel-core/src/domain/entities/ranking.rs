//! Precedence-ordered competition between facets of one type on one holder.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::domain::{
    entities::facet::{Facet, FacetType},
    value_objects::Precedence,
};

/// The competing facets of one [`FacetType`] on one holder.
///
/// Entries are ordered by ascending precedence with at most one entry per
/// precedence: adding at an occupied precedence supersedes the previous entry
/// instead of growing the list. This is what keeps repeated layout reloads
/// from accumulating stale duplicates.
///
/// The entry list is published as an immutable snapshot. Readers load the
/// current snapshot without locking and always see either the list before an
/// `add` or the list after it.
#[derive(Debug)]
pub struct FacetRanking {
    facet_type: FacetType,
    entries: ArcSwap<Vec<Arc<Facet>>>,
}

impl FacetRanking {
    pub fn new(facet_type: FacetType) -> Self {
        Self {
            facet_type,
            entries: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn facet_type(&self) -> FacetType {
        self.facet_type
    }

    /// Insert `facet`, superseding any entry at the same precedence.
    ///
    /// Returns `true` if the winner changed as a result.
    pub fn add(&self, facet: Arc<Facet>) -> bool {
        debug_assert_eq!(facet.facet_type(), self.facet_type);
        let precedence = facet.precedence();
        let previous = self.entries.rcu(|current| {
            let mut next: Vec<Arc<Facet>> = current
                .iter()
                .filter(|f| f.precedence() != precedence)
                .cloned()
                .collect();
            let position = next.partition_point(|f| f.precedence() < precedence);
            next.insert(position, Arc::clone(&facet));
            next
        });
        previous
            .last()
            .is_none_or(|old| old.precedence() <= precedence)
    }

    /// Drop the entry at exactly `precedence`. Returns the removed facet.
    pub fn remove_at(&self, precedence: Precedence) -> Option<Arc<Facet>> {
        let previous = self.entries.rcu(|current| {
            current
                .iter()
                .filter(|f| f.precedence() != precedence)
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().find(|f| f.precedence() == precedence).cloned()
    }

    /// The governing facet: the highest-precedence entry. `None` when empty.
    pub fn winner(&self) -> Option<Arc<Facet>> {
        self.entries.load().last().cloned()
    }

    /// The entry installed at exactly `precedence`, if any.
    pub fn at_precedence(&self, precedence: Precedence) -> Option<Arc<Facet>> {
        self.entries
            .load()
            .iter()
            .find(|f| f.precedence() == precedence)
            .cloned()
    }

    /// Entries at or below `precedence`, lowest first.
    pub fn at_precedence_or_below(&self, precedence: Precedence) -> Vec<Arc<Facet>> {
        self.entries
            .load()
            .iter()
            .take_while(|f| f.precedence() <= precedence)
            .cloned()
            .collect()
    }

    /// All entries, lowest precedence first.
    pub fn entries(&self) -> Vec<Arc<Facet>> {
        self.entries.load().as_ref().clone()
    }

    pub fn top_precedence(&self) -> Option<Precedence> {
        self.entries.load().last().map(|f| f.precedence())
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}
