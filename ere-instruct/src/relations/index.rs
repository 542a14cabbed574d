//! Canonical relation index
//!
//! Maps each source label to its targets per relation kind, targets ordered by
//! rank. Built once per document and read-only afterwards.

use super::normalize::{self, CanonicalPairs};
use crate::config::NormalizationRules;
use crate::document::Document;
use crate::types::{LocalLabel, RelationKind};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Canonical adjacency: source -> relation kind -> ordered targets
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    entries: HashMap<LocalLabel, BTreeMap<RelationKind, Vec<LocalLabel>>>,
}

impl RelationIndex {
    /// Build the index for a document
    ///
    /// Expands cluster-level annotations, adds coreference pairs from the
    /// clusters, then normalizes.
    pub fn build(document: &Document, rules: &NormalizationRules) -> Self {
        let mut relations = normalize::expand_relations(document);
        relations.extend(normalize::coreference_pairs(document));

        let canonical = normalize::normalize(relations, rules);
        let index = Self::from_pairs(&canonical);

        log::debug!(
            "Relation index for {}: {} sources, kinds {:?}",
            document.id,
            index.entries.len(),
            index.kinds().iter().map(|k| k.symbol()).collect::<Vec<_>>()
        );
        index
    }

    /// Index already-normalized pairs
    pub fn from_pairs(canonical: &CanonicalPairs) -> Self {
        let mut entries: HashMap<LocalLabel, BTreeMap<RelationKind, Vec<LocalLabel>>> = HashMap::new();

        for (kind, pairs) in canonical {
            for (source, target) in pairs {
                entries
                    .entry(*source)
                    .or_default()
                    .entry(kind.clone())
                    .or_default()
                    .push(*target);
            }
        }

        // Stable sort on rank alone: e/t labels of equal rank keep set order
        for by_kind in entries.values_mut() {
            for targets in by_kind.values_mut() {
                targets.sort_by_key(|label| label.rank);
            }
        }

        Self { entries }
    }

    /// Targets of `source` under `kind`, ordered by rank
    pub fn targets(&self, source: LocalLabel, kind: &RelationKind) -> &[LocalLabel] {
        self.entries
            .get(&source)
            .and_then(|by_kind| by_kind.get(kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Targets of `source` under `kind` that are tagged in the current window
    pub fn visible_targets(
        &self,
        source: LocalLabel,
        kind: &RelationKind,
        tagged: &HashSet<LocalLabel>,
    ) -> Vec<LocalLabel> {
        self.targets(source, kind)
            .iter()
            .filter(|target| tagged.contains(target))
            .copied()
            .collect()
    }

    pub fn contains(&self, source: LocalLabel, kind: &RelationKind, target: LocalLabel) -> bool {
        self.targets(source, kind).contains(&target)
    }

    /// Every (kind, targets) entry of a source
    pub fn relations_of(&self, source: LocalLabel) -> impl Iterator<Item = (&RelationKind, &[LocalLabel])> + '_ {
        self.entries
            .get(&source)
            .into_iter()
            .flat_map(|by_kind| by_kind.iter().map(|(kind, targets)| (kind, targets.as_slice())))
    }

    /// Sources with at least one entry, in label order
    pub fn sources(&self) -> Vec<LocalLabel> {
        let mut sources: Vec<LocalLabel> = self.entries.keys().copied().collect();
        sources.sort();
        sources
    }

    /// Every relation kind present in the index
    pub fn kinds(&self) -> BTreeSet<RelationKind> {
        self.entries
            .values()
            .flat_map(|by_kind| by_kind.keys().cloned())
            .collect()
    }

    /// Sub-index holding only the given kinds
    pub fn restricted(&self, kinds: &[RelationKind]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter_map(|(source, by_kind)| {
                let kept: BTreeMap<RelationKind, Vec<LocalLabel>> = by_kind
                    .iter()
                    .filter(|(kind, _)| kinds.contains(kind))
                    .map(|(kind, targets)| (kind.clone(), targets.clone()))
                    .collect();
                (!kept.is_empty()).then_some((*source, kept))
            })
            .collect();
        Self { entries }
    }
}
