//! Relation normalization
//!
//! Turns a document's raw annotations into canonical label pairs. This is a
//! pure function of its inputs: the raw relations are only read, and the result
//! is a fresh set-backed map, so duplicates arising from cluster expansion
//! collapse on insertion.

use crate::config::NormalizationRules;
use crate::document::Document;
use crate::types::{LocalLabel, RelationKind};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical relation pairs, keyed by relation kind
pub type CanonicalPairs = BTreeMap<RelationKind, BTreeSet<(LocalLabel, LocalLabel)>>;

/// A relation stated between two labelled mentions
pub type LabelledRelation = (RelationKind, LocalLabel, LocalLabel);

/// Expand a document's raw relations into mention-level label pairs
///
/// Cluster ids expand to every member mention, so one annotation may yield
/// several pairs. An id with no mapping is a lookup fault: the pair is logged
/// and skipped.
pub fn expand_relations(document: &Document) -> Vec<LabelledRelation> {
    let mut expanded = Vec::new();

    for relation in document.relations() {
        let sources = document.expand(&relation.source);
        let targets = document.expand(&relation.target);

        let (Some(sources), Some(targets)) = (sources, targets) else {
            log::warn!(
                "Lookup fault in document {}: {} pair ({}, {}) references an unknown id, skipped",
                document.id,
                relation.kind,
                relation.source,
                relation.target
            );
            continue;
        };

        for source in &sources {
            for target in &targets {
                expanded.push((relation.kind.clone(), *source, *target));
            }
        }
    }

    expanded
}

/// Coreference pairs implied by the document's clusters
///
/// Every ordered pair of distinct mentions inside one cluster.
pub fn coreference_pairs(document: &Document) -> Vec<LabelledRelation> {
    let mut pairs = Vec::new();

    for cluster in document.coreference_clusters() {
        let labels: Vec<LocalLabel> = cluster.iter().filter_map(|id| document.label_of(id)).collect();
        for (i, first) in labels.iter().enumerate() {
            for (j, second) in labels.iter().enumerate() {
                if i != j {
                    pairs.push((RelationKind::Coreference, *first, *second));
                }
            }
        }
    }

    pairs
}

/// Apply the normalization rules to labelled relations
///
/// - an inverse rule rewrites `(a, b)` under `from` into `(b, a)` under `to`,
///   and `from` never appears as a key
/// - a bidirectional kind also receives `(b, a)`
/// - a mirrored kind contributes `(b, a)` to its partner, and keeps `(a, b)`
/// - every other kind passes through unchanged
pub fn normalize<I>(relations: I, rules: &NormalizationRules) -> CanonicalPairs
where
    I: IntoIterator<Item = LabelledRelation>,
{
    let mut canonical = CanonicalPairs::new();

    for (kind, source, target) in relations {
        if let Some(inverse) = rules.inverse_of(&kind) {
            canonical
                .entry(inverse.clone())
                .or_default()
                .insert((target, source));
            continue;
        }

        if rules.is_bidirectional(&kind) {
            canonical
                .entry(kind.clone())
                .or_default()
                .insert((target, source));
        }

        if let Some(mirror) = rules.mirror_of(&kind) {
            canonical
                .entry(mirror.clone())
                .or_default()
                .insert((target, source));
        }

        canonical.entry(kind).or_default().insert((source, target));
    }

    canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MentionRecord, TokenJoin};

    fn e(rank: usize) -> LocalLabel {
        LocalLabel::event(rank)
    }

    fn mention(id: &str, offset: usize) -> MentionRecord {
        MentionRecord {
            id: id.to_string(),
            sent_id: 0,
            offset: (offset, offset + 1),
            text: id.to_string(),
        }
    }

    fn clustered_doc() -> Document {
        let mut doc = Document::new(
            "d",
            vec![vec!["a".into(), "b".into(), "c".into(), "d".into()]],
            TokenJoin::Space,
            vec![mention("a", 0), mention("b", 1), mention("c", 2), mention("d", 3)],
            Vec::new(),
        );
        doc.add_cluster("X", vec!["a".into(), "b".into()], true);
        doc.add_cluster("Y", vec!["c".into()], true);
        doc.add_cluster("Z", vec!["d".into()], true);
        doc
    }

    #[test]
    fn test_expand_cluster_pairs_and_skip_faults() {
        let mut doc = clustered_doc();
        doc.add_relation(RelationKind::Cause, "X", "Y");
        doc.add_relation(RelationKind::Cause, "X", "GHOST");

        let expanded = expand_relations(&doc);
        assert_eq!(
            expanded,
            vec![
                (RelationKind::Cause, e(0), e(2)),
                (RelationKind::Cause, e(1), e(2)),
            ]
        );
    }

    #[test]
    fn test_coreference_pairs_are_permutations() {
        let doc = clustered_doc();
        let pairs = coreference_pairs(&doc);
        assert_eq!(
            pairs,
            vec![
                (RelationKind::Coreference, e(0), e(1)),
                (RelationKind::Coreference, e(1), e(0)),
            ]
        );
    }

    #[test]
    fn test_bidirectional_kinds_get_reverse_pairs() {
        let rules = NormalizationRules::default();
        let canonical = normalize(
            vec![
                (RelationKind::Simultaneous, e(0), e(3)),
                (RelationKind::Cause, e(1), e(2)),
            ],
            &rules,
        );

        let simultaneous = &canonical[&RelationKind::Simultaneous];
        assert!(simultaneous.contains(&(e(0), e(3))));
        assert!(simultaneous.contains(&(e(3), e(0))));
        assert_eq!(canonical[&RelationKind::Cause].len(), 1);
    }

    #[test]
    fn test_after_is_rewritten_to_before() {
        let rules = NormalizationRules::default();
        let canonical = normalize(
            vec![
                (RelationKind::After, e(2), e(1)),
                (RelationKind::Before, e(0), e(1)),
            ],
            &rules,
        );

        assert!(!canonical.contains_key(&RelationKind::After));
        let before = &canonical[&RelationKind::Before];
        assert!(before.contains(&(e(1), e(2))));
        assert!(before.contains(&(e(0), e(1))));
    }

    #[test]
    fn test_mirrored_pairs_keep_both_labels() {
        let rules = NormalizationRules::default();
        let canonical = normalize(
            vec![
                (RelationKind::SuperSub, e(0), e(1)),
                (RelationKind::SubSuper, e(3), e(2)),
            ],
            &rules,
        );

        let super_sub = &canonical[&RelationKind::SuperSub];
        let sub_super = &canonical[&RelationKind::SubSuper];
        assert!(super_sub.contains(&(e(0), e(1))));
        assert!(super_sub.contains(&(e(2), e(3))));
        assert!(sub_super.contains(&(e(1), e(0))));
        assert!(sub_super.contains(&(e(3), e(2))));
    }

    #[test]
    fn test_duplicates_and_unknown_kinds() {
        let other = RelationKind::from("INCLUDES");
        let canonical = normalize(
            vec![
                (other.clone(), e(0), e(1)),
                (other.clone(), e(0), e(1)),
            ],
            &NormalizationRules::default(),
        );
        assert_eq!(canonical[&other].len(), 1);
    }
}
