//! Multi-hop path enumeration and consistency filtering
//!
//! For every one-hop target of the focal node, all simple paths to that target
//! are enumerated. A path survives only if it has at least two edges and the
//! left-to-right composition of its edge kinds equals the kind of the direct
//! edge between its endpoints. One survivor per target is kept, chosen with the
//! caller's random source.
//!
//! Composition law:
//!
//! | first        | second       | composed     |
//! |--------------|--------------|--------------|
//! | CAUSE        | CAUSE        | CAUSE        |
//! | CAUSE        | PRECONDITION | PRECONDITION |
//! | PRECONDITION | CAUSE        | PRECONDITION |
//! | PRECONDITION | PRECONDITION | PRECONDITION |
//!
//! Any other combination has no composed kind and rejects the path.

use crate::types::{LocalLabel, RelationKind, Triple};
use petgraph::algo::all_simple_paths;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use rand::seq::SliceRandom;
use rand::Rng;

/// A validated chain of edges from the focal node to one of its targets
pub type ReasoningPath = Vec<Triple>;

/// Compose two consecutive edge kinds
pub fn compose(first: &RelationKind, second: &RelationKind) -> Option<RelationKind> {
    match (first, second) {
        (RelationKind::Cause, RelationKind::Cause) => Some(RelationKind::Cause),
        (RelationKind::Cause, RelationKind::Precondition)
        | (RelationKind::Precondition, RelationKind::Cause)
        | (RelationKind::Precondition, RelationKind::Precondition) => Some(RelationKind::Precondition),
        _ => None,
    }
}

/// Fold a sequence of edge kinds left to right
///
/// Once a step has no composed kind the whole sequence has none.
pub fn compose_path(kinds: &[RelationKind]) -> Option<RelationKind> {
    let (first, rest) = kinds.split_first()?;
    rest.iter()
        .try_fold(first.clone(), |composed, next| compose(&composed, next))
}

/// Keeps logically consistent multi-hop paths
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConsistencyFilter {
    max_hops: Option<usize>,
}

impl PathConsistencyFilter {
    /// Create a filter; `max_hops` caps the number of edges per enumerated path
    pub fn new(max_hops: Option<usize>) -> Self {
        Self { max_hops }
    }

    /// Select at most one consistent path per one-hop target of `focal`
    ///
    /// Edges are added in triple order; a later triple for the same node pair
    /// replaces the earlier edge kind.
    pub fn select<R>(&self, triples: &[Triple], focal: LocalLabel, rng: &mut R) -> Vec<ReasoningPath>
    where
        R: Rng + ?Sized,
    {
        let mut graph: DiGraphMap<LocalLabel, RelationKind> = DiGraphMap::new();
        for triple in triples {
            graph.add_edge(triple.head, triple.tail, triple.relation.clone());
        }

        if graph.edge_count() == 0 || !graph.contains_node(focal) {
            return Vec::new();
        }

        let one_hop: Vec<LocalLabel> = graph
            .neighbors_directed(focal, Direction::Outgoing)
            .filter(|target| *target != focal)
            .collect();

        let max_intermediate = self.max_hops.map(|hops| hops.saturating_sub(1));
        let mut selected = Vec::new();

        for target in one_hop {
            let candidates: Vec<Vec<LocalLabel>> =
                all_simple_paths::<Vec<LocalLabel>, _>(&graph, focal, target, 0, max_intermediate).collect();

            let consistent: Vec<Vec<LocalLabel>> = candidates
                .into_iter()
                .filter(|nodes| Self::is_consistent(&graph, nodes))
                .collect();

            log::trace!(
                "Target {} of {}: {} consistent paths",
                target,
                focal,
                consistent.len()
            );

            if let Some(nodes) = consistent.choose(rng) {
                selected.push(Self::to_triples(&graph, nodes));
            }
        }

        selected
    }

    /// A node path is consistent when it has two or more edges and its
    /// composed kind matches the direct edge between its endpoints
    fn is_consistent(graph: &DiGraphMap<LocalLabel, RelationKind>, nodes: &[LocalLabel]) -> bool {
        if nodes.len() <= 2 {
            return false;
        }

        let kinds: Vec<RelationKind> = nodes
            .windows(2)
            .filter_map(|pair| graph.edge_weight(pair[0], pair[1]).cloned())
            .collect();

        let (first, last) = (nodes[0], nodes[nodes.len() - 1]);
        match (compose_path(&kinds), graph.edge_weight(first, last)) {
            (Some(composed), Some(direct)) => composed == *direct,
            _ => false,
        }
    }

    fn to_triples(graph: &DiGraphMap<LocalLabel, RelationKind>, nodes: &[LocalLabel]) -> ReasoningPath {
        nodes
            .windows(2)
            .filter_map(|pair| {
                graph
                    .edge_weight(pair[0], pair[1])
                    .map(|kind| Triple::new(pair[0], pair[1], kind.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn e(rank: usize) -> LocalLabel {
        LocalLabel::event(rank)
    }

    fn t(head: usize, tail: usize, kind: RelationKind) -> Triple {
        Triple::new(e(head), e(tail), kind)
    }

    #[test]
    fn test_composition_table() {
        use RelationKind::{Cause, Precondition};
        assert_eq!(compose(&Cause, &Cause), Some(Cause));
        assert_eq!(compose(&Cause, &Precondition), Some(Precondition));
        assert_eq!(compose(&Precondition, &Cause), Some(Precondition));
        assert_eq!(compose(&Precondition, &Precondition), Some(Precondition));
        assert_eq!(compose(&Cause, &RelationKind::Before), None);
        assert_eq!(compose(&RelationKind::Coreference, &Cause), None);
    }

    #[test]
    fn test_compose_path_short_circuits() {
        use RelationKind::{Before, Cause, Precondition};
        assert_eq!(compose_path(&[Cause, Cause, Cause]), Some(Cause));
        assert_eq!(compose_path(&[Cause, Precondition, Cause]), Some(Precondition));
        assert_eq!(compose_path(&[Before, Cause, Cause]), None);
        assert_eq!(compose_path(&[]), None);
    }

    #[test]
    fn test_consistent_cause_chain_is_kept() {
        let triples = vec![
            t(0, 1, RelationKind::Cause),
            t(0, 2, RelationKind::Cause),
            t(1, 2, RelationKind::Cause),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let paths = PathConsistencyFilter::default().select(&triples, e(0), &mut rng);

        assert_eq!(
            paths,
            vec![vec![t(0, 1, RelationKind::Cause), t(1, 2, RelationKind::Cause)]]
        );
    }

    #[test]
    fn test_contradicting_direct_edge_rejects_path() {
        let triples = vec![
            t(0, 1, RelationKind::Cause),
            t(0, 2, RelationKind::Precondition),
            t(1, 2, RelationKind::Cause),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(PathConsistencyFilter::default()
            .select(&triples, e(0), &mut rng)
            .is_empty());
    }

    #[test]
    fn test_precondition_absorbs_cause() {
        let triples = vec![
            t(0, 1, RelationKind::Cause),
            t(0, 3, RelationKind::Precondition),
            t(1, 2, RelationKind::Precondition),
            t(2, 3, RelationKind::Cause),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let paths = PathConsistencyFilter::default().select(&triples, e(0), &mut rng);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 3);
        assert_eq!(paths[0].last().unwrap().tail, e(3));
    }

    #[test]
    fn test_one_survivor_per_target_and_soundness() {
        // Two consistent routes 0->1->3 and 0->2->3 for target 3
        let triples = vec![
            t(0, 1, RelationKind::Cause),
            t(0, 2, RelationKind::Cause),
            t(0, 3, RelationKind::Cause),
            t(1, 3, RelationKind::Cause),
            t(2, 3, RelationKind::Cause),
        ];
        let filter = PathConsistencyFilter::default();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let paths = filter.select(&triples, e(0), &mut rng);
            assert_eq!(paths.len(), 1);

            let path = &paths[0];
            assert!(path.len() >= 2);
            let kinds: Vec<_> = path.iter().map(|t| t.relation.clone()).collect();
            assert_eq!(compose_path(&kinds), Some(RelationKind::Cause));
            assert_eq!(path[0].head, e(0));
            assert_eq!(path.last().unwrap().tail, e(3));
        }

        let pick = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            filter.select(&triples, e(0), &mut rng)
        };
        assert_eq!(pick(7), pick(7));
    }

    #[test]
    fn test_hop_cap_limits_enumeration() {
        let triples = vec![
            t(0, 1, RelationKind::Cause),
            t(1, 2, RelationKind::Cause),
            t(2, 3, RelationKind::Cause),
            t(0, 3, RelationKind::Cause),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            PathConsistencyFilter::new(None).select(&triples, e(0), &mut rng).len(),
            1
        );
        assert!(PathConsistencyFilter::new(Some(2))
            .select(&triples, e(0), &mut rng)
            .is_empty());
    }

    #[test]
    fn test_empty_graph_yields_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(PathConsistencyFilter::default().select(&[], e(0), &mut rng).is_empty());
    }
}
