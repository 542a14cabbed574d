//! Local reasoning graph construction
//!
//! Breadth-first expansion from the focal event over CAUSE and PRECONDITION
//! edges. Only targets tagged in the current window are followed, so the graph
//! never leaves what a reader of the window can see.

use crate::relations::RelationIndex;
use crate::types::{LocalLabel, RelationKind, Triple};
use std::collections::{HashSet, VecDeque};

/// Relation kinds that form reasoning-graph edges, in expansion order
pub const CAUSAL_KINDS: [RelationKind; 2] = [RelationKind::Cause, RelationKind::Precondition];

/// Builds the edge list of a window's local causal graph
pub struct ReasoningGraphBuilder;

impl ReasoningGraphBuilder {
    /// Collect every causal edge reachable from `focal` inside the window
    ///
    /// # Arguments
    /// * `focal` - Label of the focal event
    /// * `index` - Canonical relation index of the document
    /// * `tagged` - Labels visible in the window
    ///
    /// # Returns
    /// * The (head, tail, relation) triples in discovery order. Each reached
    ///   node is expanded once.
    pub fn build(focal: LocalLabel, index: &RelationIndex, tagged: &HashSet<LocalLabel>) -> Vec<Triple> {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        let mut triples = Vec::new();

        queue.push_back(focal);
        visited.insert(focal);

        while let Some(head) = queue.pop_front() {
            for kind in &CAUSAL_KINDS {
                for tail in index.visible_targets(head, kind, tagged) {
                    log::trace!("Reasoning edge {} -[{}]-> {}", head, kind, tail);
                    triples.push(Triple::new(head, tail, kind.clone()));
                    if visited.insert(tail) {
                        queue.push_back(tail);
                    }
                }
            }
        }

        triples
    }
}
