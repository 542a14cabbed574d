//! Relation normalization and the canonical relation index
//!
//! Raw corpus annotations are expanded to mention labels, normalized by the
//! configured rules, and indexed by source label.

pub mod index;
pub mod normalize;

// Re-export key types for convenience
pub use index::RelationIndex;
pub use normalize::{normalize, CanonicalPairs, LabelledRelation};
