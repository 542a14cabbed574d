//! Causal reasoning chains
//!
//! Builds a window-scoped causal graph around the focal event, keeps the
//! multi-hop paths whose composed label agrees with the direct annotation, and
//! renders them as text.

pub mod graph;
pub mod paths;
pub mod render;

// Re-export key types for convenience
pub use graph::{ReasoningGraphBuilder, CAUSAL_KINDS};
pub use paths::{compose, compose_path, PathConsistencyFilter, ReasoningPath};
pub use render::{PathRenderer, NONE_TEXT};
