//! Builder configuration types
//!
//! This module defines the configuration needed by the example builder: window
//! capacity, the seed for every random choice, an optional hop cap for path
//! enumeration, and the relation normalization rules.

use crate::types::{InstructError, RelationKind, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the example builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Maximum number of non-focal events per window (default: 30)
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// Seed for window shuffles, path tie-breaks and negative sampling
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Optional cap on the number of edges in an enumerated reasoning path
    #[serde(default)]
    pub max_path_hops: Option<usize>,

    /// Rules applied when normalizing raw relation annotations
    #[serde(default)]
    pub normalization: NormalizationRules,
}

fn default_window_capacity() -> usize {
    30
}

fn default_seed() -> u64 {
    42
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            window_capacity: default_window_capacity(),
            seed: default_seed(),
            max_path_hops: None,
            normalization: NormalizationRules::default(),
        }
    }
}

impl BuilderConfig {
    /// Create a new builder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the window capacity
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }

    /// Builder method: set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method: cap reasoning paths at `hops` edges
    pub fn with_max_path_hops(mut self, hops: usize) -> Self {
        self.max_path_hops = Some(hops);
        self
    }

    /// Builder method: replace the normalization rules
    pub fn with_normalization(mut self, rules: NormalizationRules) -> Self {
        self.normalization = rules;
        self
    }

    /// Check that the configuration can drive a build
    pub fn validate(&self) -> Result<()> {
        if self.window_capacity == 0 {
            return Err(InstructError::InvalidConfig(
                "window_capacity must be at least 1".to_string(),
            ));
        }
        if let Some(hops) = self.max_path_hops {
            // A reasoning path needs at least two edges
            if hops < 2 {
                return Err(InstructError::InvalidConfig(format!(
                    "max_path_hops must be at least 2, got {}",
                    hops
                )));
            }
        }
        Ok(())
    }
}

/// Rewrite of one directional relation into its canonical inverse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InverseRule {
    /// Symbol dropped from the canonical index
    pub from: RelationKind,
    /// Symbol that receives the reversed pairs
    pub to: RelationKind,
}

/// Pair of relation kinds that mirror each other, both kept queryable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorPair {
    pub forward: RelationKind,
    pub backward: RelationKind,
}

/// Normalization rules for raw relation annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRules {
    /// Relation kinds whose reverse pair is always materialized
    #[serde(default = "default_bidirectional")]
    pub bidirectional: Vec<RelationKind>,

    /// Directional kinds rewritten into their canonical inverse
    #[serde(default = "default_inverses")]
    pub inverses: Vec<InverseRule>,

    /// Hierarchical kinds that feed each other's reverse pairs
    #[serde(default = "default_mirrored")]
    pub mirrored: Vec<MirrorPair>,
}

fn default_bidirectional() -> Vec<RelationKind> {
    vec![
        RelationKind::Coreference,
        RelationKind::Coref,
        RelationKind::Simultaneous,
        RelationKind::BeginsOn,
        RelationKind::Equal,
        RelationKind::Vague,
    ]
}

fn default_inverses() -> Vec<InverseRule> {
    vec![InverseRule {
        from: RelationKind::After,
        to: RelationKind::Before,
    }]
}

fn default_mirrored() -> Vec<MirrorPair> {
    vec![MirrorPair {
        forward: RelationKind::SuperSub,
        backward: RelationKind::SubSuper,
    }]
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self {
            bidirectional: default_bidirectional(),
            inverses: default_inverses(),
            mirrored: default_mirrored(),
        }
    }
}

impl NormalizationRules {
    /// Rules that leave every annotation as-is
    pub fn none() -> Self {
        Self {
            bidirectional: Vec::new(),
            inverses: Vec::new(),
            mirrored: Vec::new(),
        }
    }

    pub fn is_bidirectional(&self, kind: &RelationKind) -> bool {
        self.bidirectional.contains(kind)
    }

    /// Canonical target kind if `kind` must be rewritten
    pub fn inverse_of(&self, kind: &RelationKind) -> Option<&RelationKind> {
        self.inverses.iter().find(|rule| &rule.from == kind).map(|rule| &rule.to)
    }

    /// Kind that receives the reversed pairs of `kind`, if mirrored
    pub fn mirror_of(&self, kind: &RelationKind) -> Option<&RelationKind> {
        self.mirrored.iter().find_map(|pair| {
            if &pair.forward == kind {
                Some(&pair.backward)
            } else if &pair.backward == kind {
                Some(&pair.forward)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_config_builder() {
        let config = BuilderConfig::new()
            .with_window_capacity(10)
            .with_seed(7)
            .with_max_path_hops(4);

        assert_eq!(config.window_capacity, 10);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_path_hops, Some(4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_degenerate_values() {
        assert!(BuilderConfig::new().with_window_capacity(0).validate().is_err());
        assert!(BuilderConfig::new().with_max_path_hops(1).validate().is_err());
    }

    #[test]
    fn test_serde_defaults_match_default() {
        let config: BuilderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BuilderConfig::default());
        assert_eq!(config.window_capacity, 30);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_rule_lookups() {
        let rules = NormalizationRules::default();
        assert!(rules.is_bidirectional(&RelationKind::Coreference));
        assert!(!rules.is_bidirectional(&RelationKind::Cause));
        assert_eq!(rules.inverse_of(&RelationKind::After), Some(&RelationKind::Before));
        assert_eq!(rules.inverse_of(&RelationKind::Before), None);
        assert_eq!(rules.mirror_of(&RelationKind::SubSuper), Some(&RelationKind::SuperSub));
        assert_eq!(rules.mirror_of(&RelationKind::SuperSub), Some(&RelationKind::SubSuper));
    }
}
