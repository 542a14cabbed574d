//! Core types for the instruction-example builder
//!
//! This module defines the fundamental values that flow through windowing,
//! relation normalization and reasoning-path extraction: local labels, relation
//! kinds, graph triples and the generated examples themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for builder operations
pub type Result<T> = std::result::Result<T, InstructError>;

/// Errors that can occur while loading corpora, building examples or evaluating
#[derive(Debug, thiserror::Error)]
pub enum InstructError {
    #[error("Failed to parse corpus document: {0}")]
    CorpusParseError(String),

    #[error("Invalid local label: {0}")]
    InvalidLabel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Prediction stream does not align with window counts: {0}")]
    AlignmentError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Kind of mention a local label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelKind {
    /// Event trigger (`e` prefix)
    Event,
    /// Time expression (`t` prefix)
    Timex,
}

/// Short-form label derived from a mention's rank in document order
///
/// Events and time expressions are numbered separately: `e0, e1, ...` and
/// `t0, t1, ...`, both sorted by (sentence index, start offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalLabel {
    pub kind: LabelKind,
    pub rank: usize,
}

impl LocalLabel {
    pub fn event(rank: usize) -> Self {
        Self { kind: LabelKind::Event, rank }
    }

    pub fn timex(rank: usize) -> Self {
        Self { kind: LabelKind::Timex, rank }
    }

    pub fn is_event(&self) -> bool {
        self.kind == LabelKind::Event
    }
}

impl fmt::Display for LocalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LabelKind::Event => write!(f, "e{}", self.rank),
            LabelKind::Timex => write!(f, "t{}", self.rank),
        }
    }
}

impl FromStr for LocalLabel {
    type Err = InstructError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.chars().next() {
            Some('e') => LabelKind::Event,
            Some('t') => LabelKind::Timex,
            _ => return Err(InstructError::InvalidLabel(s.to_string())),
        };
        let rank = s[1..]
            .parse::<usize>()
            .map_err(|_| InstructError::InvalidLabel(s.to_string()))?;
        Ok(Self { kind, rank })
    }
}

/// Relation-type symbol as it appears in the source corpora
///
/// Unknown symbols are carried through as `Other` so that corpora with extra
/// relation types still load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    Cause,
    Precondition,
    Before,
    After,
    Equal,
    Vague,
    Simultaneous,
    Contains,
    Overlap,
    BeginsOn,
    EndsOn,
    Subevent,
    SuperSub,
    SubSuper,
    /// HiEve-style coreference symbol (`Coref`)
    Coref,
    /// Cluster-derived coreference (`COREFERENCE`)
    Coreference,
    Other(String),
}

impl RelationKind {
    /// Corpus symbol for this relation kind
    pub fn symbol(&self) -> &str {
        match self {
            RelationKind::Cause => "CAUSE",
            RelationKind::Precondition => "PRECONDITION",
            RelationKind::Before => "BEFORE",
            RelationKind::After => "AFTER",
            RelationKind::Equal => "EQUAL",
            RelationKind::Vague => "VAGUE",
            RelationKind::Simultaneous => "SIMULTANEOUS",
            RelationKind::Contains => "CONTAINS",
            RelationKind::Overlap => "OVERLAP",
            RelationKind::BeginsOn => "BEGINS-ON",
            RelationKind::EndsOn => "ENDS-ON",
            RelationKind::Subevent => "SUBEVENT",
            RelationKind::SuperSub => "SuperSub",
            RelationKind::SubSuper => "SubSuper",
            RelationKind::Coref => "Coref",
            RelationKind::Coreference => "COREFERENCE",
            RelationKind::Other(symbol) => symbol,
        }
    }

    /// True for either coreference symbol
    pub fn is_coreference(&self) -> bool {
        matches!(self, RelationKind::Coref | RelationKind::Coreference)
    }
}

impl From<&str> for RelationKind {
    fn from(symbol: &str) -> Self {
        match symbol {
            "CAUSE" => RelationKind::Cause,
            "PRECONDITION" => RelationKind::Precondition,
            "BEFORE" => RelationKind::Before,
            "AFTER" => RelationKind::After,
            "EQUAL" => RelationKind::Equal,
            "VAGUE" => RelationKind::Vague,
            "SIMULTANEOUS" => RelationKind::Simultaneous,
            "CONTAINS" => RelationKind::Contains,
            "OVERLAP" => RelationKind::Overlap,
            "BEGINS-ON" => RelationKind::BeginsOn,
            "ENDS-ON" => RelationKind::EndsOn,
            "SUBEVENT" => RelationKind::Subevent,
            "SuperSub" => RelationKind::SuperSub,
            "SubSuper" => RelationKind::SubSuper,
            "Coref" => RelationKind::Coref,
            "COREFERENCE" | "coreference" => RelationKind::Coreference,
            other => RelationKind::Other(other.to_string()),
        }
    }
}

impl From<String> for RelationKind {
    fn from(symbol: String) -> Self {
        RelationKind::from(symbol.as_str())
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        kind.symbol().to_string()
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A labeled edge of a local reasoning graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub head: LocalLabel,
    pub tail: LocalLabel,
    pub relation: RelationKind,
}

impl Triple {
    pub fn new(head: LocalLabel, tail: LocalLabel, relation: RelationKind) -> Self {
        Self { head, tail, relation }
    }
}

/// One generated training/evaluation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Task description
    pub instruction: String,
    /// Rendered window text followed by the question about the focal event
    pub input: String,
    /// Relation label lines (plus coreference/reasoning lines for causal)
    pub output: String,
}
