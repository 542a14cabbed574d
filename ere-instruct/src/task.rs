//! Task definitions
//!
//! A task fixes the instruction text, the question asked about the focal event,
//! the relation labels listed in the output, which events become focal, and how
//! a training split is sampled.

use crate::types::RelationKind;
use serde::{Deserialize, Serialize};

const INSTRUCTION_CAUSAL: &str = "The current task is an event causal relation extraction task, which aims to \
identify causal relations among events in texts. The causal relation between events denotes that the occurrence \
of the first event precipitates the happening of the second event, delineated into two subtypes: CAUSE and \
PRECONDITION. In the provided document, event trigger words are annotated within angle brackets (<>). The desired \
outcome is a list of events in the document that have causal relations with the given event. The prescribed output \
format should follow this structure: 'relation1: event1, event2; relation2: event3, event4'. The output 'relation: \
none' indicates that the given event lacks this particular type of relation with other events.";

const INSTRUCTION_COREFERENCE: &str = "The current task is an event coreference relation extraction task, which \
aims to identify coreference relations among events in texts. The coreference relation, labeled as COREFERENCE, \
denotes that two events are the same one. In the provided document, event trigger words are annotated within angle \
brackets (<>). The desired outcome is a list of events in the document that have a coreference relation with the \
given event. The prescribed output format should follow this structure: 'relation1: event1, event2; relation2: \
event3, event4'. The output 'relation: none' indicates that the given event lacks this particular type of relation \
with other events.";

const INSTRUCTION_SUBEVENT: &str = "The current task is a subevent relation extraction task, which aims to identify \
subevent relations among events in texts. The subevent relation denotes a hierarchical relation where the first \
event is contained by the second, delineated into two subtypes: SuperSub and SubSuper. In the provided document, \
event trigger words are annotated within angle brackets (<>). The desired outcome is a list of events in the \
document that have a subevent relation with the given event. The prescribed output format should follow this \
structure: 'relation1: event1, event2; relation2: event3, event4'. The output 'relation: none' indicates that the \
given event lacks this particular type of relation with other events.";

const INSTRUCTION_TEMPORAL: &str = "The current task is an event temporal relation extraction task, which aims to \
identify temporal relations among events in texts. The temporal relation between events refers to the chronological \
order in which they occur, involving three subtypes, namely, VAGUE, EQUAL, and BEFORE. In the provided document, \
event trigger words are annotated within angle brackets (<>). The desired outcome is a list of events in the \
document that have temporal relations with the given event. The prescribed output format should follow this \
structure: 'relation1: event1, event2; relation2: event3, event4'. The output 'relation: none' indicates that the \
given event lacks this particular type of relation with other events.";

/// Which events become focal, and who shares windows with them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocalScope {
    /// Every event, windowed with every other event
    AllEvents,
    /// Events with at least one canonical relation, windowed with their targets
    RelatedEvents,
}

/// How a training split is thinned and capped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingPolicy {
    /// Keep `floor(positives * ratio)` negatives; `None` keeps every negative
    #[serde(default)]
    pub negative_ratio: Option<f64>,
    /// Truncate the shuffled split to this many examples
    #[serde(default)]
    pub max_examples: Option<usize>,
}

/// Extraction task an example set is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Causal,
    Coreference,
    Subevent,
    Temporal,
}

impl TaskKind {
    pub fn instruction(&self) -> &'static str {
        match self {
            TaskKind::Causal => INSTRUCTION_CAUSAL,
            TaskKind::Coreference => INSTRUCTION_COREFERENCE,
            TaskKind::Subevent => INSTRUCTION_SUBEVENT,
            TaskKind::Temporal => INSTRUCTION_TEMPORAL,
        }
    }

    /// Question naming the focal event, e.g. `<e3 attack>`
    pub fn question(&self, focal_tag: &str) -> String {
        let relation = match self {
            TaskKind::Causal => "causal relations",
            TaskKind::Coreference => "the coreference relation",
            TaskKind::Subevent => "the subevent relation",
            TaskKind::Temporal => "temporal relations",
        };
        format!(
            "Please identify the events in the document that have {} with the given event {}.",
            relation, focal_tag
        )
    }

    /// Relation labels listed in the output, in line order
    pub fn labels(&self) -> Vec<RelationKind> {
        match self {
            TaskKind::Causal => vec![RelationKind::Cause, RelationKind::Precondition],
            TaskKind::Coreference => vec![RelationKind::Coreference],
            TaskKind::Subevent => vec![RelationKind::Coref, RelationKind::SuperSub, RelationKind::SubSuper],
            TaskKind::Temporal => vec![RelationKind::Equal, RelationKind::Before],
        }
    }

    /// Label line of an example without any relation
    pub fn none_line(&self) -> String {
        self.labels()
            .iter()
            .map(|kind| format!("{}: none", kind))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn focal_scope(&self) -> FocalScope {
        match self {
            TaskKind::Temporal => FocalScope::RelatedEvents,
            _ => FocalScope::AllEvents,
        }
    }

    /// Whether outputs carry coreference and reasoning lines
    pub fn with_reasoning(&self) -> bool {
        matches!(self, TaskKind::Causal)
    }

    pub fn default_sampling(&self) -> SamplingPolicy {
        match self {
            TaskKind::Causal | TaskKind::Coreference => SamplingPolicy {
                negative_ratio: Some(1.5),
                max_examples: None,
            },
            TaskKind::Subevent => SamplingPolicy {
                negative_ratio: None,
                max_examples: None,
            },
            TaskKind::Temporal => SamplingPolicy {
                negative_ratio: None,
                max_examples: Some(100_000),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Causal => "causal",
            TaskKind::Coreference => "coref",
            TaskKind::Subevent => "subevent",
            TaskKind::Temporal => "temporal",
        }
    }
}
