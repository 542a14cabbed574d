//! Event Relation Instruction Library
//!
//! A reusable library for turning event-relation-annotated documents into
//! instruction-tuning examples, and for scoring model predictions on them.
//!
//! # Architecture
//!
//! For every focal event of a document the library:
//! - Splits the remaining events into balanced windows of bounded size
//! - Renders each window with its events tagged as `<e3 attack>`
//! - Lists the focal event's relations to the tagged events, per label
//! - For causal examples, adds coreference information and logically
//!   consistent multi-hop reasoning paths found in the window
//!
//! Relations come from a canonical index built once per document: cluster-level
//! annotations are expanded to mention pairs, inverse symbols are rewritten and
//! symmetric relations are stored in both directions.
//!
//! File layout, configuration files and parallel conversion are in the
//! application layer (ere-instruct-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use ere_instruct::{load_documents, BuilderConfig, CorpusFormat, ExampleBuilder, TaskKind};
//! use std::path::Path;
//!
//! let documents = load_documents(Path::new("valid.jsonl"), CorpusFormat::Clustered).unwrap();
//!
//! let config = BuilderConfig::new().with_window_capacity(30).with_seed(42);
//! let builder = ExampleBuilder::new(TaskKind::Causal, config).unwrap();
//!
//! for (position, document) in documents.iter().enumerate() {
//!     let mut rng = builder.document_rng(position);
//!     let built = builder.build_document(document, &mut rng);
//!     for example in built.examples {
//!         println!("{}", example.example.output);
//!     }
//! }
//! ```

// Public modules
pub mod builder;
pub mod config;
pub mod corpus;
pub mod document;
pub mod eval;
pub mod reasoning;
pub mod relations;
pub mod task;
pub mod types;
pub mod window;

// Re-export main types for convenience
pub use builder::{sample_training_set, BuiltExample, DocumentExamples, ExampleBuilder};
pub use config::{BuilderConfig, InverseRule, MirrorPair, NormalizationRules};
pub use corpus::{load_documents, parse_document, CorpusFormat};
pub use document::{Document, Mention, MentionRecord, TagLookup, TokenJoin};
pub use eval::{evaluate, EvaluationReport, LabelScores};
pub use reasoning::{PathConsistencyFilter, PathRenderer, ReasoningGraphBuilder, ReasoningPath};
pub use relations::RelationIndex;
pub use task::{SamplingPolicy, TaskKind};
pub use types::{Example, InstructError, LabelKind, LocalLabel, RelationKind, Result, Triple};
pub use window::{Window, WindowLedger, WindowPartitioner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
