//! Main example-builder API
//!
//! `ExampleBuilder` is the entry point for turning a numbered `Document` into
//! instruction examples. Per focal event it partitions the window companions,
//! renders each window, lists the focal event's visible relations and, for the
//! causal task, adds the coreference and reasoning lines.

use crate::config::BuilderConfig;
use crate::document::{Document, TagLookup};
use crate::reasoning::{PathConsistencyFilter, PathRenderer, ReasoningGraphBuilder, CAUSAL_KINDS, NONE_TEXT};
use crate::relations::RelationIndex;
use crate::task::{FocalScope, SamplingPolicy, TaskKind};
use crate::types::{Example, LocalLabel, RelationKind, Result, Triple};
use crate::window::{Window, WindowLedger, WindowPartitioner};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// An example plus the bookkeeping needed to sample and align it
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltExample {
    pub example: Example,
    pub focal: LocalLabel,
    /// True when the label line lists no relation at all
    pub negative: bool,
}

/// Everything generated for one document
#[derive(Debug, Clone, Default)]
pub struct DocumentExamples {
    pub examples: Vec<BuiltExample>,
    /// Window count per focal event, in focal order
    pub ledger: WindowLedger,
}

/// The example builder - entry point for example generation
pub struct ExampleBuilder {
    task: TaskKind,
    config: BuilderConfig,
    partitioner: WindowPartitioner,
    path_filter: PathConsistencyFilter,
}

impl ExampleBuilder {
    /// Create a builder for a task
    pub fn new(task: TaskKind, config: BuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            task,
            partitioner: WindowPartitioner::new(config.window_capacity),
            path_filter: PathConsistencyFilter::new(config.max_path_hops),
            config,
        })
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Random source for the document at `position` in a split
    ///
    /// Every document draws from its own ChaCha stream of the configured seed,
    /// so documents can be built in any order with identical results.
    pub fn document_rng(&self, position: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        rng.set_stream(position as u64);
        rng
    }

    /// Random source for split-level sampling and shuffling
    pub fn split_rng(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        rng.set_stream(u64::MAX);
        rng
    }

    /// Canonical relation index of a document under the configured rules
    pub fn relation_index(&self, document: &Document) -> RelationIndex {
        RelationIndex::build(document, &self.config.normalization)
    }

    /// Focal events of a document with their window companions, in focal order
    pub fn focal_events(&self, document: &Document, index: &RelationIndex) -> Vec<(LocalLabel, Vec<LocalLabel>)> {
        let events: Vec<LocalLabel> = document.events().iter().map(|m| m.label).collect();

        match self.task.focal_scope() {
            FocalScope::AllEvents => events
                .iter()
                .map(|focal| {
                    let others = events.iter().filter(|e| *e != focal).copied().collect();
                    (*focal, others)
                })
                .collect(),
            FocalScope::RelatedEvents => index
                .sources()
                .into_iter()
                .filter(|source| source.is_event())
                .filter_map(|focal| {
                    let mut seen = HashSet::new();
                    let others: Vec<LocalLabel> = index
                        .relations_of(focal)
                        .flat_map(|(_, targets)| targets.iter().copied())
                        .filter(|target| *target != focal && seen.insert(*target))
                        .collect();
                    (!others.is_empty()).then_some((focal, others))
                })
                .collect(),
        }
    }

    /// Build every example of one document
    pub fn build_document<R>(&self, document: &Document, rng: &mut R) -> DocumentExamples
    where
        R: Rng + ?Sized,
    {
        let index = self.relation_index(document);
        let causal_index = self.task.with_reasoning().then(|| index.restricted(&CAUSAL_KINDS));
        let mut output = DocumentExamples::default();

        for (focal, others) in self.focal_events(document, &index) {
            let windows = self.partitioner.windows(
                focal,
                others,
                |label| {
                    document
                        .mention(*label)
                        .map(|m| m.position())
                        .unwrap_or((usize::MAX, label.rank))
                },
                rng,
            );
            output.ledger.record(windows.len());

            for window in &windows {
                output
                    .examples
                    .push(self.build_window(document, &index, causal_index.as_ref(), window, rng));
            }
        }

        log::debug!(
            "Document {}: {} focal events, {} examples",
            document.id,
            output.ledger.counts().len(),
            output.examples.len()
        );
        output
    }

    /// Render one window into an example
    ///
    /// `causal_index` holds only CAUSE and PRECONDITION entries and is present
    /// for tasks whose outputs carry reasoning lines.
    fn build_window<R>(
        &self,
        document: &Document,
        index: &RelationIndex,
        causal_index: Option<&RelationIndex>,
        window: &Window<LocalLabel>,
        rng: &mut R,
    ) -> BuiltExample
    where
        R: Rng + ?Sized,
    {
        let focal = window.focal;
        let tagged: HashSet<LocalLabel> = window.members.iter().copied().collect();
        let focal_tag = document.tag(focal);

        let text = document.render_tagged(&window.members);
        let input = format!("Document content: {}\n{}", text, self.task.question(&focal_tag));

        let label_line = self
            .task
            .labels()
            .iter()
            .map(|kind| format!("{}: {}", kind, Self::target_list(document, index, focal, kind, &tagged)))
            .collect::<Vec<_>>()
            .join("; ");
        let negative = label_line == self.task.none_line();

        let mut output = label_line;
        if let Some(causal_index) = causal_index {
            let coreference: Vec<Triple> = index
                .visible_targets(focal, &RelationKind::Coreference, &tagged)
                .into_iter()
                .map(|target| Triple::new(focal, target, RelationKind::Coreference))
                .collect();

            let triples = ReasoningGraphBuilder::build(focal, causal_index, &tagged);
            let paths = self.path_filter.select(&triples, focal, rng);

            output.push_str(&format!(
                "\nCoreference information: {}\nRelevant reasoning information: {}",
                PathRenderer::render_path(document, &coreference),
                PathRenderer::render_paths(document, &paths)
            ));
        }

        BuiltExample {
            example: Example {
                instruction: self.task.instruction().to_string(),
                input,
                output,
            },
            focal,
            negative,
        }
    }

    /// Visible targets of one label as `<label mention>` tags, or `none`
    fn target_list(
        document: &Document,
        index: &RelationIndex,
        focal: LocalLabel,
        kind: &RelationKind,
        tagged: &HashSet<LocalLabel>,
    ) -> String {
        let targets = index.visible_targets(focal, kind, tagged);
        if targets.is_empty() {
            NONE_TEXT.to_string()
        } else {
            targets
                .iter()
                .map(|target| document.tag(*target))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Thin, shuffle and cap a training split
///
/// Positives are always kept. Negatives are sampled without replacement when the
/// policy has a ratio (never more than exist), otherwise all are kept.
pub fn sample_training_set<R>(examples: Vec<BuiltExample>, policy: &SamplingPolicy, rng: &mut R) -> Vec<Example>
where
    R: Rng + ?Sized,
{
    let (positives, negatives): (Vec<BuiltExample>, Vec<BuiltExample>) =
        examples.into_iter().partition(|built| !built.negative);

    log::info!("Positive examples: {}", positives.len());
    log::info!("Negative examples: {}", negatives.len());

    let kept_negatives: Vec<BuiltExample> = match policy.negative_ratio {
        Some(ratio) => {
            let keep = ((positives.len() as f64 * ratio).floor() as usize).min(negatives.len());
            log::info!("Keeping {} negative examples", keep);
            negatives.choose_multiple(rng, keep).cloned().collect()
        }
        None => negatives,
    };

    let mut kept: Vec<Example> = positives
        .into_iter()
        .chain(kept_negatives)
        .map(|built| built.example)
        .collect();
    kept.shuffle(rng);

    if let Some(max) = policy.max_examples {
        kept.truncate(max);
    }
    log::info!("Kept examples: {}", kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MentionRecord, TokenJoin};

    fn mention(id: &str, sent_id: usize, start: usize, text: &str) -> MentionRecord {
        MentionRecord {
            id: id.to_string(),
            sent_id,
            offset: (start, start + 1),
            text: text.to_string(),
        }
    }

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    /// storm(e0) causes flood(e1), flood causes damage(e2), storm causes damage;
    /// damage and losses(e3) corefer
    fn storm_document() -> Document {
        let mut doc = Document::new(
            "storm",
            vec![words("A storm brought a flood ."), words("The damage and the losses grew .")],
            TokenJoin::Space,
            vec![
                mention("m0", 0, 1, "storm"),
                mention("m1", 0, 4, "flood"),
                mention("m2", 1, 1, "damage"),
                mention("m3", 1, 4, "losses"),
            ],
            Vec::new(),
        );
        doc.add_cluster("E0", vec!["m0".into()], true);
        doc.add_cluster("E1", vec!["m1".into()], true);
        doc.add_cluster("E2", vec!["m2".into(), "m3".into()], true);
        doc.add_relation(RelationKind::Cause, "E0", "E1");
        doc.add_relation(RelationKind::Cause, "E1", "E2");
        doc.add_relation(RelationKind::Cause, "E0", "E2");
        doc
    }

    fn built(negative: bool, id: usize) -> BuiltExample {
        BuiltExample {
            example: Example {
                instruction: String::new(),
                input: id.to_string(),
                output: String::new(),
            },
            focal: LocalLabel::event(id),
            negative,
        }
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = BuilderConfig::new().with_window_capacity(0);
        assert!(ExampleBuilder::new(TaskKind::Causal, config).is_err());
    }

    #[test]
    fn test_causal_example_lines() {
        let builder = ExampleBuilder::new(TaskKind::Causal, BuilderConfig::new()).unwrap();
        let mut rng = builder.document_rng(0);
        let output = builder.build_document(&storm_document(), &mut rng);

        assert_eq!(output.ledger.counts(), &[1, 1, 1, 1]);
        assert_eq!(output.examples.len(), 4);

        let storm = &output.examples[0];
        assert_eq!(storm.focal, LocalLabel::event(0));
        assert!(!storm.negative);
        assert_eq!(
            storm.example.output,
            "CAUSE: <e1 flood>, <e2 damage>, <e3 losses>; PRECONDITION: none\n\
             Coreference information: none\n\
             Relevant reasoning information: <e0 storm> causes <e1 flood> to occur, \
             <e1 flood> causes <e2 damage> to occur; \
             <e0 storm> causes <e1 flood> to occur, <e1 flood> causes <e3 losses> to occur"
        );
        assert!(storm
            .example
            .input
            .starts_with("Document content: A <e0 storm> brought a <e1 flood> . The <e2 damage>"));
        assert!(storm
            .example
            .input
            .ends_with("have causal relations with the given event <e0 storm>."));

        let damage = &output.examples[2];
        assert!(damage.negative);
        assert!(damage
            .example
            .output
            .contains("Coreference information: <e2 damage> and <e3 losses> are identical"));
        assert!(damage.example.output.ends_with("Relevant reasoning information: none"));
    }

    #[test]
    fn test_reasoning_uses_causal_relations_only() {
        let builder = ExampleBuilder::new(TaskKind::Causal, BuilderConfig::new()).unwrap();
        let plain = builder.build_document(&storm_document(), &mut builder.document_rng(0));

        let mut temporal = storm_document();
        temporal.add_relation(RelationKind::Before, "m0", "m1");
        temporal.add_relation(RelationKind::Before, "m1", "m2");
        let with_temporal = builder.build_document(&temporal, &mut builder.document_rng(0));
        assert_eq!(plain.examples, with_temporal.examples);

        let coref = ExampleBuilder::new(TaskKind::Coreference, BuilderConfig::new()).unwrap();
        let output = coref.build_document(&storm_document(), &mut coref.document_rng(0));
        assert_eq!(output.examples[2].example.output, "COREFERENCE: <e3 losses>");
        assert!(output
            .examples
            .iter()
            .all(|b| !b.example.output.contains("Relevant reasoning information")));
    }

    #[test]
    fn test_windows_split_large_documents() {
        let mentions = (0..8).map(|i| mention(&format!("m{}", i), 0, i, "x")).collect();
        let doc = Document::new("big", vec![vec!["x".to_string(); 8]], TokenJoin::Space, mentions, Vec::new());
        let builder = ExampleBuilder::new(
            TaskKind::Coreference,
            BuilderConfig::new().with_window_capacity(3),
        )
        .unwrap();

        let mut rng = builder.document_rng(0);
        let output = builder.build_document(&doc, &mut rng);

        // 7 companions per focal event, capacity 3 -> 3 windows each
        assert_eq!(output.ledger.counts(), &[3; 8]);
        assert_eq!(output.examples.len(), output.ledger.total_windows());
        assert!(output.examples.iter().all(|b| b.negative));
    }

    #[test]
    fn test_related_scope_for_temporal() {
        let mut doc = storm_document();
        doc.add_relation(RelationKind::After, "m3", "m0");
        let builder = ExampleBuilder::new(TaskKind::Temporal, BuilderConfig::new()).unwrap();
        let index = builder.relation_index(&doc);

        let focal = builder.focal_events(&doc, &index);
        let labels: Vec<LocalLabel> = focal.iter().map(|(l, _)| *l).collect();
        assert!(labels.contains(&LocalLabel::event(0)));
        let (_, others) = focal.iter().find(|(l, _)| *l == LocalLabel::event(0)).unwrap();
        assert!(others.contains(&LocalLabel::event(3)));
        assert!(!others.contains(&LocalLabel::event(0)));

        let mut rng = builder.document_rng(0);
        let output = builder.build_document(&doc, &mut rng);
        let storm = output
            .examples
            .iter()
            .find(|b| b.focal == LocalLabel::event(0))
            .unwrap();
        assert_eq!(storm.example.output, "EQUAL: none; BEFORE: <e3 losses>");
    }

    #[test]
    fn test_document_streams_are_reproducible() {
        let builder = ExampleBuilder::new(TaskKind::Causal, BuilderConfig::new().with_window_capacity(1)).unwrap();
        let doc = storm_document();
        let run = |position| {
            let mut rng = builder.document_rng(position);
            builder.build_document(&doc, &mut rng).examples
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_sampling_with_ratio() {
        let mut examples: Vec<BuiltExample> = (0..4).map(|i| built(false, i)).collect();
        examples.extend((4..20).map(|i| built(true, i)));

        let policy = SamplingPolicy {
            negative_ratio: Some(1.5),
            max_examples: None,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let kept = sample_training_set(examples, &policy, &mut rng);
        assert_eq!(kept.len(), 4 + 6);
    }

    #[test]
    fn test_sampling_keep_all_with_cap() {
        let examples: Vec<BuiltExample> = (0..10).map(|i| built(i % 2 == 0, i)).collect();
        let policy = SamplingPolicy {
            negative_ratio: None,
            max_examples: Some(7),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(sample_training_set(examples, &policy, &mut rng).len(), 7);
    }

    #[test]
    fn test_sampling_never_exceeds_available_negatives() {
        let mut examples: Vec<BuiltExample> = (0..10).map(|i| built(false, i)).collect();
        examples.push(built(true, 10));
        // 15 negatives wanted, only one available
        let policy = SamplingPolicy {
            negative_ratio: Some(1.5),
            max_examples: None,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(sample_training_set(examples, &policy, &mut rng).len(), 11);
    }
}
