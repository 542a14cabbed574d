//! Re-alignment of flattened predictions onto documents
//!
//! The prediction stream holds one entry per window, in generation order. The
//! window-count ledger says how many consecutive entries belong to each focal
//! event; focal events are recovered by re-running the builder's focal selection
//! over the gold documents.

use super::prediction::Prediction;
use crate::builder::ExampleBuilder;
use crate::document::Document;
use crate::types::{InstructError, LocalLabel, RelationKind, Result};
use crate::window::WindowLedger;
use std::collections::HashMap;

/// Predicted label per ordered (focal, target) pair of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictedPairs {
    labels: HashMap<(LocalLabel, LocalLabel), RelationKind>,
}

impl PredictedPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a predicted label; the first label recorded for a pair wins
    pub fn insert(&mut self, source: LocalLabel, target: LocalLabel, kind: RelationKind) {
        self.labels.entry((source, target)).or_insert(kind);
    }

    pub fn get(&self, source: LocalLabel, target: LocalLabel) -> Option<&RelationKind> {
        self.labels.get(&(source, target))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Fold predictions back onto (document, focal event) boundaries
///
/// # Arguments
/// * `builder` - Builder configured as when the examples were generated
/// * `documents` - Gold documents, in the order they were converted
/// * `predictions` - One parsed prediction per generated example
/// * `ledger` - Window counts written alongside the examples
///
/// # Returns
/// * Predicted pairs per document, or `AlignmentError` when the ledger and
///   the prediction stream disagree
pub fn align_predictions(
    builder: &ExampleBuilder,
    documents: &[Document],
    predictions: &[Prediction],
    ledger: &WindowLedger,
) -> Result<Vec<PredictedPairs>> {
    if ledger.total_windows() != predictions.len() {
        return Err(InstructError::AlignmentError(format!(
            "window counts sum to {} but there are {} predictions",
            ledger.total_windows(),
            predictions.len()
        )));
    }

    let labels = builder.task().labels();
    let mut counts = ledger.counts().iter();
    let mut stream = predictions.iter();
    let mut aligned = Vec::with_capacity(documents.len());

    for document in documents {
        let index = builder.relation_index(document);
        let mut pairs = PredictedPairs::new();

        for (focal, _) in builder.focal_events(document, &index) {
            let count = *counts.next().ok_or_else(|| {
                InstructError::AlignmentError(format!(
                    "window counts end before focal event {} of document {}",
                    focal, document.id
                ))
            })?;

            for prediction in stream.by_ref().take(count) {
                for token in &prediction.unreadable {
                    log::warn!("Unreadable predicted event '{}' in document {}", token, document.id);
                }
                for kind in &labels {
                    let Some(targets) = prediction.targets(kind.symbol()) else {
                        log::debug!("Label {} missing from prediction for {}", kind, focal);
                        continue;
                    };
                    for target in targets {
                        if document.mention(*target).is_none() {
                            log::warn!("Predicted event {} does not exist in document {}", target, document.id);
                            continue;
                        }
                        pairs.insert(focal, *target, kind.clone());
                    }
                }
            }
        }

        aligned.push(pairs);
    }

    let leftover = counts.len();
    if leftover > 0 {
        return Err(InstructError::AlignmentError(format!(
            "{} window counts left after the last document",
            leftover
        )));
    }

    Ok(aligned)
}
