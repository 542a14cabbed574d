//! Pairwise relation scoring
//!
//! Every ordered pair of distinct events gets a gold label and a predicted
//! label, either of which may be absent. Precision, recall and F1 are computed
//! per relation label and micro-averaged over all labels.

use super::align::PredictedPairs;
use crate::document::Document;
use crate::relations::RelationIndex;
use crate::types::{LocalLabel, RelationKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Precision / recall / F1 of one label (or of the micro average)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of gold pairs carrying the label
    pub support: usize,
}

impl LabelScores {
    fn from_counts(counts: &PairCounts) -> Self {
        let precision = ratio(counts.correct, counts.predicted);
        let recall = ratio(counts.correct, counts.gold);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
            support: counts.gold,
        }
    }
}

/// Scores written to `eval_results.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub task: String,
    pub documents: usize,
    pub predictions: usize,
    pub labels: BTreeMap<String, LabelScores>,
    pub micro: LabelScores,
}

#[derive(Debug, Clone, Copy, Default)]
struct PairCounts {
    correct: usize,
    predicted: usize,
    gold: usize,
}

impl PairCounts {
    fn add(&mut self, other: &PairCounts) {
        self.correct += other.correct;
        self.predicted += other.predicted;
        self.gold += other.gold;
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Accumulates pair decisions across documents
#[derive(Debug, Clone)]
pub struct PairScorer {
    labels: Vec<RelationKind>,
    counts: BTreeMap<RelationKind, PairCounts>,
}

impl PairScorer {
    /// Create a scorer over the given labels; other labels are ignored
    pub fn new(labels: Vec<RelationKind>) -> Self {
        Self {
            labels,
            counts: BTreeMap::new(),
        }
    }

    /// Gold label of a pair: the first scored label the index holds for it
    pub fn gold_label(&self, index: &RelationIndex, source: LocalLabel, target: LocalLabel) -> Option<RelationKind> {
        self.labels
            .iter()
            .find(|kind| index.contains(source, kind, target))
            .cloned()
    }

    /// Record one pair decision
    pub fn record(&mut self, gold: Option<&RelationKind>, predicted: Option<&RelationKind>) {
        let predicted = predicted.filter(|kind| self.labels.contains(kind));

        if let Some(kind) = gold {
            self.counts.entry(kind.clone()).or_default().gold += 1;
        }
        if let Some(kind) = predicted {
            let counts = self.counts.entry(kind.clone()).or_default();
            counts.predicted += 1;
            if gold == Some(kind) {
                counts.correct += 1;
            }
        }
    }

    /// Score every ordered event pair of a document
    pub fn score_document(&mut self, document: &Document, index: &RelationIndex, predicted: &PredictedPairs) {
        let events: Vec<LocalLabel> = document.events().iter().map(|m| m.label).collect();

        for source in &events {
            for target in &events {
                if source == target {
                    continue;
                }
                let gold = self.gold_label(index, *source, *target);
                self.record(gold.as_ref(), predicted.get(*source, *target));
            }
        }
    }

    /// Per-label and micro-averaged scores
    pub fn report(&self, task: &str, documents: usize, predictions: usize) -> EvaluationReport {
        let mut total = PairCounts::default();
        let mut labels = BTreeMap::new();

        for kind in &self.labels {
            let counts = self.counts.get(kind).copied().unwrap_or_default();
            total.add(&counts);
            labels.insert(kind.symbol().to_string(), LabelScores::from_counts(&counts));
        }

        EvaluationReport {
            task: task.to_string(),
            documents,
            predictions,
            labels,
            micro: LabelScores::from_counts(&total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> PairScorer {
        PairScorer::new(vec![RelationKind::Cause, RelationKind::Precondition])
    }

    #[test]
    fn test_micro_scores() {
        let mut scorer = scorer();
        // correct, wrong label, missed, spurious, true negative
        scorer.record(Some(&RelationKind::Cause), Some(&RelationKind::Cause));
        scorer.record(Some(&RelationKind::Cause), Some(&RelationKind::Precondition));
        scorer.record(Some(&RelationKind::Precondition), None);
        scorer.record(None, Some(&RelationKind::Cause));
        scorer.record(None, None);

        let report = scorer.report("causal", 1, 5);
        assert!((report.micro.precision - 1.0 / 3.0).abs() < 1e-9);
        assert!((report.micro.recall - 1.0 / 3.0).abs() < 1e-9);
        assert!((report.micro.f1 - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.micro.support, 3);

        let cause = report.labels["CAUSE"];
        assert!((cause.precision - 0.5).abs() < 1e-9);
        assert!((cause.recall - 0.5).abs() < 1e-9);
        assert_eq!(report.labels["PRECONDITION"].precision, 0.0);
    }

    #[test]
    fn test_unscored_labels_are_ignored() {
        let mut scorer = scorer();
        scorer.record(None, Some(&RelationKind::Before));
        let report = scorer.report("causal", 1, 1);
        assert_eq!(report.micro, LabelScores::default());
    }

    #[test]
    fn test_zero_division_yields_zero() {
        let report = scorer().report("causal", 0, 0);
        assert_eq!(report.micro.f1, 0.0);
        assert_eq!(report.labels.len(), 2);
    }
}
