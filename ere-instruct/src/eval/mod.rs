//! Evaluation of model predictions against gold documents
//!
//! Predictions are parsed from their label lines, folded back onto focal
//! events with the window-count ledger, and scored over ordered event pairs.

pub mod align;
pub mod metrics;
pub mod prediction;

pub use align::{align_predictions, PredictedPairs};
pub use metrics::{EvaluationReport, LabelScores, PairScorer};
pub use prediction::{load_predictions, parse_prediction, Prediction};

use crate::builder::ExampleBuilder;
use crate::document::Document;
use crate::types::Result;
use crate::window::WindowLedger;

/// Score a prediction stream for a split
///
/// `builder` must be configured as it was when the split was converted, so
/// that focal events come out in the same order.
pub fn evaluate(
    builder: &ExampleBuilder,
    documents: &[Document],
    predictions: &[Prediction],
    ledger: &WindowLedger,
) -> Result<EvaluationReport> {
    let aligned = align_predictions(builder, documents, predictions, ledger)?;
    let mut scorer = PairScorer::new(builder.task().labels());

    for (document, predicted) in documents.iter().zip(&aligned) {
        let index = builder.relation_index(document);
        scorer.score_document(document, &index, predicted);
    }

    let report = scorer.report(builder.task().name(), documents.len(), predictions.len());
    log::info!(
        "{}: precision={:.5}, recall={:.5}, f1={:.5}",
        report.task,
        report.micro.precision * 100.0,
        report.micro.recall * 100.0,
        report.micro.f1 * 100.0
    );
    Ok(report)
}
