//! Scoring a prediction file against a converted split

use crate::config::AppConfig;
use anyhow::{Context, Result};
use ere_instruct::eval::load_predictions;
use ere_instruct::{evaluate, load_documents, EvaluationReport, ExampleBuilder, WindowLedger};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Evaluate predictions for one split and write `eval_results.json`
///
/// # Arguments
/// * `config` - Configuration the split was converted with
/// * `split` - Split name, used to find the gold corpus and window counts
/// * `predictions` - JSON-lines file with a `predict` field per example
/// * `output_dir` - Directory receiving `eval_results.json`
pub fn evaluate_split(config: &AppConfig, split: &str, predictions: &Path, output_dir: &Path) -> Result<EvaluationReport> {
    let builder = ExampleBuilder::new(config.task.kind, config.builder.clone())?;

    let gold_path = config.input.split_path(split);
    let documents = load_documents(&gold_path, config.input.format)
        .with_context(|| format!("Failed to load gold split: {:?}", gold_path))?;

    let ledger_path = config.output.ledger_path(split);
    let ledger = WindowLedger::read_json(&ledger_path)
        .with_context(|| format!("Failed to read window counts: {:?}", ledger_path))?;

    let predictions = load_predictions(predictions)
        .with_context(|| format!("Failed to read predictions: {:?}", predictions))?;

    let report = evaluate(&builder, &documents, &predictions, &ledger)
        .with_context(|| format!("Failed to align predictions for split {}", split))?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    let report_path = output_dir.join("eval_results.json");
    write_report(&report_path, &report)
        .with_context(|| format!("Failed to write report: {:?}", report_path))?;

    Ok(report)
}

fn write_report(path: &Path, report: &EvaluationReport) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
