//! Split conversion: corpus files in, example files and window counts out

use crate::config::AppConfig;
use anyhow::{Context, Result};
use ere_instruct::{
    load_documents, sample_training_set, BuiltExample, DocumentExamples, Example, ExampleBuilder, WindowLedger,
};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary of one converted split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSummary {
    pub documents: usize,
    pub generated: usize,
    pub written: usize,
}

/// Convert every configured split
pub fn convert_all(config: &AppConfig) -> Result<()> {
    let builder = ExampleBuilder::new(config.task.kind, config.builder.clone())?;

    fs::create_dir_all(&config.output.dir)
        .with_context(|| format!("Failed to create output directory: {:?}", config.output.dir))?;

    for split in &config.input.splits {
        let summary = convert_split(config, &builder, split)?;
        log::info!(
            "Convert {} finish: {} documents, {} examples generated, {} written",
            split,
            summary.documents,
            summary.generated,
            summary.written
        );
    }

    Ok(())
}

/// Convert one split
///
/// Documents are built in parallel, each from its own random stream, and
/// collected in corpus order. The train split is down-sampled and shuffled;
/// other splits keep generation order and get a window-count file.
pub fn convert_split(config: &AppConfig, builder: &ExampleBuilder, split: &str) -> Result<SplitSummary> {
    let input = config.input.split_path(split);
    let documents = load_documents(&input, config.input.format)
        .with_context(|| format!("Failed to load split {} from {:?}", split, input))?;

    let built: Vec<DocumentExamples> = documents
        .par_iter()
        .enumerate()
        .map(|(position, document)| {
            let mut rng = builder.document_rng(position);
            builder.build_document(document, &mut rng)
        })
        .collect();

    let mut ledger = WindowLedger::new();
    let mut examples: Vec<BuiltExample> = Vec::new();
    for document in built {
        ledger.extend(&document.ledger);
        examples.extend(document.examples);
    }
    let generated = examples.len();

    let written: Vec<Example> = if split == config.output.train_split {
        let mut rng = builder.split_rng();
        sample_training_set(examples, &config.task.sampling(), &mut rng)
    } else {
        let ledger_path = config.output.ledger_path(split);
        ledger
            .write_json(&ledger_path)
            .with_context(|| format!("Failed to write window counts: {:?}", ledger_path))?;
        log::debug!("Wrote {} window counts to {:?}", ledger.counts().len(), ledger_path);
        examples.into_iter().map(|built| built.example).collect()
    };

    let output = config.output.examples_path(split);
    write_examples(&output, &written)
        .with_context(|| format!("Failed to write examples: {:?}", output))?;

    Ok(SplitSummary {
        documents: documents.len(),
        generated,
        written: written.len(),
    })
}

/// Write examples as a JSON array indented by four spaces
pub fn write_examples(path: &Path, examples: &[Example]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    examples.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}
