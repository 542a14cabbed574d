//! Corpus loaders (clustered and flat JSON-lines formats)
//!
//! Each loader parses one JSON record per line into a numbered `Document`.

use crate::document::Document;
use crate::types::{InstructError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub mod clustered;
pub mod flat;

/// Supported corpus record layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// Token sentences, coreference clusters, TIMEX and typed relation maps
    Clustered,
    /// Character sentences, flat events and one relation map
    Flat,
}

/// Parse one corpus line
pub fn parse_document(line: &str, format: CorpusFormat) -> Result<Document> {
    match format {
        CorpusFormat::Clustered => clustered::parse_record(line),
        CorpusFormat::Flat => flat::parse_record(line),
    }
}

/// Load every document of a JSON-lines corpus file
///
/// Blank lines are skipped. A malformed record fails the whole file, with the
/// offending line number in the error.
pub fn load_documents(path: &Path, format: CorpusFormat) -> Result<Vec<Document>> {
    log::info!("Loading {:?} corpus: {:?}", format, path);

    let reader = BufReader::new(File::open(path)?);
    let mut documents = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let document = parse_document(line.trim(), format).map_err(|e| {
            InstructError::CorpusParseError(format!("{:?} line {}: {}", path, line_no + 1, e))
        })?;
        documents.push(document);
    }

    log::info!("Loaded {} documents from {:?}", documents.len(), path);
    Ok(documents)
}
