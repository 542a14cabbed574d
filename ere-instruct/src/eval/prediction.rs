//! Model prediction parsing
//!
//! A prediction is the text a model produced for one window. Only its first
//! line (the label line) is scored; the coreference and reasoning lines of
//! causal outputs are ignored.

use crate::types::{LocalLabel, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Target lists that mean "no relation"
const NONE_MARKERS: [&str; 6] = ["none", "none.", "NONE", "NONE.", "None", "None."];

/// Parsed label line: relation symbol -> predicted target labels, in line order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    pub items: Vec<(String, Vec<LocalLabel>)>,
    /// Target tokens that did not read as a local label
    pub unreadable: Vec<String>,
}

impl Prediction {
    /// Targets predicted under a relation symbol
    pub fn targets(&self, symbol: &str) -> Option<&[LocalLabel]> {
        self.items
            .iter()
            .find(|(label, _)| label == symbol)
            .map(|(_, targets)| targets.as_slice())
    }
}

#[derive(Debug, Deserialize)]
struct PredictionRecord {
    predict: String,
}

/// Parse the label line of a model output
///
/// Items that do not read as `LABEL: targets` are logged and kept with an
/// empty target list.
pub fn parse_prediction(text: &str) -> Prediction {
    let first_line = text.split('\n').next().unwrap_or_default();
    let line = first_line.trim().trim_end_matches('.');

    let mut prediction = Prediction::default();
    for item in line.split("; ") {
        let mut parts = item.splitn(2, ": ");
        let (label, targets) = match (parts.next(), parts.next()) {
            (Some(label), Some(targets)) => (label.trim_start(), targets),
            _ => {
                log::warn!("Malformed prediction item '{}' in '{}'", item, line);
                prediction.items.push((item.trim().to_string(), Vec::new()));
                continue;
            }
        };

        let mut labels = Vec::new();
        if !NONE_MARKERS.contains(&targets) {
            for tag in targets.split(", ") {
                let token = tag
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .split(' ')
                    .next()
                    .unwrap_or_default();
                match token.parse::<LocalLabel>() {
                    Ok(target) => labels.push(target),
                    Err(_) => prediction.unreadable.push(token.to_string()),
                }
            }
        }
        prediction.items.push((label.to_string(), labels));
    }

    prediction
}

/// Read a JSON-lines prediction file, one `{"predict": ...}` object per line
pub fn load_predictions(path: &Path) -> Result<Vec<Prediction>> {
    let reader = BufReader::new(File::open(path)?);
    let mut predictions = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: PredictionRecord = serde_json::from_str(&line)?;
        predictions.push(parse_prediction(&record.predict));
    }

    log::info!("Loaded {} predictions from {}", predictions.len(), path.display());
    Ok(predictions)
}
