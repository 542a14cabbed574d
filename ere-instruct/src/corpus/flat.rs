//! Flat corpus records
//!
//! Layout: `text` holds one string per sentence and offsets are character
//! offsets into it; `events` are individual mentions and `relations` maps a
//! relation symbol to pairs of event ids. When any event carries an `eiid`, the
//! `eiid` is the relation key and events without one are dropped. Mention text
//! is the character slice at the event's offsets; an event's own `mention` field
//! is only used when the offsets fall outside the text.

use crate::document::{Document, MentionRecord, TokenJoin};
use crate::types::{InstructError, RelationKind, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct FlatRecord {
    #[serde(alias = "fid")]
    id: String,
    text: Vec<String>,
    #[serde(default)]
    events: Vec<FlatEvent>,
    #[serde(default)]
    relations: BTreeMap<String, Vec<(String, String)>>,
}

#[derive(Debug, Deserialize)]
struct FlatEvent {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    eiid: Option<String>,
    sent_id: usize,
    offset: (usize, usize),
    #[serde(default)]
    mention: Option<String>,
}

/// Parse one flat record into a document
pub fn parse_record(line: &str) -> Result<Document> {
    let record: FlatRecord =
        serde_json::from_str(line).map_err(|e| InstructError::CorpusParseError(e.to_string()))?;

    let sentences: Vec<Vec<String>> = record
        .text
        .iter()
        .map(|s| s.chars().map(|c| c.to_string()).collect())
        .collect();

    let keyed_by_eiid = record.events.iter().any(|e| e.eiid.is_some());

    let mut mentions = Vec::with_capacity(record.events.len());
    for event in &record.events {
        let key = if keyed_by_eiid { &event.eiid } else { &event.id };
        let Some(id) = key.clone() else {
            log::debug!("Dropping event without key in document {}", record.id);
            continue;
        };
        // The rendered span is the offset slice, so the tag text comes from it too
        let mut text = slice_chars(&sentences, event.sent_id, event.offset);
        if text.is_empty() {
            text = event.mention.clone().unwrap_or_default();
        }
        mentions.push(MentionRecord {
            id,
            sent_id: event.sent_id,
            offset: event.offset,
            text,
        });
    }

    let mut document = Document::new(record.id, sentences, TokenJoin::Concat, mentions, Vec::new());

    for (symbol, pairs) in record.relations {
        let kind = RelationKind::from(symbol);
        for (source, target) in pairs {
            document.add_relation(kind.clone(), source, target);
        }
    }

    Ok(document)
}

fn slice_chars(sentences: &[Vec<String>], sent_id: usize, offset: (usize, usize)) -> String {
    sentences
        .get(sent_id)
        .map(|chars| {
            let end = offset.1.min(chars.len());
            let start = offset.0.min(end);
            chars[start..end].concat()
        })
        .unwrap_or_default()
}
