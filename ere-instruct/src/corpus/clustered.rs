//! Clustered corpus records
//!
//! Layout: `tokens` holds one token list per sentence, `events` holds
//! coreference clusters whose mentions carry the trigger word, `TIMEX` holds time
//! expressions, and relations are stated between cluster or TIMEX ids. Unlabelled
//! splits carry `event_mentions` instead of `events`.

use crate::document::{Document, MentionRecord, TokenJoin};
use crate::types::{InstructError, RelationKind, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

type PairList = Vec<(String, String)>;

#[derive(Debug, Deserialize)]
struct ClusteredRecord {
    id: String,
    tokens: Vec<Vec<String>>,
    #[serde(default)]
    events: Vec<EventCluster>,
    #[serde(default)]
    event_mentions: Vec<EventMention>,
    #[serde(rename = "TIMEX", default)]
    timex: Vec<TimexMention>,
    #[serde(default)]
    temporal_relations: BTreeMap<String, PairList>,
    #[serde(default)]
    causal_relations: BTreeMap<String, PairList>,
    #[serde(default)]
    subevent_relations: PairList,
}

#[derive(Debug, Deserialize)]
struct EventCluster {
    id: String,
    mention: Vec<EventMention>,
}

#[derive(Debug, Deserialize)]
struct EventMention {
    id: String,
    trigger_word: String,
    sent_id: usize,
    offset: (usize, usize),
}

#[derive(Debug, Deserialize)]
struct TimexMention {
    id: String,
    mention: String,
    sent_id: usize,
    offset: (usize, usize),
}

impl From<&EventMention> for MentionRecord {
    fn from(m: &EventMention) -> Self {
        MentionRecord {
            id: m.id.clone(),
            sent_id: m.sent_id,
            offset: m.offset,
            text: m.trigger_word.clone(),
        }
    }
}

/// Parse one clustered record into a document
pub fn parse_record(line: &str) -> Result<Document> {
    let record: ClusteredRecord =
        serde_json::from_str(line).map_err(|e| InstructError::CorpusParseError(e.to_string()))?;

    let mut mentions: Vec<MentionRecord> = record
        .events
        .iter()
        .flat_map(|cluster| cluster.mention.iter().map(MentionRecord::from))
        .collect();
    mentions.extend(record.event_mentions.iter().map(MentionRecord::from));

    let timexes = record
        .timex
        .iter()
        .map(|t| MentionRecord {
            id: t.id.clone(),
            sent_id: t.sent_id,
            offset: t.offset,
            text: t.mention.clone(),
        })
        .collect();

    let mut document = Document::new(record.id, record.tokens, TokenJoin::Space, mentions, timexes);

    for cluster in &record.events {
        let members = cluster.mention.iter().map(|m| m.id.clone()).collect();
        document.add_cluster(cluster.id.clone(), members, true);
    }

    let typed = record
        .temporal_relations
        .into_iter()
        .chain(record.causal_relations)
        .map(|(symbol, pairs)| (RelationKind::from(symbol), pairs))
        .chain(std::iter::once((RelationKind::Subevent, record.subevent_relations)));

    for (kind, pairs) in typed {
        for (source, target) in pairs {
            document.add_relation(kind.clone(), source, target);
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalLabel;

    const RECORD: &str = r#"{
        "id": "doc-1",
        "tokens": [["Rain", "caused", "floods", "."], ["Roads", "closed", "on", "Friday", "."]],
        "events": [
            {"id": "EV1", "mention": [{"id": "m1", "trigger_word": "Rain", "sent_id": 0, "offset": [0, 1]}]},
            {"id": "EV2", "mention": [
                {"id": "m2", "trigger_word": "floods", "sent_id": 0, "offset": [2, 3]},
                {"id": "m4", "trigger_word": "closed", "sent_id": 1, "offset": [1, 2]}
            ]}
        ],
        "TIMEX": [{"id": "TIME1", "mention": "Friday", "sent_id": 1, "offset": [3, 4]}],
        "temporal_relations": {"BEFORE": [["EV1", "EV2"]], "SIMULTANEOUS": []},
        "causal_relations": {"CAUSE": [["EV1", "EV2"]], "PRECONDITION": []},
        "subevent_relations": []
    }"#;

    #[test]
    fn test_parse_clustered_record() {
        let doc = parse_record(RECORD).unwrap();

        assert_eq!(doc.id, "doc-1");
        assert_eq!(doc.events().len(), 3);
        assert_eq!(doc.timexes().len(), 1);
        assert_eq!(doc.label_of("m4"), Some(LocalLabel::event(2)));
        assert_eq!(
            doc.expand("EV2"),
            Some(vec![LocalLabel::event(1), LocalLabel::event(2)])
        );
        assert_eq!(doc.coreference_clusters().len(), 2);

        let kinds: Vec<_> = doc.relations().iter().map(|r| r.kind.clone()).collect();
        assert!(kinds.contains(&RelationKind::Before));
        assert!(kinds.contains(&RelationKind::Cause));
        assert_eq!(doc.relations().len(), 2);
    }

    #[test]
    fn test_parse_unlabelled_record() {
        let line = r#"{"id": "t", "tokens": [["A", "b"]],
            "event_mentions": [{"id": "x", "trigger_word": "b", "sent_id": 0, "offset": [1, 2]}],
            "TIMEX": []}"#;
        let doc = parse_record(line).unwrap();
        assert_eq!(doc.events().len(), 1);
        assert!(doc.relations().is_empty());
        assert!(doc.coreference_clusters().is_empty());
    }
}
