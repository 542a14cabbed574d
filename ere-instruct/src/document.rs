//! In-memory document model
//!
//! A `Document` holds one corpus record after canonical numbering: its sentence
//! tokens, the event and time-expression mentions sorted into document order and
//! labelled `e0.. / t0..`, the coreference clusters, and the raw relation
//! annotations exactly as the corpus stated them (over cluster or mention ids).

use crate::types::{LabelKind, LocalLabel, RelationKind};
use std::collections::HashMap;

/// How tokens of a sentence are glued back together when rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenJoin {
    /// Word tokens, joined by a single space
    Space,
    /// Character tokens, concatenated
    Concat,
}

impl TokenJoin {
    fn separator(&self) -> &'static str {
        match self {
            TokenJoin::Space => " ",
            TokenJoin::Concat => "",
        }
    }
}

/// A mention as read from the corpus, before numbering
#[derive(Debug, Clone, PartialEq)]
pub struct MentionRecord {
    pub id: String,
    pub sent_id: usize,
    /// Token (or character) span `[start, end)` inside the sentence
    pub offset: (usize, usize),
    pub text: String,
}

/// A numbered mention
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub id: String,
    pub label: LocalLabel,
    pub sent_id: usize,
    pub offset: (usize, usize),
    pub text: String,
}

impl Mention {
    /// Document-order sort key
    pub fn position(&self) -> (usize, usize) {
        (self.sent_id, self.offset.0)
    }
}

/// A relation annotation as stated by the corpus
#[derive(Debug, Clone, PartialEq)]
pub struct RawRelation {
    pub kind: RelationKind,
    pub source: String,
    pub target: String,
}

/// Lookup from local labels to mention text, used for `<label mention>` tags
pub trait TagLookup {
    /// Mention text for a label, if the label exists
    fn mention_text(&self, label: LocalLabel) -> Option<&str>;

    /// Render the angle-bracket tag for a label, e.g. `<e3 attack>`
    fn tag(&self, label: LocalLabel) -> String {
        format!("<{} {}>", label, self.mention_text(label).unwrap_or_default())
    }
}

impl TagLookup for HashMap<LocalLabel, String> {
    fn mention_text(&self, label: LocalLabel) -> Option<&str> {
        self.get(&label).map(String::as_str)
    }
}

/// One corpus document after canonical numbering
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    sentences: Vec<Vec<String>>,
    join: TokenJoin,
    events: Vec<Mention>,
    timexes: Vec<Mention>,
    id_to_label: HashMap<String, LocalLabel>,
    /// Abstract (cluster) id -> member mention ids
    clusters: HashMap<String, Vec<String>>,
    /// Coreference clusters in corpus order, as mention ids
    coreference_clusters: Vec<Vec<String>>,
    relations: Vec<RawRelation>,
}

impl Document {
    /// Number mentions and assemble a document
    ///
    /// Events and time expressions are each sorted by (sentence, start offset);
    /// the sort is stable, so ties keep corpus order.
    pub fn new(
        id: impl Into<String>,
        sentences: Vec<Vec<String>>,
        join: TokenJoin,
        events: Vec<MentionRecord>,
        timexes: Vec<MentionRecord>,
    ) -> Self {
        let events = Self::number(events, LabelKind::Event);
        let timexes = Self::number(timexes, LabelKind::Timex);

        let mut id_to_label = HashMap::new();
        for mention in events.iter().chain(timexes.iter()) {
            id_to_label.insert(mention.id.clone(), mention.label);
        }

        Self {
            id: id.into(),
            sentences,
            join,
            events,
            timexes,
            id_to_label,
            clusters: HashMap::new(),
            coreference_clusters: Vec::new(),
            relations: Vec::new(),
        }
    }

    fn number(mut records: Vec<MentionRecord>, kind: LabelKind) -> Vec<Mention> {
        records.sort_by_key(|m| (m.sent_id, m.offset.0));
        records
            .into_iter()
            .enumerate()
            .map(|(rank, m)| Mention {
                id: m.id,
                label: LocalLabel { kind, rank },
                sent_id: m.sent_id,
                offset: m.offset,
                text: m.text,
            })
            .collect()
    }

    /// Register an abstract id standing for several mentions
    ///
    /// When `coreferent` is set the members also form a coreference cluster.
    pub fn add_cluster(&mut self, cluster_id: impl Into<String>, members: Vec<String>, coreferent: bool) {
        if coreferent {
            self.coreference_clusters.push(members.clone());
        }
        self.clusters.insert(cluster_id.into(), members);
    }

    /// Record a raw relation annotation
    pub fn add_relation(&mut self, kind: RelationKind, source: impl Into<String>, target: impl Into<String>) {
        self.relations.push(RawRelation {
            kind,
            source: source.into(),
            target: target.into(),
        });
    }

    pub fn events(&self) -> &[Mention] {
        &self.events
    }

    pub fn timexes(&self) -> &[Mention] {
        &self.timexes
    }

    pub fn relations(&self) -> &[RawRelation] {
        &self.relations
    }

    pub fn coreference_clusters(&self) -> &[Vec<String>] {
        &self.coreference_clusters
    }

    pub fn sentences(&self) -> &[Vec<String>] {
        &self.sentences
    }

    /// Local label of a mention id
    pub fn label_of(&self, mention_id: &str) -> Option<LocalLabel> {
        self.id_to_label.get(mention_id).copied()
    }

    /// Mention behind a local label
    pub fn mention(&self, label: LocalLabel) -> Option<&Mention> {
        match label.kind {
            LabelKind::Event => self.events.get(label.rank),
            LabelKind::Timex => self.timexes.get(label.rank),
        }
    }

    /// Resolve a corpus id (cluster or mention) to the labels it stands for
    ///
    /// Returns `None` when the id is unknown.
    pub fn expand(&self, id: &str) -> Option<Vec<LocalLabel>> {
        match self.clusters.get(id) {
            Some(members) => Some(members.iter().filter_map(|m| self.label_of(m)).collect()),
            None => self.label_of(id).map(|label| vec![label]),
        }
    }

    /// Render the document text with the given mentions wrapped in tags
    ///
    /// `tagged` must be in document order; labels without a mention are ignored.
    pub fn render_tagged(&self, tagged: &[LocalLabel]) -> String {
        let separator = self.join.separator();
        let mentions: Vec<&Mention> = tagged.iter().filter_map(|l| self.mention(*l)).collect();

        let mut rendered = Vec::with_capacity(self.sentences.len());
        for (sent_id, sentence) in self.sentences.iter().enumerate() {
            let mut pieces: Vec<String> = Vec::new();
            let mut cursor = 0;

            for mention in mentions.iter().filter(|m| m.sent_id == sent_id) {
                let (start, end) = Self::clamp_span(mention.offset, cursor, sentence.len());
                pieces.extend(sentence[cursor..start].iter().cloned());
                let span = sentence[start..end].join(separator);
                pieces.push(format!("<{} {}>", mention.label, span));
                cursor = end;
            }
            pieces.extend(sentence[cursor..].iter().cloned());
            rendered.push(pieces.join(separator));
        }

        rendered.join(" ")
    }

    /// Keep a span inside the sentence and behind the cursor
    ///
    /// Overlapping spans are cut at the end of the previous tag so no token is
    /// emitted twice; a span lying wholly inside the previous one renders as an
    /// empty tag that still carries its label.
    fn clamp_span(offset: (usize, usize), cursor: usize, len: usize) -> (usize, usize) {
        let start = offset.0.clamp(cursor, len);
        let end = offset.1.clamp(start, len);
        (start, end)
    }
}

impl TagLookup for Document {
    fn mention_text(&self, label: LocalLabel) -> Option<&str> {
        self.mention(label).map(|m| m.text.as_str())
    }
}
