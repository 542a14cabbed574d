//! Natural-language rendering of triples and reasoning paths

use super::paths::ReasoningPath;
use crate::document::TagLookup;
use crate::types::{RelationKind, Triple};

/// Literal emitted for an empty relation or path list
pub const NONE_TEXT: &str = "none";

/// Deterministic template rendering
pub struct PathRenderer;

impl PathRenderer {
    /// Render one triple with its relation template
    ///
    /// Returns `None` for relation kinds without a template.
    pub fn render_triple<L>(lookup: &L, triple: &Triple) -> Option<String>
    where
        L: TagLookup + ?Sized,
    {
        let head = lookup.tag(triple.head);
        let tail = lookup.tag(triple.tail);

        match &triple.relation {
            kind if kind.is_coreference() => Some(format!("{} and {} are identical", head, tail)),
            RelationKind::Cause => Some(format!("{} causes {} to occur", head, tail)),
            RelationKind::Precondition => Some(format!("{} is a precondition for {}", head, tail)),
            other => {
                log::debug!("No template for relation {}", other);
                None
            }
        }
    }

    /// Render a relation list or a single path: edges joined by `, `
    pub fn render_path<L>(lookup: &L, path: &[Triple]) -> String
    where
        L: TagLookup + ?Sized,
    {
        let rendered: Vec<String> = path
            .iter()
            .filter_map(|triple| Self::render_triple(lookup, triple))
            .collect();

        if rendered.is_empty() {
            NONE_TEXT.to_string()
        } else {
            rendered.join(", ")
        }
    }

    /// Render several paths: each path as in `render_path`, joined by `; `
    pub fn render_paths<L>(lookup: &L, paths: &[ReasoningPath]) -> String
    where
        L: TagLookup + ?Sized,
    {
        if paths.is_empty() {
            return NONE_TEXT.to_string();
        }
        paths
            .iter()
            .map(|path| Self::render_path(lookup, path))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
