//! Key resolution: from raw line text around a cursor to translation values.
//!
//! All entry points are pure functions of the line text, the cursor offset,
//! the [`MatchSpec`] and a [`DocumentSet`] snapshot. Offsets are character
//! offsets into the line. Every label is resolved independently; a miss in
//! one document never hides results from another.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{
    Document, DocumentError, DocumentSet, DottedKey, MatchSpec, children, is_container,
    render_value, trim_quotes,
};

/// A run of reference characters within a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
    pub text: String,
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// The maximal run of `[A-Za-z0-9_.]` containing the cursor at `offset`.
///
/// The run covers reference characters before the cursor and from the
/// cursor onwards. Returns `None` when the cursor touches no such character.
pub fn extract_reference_span(line: &str, offset: usize) -> Option<Span> {
    let chars: Vec<char> = line.chars().collect();
    let offset = offset.min(chars.len());

    let start = run_start(&chars, offset);
    let end = chars[offset..]
        .iter()
        .position(|c| !is_reference_char(*c))
        .map_or(chars.len(), |i| offset + i);

    make_span(&chars, start, end)
}

/// The run of reference characters ending right before the completion
/// trigger `.` at `dot_offset`.
pub fn span_before(line: &str, dot_offset: usize) -> Option<Span> {
    let chars: Vec<char> = line.chars().collect();
    let end = dot_offset.min(chars.len());
    make_span(&chars, run_start(&chars, end), end)
}

fn run_start(chars: &[char], offset: usize) -> usize {
    chars[..offset]
        .iter()
        .rposition(|c| !is_reference_char(*c))
        .map_or(0, |i| i + 1)
}

fn make_span(chars: &[char], start: usize, end: usize) -> Option<Span> {
    (start < end).then(|| Span {
        start,
        end,
        text: chars[start..end].iter().collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverEntry {
    pub label: String,
    pub value: String,
}

/// Values of one key across every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub span: Span,
    pub key: DottedKey,
    pub entries: Vec<HoverEntry>,
}

impl Hover {
    /// `label: value` lines in document order.
    pub fn contents(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.label, e.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Child key to insert after the trigger `.`.
    pub key: String,
    /// Full dotted key of the child.
    pub path: DottedKey,
    /// One `label: value` line per document where the child is a leaf.
    pub documentation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub parent: DottedKey,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionTarget {
    pub label: String,
    pub file_path: PathBuf,
    /// Zero-based line number.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub span: Span,
    pub key: DottedKey,
    pub targets: Vec<DefinitionTarget>,
}

/// Resolves references against a snapshot of loaded documents.
pub struct Resolver<'a> {
    spec: &'a MatchSpec,
    docs: &'a DocumentSet,
}

impl<'a> Resolver<'a> {
    pub fn new(spec: &'a MatchSpec, docs: &'a DocumentSet) -> Self {
        Self { spec, docs }
    }

    /// Documents that loaded successfully, in enumeration order.
    fn documents(&self) -> impl Iterator<Item = &'a Document> + 'a {
        self.docs
            .values()
            .map(|doc| doc.as_ref())
            .filter(|doc| doc.error.is_none())
    }

    /// Pick the key a span most likely denotes.
    ///
    /// The prefix-stripped key is preferred; the literal span is tried next,
    /// for call sites that pass a bare key such as `'CONTROLL.buy' | translate`.
    /// The first candidate present in any document wins.
    pub fn resolve_best_key(&self, span: &str) -> Option<DottedKey> {
        let mut candidates: Vec<DottedKey> = Vec::with_capacity(2);
        if let Some(key) = self.spec.extract_key(span) {
            candidates.push(key);
        }
        let literal = DottedKey::new(trim_quotes(span));
        if !candidates.contains(&literal) {
            candidates.push(literal);
        }

        let found = candidates
            .into_iter()
            .find(|key| self.documents().any(|doc| doc.tree.contains(key)));
        debug!(text = span, key = ?found, "resolved best key");
        found
    }

    pub fn hover_at(&self, line: &str, offset: usize) -> Option<Hover> {
        let span = extract_reference_span(line, offset)?;
        let key = self.resolve_best_key(&span.text)?;

        let entries: Vec<HoverEntry> = self
            .documents()
            .filter_map(|doc| {
                doc.tree.lookup(&key).map(|value| HoverEntry {
                    label: doc.label.clone(),
                    value: render_value(value),
                })
            })
            .collect();

        if entries.is_empty() {
            return None;
        }
        Some(Hover { span, key, entries })
    }

    /// Child keys of the node referenced just before the trigger `.`.
    ///
    /// Only prefixed references complete; the literal fallback does not apply.
    pub fn completions_at(&self, line: &str, dot_offset: usize) -> Option<Completion> {
        let span = span_before(line, dot_offset)?;
        let parent = self.spec.extract_key(&span.text)?;

        let mut suggestions: IndexMap<String, Suggestion> = IndexMap::new();
        for doc in self.documents() {
            let Some(node) = doc.tree.lookup(&parent) else {
                continue;
            };
            if !is_container(node) {
                continue;
            }
            for (child, value) in children(node) {
                let suggestion = suggestions
                    .entry(child.clone())
                    .or_insert_with(|| Suggestion {
                        path: child_key(&parent, &child),
                        key: child,
                        documentation: Vec::new(),
                    });
                if !is_container(value) {
                    suggestion
                        .documentation
                        .push(format!("{}: {}", doc.label, render_value(value)));
                }
            }
        }

        Some(Completion {
            parent,
            suggestions: suggestions.into_values().collect(),
        })
    }

    /// Lines in each document's source where the key under the cursor is
    /// defined.
    ///
    /// A key matches the first line containing its quoted last segment. The
    /// root key has no segment to search for and targets line 0 of every
    /// loaded document.
    ///
    /// `read_source` supplies the raw text of a document; a read failure
    /// skips that document.
    pub fn definition_at<F>(&self, line: &str, offset: usize, mut read_source: F) -> Option<Definition>
    where
        F: FnMut(&Document) -> Result<String, DocumentError>,
    {
        let span = extract_reference_span(line, offset)?;
        let key = self.resolve_best_key(&span.text)?;
        let needle = key.last_segment().map(|segment| format!("\"{segment}\""));

        let mut targets = Vec::new();
        for doc in self.documents() {
            if !doc.tree.contains(&key) {
                continue;
            }
            let found = match &needle {
                // The root key points at the top of the file.
                None => Some(0),
                Some(needle) => match read_source(doc) {
                    Ok(source) => find_line(&source, needle),
                    Err(err) => {
                        warn!(label = %doc.label, "{err}");
                        continue;
                    }
                },
            };
            match found {
                Some(line) => targets.push(DefinitionTarget {
                    label: doc.label.clone(),
                    file_path: doc.path.clone(),
                    line,
                }),
                None => debug!(label = %doc.label, key = %key, "no source line for key"),
            }
        }

        if targets.is_empty() {
            return None;
        }
        Some(Definition { span, key, targets })
    }
}

fn child_key(parent: &DottedKey, child: &str) -> DottedKey {
    if parent.is_root() {
        DottedKey::new(child)
    } else {
        DottedKey::new(format!("{parent}.{child}"))
    }
}

/// Zero-based index of the first line containing `needle`.
fn find_line(source: &str, needle: &str) -> Option<usize> {
    source.lines().position(|line| line.contains(needle))
}
