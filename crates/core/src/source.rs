//! Documents and the in-scope document boundary.
//!
//! The core never touches the file system: the surrounding tool hands
//! it document texts and decides which documents are in scope for one
//! another (same directory, unioned across every source root that
//! mirrors the same relative path). [`InScopeProvider`] marks that
//! boundary; [`DocumentSet`] is the in-memory implementation used by
//! tests and by hosts that already hold all texts.

use crate::index::{build_index, SymbolIndex};
use crate::lexer::{lex, Token};
use crate::parser::{parse, Parse};

/// One source document: identity, text, and its token sequence.
/// Immutable once built; a text change means building a new one.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Document {
    pub fn new(id: &str, text: &str) -> Document {
        Document {
            id: id.to_owned(),
            text: text.to_owned(),
            tokens: lex(text),
        }
    }
}

/// Supplies the ordered in-scope document ids for a given document.
///
/// How scope is computed (sibling files, source-root mirroring,
/// project configuration) is the host's business; the core only
/// consumes the resulting order. The document itself comes first.
pub trait InScopeProvider {
    fn in_scope(&self, doc: &str) -> Vec<String>;
}

/// An ordered set of documents with their parses, insertion order
/// preserved. Replacing a document re-lexes and re-parses it; the
/// index is rebuilt on request, never cached.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    entries: Vec<(Document, Parse)>,
}

impl DocumentSet {
    pub fn new() -> DocumentSet {
        DocumentSet::default()
    }

    /// Insert a document, or replace it if the id is already present
    /// (the replacement keeps its scope position).
    pub fn insert(&mut self, id: &str, text: &str) {
        let document = Document::new(id, text);
        let tree = parse(&document.tokens);
        if let Some(entry) = self.entries.iter_mut().find(|(d, _)| d.id == id) {
            *entry = (document, tree);
        } else {
            self.entries.push((document, tree));
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|(d, _)| d.id != id);
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.entries.iter().find(|(d, _)| d.id == id).map(|(d, _)| d)
    }

    pub fn tree(&self, id: &str) -> Option<&Parse> {
        self.entries.iter().find(|(d, _)| d.id == id).map(|(_, p)| p)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(d, _)| d.id.as_str())
    }

    /// Build the symbol index over every document, in insertion order.
    pub fn build_index(&self) -> SymbolIndex {
        let refs: Vec<(&str, &Parse)> = self
            .entries
            .iter()
            .map(|(d, p)| (d.id.as_str(), p))
            .collect();
        build_index(&refs)
    }
}

impl InScopeProvider for DocumentSet {
    fn in_scope(&self, doc: &str) -> Vec<String> {
        let mut ids = Vec::new();
        if self.entries.iter().any(|(d, _)| d.id == doc) {
            ids.push(doc.to_owned());
        }
        for (d, _) in &self.entries {
            if d.id != doc {
                ids.push(d.id.clone());
            }
        }
        ids
    }
}
