//! Type-reference resolution and go-to-definition.
//!
//! Resolution is a pure function of a parse tree and a symbol index:
//! primitives win first, then definitions in the current document,
//! then definitions in other in-scope documents in the caller's
//! supplied order. Only field kinds that take a type reference produce
//! occurrences; data-type positions (`checksum`, `padding`,
//! `reserved`, `unknown`) and plain case labels never resolve against
//! the registry.

use crate::ast::{Field, Primitive, TypeRef};
use crate::finding::Span;
use crate::index::{Symbol, SymbolIndex};
use crate::parser::Parse;

/// How a type-reference occurrence resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Primitive(Primitive),
    /// Defined in the current document.
    Local(&'a Symbol),
    /// Defined in another in-scope document.
    External(&'a Symbol),
    Undefined,
}

/// A definition site in some document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub doc: String,
    pub span: Span,
}

/// Classify a type name from the viewpoint of document `doc`.
pub fn classify<'a>(name: &str, doc: &str, index: &'a SymbolIndex) -> Resolution<'a> {
    if let Some(primitive) = Primitive::from_keyword(name) {
        return Resolution::Primitive(primitive);
    }
    let candidates = index.candidates(name);
    if let Some(symbol) = candidates.iter().find(|s| s.doc == doc) {
        return Resolution::Local(symbol);
    }
    if let Some(symbol) = candidates.first() {
        return Resolution::External(symbol);
    }
    Resolution::Undefined
}

/// The type-reference occurrence containing `offset`, if any.
pub fn type_ref_at(parse: &Parse, offset: usize) -> Option<&TypeRef> {
    fn search(fields: &[Field], offset: usize) -> Option<&TypeRef> {
        for field in fields {
            if field.kind.takes_type_reference() {
                if let Some(type_ref) = &field.type_ref {
                    if type_ref.span().contains(offset) {
                        return Some(type_ref);
                    }
                }
            }
            for case in &field.cases {
                if let Some(found) = search(&case.fields, offset) {
                    return Some(found);
                }
            }
        }
        None
    }
    parse
        .definitions
        .iter()
        .find_map(|def| search(&def.fields, offset))
}

/// Resolve the type-reference occurrence at `offset` in document
/// `doc`. Returns `None` when the offset is not inside one.
pub fn resolve_at<'a>(
    parse: &Parse,
    doc: &str,
    offset: usize,
    index: &'a SymbolIndex,
) -> Option<Resolution<'a>> {
    match type_ref_at(parse, offset)? {
        TypeRef::Primitive { kind, .. } => Some(Resolution::Primitive(*kind)),
        TypeRef::Named { name, .. } => Some(classify(name, doc, index)),
    }
}

/// The definition site for the occurrence at `offset`: the name token
/// of the resolved definition. Nothing for primitives and unresolved
/// names.
pub fn goto_definition(
    parse: &Parse,
    doc: &str,
    offset: usize,
    index: &SymbolIndex,
) -> Option<Location> {
    match resolve_at(parse, doc, offset, index)? {
        Resolution::Local(symbol) | Resolution::External(symbol) => Some(Location {
            doc: symbol.doc.clone(),
            span: symbol.span,
        }),
        Resolution::Primitive(_) | Resolution::Undefined => None,
    }
}
