//! mspec-core: semantic front end for the mspec schema language.
//!
//! mspec describes binary message formats: primitive and sized fields,
//! arrays, enums, discriminated unions (type switches), checksums, and
//! cross-type references. This crate is the grammar-aware core that
//! editor tooling builds on: a lossless lexer, a tolerant structured
//! parser, a cross-document symbol index, reference resolution,
//! diagnostics, and completion-context inference.
//!
//! # Public API
//!
//! Key entry points are re-exported at the crate root:
//!
//! - [`lex()`] -- text to token sequence, total
//! - [`parse()`] -- tokens to definition tree, tolerant
//! - [`build_index()`] -- in-scope parses to [`SymbolIndex`]
//! - [`resolve_at()`] / [`goto_definition()`] -- occurrence queries
//! - [`diagnose()`] -- validation findings for one document
//! - [`completion_context()`] / [`completions()`] -- cursor queries
//!
//! Everything is a pure function of caller-owned, immutable inputs:
//! there is no internal caching, no I/O, and no shared mutable state,
//! so concurrent read-only queries over a frozen document set are
//! safe. When a document's text changes, the caller re-lexes and
//! re-parses it and rebuilds the index before querying again.

/// File extension conventionally used by mspec documents.
pub const MSPEC_FILE_EXTENSION: &str = "mspec";

pub mod ast;
pub mod completion;
pub mod diagnostics;
pub mod finding;
pub mod index;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod resolve;
pub mod source;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Case, CaseName, Definition, DefinitionKind, Field, FieldKind, Primitive, TypeRef};
pub use completion::Context;
pub use finding::{Finding, FindingKind, Severity, Span};
pub use index::{Symbol, SymbolIndex, SymbolKind};
pub use lexer::{Token, TokenKind};
pub use parser::Parse;
pub use resolve::{Location, Resolution};
pub use source::{Document, DocumentSet, InScopeProvider};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use completion::{completion_context, completions};
pub use diagnostics::diagnose;
pub use index::build_index;
pub use lexer::lex;
pub use parser::parse;
pub use resolve::{goto_definition, resolve_at};
