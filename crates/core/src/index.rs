//! Cross-document symbol index.
//!
//! Built fresh from the ordered set of in-scope parses; no caching, no
//! hidden state. Besides the literal definition names, the index
//! synthesizes one derived name per `*`-marked type-switch case:
//! `<definition name><case name>`, concatenated without a separator.
//! Name collisions are kept as multiple candidates in document scan
//! order; disambiguation is the resolver's job.

use std::collections::HashMap;

use crate::ast::DefinitionKind;
use crate::finding::Span;
use crate::parser::Parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    DiscriminatedType,
    DataIo,
    Enum,
    /// Derived subtype introduced by a starred type-switch case.
    Case,
}

impl SymbolKind {
    fn of(kind: DefinitionKind) -> SymbolKind {
        match kind {
            DefinitionKind::Type => SymbolKind::Type,
            DefinitionKind::DiscriminatedType => SymbolKind::DiscriminatedType,
            DefinitionKind::DataIo => SymbolKind::DataIo,
            DefinitionKind::Enum => SymbolKind::Enum,
        }
    }
}

/// One named definition known to the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Id of the document the definition lives in.
    pub doc: String,
    /// Range of the name token (for derived case symbols, of the case
    /// name inside the type switch).
    pub span: Span,
    /// Owning definition name, for derived case symbols.
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    by_name: HashMap<String, Vec<Symbol>>,
}

impl SymbolIndex {
    /// Build the index over the in-scope documents, in the caller's
    /// scope order.
    pub fn build(documents: &[(&str, &Parse)]) -> SymbolIndex {
        build_index(documents)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All candidates for a name, in document scan order.
    pub fn candidates(&self, name: &str) -> &[Symbol] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first candidate by scan order, if any.
    pub fn first(&self, name: &str) -> Option<&Symbol> {
        self.candidates(name).first()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn insert(&mut self, symbol: Symbol) {
        self.by_name.entry(symbol.name.clone()).or_default().push(symbol);
    }
}

pub fn build_index(documents: &[(&str, &Parse)]) -> SymbolIndex {
    let mut index = SymbolIndex::default();

    for (doc, parse) in documents {
        for def in &parse.definitions {
            index.insert(Symbol {
                name: def.name.clone(),
                kind: SymbolKind::of(def.kind),
                doc: (*doc).to_owned(),
                span: def.name_span,
                parent: None,
            });

            // Starred cases introduce derived subtypes, at any nesting
            // depth; the parent is always the containing definition.
            def.for_each_field(&mut |field| {
                for case in &field.cases {
                    let Some(case_name) = &case.name else { continue };
                    if !case_name.starred {
                        continue;
                    }
                    index.insert(Symbol {
                        name: format!("{}{}", def.name, case_name.text),
                        kind: SymbolKind::Case,
                        doc: (*doc).to_owned(),
                        span: case_name.span,
                        parent: Some(def.name.clone()),
                    });
                }
            });
        }
    }

    index
}
