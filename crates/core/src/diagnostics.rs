//! Validation rules over a parse tree and a symbol index.
//!
//! `diagnose` is recomputed from scratch whenever any in-scope
//! document changes; it carries the parser's structural findings
//! through and adds the semantic rules on top. Everything comes back
//! as plain `Finding` values; nothing here can fail.

use crate::ast::TypeRef;
use crate::finding::{Finding, FindingKind};
use crate::index::SymbolIndex;
use crate::parser::Parse;
use crate::resolve::{classify, Resolution};

/// Run all validation rules for document `doc`.
///
/// Rules, per occurrence:
/// - a sized primitive without its integer size token (including the
///   data types of `checksum`/`padding`/`reserved`/`unknown` fields)
///   is a `MissingSizeParameter` error;
/// - a named reference that resolves nowhere is an `UndefinedType`
///   error, only in field kinds that take type references;
/// - a named reference defined in another in-scope document is an
///   `ExternalTypeInfo` note, so hosts can style it differently.
pub fn diagnose(parse: &Parse, doc: &str, index: &SymbolIndex) -> Vec<Finding> {
    let mut findings = parse.errors.clone();

    for def in &parse.definitions {
        def.for_each_field(&mut |field| {
            let Some(type_ref) = &field.type_ref else {
                return;
            };
            match type_ref {
                TypeRef::Primitive { kind, size, span } => {
                    if kind.is_sized() && size.is_none() {
                        findings.push(Finding::new(
                            FindingKind::MissingSizeParameter,
                            *span,
                            format!(
                                "Type '{kw}' requires a size parameter (e.g., '{kw} 8')",
                                kw = kind.keyword()
                            ),
                        ));
                    }
                }
                TypeRef::Named { name, span } => {
                    if !field.kind.takes_type_reference() {
                        return;
                    }
                    match classify(name, doc, index) {
                        Resolution::Undefined => findings.push(Finding::new(
                            FindingKind::UndefinedType,
                            *span,
                            format!(
                                "Undefined type '{name}'. Type must be defined with \
                                 [type {name}], [enum {name}], or similar."
                            ),
                        )),
                        Resolution::External(symbol) => findings.push(Finding::new(
                            FindingKind::ExternalTypeInfo,
                            *span,
                            format!("Type '{}' is defined in '{}'", name, symbol.doc),
                        )),
                        Resolution::Primitive(_) | Resolution::Local(_) => {}
                    }
                }
            }
        });
    }

    findings
}
