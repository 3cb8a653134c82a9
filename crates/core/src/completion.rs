//! Completion-context inference.
//!
//! Determines the grammar production active at a cursor offset from
//! the token stream and the shared keyword tables, the same tables
//! the parser runs on, not a separate set of text heuristics. The
//! innermost unclosed `[` before the cursor decides the context; the
//! tokens between it and the cursor are matched against the field
//! production.

use crate::ast::{FieldKind, Primitive};
use crate::index::SymbolIndex;
use crate::keywords;
use crate::lexer::{Token, TokenKind};

/// The grammar production active at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Right after `[` at document top level.
    DefinitionKeyword,
    /// Right after `[` nested in a definition body.
    FieldKeyword,
    /// Right after a field keyword that takes a type.
    DataType,
    /// After `<typeRef> <fieldName>` in an `array`/`manualArray` head.
    ArrayLoopType,
    Unknown,
}

/// Classify the grammar context at `offset`.
pub fn completion_context(tokens: &[Token], offset: usize) -> Context {
    // Tokens fully before the cursor; a token the cursor touches is
    // still being typed and stays out of the classification.
    let sig: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.is_significant() && t.end <= offset)
        .collect();

    // Stack of unclosed `[` positions (indices into `sig`).
    let mut stack: Vec<usize> = Vec::new();
    for (i, t) in sig.iter().enumerate() {
        if t.kind == TokenKind::Bracket {
            match t.text.as_str() {
                "[" => stack.push(i),
                "]" => {
                    stack.pop();
                }
                _ => {}
            }
        }
    }
    let Some(&open) = stack.last() else {
        return Context::Unknown;
    };
    let depth = stack.len();
    let content = &sig[open + 1..];

    // Nothing after the bracket yet: keyword position.
    if content.is_empty() {
        return if depth == 1 {
            Context::DefinitionKeyword
        } else {
            Context::FieldKeyword
        };
    }

    let first = content[0];
    if !first.is_word() {
        return Context::Unknown;
    }
    // The cursor glued to the keyword means the keyword itself is
    // still being completed.
    if content.len() == 1 && first.end == offset {
        return Context::Unknown;
    }

    let word = first.text.as_str();
    if depth == 1 && keywords::is_definition_keyword(word) {
        // `[type <cursor>` / `[enum <cursor>`: naming position.
        return Context::Unknown;
    }

    if let Some(kind) = FieldKind::from_keyword(word) {
        if kind.is_array() {
            if let Some(context) = array_head_context(content, offset) {
                return context;
            }
        }
        if content.len() == 1 && (kind.takes_type_reference() || kind.takes_data_type()) {
            return Context::DataType;
        }
    }

    Context::Unknown
}

/// Match `array|manualArray <typeRef> <fieldName> <cursor>`; anything
/// shorter or longer is not the loop-keyword position.
fn array_head_context(content: &[&Token], offset: usize) -> Option<Context> {
    let mut i = 1;
    let type_tok = content.get(i)?;
    if !type_tok.is_word() {
        return None;
    }
    i += 1;
    if let Some(primitive) = Primitive::from_keyword(&type_tok.text) {
        if primitive.is_sized() {
            if matches!(content.get(i), Some(t) if t.kind == TokenKind::Number) {
                i += 1;
            }
        }
    }
    let name_tok = content.get(i)?;
    if !name_tok.is_word() {
        return None;
    }
    i += 1;
    if i == content.len() && name_tok.end < offset {
        return Some(Context::ArrayLoopType);
    }
    None
}

/// The context at `offset` plus the syntactically valid candidates:
/// keywords for keyword positions, the primitives plus every indexed
/// name for type positions, and the union of all three sets when the
/// context is unknown.
pub fn completions(
    tokens: &[Token],
    offset: usize,
    index: &SymbolIndex,
) -> (Context, Vec<String>) {
    let context = completion_context(tokens, offset);
    let mut names: Vec<String> = Vec::new();

    let push_all = |set: &[&str], names: &mut Vec<String>| {
        names.extend(set.iter().map(|s| (*s).to_owned()));
    };

    match context {
        Context::DefinitionKeyword => push_all(keywords::DEFINITION_KEYWORDS, &mut names),
        Context::FieldKeyword => push_all(keywords::FIELD_KEYWORDS, &mut names),
        Context::ArrayLoopType => push_all(keywords::ARRAY_LOOP_TYPES, &mut names),
        Context::DataType => {
            push_all(keywords::PRIMITIVE_TYPES, &mut names);
            names.extend(indexed_names(index));
        }
        Context::Unknown => {
            push_all(keywords::DEFINITION_KEYWORDS, &mut names);
            push_all(keywords::FIELD_KEYWORDS, &mut names);
            push_all(keywords::PRIMITIVE_TYPES, &mut names);
            names.extend(indexed_names(index));
        }
    }

    (context, names)
}

fn indexed_names(index: &SymbolIndex) -> Vec<String> {
    let mut names: Vec<String> = index.names().map(str::to_owned).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{build_index, SymbolIndex};
    use crate::lexer::lex;
    use crate::parser::parse;

    fn context_at_end(src: &str) -> Context {
        completion_context(&lex(src), src.len())
    }

    fn index_of(src: &str) -> SymbolIndex {
        let p = parse(&lex(src));
        build_index(&[("a.mspec", &p)])
    }

    #[test]
    fn open_bracket_at_top_level_offers_definitions() {
        assert_eq!(context_at_end("["), Context::DefinitionKeyword);
        assert_eq!(context_at_end("[type Done]\n["), Context::DefinitionKeyword);
    }

    #[test]
    fn open_bracket_in_a_body_offers_fields() {
        assert_eq!(context_at_end("[type Foo\n  ["), Context::FieldKeyword);
        assert_eq!(
            context_at_end("[type Foo [simple uint 8 x] ["),
            Context::FieldKeyword
        );
    }

    #[test]
    fn after_a_type_taking_keyword_offers_data_types() {
        assert_eq!(context_at_end("[type Foo [simple "), Context::DataType);
        assert_eq!(context_at_end("[type Foo [checksum "), Context::DataType);
    }

    #[test]
    fn cursor_glued_to_the_keyword_is_still_typing_it() {
        assert_eq!(context_at_end("[type Foo [simple"), Context::Unknown);
    }

    #[test]
    fn array_head_reaches_the_loop_keyword_position() {
        assert_eq!(
            context_at_end("[type Foo [array uint 8 items "),
            Context::ArrayLoopType
        );
        assert_eq!(
            context_at_end("[type Foo [manualArray Item items "),
            Context::ArrayLoopType
        );
        // Not yet past the field name.
        assert_eq!(context_at_end("[type Foo [array uint 8 "), Context::Unknown);
        // Already past the loop keyword.
        assert_eq!(
            context_at_end("[type Foo [array uint 8 items count "),
            Context::Unknown
        );
    }

    #[test]
    fn loop_candidates_are_exactly_the_three_keywords() {
        let src = "[type Foo [array uint 8 items ";
        let (context, names) = completions(&lex(src), src.len(), &SymbolIndex::default());
        assert_eq!(context, Context::ArrayLoopType);
        assert_eq!(names, vec!["count", "length", "terminated"]);
    }

    #[test]
    fn data_type_candidates_include_indexed_names() {
        let index = index_of("[type Item] [enum uint 8 Color]");
        let src = "[type Foo [simple ";
        let (context, names) = completions(&lex(src), src.len(), &index);
        assert_eq!(context, Context::DataType);
        assert!(names.iter().any(|n| n == "uint"));
        assert!(names.iter().any(|n| n == "Item"));
        assert!(names.iter().any(|n| n == "Color"));
    }

    #[test]
    fn naming_position_after_a_definition_keyword_is_unknown() {
        assert_eq!(context_at_end("[type "), Context::Unknown);
        assert_eq!(context_at_end("[enum "), Context::Unknown);
    }

    #[test]
    fn top_level_outside_brackets_is_unknown() {
        assert_eq!(context_at_end("[type Done] "), Context::Unknown);
        assert_eq!(context_at_end(""), Context::Unknown);
    }

    #[test]
    fn unknown_context_falls_back_to_the_union() {
        let index = index_of("[type Item]");
        let (context, names) = completions(&lex(""), 0, &index);
        assert_eq!(context, Context::Unknown);
        assert!(names.iter().any(|n| n == "type"));
        assert!(names.iter().any(|n| n == "simple"));
        assert!(names.iter().any(|n| n == "bit"));
        assert!(names.iter().any(|n| n == "Item"));
    }
}
