//! Tolerant recursive-descent parser for mspec documents.
//!
//! The parser never fails: on a production mismatch it records a
//! `Syntax` finding, emits a best-effort node where one can be built,
//! and resynchronizes at the next `[` that opens a recognized
//! definition keyword. Expression bodies (`assert`, `validation`,
//! const values, array loop expressions) are out of scope and skipped
//! as opaque balanced-bracket spans.

use crate::ast::*;
use crate::finding::{Finding, Span};
use crate::keywords;
use crate::lexer::{Token, TokenKind};

/// Parser output: the definition tree plus the structural findings
/// collected while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    pub definitions: Vec<Definition>,
    pub errors: Vec<Finding>,
}

pub fn parse(tokens: &[Token]) -> Parse {
    let mut p = Parser::new(tokens);
    p.parse_document()
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    /// Significant tokens only; comments and whitespace are dropped.
    tokens: Vec<&'a Token>,
    pos: usize,
    /// End offset of the input, for anchoring end-of-input findings.
    end: usize,
    errors: Vec<Finding>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens: tokens.iter().filter(|t| t.is_significant()).collect(),
            pos: 0,
            end: tokens.last().map(|t| t.end).unwrap_or(0),
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos).copied();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn at_open(&self) -> bool {
        matches!(self.peek(), Some(t) if t.kind == TokenKind::Bracket && t.text == "[")
    }

    fn at_close(&self) -> bool {
        matches!(self.peek(), Some(t) if t.kind == TokenKind::Bracket && t.text == "]")
    }

    /// Text of the current token when it is an identifier or keyword.
    fn word(&self) -> Option<&'a str> {
        match self.peek() {
            Some(t) if t.is_word() => Some(&t.text),
            _ => None,
        }
    }

    fn word2(&self) -> Option<&'a str> {
        match self.peek2() {
            Some(t) if t.is_word() => Some(&t.text),
            _ => None,
        }
    }

    fn at_operator(&self, op: &str) -> bool {
        matches!(self.peek(), Some(t) if t.kind == TokenKind::Operator && t.text == op)
    }

    fn span_of(t: &Token) -> Span {
        Span::new(t.start, t.end)
    }

    /// Span of the current token, or a zero-width span at end of input.
    fn here(&self) -> Span {
        match self.peek() {
            Some(t) => Self::span_of(t),
            None => Span::new(self.end, self.end),
        }
    }

    fn error(&mut self, span: Span, message: impl Into<String>) {
        self.errors.push(Finding::syntax(span, message));
    }

    fn take_name(&mut self) -> Option<Name> {
        match self.peek() {
            Some(t) if t.is_word() => {
                self.advance();
                Some(Name {
                    text: t.text.clone(),
                    span: Self::span_of(t),
                })
            }
            _ => None,
        }
    }

    // -- Top level ----------------------------------------------

    fn parse_document(&mut self) -> Parse {
        let mut definitions = Vec::new();
        while let Some(t) = self.peek() {
            if self.at_open() {
                if matches!(self.word2(), Some(w) if keywords::is_definition_keyword(w)) {
                    if let Some(def) = self.parse_definition() {
                        definitions.push(def);
                    }
                } else {
                    let span = self.peek2().map(Self::span_of).unwrap_or(Self::span_of(t));
                    self.error(
                        span,
                        "expected 'type', 'discriminatedType', 'dataIo' or 'enum' after '['",
                    );
                    self.advance();
                    self.skip_to_next_definition();
                }
            } else {
                self.error(
                    Self::span_of(t),
                    format!("expected '[' opening a definition, got '{}'", t.text),
                );
                self.advance();
                self.skip_to_next_definition();
            }
        }
        Parse {
            definitions,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Advance to the next `[` that opens a recognized definition
    /// keyword, without consuming it.
    fn skip_to_next_definition(&mut self) {
        while self.peek().is_some() {
            if self.at_open() && matches!(self.word2(), Some(w) if keywords::is_definition_keyword(w))
            {
                return;
            }
            self.advance();
        }
    }

    /// Consume tokens up to and including the `]` matching an already
    /// consumed `[`, balancing nested square brackets.
    fn skip_balanced_to_close(&mut self) {
        let mut depth: u32 = 0;
        loop {
            if self.at_open() {
                depth += 1;
                self.advance();
            } else if self.at_close() {
                self.advance();
                if depth == 0 {
                    return;
                }
                depth -= 1;
            } else if self.advance().is_none() {
                let span = Span::new(self.end, self.end);
                self.error(span, "unexpected end of input, unclosed '['");
                return;
            }
        }
    }

    // -- Definitions --------------------------------------------

    fn parse_definition(&mut self) -> Option<Definition> {
        self.advance(); // '['
        let kw = self.advance()?; // definition keyword, checked by the caller
        let kind = DefinitionKind::from_keyword(&kw.text)?;
        match kind {
            DefinitionKind::Enum => self.parse_enum(),
            _ => self.parse_complex(kind),
        }
    }

    fn parse_complex(&mut self, kind: DefinitionKind) -> Option<Definition> {
        let name = match self.take_name() {
            Some(n) => n,
            None => {
                let span = self.here();
                self.error(span, format!("expected a name after '{}'", kind.keyword()));
                self.skip_balanced_to_close();
                return None;
            }
        };

        let mut fields = Vec::new();
        let mut incomplete = false;
        loop {
            if self.at_close() {
                self.advance();
                break;
            }
            if self.at_open() {
                // An unclosed definition followed by the next one: stop
                // here and let the top level pick it up. `enum` stays a
                // field keyword inside a body.
                if matches!(self.word2(), Some(w) if keywords::is_definition_keyword(w) && w != "enum")
                {
                    let span = self.here();
                    self.error(span, format!("expected ']' to close '{}'", name.text));
                    incomplete = true;
                    break;
                }
                if let Some(field) = self.parse_field() {
                    fields.push(field);
                }
                continue;
            }
            if self.advance().is_none() {
                let span = self.here();
                self.error(span, format!("unexpected end of input in '{}'", name.text));
                incomplete = true;
                break;
            }
        }

        Some(Definition {
            kind,
            name: name.text,
            name_span: name.span,
            base: None,
            constants: Vec::new(),
            fields,
            incomplete,
        })
    }

    fn parse_enum(&mut self) -> Option<Definition> {
        // Optional base type clause. Numeric-sized bases require a size
        // token; non-sized bases take none.
        let mut base = None;
        if let Some(w) = self.word() {
            if let Some(primitive) = Primitive::from_keyword(w) {
                let base_tok = self.advance()?;
                let span = Self::span_of(base_tok);
                let mut size = None;
                if primitive.is_sized() {
                    match self.peek() {
                        Some(t) if t.kind == TokenKind::Number => {
                            self.advance();
                            size = t.text.parse().ok();
                        }
                        _ => {
                            self.error(
                                span,
                                format!(
                                    "enum base type '{}' requires a size",
                                    primitive.keyword()
                                ),
                            );
                        }
                    }
                }
                base = Some(EnumBase {
                    kind: primitive,
                    size,
                    span,
                });
            }
        }

        let name = match self.take_name() {
            Some(n) => n,
            None => {
                let span = self.here();
                self.error(span, "expected a name after 'enum'");
                self.skip_balanced_to_close();
                return None;
            }
        };

        let mut constants = Vec::new();
        let mut incomplete = false;
        loop {
            if self.at_close() {
                self.advance();
                break;
            }
            if self.at_open() {
                if let Some(constant) = self.parse_enum_constant() {
                    constants.push(constant);
                }
                continue;
            }
            if self.advance().is_none() {
                let span = self.here();
                self.error(span, format!("unexpected end of input in '{}'", name.text));
                incomplete = true;
                break;
            }
        }

        Some(Definition {
            kind: DefinitionKind::Enum,
            name: name.text,
            name_span: name.span,
            base,
            constants,
            fields: Vec::new(),
            incomplete,
        })
    }

    fn parse_enum_constant(&mut self) -> Option<EnumConstant> {
        self.advance(); // '['
        let mut value = None;
        if let Some(t) = self.peek() {
            if t.kind == TokenKind::StringLiteral {
                self.advance();
                value = Some(strip_quotes(&t.text));
            }
        }
        let name = self.take_name();
        self.skip_balanced_to_close();
        Some(EnumConstant { value, name })
    }

    // -- Fields -------------------------------------------------

    fn parse_field(&mut self) -> Option<Field> {
        self.advance(); // '['
        let kind = match self.word() {
            Some(w) => match FieldKind::from_keyword(w) {
                Some(kind) => kind,
                None => {
                    let span = self.here();
                    self.error(span, format!("unknown field keyword '{}'", w));
                    self.skip_balanced_to_close();
                    return None;
                }
            },
            None => {
                let span = self.here();
                self.error(span, "expected a field keyword after '['");
                self.skip_balanced_to_close();
                return None;
            }
        };
        let kw_tok = self.advance()?;
        let mut field = Field::new(kind, Self::span_of(kw_tok));

        if kind.takes_type_reference() || kind.takes_data_type() {
            field.type_ref = self.parse_type_ref(kind);
            // `reserved` and `unknown` fields have no name of their own.
            if !matches!(kind, FieldKind::Reserved | FieldKind::Unknown) {
                field.name = self.take_name();
            }
        } else if kind == FieldKind::State {
            field.name = self.take_name();
        } else if kind == FieldKind::TypeSwitch {
            self.parse_type_switch(&mut field);
        }

        if kind.is_array() {
            match self.word() {
                Some(w) if keywords::is_array_loop_type(w) => {
                    field.loop_kind = LoopKind::from_keyword(w);
                    self.advance();
                }
                _ => {
                    let span = self.here();
                    self.error(
                        span,
                        format!(
                            "expected 'count', 'length' or 'terminated' in '{}' field",
                            kind.keyword()
                        ),
                    );
                }
            }
        }

        // Whatever remains (loop expressions, const values, encodings,
        // assert/validation bodies) is an opaque balanced span.
        self.skip_balanced_to_close();
        Some(field)
    }

    fn parse_type_ref(&mut self, kind: FieldKind) -> Option<TypeRef> {
        match self.peek() {
            Some(t) if t.is_word() => {
                if let Some(primitive) = Primitive::from_keyword(&t.text) {
                    self.advance();
                    let span = Self::span_of(t);
                    let mut size = None;
                    if primitive.is_sized() {
                        if let Some(n) = self.peek() {
                            if n.kind == TokenKind::Number {
                                self.advance();
                                size = n.text.parse().ok();
                            }
                        }
                    }
                    Some(TypeRef::Primitive {
                        kind: primitive,
                        size,
                        span,
                    })
                } else {
                    self.advance();
                    Some(TypeRef::Named {
                        name: t.text.clone(),
                        span: Self::span_of(t),
                    })
                }
            }
            _ => {
                let span = self.here();
                self.error(span, format!("expected a type after '{}'", kind.keyword()));
                None
            }
        }
    }

    fn parse_type_switch(&mut self, field: &mut Field) {
        while let Some(name) = self.take_name() {
            field.discriminators.push(name);
            if self.at_operator(",") {
                self.advance();
            }
        }
        if field.discriminators.is_empty() {
            let span = self.here();
            self.error(span, "expected at least one discriminator field name");
        }
        while self.at_open() {
            if matches!(self.peek2(), Some(t) if t.kind == TokenKind::StringLiteral) {
                if let Some(case) = self.parse_case() {
                    field.cases.push(case);
                }
            } else {
                break;
            }
        }
    }

    fn parse_case(&mut self) -> Option<Case> {
        self.advance(); // '['
        let mut values = Vec::new();
        while let Some(t) = self.peek() {
            if t.kind != TokenKind::StringLiteral {
                break;
            }
            self.advance();
            values.push(strip_quotes(&t.text));
            if self.at_operator(",") || self.at_operator("|") {
                self.advance();
            }
        }

        let mut starred = false;
        let mut star_span = None;
        if self.at_operator("*") {
            let star = self.advance()?;
            starred = true;
            star_span = Some(Self::span_of(star));
        }

        let name = match self.take_name() {
            Some(n) => Some(CaseName {
                text: n.text,
                span: n.span,
                starred,
            }),
            None => {
                if let Some(span) = star_span {
                    self.error(span, "expected a case name after '*'");
                }
                None
            }
        };

        let mut fields = Vec::new();
        loop {
            if self.at_close() {
                self.advance();
                break;
            }
            if self.at_open() {
                if let Some(f) = self.parse_field() {
                    fields.push(f);
                }
                continue;
            }
            if self.advance().is_none() {
                let span = self.here();
                self.error(span, "unexpected end of input in case");
                break;
            }
        }

        Some(Case {
            values,
            name,
            fields,
        })
    }
}

/// Drop the surrounding single quotes of a string literal token.
fn strip_quotes(text: &str) -> String {
    let inner = text.strip_prefix('\'').unwrap_or(text);
    inner.strip_suffix('\'').unwrap_or(inner).to_owned()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse_src(src: &str) -> Parse {
        parse(&lex(src))
    }

    #[test]
    fn parses_type_with_simple_fields() {
        let p = parse_src(
            "[type Header\n  [simple uint 8 messageType]\n  [simple Payload payload]\n]",
        );
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        assert_eq!(p.definitions.len(), 1);
        let def = &p.definitions[0];
        assert_eq!(def.kind, DefinitionKind::Type);
        assert_eq!(def.name, "Header");
        assert_eq!(def.fields.len(), 2);
        match &def.fields[0].type_ref {
            Some(TypeRef::Primitive { kind, size, .. }) => {
                assert_eq!(*kind, Primitive::Uint);
                assert_eq!(*size, Some(8));
            }
            other => panic!("expected primitive type ref, got {:?}", other),
        }
        assert_eq!(def.fields[0].name.as_ref().unwrap().text, "messageType");
        match &def.fields[1].type_ref {
            Some(TypeRef::Named { name, .. }) => assert_eq!(name, "Payload"),
            other => panic!("expected named type ref, got {:?}", other),
        }
    }

    #[test]
    fn missing_size_still_produces_a_node() {
        let p = parse_src("[type T [simple uint flags]]");
        assert!(p.errors.is_empty(), "parser must not flag missing sizes");
        match &p.definitions[0].fields[0].type_ref {
            Some(TypeRef::Primitive { size, .. }) => assert_eq!(*size, None),
            other => panic!("expected primitive type ref, got {:?}", other),
        }
        assert_eq!(p.definitions[0].fields[0].name.as_ref().unwrap().text, "flags");
    }

    #[test]
    fn enum_base_type_is_optional() {
        let p = parse_src("[enum Color ['0x01' RED] ['0x02' BLUE]]");
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let def = &p.definitions[0];
        assert_eq!(def.kind, DefinitionKind::Enum);
        assert_eq!(def.name, "Color");
        assert!(def.base.is_none());
        assert_eq!(def.constants.len(), 2);
        assert_eq!(def.constants[0].value.as_deref(), Some("0x01"));
        assert_eq!(def.constants[0].name.as_ref().unwrap().text, "RED");
    }

    #[test]
    fn enum_sized_base_takes_its_size() {
        let p = parse_src("[enum uint 8 Color]");
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let base = p.definitions[0].base.unwrap();
        assert_eq!(base.kind, Primitive::Uint);
        assert_eq!(base.size, Some(8));
        assert_eq!(p.definitions[0].name, "Color");
    }

    #[test]
    fn enum_sized_base_without_size_is_an_anomaly() {
        let p = parse_src("[enum uint Color]");
        assert_eq!(p.errors.len(), 1);
        assert!(p.errors[0].message.contains("requires a size"));
        // The node is still produced, with the name and no silent size.
        let def = &p.definitions[0];
        assert_eq!(def.name, "Color");
        assert_eq!(def.base.unwrap().size, None);
    }

    #[test]
    fn enum_non_sized_base_takes_no_size() {
        let p = parse_src("[enum bit Flag]");
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let base = p.definitions[0].base.unwrap();
        assert_eq!(base.kind, Primitive::Bit);
        assert_eq!(base.size, None);
        assert_eq!(p.definitions[0].name, "Flag");
    }

    #[test]
    fn array_field_carries_its_loop_kind() {
        let p = parse_src("[type T [array uint 8 items count 'len']]");
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let field = &p.definitions[0].fields[0];
        assert_eq!(field.kind, FieldKind::Array);
        assert_eq!(field.loop_kind, Some(LoopKind::Count));
        assert_eq!(field.name.as_ref().unwrap().text, "items");
    }

    #[test]
    fn array_without_loop_type_is_an_anomaly() {
        let p = parse_src("[type T [array uint 8 items]]");
        assert_eq!(p.errors.len(), 1);
        assert!(p.errors[0].message.contains("count"));
        assert_eq!(p.definitions[0].fields[0].loop_kind, None);
    }

    #[test]
    fn type_switch_cases_with_and_without_star() {
        let p = parse_src(
            "[discriminatedType Msg\n  [discriminator uint 8 kind]\n  [typeSwitch kind\n    ['1' *Ping [simple uint 8 seq]]\n    ['2' PONG]\n  ]\n]",
        );
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let switch = &p.definitions[0].fields[1];
        assert_eq!(switch.kind, FieldKind::TypeSwitch);
        assert_eq!(switch.discriminators[0].text, "kind");
        assert_eq!(switch.cases.len(), 2);
        let ping = &switch.cases[0];
        assert_eq!(ping.values, vec!["1"]);
        assert!(ping.name.as_ref().unwrap().starred);
        assert_eq!(ping.name.as_ref().unwrap().text, "Ping");
        assert_eq!(ping.fields.len(), 1);
        let pong = &switch.cases[1];
        assert!(!pong.name.as_ref().unwrap().starred);
        assert_eq!(pong.name.as_ref().unwrap().text, "PONG");
    }

    #[test]
    fn case_with_multiple_discriminator_values() {
        let p = parse_src(
            "[discriminatedType E [typeSwitch a,b ['1','4' *Both] ['2'|'3' Plain]]]",
        );
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let switch = &p.definitions[0].fields[0];
        assert_eq!(switch.discriminators.len(), 2);
        assert_eq!(switch.cases[0].values, vec!["1", "4"]);
        assert_eq!(switch.cases[1].values, vec!["2", "3"]);
    }

    #[test]
    fn assert_and_validation_bodies_are_opaque() {
        let p = parse_src(
            "[type T\n  [assert uint 8 reserved 'reserved == 0x00']\n  [validation 'lengthInBytes >= 8' \"length too short\"]\n]",
        );
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let fields = &p.definitions[0].fields;
        assert_eq!(fields[0].kind, FieldKind::Assert);
        assert!(fields[0].type_ref.is_none());
        assert_eq!(fields[1].kind, FieldKind::Validation);
    }

    #[test]
    fn reserved_and_unknown_take_no_field_name() {
        let p = parse_src("[type T [reserved uint 8 '0x00'] [unknown uint 16]]");
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let fields = &p.definitions[0].fields;
        assert_eq!(fields[0].kind, FieldKind::Reserved);
        assert!(fields[0].name.is_none());
        assert!(matches!(
            fields[0].type_ref,
            Some(TypeRef::Primitive { kind: Primitive::Uint, size: Some(8), .. })
        ));
        assert_eq!(fields[1].kind, FieldKind::Unknown);
        assert!(fields[1].name.is_none());
    }

    #[test]
    fn unknown_field_keyword_is_reported_and_skipped() {
        let p = parse_src("[type T [bogus uint 8 x] [simple uint 8 y]]");
        assert_eq!(p.errors.len(), 1);
        assert!(p.errors[0].message.contains("bogus"));
        assert_eq!(p.definitions[0].fields.len(), 1);
        assert_eq!(p.definitions[0].fields[0].name.as_ref().unwrap().text, "y");
    }

    #[test]
    fn recovers_at_the_next_definition() {
        let p = parse_src("[garbage nonsense] [type Good [simple uint 8 x]]");
        assert!(!p.errors.is_empty());
        assert_eq!(p.definitions.len(), 1);
        assert_eq!(p.definitions[0].name, "Good");
    }

    #[test]
    fn unclosed_definition_is_marked_incomplete() {
        let p = parse_src("[type Broken [simple uint 8 x]\n[type Next]");
        assert_eq!(p.definitions.len(), 2);
        assert!(p.definitions[0].incomplete);
        assert_eq!(p.definitions[0].name, "Broken");
        assert!(!p.definitions[1].incomplete);
        assert!(!p.errors.is_empty());
    }

    #[test]
    fn parse_is_deterministic() {
        let src = "[type A [simple uint 8 x]] [enum uint 8 B ['1' ONE]]";
        let first = parse_src(src);
        let second = parse_src(src);
        assert_eq!(first, second);
    }

    #[test]
    fn enum_as_field_keyword_stays_a_field() {
        let p = parse_src("[type T [enum Color color]]");
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        let field = &p.definitions[0].fields[0];
        assert_eq!(field.kind, FieldKind::EnumField);
        assert!(matches!(&field.type_ref, Some(TypeRef::Named { name, .. }) if name == "Color"));
    }
}
