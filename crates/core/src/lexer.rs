//! Total lexer for mspec source text.
//!
//! Every byte of the input lands in exactly one token, comments and
//! whitespace included, so concatenating the token texts in order
//! reproduces the document. Unrecognized characters become `Unknown`
//! tokens instead of errors; there is no failure path.

use crate::keywords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    StringLiteral,
    Operator,
    Bracket,
    Comment,
    Whitespace,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    /// True for tokens the grammar cares about (everything except
    /// comments and whitespace).
    pub fn is_significant(&self) -> bool {
        !matches!(self.kind, TokenKind::Comment | TokenKind::Whitespace)
    }

    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier)
    }
}

pub fn lex(text: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let len = text.len();
    let offset_at = |i: usize| if i < chars.len() { chars[i].0 } else { len };

    let mut tokens = Vec::new();
    let mut pos = 0usize;

    let push = |kind: TokenKind, start: usize, end: usize, tokens: &mut Vec<Token>| {
        tokens.push(Token {
            kind,
            text: text[start..end].to_owned(),
            start,
            end,
        });
    };

    while pos < chars.len() {
        let (start, c) = chars[pos];

        // Line comment
        if c == '/' && pos + 1 < chars.len() && chars[pos + 1].1 == '/' {
            while pos < chars.len() && chars[pos].1 != '\n' {
                pos += 1;
            }
            push(TokenKind::Comment, start, offset_at(pos), &mut tokens);
            continue;
        }

        // Block comment; an unterminated one runs to end of input
        if c == '/' && pos + 1 < chars.len() && chars[pos + 1].1 == '*' {
            pos += 2;
            while pos < chars.len() {
                if chars[pos].1 == '*' && pos + 1 < chars.len() && chars[pos + 1].1 == '/' {
                    pos += 2;
                    break;
                }
                pos += 1;
            }
            push(TokenKind::Comment, start, offset_at(pos), &mut tokens);
            continue;
        }

        // Whitespace run
        if c.is_whitespace() {
            while pos < chars.len() && chars[pos].1.is_whitespace() {
                pos += 1;
            }
            push(TokenKind::Whitespace, start, offset_at(pos), &mut tokens);
            continue;
        }

        // String literal: single-quoted, closed by `'` or cut off at
        // end of line / end of input
        if c == '\'' {
            pos += 1;
            while pos < chars.len() && chars[pos].1 != '\'' && chars[pos].1 != '\n' {
                pos += 1;
            }
            if pos < chars.len() && chars[pos].1 == '\'' {
                pos += 1;
            }
            push(TokenKind::StringLiteral, start, offset_at(pos), &mut tokens);
            continue;
        }

        // Number: unsigned decimal digits
        if c.is_ascii_digit() {
            while pos < chars.len() && chars[pos].1.is_ascii_digit() {
                pos += 1;
            }
            push(TokenKind::Number, start, offset_at(pos), &mut tokens);
            continue;
        }

        // Identifier or keyword: [A-Za-z][A-Za-z0-9_-]*
        if c.is_ascii_alphabetic() {
            pos += 1;
            while pos < chars.len() {
                let ch = chars[pos].1;
                if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                    pos += 1;
                } else {
                    break;
                }
            }
            let end = offset_at(pos);
            let kind = if keywords::is_keyword(&text[start..end]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            push(kind, start, end, &mut tokens);
            continue;
        }

        // Brackets
        if matches!(c, '[' | ']' | '(' | ')' | '{' | '}') {
            pos += 1;
            push(TokenKind::Bracket, start, offset_at(pos), &mut tokens);
            continue;
        }

        // Two-character operators
        if pos + 1 < chars.len() {
            let pair = [c, chars[pos + 1].1];
            if matches!(
                pair,
                ['=', '=']
                    | ['!', '=']
                    | ['>', '>']
                    | ['<', '<']
                    | ['>', '=']
                    | ['<', '=']
                    | ['&', '&']
                    | ['|', '|']
            ) {
                pos += 2;
                push(TokenKind::Operator, start, offset_at(pos), &mut tokens);
                continue;
            }
        }

        // Single-character operators
        if matches!(
            c,
            '=' | ','
                | '.'
                | '?'
                | ':'
                | '!'
                | '+'
                | '-'
                | '/'
                | '^'
                | '>'
                | '<'
                | '&'
                | '|'
                | '%'
                | '*'
                | '"'
        ) {
            pos += 1;
            push(TokenKind::Operator, start, offset_at(pos), &mut tokens);
            continue;
        }

        // Anything else is a single Unknown token
        pos += 1;
        push(TokenKind::Unknown, start, offset_at(pos), &mut tokens);
    }

    tokens
}
