use serde::{Deserialize, Serialize};

/// Byte range in a document's source text, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    /// A definition or field body that did not match its production.
    Syntax,
    /// A sized primitive (`int`, `uint`, `float`, `ufloat`, `string`)
    /// without the required integer size token.
    MissingSizeParameter,
    /// A type reference that resolves nowhere in scope.
    UndefinedType,
    /// A type reference that resolves in another in-scope document.
    /// Informational, so hosts can style cross-file references.
    ExternalTypeInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Info,
}

/// A validation finding anchored to a token range.
///
/// Findings are plain values: there is no fatal error path anywhere in
/// the crate, so everything the front end has to say about a document
/// comes out as a list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    pub start: usize,
    pub end: usize,
    pub severity: Severity,
}

impl Finding {
    pub fn new(kind: FindingKind, span: Span, message: impl Into<String>) -> Self {
        let severity = match kind {
            FindingKind::ExternalTypeInfo => Severity::Info,
            _ => Severity::Error,
        };
        Finding {
            kind,
            message: message.into(),
            start: span.start,
            end: span.end,
            severity,
        }
    }

    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        Finding::new(FindingKind::Syntax, span, message)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Serialize for host consumption. Always includes every field.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":     format!("{:?}", self.kind),
            "message":  self.message,
            "start":    self.start,
            "end":      self.end,
            "severity": format!("{:?}", self.severity),
        })
    }
}
