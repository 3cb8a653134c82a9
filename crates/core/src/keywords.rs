//! Keyword tables for the mspec schema language.
//!
//! These slices are the single source of truth shared by the lexer,
//! the parser, diagnostics, and completion. Keyword recognition is
//! case-sensitive throughout.

/// Definition keywords that open a top-level construct.
pub const DEFINITION_KEYWORDS: &[&str] = &["type", "discriminatedType", "dataIo", "enum"];

/// Field keywords that open a field inside a definition body.
pub const FIELD_KEYWORDS: &[&str] = &[
    "abstract",
    "array",
    "assert",
    "checksum",
    "const",
    "discriminator",
    "enum",
    "implicit",
    "manualArray",
    "manual",
    "optional",
    "padding",
    "peek",
    "reserved",
    "simple",
    "state",
    "typeSwitch",
    "unknown",
    "validation",
    "virtual",
];

/// Built-in primitive type keywords.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "bit", "byte", "int", "uint", "vint", "vuint", "float", "ufloat", "string", "vstring", "time",
    "date", "dateTime",
];

/// Primitives that require an explicit bit/byte size token.
pub const SIZED_TYPES: &[&str] = &["int", "uint", "float", "ufloat", "string"];

/// Loop keywords closing an `array`/`manualArray` field header.
pub const ARRAY_LOOP_TYPES: &[&str] = &["count", "length", "terminated"];

pub fn is_definition_keyword(word: &str) -> bool {
    DEFINITION_KEYWORDS.contains(&word)
}

pub fn is_field_keyword(word: &str) -> bool {
    FIELD_KEYWORDS.contains(&word)
}

pub fn is_primitive_type(word: &str) -> bool {
    PRIMITIVE_TYPES.contains(&word)
}

pub fn is_array_loop_type(word: &str) -> bool {
    ARRAY_LOOP_TYPES.contains(&word)
}

/// True if the word belongs to any keyword set.
pub fn is_keyword(word: &str) -> bool {
    is_definition_keyword(word)
        || is_field_keyword(word)
        || is_primitive_type(word)
        || is_array_loop_type(word)
}
