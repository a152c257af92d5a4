//! Token and arena node model.
//!
//! The compiled filter is not a pointer tree: it is a flat, append-only table
//! of [`Entry`] nodes that reference each other by index. Variadic constructs
//! (AND/OR groups, IN value lists) are encoded as a reversed singly-linked
//! chain of same-kind entries: `index1` points at the previous sibling (or
//! [`NO_LINK`] at the first-inserted element) and `index2` at that element's
//! own operand. The parser only ever appends, so no entry links forward, and
//! the finished table is trivially shareable and immutable.

use std::fmt;

use crate::value::Value;

/// Sentinel for "no link" in an [`Entry`] index slot.
pub const NO_LINK: i32 = -1;

/// A lexical token of the filter language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords (case-insensitive in source text)
    And,
    Or,
    Not,
    Between,
    Exist,
    In,
    Is,
    Match,
    Options,
    AnyOf,
    TypeOf,

    // Punctuation
    Comma,
    LParen,
    RParen,

    // Comparison operators
    Lt,
    Lte,
    Gt,
    Gte,
    EqEq,
    NotEq,

    /// Field path; `None` is the self path `$`
    Path(Option<String>),

    /// Any literal, already resolved to its scalar value
    Literal(Value),

    /// `${...}` late-bound expression, text captured verbatim
    Expression(String),

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::Between => write!(f, "BETWEEN"),
            Token::Exist => write!(f, "EXIST"),
            Token::In => write!(f, "IN"),
            Token::Is => write!(f, "IS"),
            Token::Match => write!(f, "MATCH"),
            Token::Options => write!(f, "OPTIONS"),
            Token::AnyOf => write!(f, "ANYOF"),
            Token::TypeOf => write!(f, "TYPEOF"),
            Token::Comma => write!(f, "\",\""),
            Token::LParen => write!(f, "\"(\""),
            Token::RParen => write!(f, "\")\""),
            Token::Lt => write!(f, "\"<\""),
            Token::Lte => write!(f, "\"<=\""),
            Token::Gt => write!(f, "\">\""),
            Token::Gte => write!(f, "\">=\""),
            Token::EqEq => write!(f, "\"==\""),
            Token::NotEq => write!(f, "\"!=\""),
            Token::Path(Some(path)) => write!(f, "path {path:?}"),
            Token::Path(None) => write!(f, "path \"$\""),
            Token::Literal(_) => write!(f, "literal"),
            Token::Expression(_) => write!(f, "expression"),
            Token::Eof => write!(f, "end of filter"),
        }
    }
}

/// Operator tag of an arena [`Entry`].
///
/// Surface-level negated forms get dedicated tags (`Nbetween`, `Nin`, ...);
/// the evaluator treats each as "flip the negate accumulator, then behave as
/// the positive twin". `Value`, `ValueExpr`, `ArrayExpr` and `List` only
/// appear in operand position, never as a predicate root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    And,
    AnyIs,
    AnyNis,
    ArrayExpr,
    Between,
    Eq,
    Exist,
    Gt,
    Gte,
    In,
    List,
    Lt,
    Lte,
    Match,
    MatchOp,
    Nbetween,
    Neq,
    Nexist,
    Nin,
    Nmatch,
    NmatchOp,
    Not,
    Or,
    TypeEq,
    TypeIn,
    TypeNeq,
    TypeNin,
    Value,
    ValueExpr,
}

/// One arena node: an operator tag, an optional text payload (field path or
/// expression text), an optional literal value, and up to two links.
///
/// For predicate entries `text` is the field path, with `None` meaning the
/// self path. For `ValueExpr`/`ArrayExpr` entries `text` is the expression
/// text and is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: Option<String>,
    pub value: Option<Value>,
    pub index1: i32,
    pub index2: i32,
}

impl Entry {
    pub fn new(kind: EntryKind, index1: i32, index2: i32) -> Self {
        Entry {
            kind,
            text: None,
            value: None,
            index1,
            index2,
        }
    }

    pub fn with_text(kind: EntryKind, text: Option<String>, index1: i32, index2: i32) -> Self {
        Entry {
            kind,
            text,
            value: None,
            index1,
            index2,
        }
    }

    pub fn with_value(kind: EntryKind, value: Value) -> Self {
        Entry {
            kind,
            text: None,
            value: Some(value),
            index1: NO_LINK,
            index2: NO_LINK,
        }
    }
}
