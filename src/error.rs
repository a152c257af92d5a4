use thiserror::Error;

/// Errors raised while compiling filter text into a [`FilterProgram`].
///
/// Compilation either succeeds completely or fails with the first error
/// encountered; there is no partial program and no error recovery.
///
/// [`FilterProgram`]: crate::FilterProgram
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A token had the shape of a literal but invalid content: bad hex in an
    /// OBJECTID, bad base64 in a BINARY, month 13 in a datetime, an unknown
    /// UUID representation name, and so on.
    #[error("string {literal} is not a valid {family} literal")]
    BadLiteral {
        family: &'static str,
        literal: String,
    },

    /// A character that cannot start any token.
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    /// Input ended inside a quoted string, quoted path, regex, datetime or
    /// `${...}` expression.
    #[error("unterminated {what} starting at offset {offset}")]
    Unterminated { what: &'static str, offset: usize },

    /// The token stream does not match the grammar.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },
}

/// Errors raised while evaluating a compiled [`FilterProgram`] into a query
/// document.
///
/// Evaluation failures never invalidate the program itself; the same program
/// may be evaluated again with a different resolver.
///
/// [`FilterProgram`]: crate::FilterProgram
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// [`FilterProgram::to_document`] was called but the filter text contained
    /// a `${...}` expression.
    ///
    /// [`FilterProgram::to_document`]: crate::FilterProgram::to_document
    #[error("expressions are not supported by this filter")]
    ExpressionsUnsupported,

    /// An `IN ${...}` expression resolved to something other than an array.
    #[error("expression ${{{0}}} must evaluate to an array")]
    ArrayExpected(String),

    /// The caller-supplied resolver failed for the given expression text.
    #[error("{0}")]
    Resolver(String),
}
