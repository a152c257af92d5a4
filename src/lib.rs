//! A small filter language that compiles to MongoDB-style query documents.
//!
//! Filter text such as `price NOT BETWEEN 10 AND 20 OR tags IN ("a", "b")`
//! is compiled once into a [`FilterProgram`], then evaluated any number of
//! times into an ordered query [`Document`] rendered as Extended JSON.
//! `${...}` expressions in the text stay unresolved until evaluation, when a
//! caller-supplied resolver provides their values.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let program = sieve_lang::parse("age >= 21 AND name EXIST")?;
//! let document = program.to_document()?;
//!
//! assert_eq!(
//!     serde_json::Value::Object(document),
//!     json!({
//!         "$and": [
//!             { "age": { "$gte": { "$numberDecimal": "21" } } },
//!             { "name": { "$exists": true } },
//!         ]
//!     })
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Language
//!
//! A filter is predicates over field paths, combined with `AND`, `OR`,
//! `NOT (...)` and parentheses (`AND` binds tighter). Predicates are the six
//! comparisons (`<`, `<=`, `>`, `>=`, `==`, `!=`), `[NOT] BETWEEN a AND b`,
//! `[NOT] EXIST`, `[NOT] IN (...)`, `[NOT] MATCH regex [OPTIONS opts]`,
//! `TYPEOF path == type` (and `!=` / `[NOT] IN`), and
//! `ANYOF path IS [NOT] (...)` for matching elements of an array field. The
//! path `$` denotes the value under test itself, which inside `ANYOF` means
//! the array element.
//!
//! Literals cover strings, exact decimals, booleans, `null`, `#...#`
//! datetimes, `/pattern/flags` regexes, and `OBJECTID`, `UUID` and `BINARY` calls.
//! Keywords are case-insensitive; paths are dot-separated bare words or
//! backtick-quoted.

pub mod ast;
mod builder;
pub mod error;
mod evaluator;
pub mod lexer;
mod literal;
pub mod parser;
mod program;
pub mod type_aliases;
pub mod value;

pub use error::{CompileError, EvalError};
pub use program::{Document, FilterProgram};
pub use value::{BinarySubtype, UuidRepresentation, Value};

/// Compiles filter text into a reusable [`FilterProgram`].
///
/// Whitespace-only input is a valid filter and compiles to the empty
/// program.
pub fn parse(filter_text: &str) -> Result<FilterProgram, CompileError> {
    let program = parser::Parser::new(lexer::Lexer::new(filter_text))?.parse()?;
    log::debug!(
        "compiled {}-char filter into {} entries",
        filter_text.len(),
        program.entries().len()
    );
    Ok(program)
}
