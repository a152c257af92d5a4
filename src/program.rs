use crate::ast::{Entry, NO_LINK};
use crate::error::EvalError;
use crate::evaluator::Executor;
use crate::value::Value;

/// A query document: an ordered JSON object mapping operator and field keys
/// to JSON values, with non-JSON scalars in Extended JSON form.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A compiled filter.
///
/// Compiling is done once; the program can then be evaluated any number of
/// times, each time with a fresh set of `${...}` expression values. The
/// program itself is immutable and cheap to clone.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let program = sieve_lang::parse("qty > 10 AND status == \"open\"")?;
/// let document = program.to_document()?;
///
/// assert_eq!(
///     serde_json::Value::Object(document),
///     json!({
///         "$and": [
///             { "qty": { "$gt": { "$numberDecimal": "10" } } },
///             { "status": { "$eq": "open" } },
///         ]
///     })
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterProgram {
    entries: Vec<Entry>,
    root: i32,
}

impl FilterProgram {
    pub(crate) fn empty() -> Self {
        FilterProgram {
            entries: Vec::new(),
            root: NO_LINK,
        }
    }

    pub(crate) fn new(entries: Vec<Entry>, root: i32) -> Self {
        FilterProgram { entries, root }
    }

    /// The entry arena, root last among its reachable nodes.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Index of the root entry, or [`NO_LINK`] for the empty program.
    pub fn root_index(&self) -> i32 {
        self.root
    }

    /// Evaluates a program that uses no `${...}` expressions.
    ///
    /// The empty program yields the empty document, which matches everything.
    /// Fails with [`EvalError::ExpressionsUnsupported`] if the filter text
    /// contained an expression.
    pub fn to_document(&self) -> Result<Document, EvalError> {
        self.to_document_with(|_| Err(EvalError::ExpressionsUnsupported))
    }

    /// Evaluates the program, resolving each `${...}` expression through
    /// `resolver`.
    ///
    /// The resolver receives the verbatim text between the braces. An
    /// expression in value position may return any [`Value`]; one in `IN`
    /// operand position must return [`Value::Array`].
    pub fn to_document_with<F>(&self, resolver: F) -> Result<Document, EvalError>
    where
        F: FnMut(&str) -> Result<Value, EvalError>,
    {
        if self.root == NO_LINK {
            return Ok(Document::new());
        }
        let document = Executor::new(&self.entries, resolver).execute(self.root)?;
        log::trace!("evaluated program with {} entries", self.entries.len());
        Ok(document)
    }
}
