//! Tree walk from the entry arena to a query document.
//!
//! Negation is an accumulator threaded down the walk: a `Not` wrapper or a
//! negated operator tag flips it, and it is only rendered into the document
//! at the leaf operator (by the builder's per-operator encoding). Group
//! elements reset it, since a negated group is encoded around the group as a
//! whole.
//!
//! Arena inconsistencies (a value entry in predicate position, a sibling
//! chain mixing kinds) are parser bugs, not user errors, and panic.

use serde_json::Value as Json;

use crate::ast::{Entry, EntryKind, NO_LINK};
use crate::builder::{self, ops};
use crate::error::EvalError;
use crate::program::Document;
use crate::value::Value;

pub(crate) struct Executor<'a, F> {
    entries: &'a [Entry],
    resolver: F,
}

impl<'a, F> Executor<'a, F>
where
    F: FnMut(&str) -> Result<Value, EvalError>,
{
    pub(crate) fn new(entries: &'a [Entry], resolver: F) -> Self {
        Executor { entries, resolver }
    }

    pub(crate) fn execute(&mut self, root: i32) -> Result<Document, EvalError> {
        self.document(root, false)
    }

    fn document(&mut self, index: i32, negate: bool) -> Result<Document, EvalError> {
        let entry = self.entries[index as usize].clone();

        // A negated operator tag is its positive twin with the accumulator
        // flipped.
        let (kind, negate) = match entry.kind {
            EntryKind::AnyNis => (EntryKind::AnyIs, !negate),
            EntryKind::Nbetween => (EntryKind::Between, !negate),
            EntryKind::Nexist => (EntryKind::Exist, !negate),
            EntryKind::Nin => (EntryKind::In, !negate),
            EntryKind::Nmatch => (EntryKind::Match, !negate),
            EntryKind::NmatchOp => (EntryKind::MatchOp, !negate),
            EntryKind::TypeNeq => (EntryKind::TypeEq, !negate),
            EntryKind::TypeNin => (EntryKind::TypeIn, !negate),
            other => (other, negate),
        };

        let path = entry.text.as_deref();

        match kind {
            EntryKind::And => {
                let values = self.document_array(index)?;
                Ok(builder::and(values, negate))
            }
            EntryKind::Or => {
                let values = self.document_array(index)?;
                Ok(builder::or(values, negate))
            }
            EntryKind::Not => self.document(entry.index1, !negate),
            EntryKind::AnyIs => {
                let sub_filter = self.document(entry.index1, false)?;
                Ok(builder::any(path, sub_filter, negate))
            }
            EntryKind::Between => {
                let from = self.value(entry.index1)?;
                let to = self.value(entry.index2)?;
                Ok(builder::between(path, from, to, negate))
            }
            EntryKind::Exist => Ok(builder::exist(path, negate)),
            EntryKind::In => {
                let values = self.value_array(entry.index1)?;
                Ok(builder::in_list(path, values, negate))
            }
            EntryKind::Match => {
                let regex = self.value(entry.index1)?;
                Ok(builder::match_regex(path, regex, negate))
            }
            EntryKind::MatchOp => {
                let regex = self.value(entry.index1)?;
                let options = self.value(entry.index2)?;
                Ok(builder::match_options(path, regex, options, negate))
            }
            EntryKind::TypeEq => {
                let value = self.value(entry.index1)?;
                Ok(builder::type_eq(path, value, negate))
            }
            EntryKind::TypeIn => {
                let values = self.value_array(entry.index1)?;
                Ok(builder::type_in(path, values, negate))
            }
            EntryKind::Lt => self.comparison(ops::LT, &entry, negate),
            EntryKind::Lte => self.comparison(ops::LTE, &entry, negate),
            EntryKind::Gt => self.comparison(ops::GT, &entry, negate),
            EntryKind::Gte => self.comparison(ops::GTE, &entry, negate),
            EntryKind::Eq => self.comparison(ops::EQ, &entry, negate),
            EntryKind::Neq => self.comparison(ops::NE, &entry, negate),
            other => panic!("entry kind {other:?} is not expected in predicate position"),
        }
    }

    fn comparison(
        &mut self,
        operator: &str,
        entry: &Entry,
        negate: bool,
    ) -> Result<Document, EvalError> {
        let value = self.value(entry.index1)?;
        Ok(builder::comparison(
            entry.text.as_deref(),
            operator,
            value,
            negate,
        ))
    }

    /// Materializes an AND/OR sibling chain in source order. The chain links
    /// point backwards, so the elements are counted first and filled from the
    /// back.
    fn document_array(&mut self, index: i32) -> Result<Vec<Json>, EvalError> {
        let kind = self.entries[index as usize].kind;

        let mut count = 0;
        let mut at = index;
        loop {
            let entry = &self.entries[at as usize];
            assert!(
                entry.kind == kind,
                "entry kind {:?} is not expected, expected {:?}",
                entry.kind,
                kind
            );
            count += 1;
            if entry.index1 == NO_LINK {
                break;
            }
            at = entry.index1;
        }

        let mut result = vec![Json::Null; count];
        let mut at = index;
        loop {
            let entry = self.entries[at as usize].clone();
            count -= 1;
            result[count] = Json::Object(self.document(entry.index2, false)?);
            if entry.index1 == NO_LINK {
                break;
            }
            at = entry.index1;
        }
        Ok(result)
    }

    fn value_array(&mut self, index: i32) -> Result<Vec<Json>, EvalError> {
        let entry = self.entries[index as usize].clone();
        match (entry.kind, entry.text) {
            (EntryKind::ArrayExpr, Some(text)) => match (self.resolver)(&text)? {
                Value::Array(items) => Ok(items.iter().map(Value::to_json).collect()),
                _ => Err(EvalError::ArrayExpected(text)),
            },
            (EntryKind::List, _) => {
                let mut count = 0;
                let mut at = index;
                loop {
                    let entry = &self.entries[at as usize];
                    assert!(
                        entry.kind == EntryKind::List,
                        "entry kind {:?} is not expected, expected List",
                        entry.kind
                    );
                    count += 1;
                    if entry.index1 == NO_LINK {
                        break;
                    }
                    at = entry.index1;
                }

                let mut result = vec![Json::Null; count];
                let mut at = index;
                loop {
                    let entry = self.entries[at as usize].clone();
                    count -= 1;
                    result[count] = self.value(entry.index2)?;
                    if entry.index1 == NO_LINK {
                        break;
                    }
                    at = entry.index1;
                }
                Ok(result)
            }
            (kind, _) => panic!("entry kind {kind:?} is not expected, expected ArrayExpr or List"),
        }
    }

    fn value(&mut self, index: i32) -> Result<Json, EvalError> {
        let entry = self.entries[index as usize].clone();
        match (entry.kind, entry.value, entry.text) {
            (EntryKind::Value, Some(value), _) => Ok(value.to_json()),
            (EntryKind::ValueExpr, _, Some(text)) => Ok((self.resolver)(&text)?.to_json()),
            (kind, ..) => panic!("entry kind {kind:?} is not expected, expected Value or ValueExpr"),
        }
    }
}
