//! Query document construction.
//!
//! Each function renders one operator into its query-language form, with
//! negation folded in at this level rather than as a generic wrapper: most
//! operators wrap in `$not`, but `$exists` flips its boolean, `$in` becomes
//! `$nin`, OR becomes `$nor`, and a negated AND wraps in a one-element
//! `$nor`. A `None` path is the self path and omits the outer field key.

use serde_json::Value as Json;
use serde_json::json;

use crate::program::Document;

pub(crate) mod ops {
    pub const AND: &str = "$and";
    pub const ELEM_MATCH: &str = "$elemMatch";
    pub const EQ: &str = "$eq";
    pub const EXISTS: &str = "$exists";
    pub const GT: &str = "$gt";
    pub const GTE: &str = "$gte";
    pub const IN: &str = "$in";
    pub const LT: &str = "$lt";
    pub const LTE: &str = "$lte";
    pub const NE: &str = "$ne";
    pub const NIN: &str = "$nin";
    pub const NOR: &str = "$nor";
    pub const NOT: &str = "$not";
    pub const OPTIONS: &str = "$options";
    pub const OR: &str = "$or";
    pub const REGEX: &str = "$regex";
    pub const TYPE: &str = "$type";
}

fn doc1(key: &str, value: Json) -> Document {
    let mut document = Document::new();
    document.insert(key.to_string(), value);
    document
}

fn at_path(path: Option<&str>, comparison: Document) -> Document {
    match path {
        Some(path) => doc1(path, Json::Object(comparison)),
        None => comparison,
    }
}

fn negated(comparison: Document) -> Document {
    doc1(ops::NOT, Json::Object(comparison))
}

pub(crate) fn and(values: Vec<Json>, negate: bool) -> Document {
    let comparison = doc1(ops::AND, Json::Array(values));
    if negate {
        doc1(ops::NOR, json!([comparison]))
    } else {
        comparison
    }
}

pub(crate) fn or(values: Vec<Json>, negate: bool) -> Document {
    doc1(if negate { ops::NOR } else { ops::OR }, Json::Array(values))
}

pub(crate) fn any(path: Option<&str>, sub_filter: Document, negate: bool) -> Document {
    let mut comparison = doc1(ops::ELEM_MATCH, Json::Object(sub_filter));
    if negate {
        comparison = negated(comparison);
    }
    at_path(path, comparison)
}

pub(crate) fn between(path: Option<&str>, from: Json, to: Json, negate: bool) -> Document {
    let mut comparison = Document::new();
    comparison.insert(ops::GTE.to_string(), from);
    comparison.insert(ops::LTE.to_string(), to);
    if negate {
        comparison = negated(comparison);
    }
    at_path(path, comparison)
}

pub(crate) fn comparison(path: Option<&str>, operator: &str, value: Json, negate: bool) -> Document {
    let mut comparison = doc1(operator, value);
    if negate {
        comparison = negated(comparison);
    }
    at_path(path, comparison)
}

pub(crate) fn exist(path: Option<&str>, negate: bool) -> Document {
    at_path(path, doc1(ops::EXISTS, Json::Bool(!negate)))
}

pub(crate) fn in_list(path: Option<&str>, values: Vec<Json>, negate: bool) -> Document {
    at_path(
        path,
        doc1(if negate { ops::NIN } else { ops::IN }, Json::Array(values)),
    )
}

pub(crate) fn match_regex(path: Option<&str>, regex: Json, negate: bool) -> Document {
    let mut comparison = doc1(ops::REGEX, regex);
    if negate {
        comparison = negated(comparison);
    }
    at_path(path, comparison)
}

pub(crate) fn match_options(
    path: Option<&str>,
    regex: Json,
    options: Json,
    negate: bool,
) -> Document {
    let mut comparison = Document::new();
    comparison.insert(ops::REGEX.to_string(), regex);
    comparison.insert(ops::OPTIONS.to_string(), options);
    if negate {
        comparison = negated(comparison);
    }
    at_path(path, comparison)
}

pub(crate) fn type_eq(path: Option<&str>, value: Json, negate: bool) -> Document {
    let mut comparison = doc1(ops::TYPE, value);
    if negate {
        comparison = negated(comparison);
    }
    at_path(path, comparison)
}

pub(crate) fn type_in(path: Option<&str>, values: Vec<Json>, negate: bool) -> Document {
    let mut comparison = doc1(ops::TYPE, Json::Array(values));
    if negate {
        comparison = negated(comparison);
    }
    at_path(path, comparison)
}
