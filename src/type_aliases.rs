//! String aliases usable as the right-hand side of a `TYPEOF` check.
//!
//! These are the type names the store's `$type` operator understands. The
//! compiler does not validate them; a `TYPEOF` predicate passes whatever
//! string it was given through to the document.

pub const DOUBLE: &str = "double";
pub const STRING: &str = "string";
pub const OBJECT: &str = "object";
pub const ARRAY: &str = "array";
pub const BINARY_DATA: &str = "binData";
pub const OBJECT_ID: &str = "objectId";
pub const BOOLEAN: &str = "bool";
pub const DATE: &str = "date";
pub const NULL: &str = "null";
pub const REGULAR_EXPRESSION: &str = "regex";
pub const JAVA_SCRIPT: &str = "javascript";
pub const INT32: &str = "int";
pub const TIMESTAMP: &str = "timestamp";
pub const INT64: &str = "long";
pub const DECIMAL128: &str = "decimal";
pub const MIN_KEY: &str = "minKey";
pub const MAX_KEY: &str = "maxKey";

/// Matches any of the four numeric types.
pub const NUMBER: &str = "number";
