// tests/filter_tests.rs

use rust_decimal::Decimal;
use serde_json::{Value as Json, json};
use sieve_lang::error::{CompileError, EvalError};
use sieve_lang::value::Value;

fn document(filter: &str) -> Json {
    let program = sieve_lang::parse(filter).unwrap();
    Json::Object(program.to_document().unwrap())
}

fn document_with<F>(filter: &str, resolver: F) -> Json
where
    F: FnMut(&str) -> Result<Value, EvalError>,
{
    let program = sieve_lang::parse(filter).unwrap();
    Json::Object(program.to_document_with(resolver).unwrap())
}

fn decimal(text: &str) -> Json {
    json!({ "$numberDecimal": text })
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_comparisons() {
    let test_cases = vec![
        ("a < 10", json!({ "a": { "$lt": decimal("10") } })),
        ("a <= 10", json!({ "a": { "$lte": decimal("10") } })),
        ("a > 10", json!({ "a": { "$gt": decimal("10") } })),
        ("a >= 10", json!({ "a": { "$gte": decimal("10") } })),
        ("a == 10", json!({ "a": { "$eq": decimal("10") } })),
        ("a != 10", json!({ "a": { "$ne": decimal("10") } })),
    ];

    for (filter, expected) in test_cases {
        assert_eq!(document(filter), expected, "Failed for filter: {}", filter);
    }
}

#[test]
fn test_negated_comparisons_wrap_in_not() {
    let test_cases = vec![
        ("NOT (a < 10)", json!({ "a": { "$not": { "$lt": decimal("10") } } })),
        ("NOT (a == 10)", json!({ "a": { "$not": { "$eq": decimal("10") } } })),
        ("NOT (a != 10)", json!({ "a": { "$not": { "$ne": decimal("10") } } })),
    ];

    for (filter, expected) in test_cases {
        assert_eq!(document(filter), expected, "Failed for filter: {}", filter);
    }
}

#[test]
fn test_double_negation_cancels() {
    assert_eq!(
        document("NOT (NOT (a < 10))"),
        json!({ "a": { "$lt": decimal("10") } })
    );
}

// ============================================================================
// BETWEEN
// ============================================================================

#[test]
fn test_between() {
    assert_eq!(
        document("a BETWEEN 1 AND 2"),
        json!({ "a": { "$gte": decimal("1"), "$lte": decimal("2") } })
    );
    assert_eq!(
        document("a NOT BETWEEN 1 AND 2"),
        json!({ "a": { "$not": { "$gte": decimal("1"), "$lte": decimal("2") } } })
    );
    assert_eq!(
        document("NOT (a NOT BETWEEN 1 AND 2)"),
        json!({ "a": { "$gte": decimal("1"), "$lte": decimal("2") } })
    );
}

// ============================================================================
// EXIST
// ============================================================================

#[test]
fn test_exist() {
    assert_eq!(document("a EXIST"), json!({ "a": { "$exists": true } }));
    assert_eq!(document("a NOT EXIST"), json!({ "a": { "$exists": false } }));
    // Negating EXIST flips the boolean rather than wrapping in $not.
    assert_eq!(
        document("NOT (a EXIST)"),
        json!({ "a": { "$exists": false } })
    );
    assert_eq!(
        document("NOT (a NOT EXIST)"),
        json!({ "a": { "$exists": true } })
    );
}

// ============================================================================
// IN
// ============================================================================

#[test]
fn test_in_list() {
    assert_eq!(
        document(r#"a IN ("x", "y")"#),
        json!({ "a": { "$in": ["x", "y"] } })
    );
    assert_eq!(
        document(r#"a NOT IN ("x", "y")"#),
        json!({ "a": { "$nin": ["x", "y"] } })
    );
    // Negating IN swaps the operator rather than wrapping in $not.
    assert_eq!(
        document(r#"NOT (a IN ("x", "y"))"#),
        json!({ "a": { "$nin": ["x", "y"] } })
    );
    assert_eq!(
        document(r#"NOT (a NOT IN ("x"))"#),
        json!({ "a": { "$in": ["x"] } })
    );
}

#[test]
fn test_in_list_mixes_literal_kinds() {
    assert_eq!(
        document(r#"a IN (1, "two", null, true)"#),
        json!({ "a": { "$in": [decimal("1"), "two", null, true] } })
    );
}

// ============================================================================
// MATCH
// ============================================================================

#[test]
fn test_match() {
    assert_eq!(
        document("a MATCH /ab+/i"),
        json!({
            "a": {
                "$regex": { "$regularExpression": { "pattern": "ab+", "options": "i" } }
            }
        })
    );
    assert_eq!(
        document(r#"a MATCH "^x" OPTIONS "is""#),
        json!({ "a": { "$regex": "^x", "$options": "is" } })
    );
    assert_eq!(
        document(r#"a NOT MATCH "^x""#),
        json!({ "a": { "$not": { "$regex": "^x" } } })
    );
    assert_eq!(
        document(r#"NOT (a MATCH "^x" OPTIONS "i")"#),
        json!({ "a": { "$not": { "$regex": "^x", "$options": "i" } } })
    );
}

// ============================================================================
// TYPEOF
// ============================================================================

#[test]
fn test_typeof() {
    assert_eq!(
        document(r#"TYPEOF a == "string""#),
        json!({ "a": { "$type": "string" } })
    );
    assert_eq!(
        document(r#"TYPEOF a != "string""#),
        json!({ "a": { "$not": { "$type": "string" } } })
    );
    assert_eq!(
        document(r#"TYPEOF a IN ("int", "long")"#),
        json!({ "a": { "$type": ["int", "long"] } })
    );
    assert_eq!(
        document(r#"TYPEOF a NOT IN ("int", "long")"#),
        json!({ "a": { "$not": { "$type": ["int", "long"] } } })
    );
}

// ============================================================================
// ANYOF
// ============================================================================

#[test]
fn test_anyof() {
    assert_eq!(
        document("ANYOF a IS ($ > 5)"),
        json!({ "a": { "$elemMatch": { "$gt": decimal("5") } } })
    );
    assert_eq!(
        document("ANYOF a IS NOT ($ > 5)"),
        json!({ "a": { "$not": { "$elemMatch": { "$gt": decimal("5") } } } })
    );
    assert_eq!(
        document(r#"ANYOF items IS (qty > 2 AND name == "bolt")"#),
        json!({
            "items": {
                "$elemMatch": {
                    "$and": [
                        { "qty": { "$gt": decimal("2") } },
                        { "name": { "$eq": "bolt" } },
                    ]
                }
            }
        })
    );
}

#[test]
fn test_anyof_inner_negation_stays_inside() {
    // Negation inside the element filter does not leak to the $elemMatch.
    assert_eq!(
        document("ANYOF a IS (NOT ($ > 5))"),
        json!({ "a": { "$elemMatch": { "$not": { "$gt": decimal("5") } } } })
    );
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_and_or_groups() {
    assert_eq!(
        document("a == 1 AND b == 2"),
        json!({ "$and": [
            { "a": { "$eq": decimal("1") } },
            { "b": { "$eq": decimal("2") } },
        ] })
    );
    assert_eq!(
        document("a == 1 OR b == 2"),
        json!({ "$or": [
            { "a": { "$eq": decimal("1") } },
            { "b": { "$eq": decimal("2") } },
        ] })
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        document("a == 1 AND b == 2 OR c == 3"),
        json!({ "$or": [
            { "$and": [
                { "a": { "$eq": decimal("1") } },
                { "b": { "$eq": decimal("2") } },
            ] },
            { "c": { "$eq": decimal("3") } },
        ] })
    );
}

#[test]
fn test_chains_flatten() {
    assert_eq!(
        document("a == 1 AND b == 2 AND c == 3"),
        json!({ "$and": [
            { "a": { "$eq": decimal("1") } },
            { "b": { "$eq": decimal("2") } },
            { "c": { "$eq": decimal("3") } },
        ] })
    );
    // Parentheses around a prefix of the chain do not add nesting.
    assert_eq!(
        document("(a == 1 AND b == 2) AND c == 3"),
        document("a == 1 AND b == 2 AND c == 3")
    );
}

#[test]
fn test_nested_groups_keep_structure() {
    assert_eq!(
        document("a == 1 AND (b == 2 OR c == 3)"),
        json!({ "$and": [
            { "a": { "$eq": decimal("1") } },
            { "$or": [
                { "b": { "$eq": decimal("2") } },
                { "c": { "$eq": decimal("3") } },
            ] },
        ] })
    );
}

#[test]
fn test_negated_groups() {
    assert_eq!(
        document("NOT (a == 1 OR b == 2)"),
        json!({ "$nor": [
            { "a": { "$eq": decimal("1") } },
            { "b": { "$eq": decimal("2") } },
        ] })
    );
    assert_eq!(
        document("NOT (a == 1 AND b == 2)"),
        json!({ "$nor": [
            { "$and": [
                { "a": { "$eq": decimal("1") } },
                { "b": { "$eq": decimal("2") } },
            ] },
        ] })
    );
}

// ============================================================================
// Empty Filters
// ============================================================================

#[test]
fn test_empty_filter_matches_everything() {
    assert_eq!(document(""), json!({}));
    assert_eq!(document("   \t\n"), json!({}));
}

// ============================================================================
// Literal Rendering
// ============================================================================

#[test]
fn test_extended_json_literals() {
    let test_cases = vec![
        (
            "a == #2045-12-21 15:45:36.123#",
            json!({ "a": { "$eq": { "$date": "2045-12-21T15:45:36.123Z" } } }),
        ),
        (
            r#"a == OBJECTID("0102030405060708090a0b0c")"#,
            json!({ "a": { "$eq": { "$oid": "0102030405060708090a0b0c" } } }),
        ),
        (
            r#"a == BINARY("Vmc=")"#,
            json!({ "a": { "$eq": { "$binary": { "base64": "Vmc=", "subType": "00" } } } }),
        ),
        (
            r#"a == UUID("00112233-4455-6677-8899-aabbccddeeff")"#,
            json!({ "a": { "$eq": {
                "$binary": { "base64": "ABEiM0RVZneImaq7zN3u/w==", "subType": "04" }
            } } }),
        ),
        (
            r#"a == UUID("CSharpLegacy", "00112233-4455-6677-8899-aabbccddeeff")"#,
            json!({ "a": { "$eq": {
                "$binary": { "base64": "MyIRAFVEd2aImaq7zN3u/w==", "subType": "03" }
            } } }),
        ),
        (
            r#"a == UUID("JavaLegacy", "00112233-4455-6677-8899-aabbccddeeff")"#,
            json!({ "a": { "$eq": {
                "$binary": { "base64": "d2ZVRDMiEQD/7t3Mu6qZiA==", "subType": "03" }
            } } }),
        ),
        ("a == null", json!({ "a": { "$eq": null } })),
        ("a == true", json!({ "a": { "$eq": true } })),
        ("a == 19.99", json!({ "a": { "$eq": decimal("19.99") } })),
    ];

    for (filter, expected) in test_cases {
        assert_eq!(document(filter), expected, "Failed for filter: {}", filter);
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_expressions_require_a_resolver() {
    let program = sieve_lang::parse("a == ${limit}").unwrap();
    assert_eq!(
        program.to_document(),
        Err(EvalError::ExpressionsUnsupported)
    );
}

#[test]
fn test_expression_in_value_position() {
    let result = document_with("a == ${limit}", |text| {
        assert_eq!(text, "limit");
        Ok(Value::Decimal(Decimal::from(10)))
    });
    assert_eq!(result, json!({ "a": { "$eq": decimal("10") } }));
}

#[test]
fn test_expression_as_in_operand() {
    let result = document_with("a IN ${ids}", |_| {
        Ok(Value::Array(vec![
            Value::String("x".to_string()),
            Value::String("y".to_string()),
        ]))
    });
    assert_eq!(result, json!({ "a": { "$in": ["x", "y"] } }));
}

#[test]
fn test_in_expression_must_resolve_to_an_array() {
    let program = sieve_lang::parse("a IN ${ids}").unwrap();
    let result = program.to_document_with(|_| Ok(Value::Boolean(true)));
    assert_eq!(result, Err(EvalError::ArrayExpected("ids".to_string())));
}

#[test]
fn test_same_program_evaluates_repeatedly() {
    let program = sieve_lang::parse("a == ${n}").unwrap();

    for n in [1, 2, 3] {
        let document = program
            .to_document_with(|_| Ok(Value::Decimal(Decimal::from(n))))
            .unwrap();
        assert_eq!(
            Json::Object(document),
            json!({ "a": { "$eq": decimal(&n.to_string()) } })
        );
    }
}

// ============================================================================
// Self Path
// ============================================================================

#[test]
fn test_self_path_omits_field_key() {
    assert_eq!(document("$ > 5"), json!({ "$gt": decimal("5") }));
    assert_eq!(document("$ EXIST"), json!({ "$exists": true }));
    assert_eq!(
        document(r#"$ IN ("x")"#),
        json!({ "$in": ["x"] })
    );
}

// ============================================================================
// Grammar Errors
// ============================================================================

#[test]
fn test_grammar_errors() {
    let test_cases = vec![
        "a",
        "a ==",
        "a == b",
        "a == 1 2",
        "a == 1 AND",
        "AND a == 1",
        "a BETWEEN 1",
        "a BETWEEN 1 OR 2",
        "a IN ()",
        "a IN (1,)",
        "a MATCH",
        "TYPEOF a",
        "TYPEOF a > 1",
        "ANYOF a ($ > 1)",
        "NOT a == 1",
        "(a == 1",
    ];

    for filter in test_cases {
        assert!(
            matches!(
                sieve_lang::parse(filter),
                Err(CompileError::UnexpectedToken { .. })
            ),
            "Expected a grammar error for filter: {}",
            filter
        );
    }
}

#[test]
fn test_error_messages_name_the_expectation() {
    let error = sieve_lang::parse("a ==").unwrap_err();
    assert_eq!(error.to_string(), "unexpected end of filter, expected a value");

    let error = sieve_lang::parse("a == 1 b == 2").unwrap_err();
    assert_eq!(
        error.to_string(),
        "unexpected path \"b\", expected end of filter"
    );
}

// ============================================================================
// Key Order
// ============================================================================

#[test]
fn test_between_key_order_is_stable() {
    let program = sieve_lang::parse("a BETWEEN 1 AND 2").unwrap();
    let document = program.to_document().unwrap();
    let inner = document["a"].as_object().unwrap();
    let keys: Vec<_> = inner.keys().collect();
    assert_eq!(keys, ["$gte", "$lte"]);
}
