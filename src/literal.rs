//! The literal reader: pure text-span to [`Value`] conversions.
//!
//! Each function takes the already-delimited content of a literal (the lexer
//! strips quotes, `#` markers and call syntax) and returns `None` when the
//! content is invalid; the lexer turns that into a
//! [`CompileError::BadLiteral`](crate::CompileError::BadLiteral) carrying the
//! original literal text.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::value::{BinarySubtype, UuidRepresentation, Value};

/// Parses `[+-]? digits [. digits] [eE [+-]? digits]` into an exact decimal.
///
/// The exponent is applied by scale adjustment (negative) or repeated
/// multiplication (positive) so the value never passes through a binary
/// float.
pub(crate) fn decimal(text: &str) -> Option<Value> {
    let text = text.strip_prefix('+').unwrap_or(text);

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], text[at + 1..].parse::<i32>().ok()?),
        None => (text, 0),
    };

    let mut result = Decimal::from_str(mantissa).ok()?;
    if exponent < 0 {
        let scale = result.scale() + exponent.unsigned_abs();
        if scale > 28 {
            return None;
        }
        result.set_scale(scale).ok()?;
    } else {
        for _ in 0..exponent {
            result = result.checked_mul(Decimal::TEN)?;
        }
    }

    Some(Value::Decimal(result))
}

/// Parses the content between `#` markers into a UTC timestamp.
///
/// Accepted forms, dispatched by length: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`,
/// `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD HH:MM:SS.f{1,7}`. Fractional digits
/// beyond the seventh are truncated, not rounded.
pub(crate) fn date_time(text: &str) -> Option<Value> {
    const DATE: &str = "%Y-%m-%d";
    const MINUTES: &str = "%Y-%m-%d %H:%M";
    const SECONDS: &str = "%Y-%m-%d %H:%M:%S";

    let naive = match text.len() {
        10 => NaiveDate::parse_from_str(text, DATE)
            .ok()?
            .and_hms_opt(0, 0, 0)?,
        16 => NaiveDateTime::parse_from_str(text, MINUTES).ok()?,
        19 => NaiveDateTime::parse_from_str(text, SECONDS).ok()?,
        n if n >= 21 && text.as_bytes()[19] == b'.' => {
            let base = NaiveDateTime::parse_from_str(&text[..19], SECONDS).ok()?;
            let fraction = &text[20..];
            if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let digits = &fraction[..fraction.len().min(7)];
            let nanos: u32 = format!("{:0<9}", digits).parse().ok()?;
            base.with_nanosecond(nanos)?
        }
        _ => return None,
    };

    Some(Value::DateTime(DateTime::from_naive_utc_and_offset(
        naive, Utc,
    )))
}

/// Parses the quoted argument of `OBJECTID("...")`: exactly 24 hex characters.
pub(crate) fn object_id(text: &str) -> Option<Value> {
    if text.len() != 24 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let mut bytes = [0u8; 12];
    for (i, chunk) in text.as_bytes().chunks(2).enumerate() {
        bytes[i] = u8::from_str_radix(std::str::from_utf8(chunk).ok()?, 16).ok()?;
    }
    Some(Value::ObjectId(bytes))
}

/// Assembles a `UUID(...)` literal from its one or two quoted arguments.
pub(crate) fn uuid_value(representation: Option<&str>, guid_text: &str) -> Option<Value> {
    let representation = match representation {
        Some(name) => UuidRepresentation::from_name(name)?,
        None => UuidRepresentation::Standard,
    };

    Some(Value::Uuid {
        uuid: guid(guid_text)?,
        representation,
    })
}

/// Assembles a `BINARY(...)` literal from its one or two quoted arguments.
pub(crate) fn binary_value(subtype: Option<&str>, base64_text: &str) -> Option<Value> {
    let subtype = match subtype {
        Some(name) => BinarySubtype::from_name(name)?,
        None => BinarySubtype::Binary,
    };

    let bytes = base64_bytes(base64_text)?;

    // The UUID subtypes only make sense for a 16-byte payload.
    if matches!(
        subtype,
        BinarySubtype::UuidLegacy | BinarySubtype::UuidStandard
    ) && bytes.len() != 16
    {
        return None;
    }

    Some(Value::Binary { bytes, subtype })
}

// Hyphenated 8-4-4-4-12 form only; the bare-hex and urn forms the uuid crate
// would otherwise accept are not valid literal syntax.
fn guid(text: &str) -> Option<Uuid> {
    let shape_ok =
        text.len() == 36 && [8, 13, 18, 23].iter().all(|&i| text.as_bytes()[i] == b'-');
    if !shape_ok {
        return None;
    }
    Uuid::parse_str(text).ok()
}

// Embedded ASCII whitespace is ignored, matching how long base64 runs are
// commonly line-wrapped.
fn base64_bytes(text: &str) -> Option<Vec<u8>> {
    use base64::Engine;

    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(compact).ok()
}
