use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

/// A scalar value carried by a filter literal or supplied by an expression
/// resolver.
///
/// This is the value algebra the compiler core works with. It covers the
/// store-relevant scalar types beyond plain JSON: exact base-10 decimals,
/// UTC timestamps, 12-byte object identifiers, tagged binary blobs, GUIDs
/// with a representation tag, and regular expressions.
///
/// # Construction
///
/// Values are produced by the literal reader while scanning filter text, or
/// returned by the resolver passed to
/// [`FilterProgram::to_document_with`](crate::FilterProgram::to_document_with).
/// The [`Array`](Value::Array) variant has no literal form; it exists so a
/// resolver can satisfy an `IN ${...}` membership expression.
///
/// # Examples
///
/// ```
/// use sieve_lang::Value;
/// use rust_decimal::Decimal;
///
/// let price = Value::Decimal(Decimal::new(1999, 2)); // 19.99
/// let tag = Value::String("sale".to_string());
/// let missing = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null literal
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// Arbitrary-precision base-10 decimal; never goes through binary floats
    Decimal(Decimal),

    /// Timestamp, always UTC, sub-millisecond where the literal provided it
    DateTime(DateTime<Utc>),

    /// Double-quoted string
    String(String),

    /// 12-byte object identifier
    ObjectId([u8; 12]),

    /// Byte sequence with a subtype tag
    Binary {
        bytes: Vec<u8>,
        subtype: BinarySubtype,
    },

    /// GUID with a representation tag affecting the stored byte order
    Uuid {
        uuid: Uuid,
        representation: UuidRepresentation,
    },

    /// `/pattern/flags` regular expression; the pattern is never compiled here
    Regex { pattern: String, options: String },

    /// Array of values; only producible by an expression resolver
    Array(Vec<Value>),
}

impl Value {
    /// Renders the value as MongoDB Extended JSON.
    ///
    /// Plain JSON scalars map directly; everything else uses the extended
    /// forms the store understands (`$numberDecimal`, `$date`, `$oid`,
    /// `$binary`, `$regularExpression`). Timestamps are emitted with
    /// millisecond precision, matching the store's date resolution.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => (*b).into(),
            Value::Decimal(d) => json!({ "$numberDecimal": d.to_string() }),
            Value::DateTime(dt) => {
                json!({ "$date": dt.to_rfc3339_opts(SecondsFormat::Millis, true) })
            }
            Value::String(s) => s.clone().into(),
            Value::ObjectId(bytes) => json!({ "$oid": hex(bytes) }),
            Value::Binary { bytes, subtype } => binary_json(bytes, subtype.code()),
            Value::Uuid {
                uuid,
                representation,
            } => binary_json(
                &representation.stored_bytes(uuid),
                representation.subtype_code(),
            ),
            Value::Regex { pattern, options } => json!({
                "$regularExpression": { "pattern": pattern, "options": options }
            }),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

fn binary_json(bytes: &[u8], subtype: u8) -> serde_json::Value {
    use base64::Engine;

    json!({
        "$binary": {
            "base64": base64::engine::general_purpose::STANDARD.encode(bytes),
            "subType": format!("{:02x}", subtype),
        }
    })
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Subtype tag of a `BINARY(...)` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarySubtype {
    Binary,
    Function,
    OldBinary,
    UuidLegacy,
    UuidStandard,
    Md5,
    Encrypted,
    UserDefined,
    /// Any other subtype byte, written numerically in the literal
    Other(u8),
}

impl BinarySubtype {
    /// Parses the subtype argument of a two-argument `BINARY` literal: a
    /// well-known name or a decimal byte value.
    pub fn from_name(name: &str) -> Option<Self> {
        let subtype = match name {
            "Binary" => BinarySubtype::Binary,
            "Function" => BinarySubtype::Function,
            "OldBinary" => BinarySubtype::OldBinary,
            "UuidLegacy" => BinarySubtype::UuidLegacy,
            "UuidStandard" => BinarySubtype::UuidStandard,
            "MD5" => BinarySubtype::Md5,
            "Encrypted" => BinarySubtype::Encrypted,
            "UserDefined" => BinarySubtype::UserDefined,
            _ => BinarySubtype::from_code(name.parse().ok()?),
        };
        Some(subtype)
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => BinarySubtype::Binary,
            0x01 => BinarySubtype::Function,
            0x02 => BinarySubtype::OldBinary,
            0x03 => BinarySubtype::UuidLegacy,
            0x04 => BinarySubtype::UuidStandard,
            0x05 => BinarySubtype::Md5,
            0x06 => BinarySubtype::Encrypted,
            0x80 => BinarySubtype::UserDefined,
            other => BinarySubtype::Other(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            BinarySubtype::Binary => 0x00,
            BinarySubtype::Function => 0x01,
            BinarySubtype::OldBinary => 0x02,
            BinarySubtype::UuidLegacy => 0x03,
            BinarySubtype::UuidStandard => 0x04,
            BinarySubtype::Md5 => 0x05,
            BinarySubtype::Encrypted => 0x06,
            BinarySubtype::UserDefined => 0x80,
            BinarySubtype::Other(code) => *code,
        }
    }
}

/// How a `UUID(...)` literal's bytes are laid out in the store.
///
/// `Standard` is RFC 4122 big-endian under binary subtype 0x04. The legacy
/// representations all use subtype 0x03 but disagree on byte order: drivers
/// historically serialized GUIDs in their platform's native layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidRepresentation {
    Standard,
    CSharpLegacy,
    JavaLegacy,
    PythonLegacy,
}

impl UuidRepresentation {
    /// Parses the representation argument of a two-argument `UUID` literal.
    /// Names are exact; anything else (including `Unspecified`) is rejected.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Standard" => Some(UuidRepresentation::Standard),
            "CSharpLegacy" => Some(UuidRepresentation::CSharpLegacy),
            "JavaLegacy" => Some(UuidRepresentation::JavaLegacy),
            "PythonLegacy" => Some(UuidRepresentation::PythonLegacy),
            _ => None,
        }
    }

    pub fn subtype_code(&self) -> u8 {
        match self {
            UuidRepresentation::Standard => 0x04,
            _ => 0x03,
        }
    }

    /// The 16 bytes as the store sees them for this representation.
    pub fn stored_bytes(&self, uuid: &Uuid) -> [u8; 16] {
        let b = *uuid.as_bytes();
        match self {
            // RFC 4122 order.
            UuidRepresentation::Standard | UuidRepresentation::PythonLegacy => b,
            // .NET Guid.ToByteArray(): first three groups little-endian.
            UuidRepresentation::CSharpLegacy => [
                b[3], b[2], b[1], b[0], b[5], b[4], b[7], b[6], b[8], b[9], b[10], b[11], b[12],
                b[13], b[14], b[15],
            ],
            // Each 8-byte half reversed.
            UuidRepresentation::JavaLegacy => [
                b[7], b[6], b[5], b[4], b[3], b[2], b[1], b[0], b[15], b[14], b[13], b[12], b[11],
                b[10], b[9], b[8],
            ],
        }
    }
}
