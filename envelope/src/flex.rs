//! Lenient deserializers for backend number encoding.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

fn to_i64<E: serde::de::Error>(raw: IntOrString) -> Result<i64, E> {
    match raw {
        IntOrString::Int(v) => Ok(v),
        #[allow(clippy::cast_possible_truncation)]
        IntOrString::Float(v) if v.fract() == 0.0 => Ok(v as i64),
        IntOrString::Float(v) => Err(E::custom(format!("expected integer, got {v}"))),
        IntOrString::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("expected integer string, got {s:?}"))),
    }
}

/// Deserialize an `i64` sent as either a JSON number or a numeric string.
///
/// # Errors
///
/// Fails when the value is neither an integer nor an integer string.
pub fn i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    to_i64(IntOrString::deserialize(deserializer)?)
}

/// Like [`i64`], but `null` and missing fields become `None`.
///
/// # Errors
///
/// Fails when a present value is neither an integer nor an integer string.
pub fn opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => to_i64(raw).map(Some),
    }
}

/// Deserialize a string field where the backend may send `null`.
///
/// # Errors
///
/// Fails when the value is present and not a string.
pub fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize a money amount sent as a JSON number or a decimal string.
///
/// # Errors
///
/// Fails when the value is not numeric.
pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match IntOrString::deserialize(deserializer)? {
        #[allow(clippy::cast_precision_loss)]
        IntOrString::Int(v) => Ok(v as f64),
        IntOrString::Float(v) => Ok(v),
        IntOrString::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected decimal string, got {s:?}"))),
    }
}
