//! JSON decoding that never rounds integer identifiers.
//!
//! The API emits 64-bit identifiers. Those fit `i64`/`u64` exactly, but
//! anything wider would normally degrade to an `f64`. Numbers are parsed
//! with `arbitrary_precision`, so their original text survives, and integer
//! literals outside the 64-bit range are rewritten as strings.

use serde_json::Value;

use crate::error::ApiError;

/// Decode `body`, keeping object key order and out-of-range integers as text.
pub fn decode(body: &str) -> Result<Value, ApiError> {
    let mut value: Value = serde_json::from_str(body)?;
    stringify_big_integers(&mut value);
    Ok(value)
}

fn stringify_big_integers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return;
            }
            let text = n.to_string();
            if is_integer_literal(&text) {
                *value = Value::String(text);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(stringify_big_integers),
        Value::Object(map) => map.values_mut().for_each(stringify_big_integers),
        _ => {}
    }
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
