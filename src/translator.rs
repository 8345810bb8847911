//! JSON serialization of interface records
//!
//! Compact and pretty output carry the same fields; they differ only in
//! whitespace.

use serde::Serialize;
use thiserror::Error;

use crate::models::InterfaceRecord;

/// Encoding fault while producing JSON
#[derive(Debug, Error)]
#[error("failed to encode JSON: {0}")]
pub struct SerializationError(#[from] serde_json::Error);

/// Serializes `record` as minified JSON, or indented JSON when `pretty`
pub fn serialize(record: &InterfaceRecord, pretty: bool) -> Result<String, SerializationError> {
    to_json(record, pretty)
}

/// Serializes any value with the same compact/pretty switch
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, SerializationError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
