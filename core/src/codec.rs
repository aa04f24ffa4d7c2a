//! Per-attribute codecs.
//!
//! A codec is the only way a caller-supplied JSON scalar becomes a bindable
//! [`Value`], and the only way a stored value becomes JSON again.

use crate::{json_type_name, CodecError, CodecResult, Value};
use std::fmt;

/// Storage codec for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Int,
    Float,
    Text,
    Bool,
    Json,
    Blob,
    /// RFC3339 text. Only checked for being non-empty text; the store owns parsing.
    Timestamp,
}

impl Codec {
    /// Human-readable codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Int => "Int",
            Codec::Float => "Float",
            Codec::Text => "Text",
            Codec::Bool => "Bool",
            Codec::Json => "Json",
            Codec::Blob => "Blob",
            Codec::Timestamp => "Timestamp",
        }
    }

    /// Column affinity used when rendering DDL.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Codec::Int | Codec::Bool => "INTEGER",
            Codec::Float => "REAL",
            Codec::Text | Codec::Json | Codec::Timestamp => "TEXT",
            Codec::Blob => "BLOB",
        }
    }

    /// Encode a wire value into its storage value.
    ///
    /// `null` always encodes to [`Value::Null`]; nullability is the store's concern.
    pub fn encode(&self, json: &serde_json::Value) -> CodecResult<Value> {
        use serde_json::Value as J;

        if json.is_null() {
            return Ok(Value::Null);
        }

        match (self, json) {
            (Codec::Int, J::Number(n)) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| CodecError::mismatch("Int", json_type_name(json))),
            (Codec::Float, J::Number(n)) => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| CodecError::invalid("Float", n.to_string())),
            (Codec::Text, J::String(s)) => Ok(Value::Text(s.clone())),
            (Codec::Bool, J::Bool(b)) => Ok(Value::Bool(*b)),
            (Codec::Json, other) => Ok(Value::Json(other.clone())),
            (Codec::Blob, J::Array(items)) => {
                let mut bytes = Vec::with_capacity(items.len());
                for item in items {
                    let byte = item
                        .as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| CodecError::invalid("Blob", format!("{} is not a byte", item)))?;
                    bytes.push(byte);
                }
                Ok(Value::Blob(bytes))
            }
            (Codec::Timestamp, J::String(s)) => {
                if s.trim().is_empty() {
                    Err(CodecError::invalid("Timestamp", "empty timestamp"))
                } else {
                    Ok(Value::Text(s.clone()))
                }
            }
            (codec, other) => Err(CodecError::mismatch(codec.name(), json_type_name(other))),
        }
    }

    /// Normalize a value read back from the store into this codec's shape.
    ///
    /// SQLite hands booleans back as integers and JSON documents as text.
    pub fn decode(&self, value: Value) -> Value {
        match (self, value) {
            (Codec::Bool, Value::Int(i)) => Value::Bool(i != 0),
            (Codec::Float, Value::Int(i)) => Value::Float(i as f64),
            (Codec::Json, Value::Text(s)) => match serde_json::from_str(&s) {
                Ok(json) => Value::Json(json),
                Err(_) => Value::Text(s),
            },
            (_, value) => value,
        }
    }

    /// Decode a stored value into its wire representation.
    pub fn to_json(&self, value: &Value) -> serde_json::Value {
        self.decode(value.clone()).to_json()
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
