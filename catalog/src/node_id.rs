//! Opaque row identifiers.
//!
//! A node identifier names one row of one table without the caller knowing
//! its key columns. The catalog only defines the seam; hosts may plug in
//! their own encoding.

use thiserror::Error;

/// Errors raised while decoding a node identifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeIdError {
    #[error("Malformed node identifier: {0}")]
    Malformed(String),

    #[error("Node identifier carries no table name")]
    MissingTable,
}

/// Encode/decode pair for opaque row identifiers.
pub trait NodeIdCodec: Send + Sync {
    /// Encode a table name and its primary key values (in key order).
    fn encode(&self, table: &str, key_values: &[serde_json::Value]) -> String;

    /// Decode an identifier into its table name and key values.
    fn decode(&self, id: &str) -> Result<(String, Vec<serde_json::Value>), NodeIdError>;
}

/// Identifiers as compact JSON arrays: `["posts",1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonNodeIdCodec;

impl NodeIdCodec for JsonNodeIdCodec {
    fn encode(&self, table: &str, key_values: &[serde_json::Value]) -> String {
        let mut parts = Vec::with_capacity(key_values.len() + 1);
        parts.push(serde_json::Value::String(table.to_string()));
        parts.extend(key_values.iter().cloned());
        serde_json::Value::Array(parts).to_string()
    }

    fn decode(&self, id: &str) -> Result<(String, Vec<serde_json::Value>), NodeIdError> {
        let parsed: serde_json::Value =
            serde_json::from_str(id).map_err(|e| NodeIdError::Malformed(e.to_string()))?;

        let mut parts = match parsed {
            serde_json::Value::Array(parts) => parts.into_iter(),
            other => return Err(NodeIdError::Malformed(format!("expected an array, got {}", other))),
        };

        match parts.next() {
            Some(serde_json::Value::String(table)) => Ok((table, parts.collect())),
            _ => Err(NodeIdError::MissingTable),
        }
    }
}
