//! Root mutation requests.

use serde_json::Value as Json;

/// The root write of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RootOperation {
    /// Insert one row; `input` holds attribute and connector fields.
    Create { input: Json },
    /// Update the row matched by a unique key given as `(attribute, value)` pairs.
    Update { key: Vec<(String, Json)>, patch: Json },
    /// Update the row named by an opaque identifier.
    UpdateByNodeId { node_id: String, patch: Json },
}

/// One nested mutation request against a root table.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    pub table: String,
    pub operation: RootOperation,
    /// Root attributes the caller wants back.
    pub returning: Vec<String>,
}

impl MutationRequest {
    pub fn create(table: impl Into<String>, input: Json) -> Self {
        Self {
            table: table.into(),
            operation: RootOperation::Create { input },
            returning: Vec::new(),
        }
    }

    pub fn update<K: Into<String>>(
        table: impl Into<String>,
        key: impl IntoIterator<Item = (K, Json)>,
        patch: Json,
    ) -> Self {
        Self {
            table: table.into(),
            operation: RootOperation::Update {
                key: key.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                patch,
            },
            returning: Vec::new(),
        }
    }

    pub fn update_by_node_id(table: impl Into<String>, node_id: impl Into<String>, patch: Json) -> Self {
        Self {
            table: table.into(),
            operation: RootOperation::UpdateByNodeId {
                node_id: node_id.into(),
                patch,
            },
            returning: Vec::new(),
        }
    }

    /// Request root attributes back.
    pub fn returning<S: AsRef<str>>(mut self, attributes: &[S]) -> Self {
        self.returning
            .extend(attributes.iter().map(|a| a.as_ref().to_string()));
        self
    }

    /// The nested input object (create input or patch).
    pub fn input(&self) -> &Json {
        match &self.operation {
            RootOperation::Create { input } => input,
            RootOperation::Update { patch, .. } | RootOperation::UpdateByNodeId { patch, .. } => patch,
        }
    }
}
