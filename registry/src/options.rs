//! Naming options.

use serde::Deserialize;

/// Options that shape generated field and type names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InflectionOptions {
    /// Snake-case label for opaque identifiers (`node_id` gives `nodeId`, `connectByNodeId`).
    pub node_id_label: String,
    /// Field carrying the patch in update-by types.
    pub patch_field: String,
    /// Forward connector fields drop a trailing `_id` (`author_id` gives `author`).
    pub strip_id_suffix: bool,
}

impl Default for InflectionOptions {
    fn default() -> Self {
        Self {
            node_id_label: "node_id".to_string(),
            patch_field: "patch".to_string(),
            strip_id_suffix: true,
        }
    }
}

impl InflectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier label.
    pub fn with_node_id_label(mut self, label: impl Into<String>) -> Self {
        self.node_id_label = label.into();
        self
    }

    /// Set the patch field name.
    pub fn with_patch_field(mut self, field: impl Into<String>) -> Self {
        self.patch_field = field.into();
        self
    }

    /// Enable or disable `_id` stripping on forward connector fields.
    pub fn with_strip_id_suffix(mut self, strip: bool) -> Self {
        self.strip_id_suffix = strip;
        self
    }
}
