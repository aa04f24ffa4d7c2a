//! Session configuration.

use crate::SessionResult;
use serde::Deserialize;
use tether_registry::InflectionOptions;
use tether_transaction::ExecutorOptions;

/// Naming and execution settings.
///
/// ```json
/// {"inflection": {"node_id_label": "id"}, "executor": {"busy_timeout_ms": 1000}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    pub inflection: InflectionOptions,
    pub executor: ExecutorOptions,
}

impl TetherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON; absent keys keep their defaults.
    pub fn from_json_str(source: &str) -> SessionResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_inflection(mut self, inflection: InflectionOptions) -> Self {
        self.inflection = inflection;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorOptions) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_node_id_label(mut self, label: impl Into<String>) -> Self {
        self.inflection = self.inflection.with_node_id_label(label);
        self
    }
}
