//! Executor configuration.

use serde::Deserialize;

/// Connection settings applied before each request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorOptions {
    /// Run `PRAGMA foreign_keys = ON` before opening the transaction.
    pub enforce_foreign_keys: bool,
    /// How long to wait on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            enforce_foreign_keys: true,
            busy_timeout_ms: 5000,
        }
    }
}

impl ExecutorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }

    pub fn with_busy_timeout_ms(mut self, ms: u64) -> Self {
        self.busy_timeout_ms = ms;
        self
    }
}
