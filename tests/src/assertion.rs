//! Assertion types and builders for verifying step results.

use rusqlite::Connection;
use serde_json::Value as Json;
use tether_catalog::Catalog;
use tether_compiler::StatementKind;
use tether_session::{SessionError, SessionResult};
use tether_transaction::MutationOutcome;

use crate::error::{ScenarioError, ScenarioResult};
use crate::fixtures::count_rows;

/// The kind of failure a step is expected to end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedError {
    /// Rejected while planning; nothing ran.
    Validation,
    NotFound,
    ConstraintViolation,
    Any,
}

impl ExpectedError {
    fn matches(&self, err: &SessionError) -> bool {
        match self {
            ExpectedError::Validation => err.is_validation(),
            ExpectedError::NotFound => err.is_not_found(),
            ExpectedError::ConstraintViolation => err.is_constraint_violation(),
            ExpectedError::Any => true,
        }
    }
}

/// A complete assertion for a step result.
#[derive(Default)]
pub struct Assertion {
    // Outcome assertions
    pub statements: Option<usize>,
    pub kinds: Vec<(StatementKind, String, usize)>,
    pub root: Vec<(String, Json)>,

    // Table state after the step, success or not
    pub rows: Vec<(String, i64)>,

    // Error assertions
    pub error: Option<ExpectedError>,
    pub error_path: Option<String>,
    pub error_pattern: Option<String>,

    // Custom assertion function
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&MutationOutcome) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("statements", &self.statements)
            .field("kinds", &self.kinds)
            .field("root", &self.root)
            .field("rows", &self.rows)
            .field("error", &self.error)
            .field("error_path", &self.error_path)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Assertion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the assertion against a step result and the database it ran on.
    pub fn verify(
        &self,
        step: &str,
        result: &SessionResult<MutationOutcome>,
        catalog: &Catalog,
        conn: &Connection,
    ) -> ScenarioResult<()> {
        for (table, expected) in &self.rows {
            let actual = count_rows(conn, table)?;
            if actual != *expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} rows in {}, found {}", expected, table, actual),
                ));
            }
        }

        let expects_error = self.error.is_some() || self.error_path.is_some() || self.error_pattern.is_some();
        let outcome = match (result, expects_error) {
            (Err(err), true) => return self.verify_error(step, err),
            (Err(err), false) => {
                return Err(ScenarioError::assertion_failed(step, format!("unexpected error: {}", err)))
            }
            (Ok(_), true) => {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {:?} error, but step succeeded", self.error.unwrap_or(ExpectedError::Any)),
                ))
            }
            (Ok(outcome), false) => outcome,
        };

        if let Some(expected) = self.statements {
            if outcome.statements_executed != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} statements, executed {}", expected, outcome.statements_executed),
                ));
            }
        }

        for (kind, table, expected) in &self.kinds {
            let actual = outcome
                .statements_for(table)
                .filter(|s| s.kind == *kind && s.affected > 0)
                .count();
            if actual != *expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} {} statements on {}, got {}", expected, kind, table, actual),
                ));
            }
        }

        if !self.root.is_empty() {
            let json = outcome.root_json(catalog);
            for (column, expected) in &self.root {
                let actual = json.get(column).cloned().unwrap_or(Json::Null);
                if actual != *expected {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("expected root.{} = {}, got {}", column, expected, actual),
                    ));
                }
            }
        }

        if let Some(ref custom) = self.custom {
            if !custom(outcome) {
                return Err(ScenarioError::assertion_failed(step, "custom assertion failed"));
            }
        }

        Ok(())
    }

    fn verify_error(&self, step: &str, err: &SessionError) -> ScenarioResult<()> {
        if let Some(expected) = self.error {
            if !expected.matches(err) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {:?} error, got: {}", expected, err),
                ));
            }
        }

        if let Some(ref expected) = self.error_path {
            let actual = err.path();
            if actual.as_deref() != Some(expected.as_str()) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error at {}, got {:?}", expected, actual),
                ));
            }
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern).map_err(|e| {
                ScenarioError::assertion_failed(step, format!("invalid regex pattern: {}", e))
            })?;
            let message = err.to_string();
            if !re.is_match(&message) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error matching '{}', got: {}", pattern, message),
                ));
            }
        }

        Ok(())
    }
}

/// Builder for fluent assertion construction.
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    pub fn new() -> Self {
        Self {
            assertion: Assertion::new(),
        }
    }

    pub fn build(self) -> Assertion {
        self.assertion
    }

    // ========== Outcome assertions ==========

    /// Assert the total number of statements executed.
    pub fn statements(mut self, n: usize) -> Self {
        self.assertion.statements = Some(n);
        self
    }

    /// Assert that N rows of `table` were inserted.
    pub fn inserted(self, table: &str, n: usize) -> Self {
        self.kind(StatementKind::Insert, table, n)
    }

    /// Assert that N rows of `table` were updated.
    pub fn updated(self, table: &str, n: usize) -> Self {
        self.kind(StatementKind::Update, table, n)
    }

    /// Assert that N rows of `table` were deleted.
    pub fn deleted(self, table: &str, n: usize) -> Self {
        self.kind(StatementKind::Delete, table, n)
    }

    /// Assert that N connect targets in `table` were looked up.
    pub fn looked_up(self, table: &str, n: usize) -> Self {
        self.kind(StatementKind::Select, table, n)
    }

    fn kind(mut self, kind: StatementKind, table: &str, n: usize) -> Self {
        self.assertion.kinds.push((kind, table.to_string(), n));
        self
    }

    /// Assert a column of the returned root row, decoded to JSON.
    pub fn root(mut self, column: &str, value: Json) -> Self {
        self.assertion.root.push((column.to_string(), value));
        self
    }

    // ========== Table state ==========

    /// Assert how many rows `table` holds after the step.
    pub fn rows(mut self, table: &str, n: i64) -> Self {
        self.assertion.rows.push((table.to_string(), n));
        self
    }

    // ========== Error assertions ==========

    /// Assert that the step fails with the given kind of error.
    pub fn error(mut self, kind: ExpectedError) -> Self {
        self.assertion.error = Some(kind);
        self
    }

    /// Assert that the step fails at the given nested input path.
    pub fn error_at(mut self, path: impl Into<String>) -> Self {
        self.assertion.error_path = Some(path.into());
        self
    }

    /// Assert that the step fails with an error matching the given regex.
    pub fn error_matches(mut self, pattern: impl Into<String>) -> Self {
        self.assertion.error_pattern = Some(pattern.into());
        self
    }

    // ========== Advanced ==========

    /// Custom assertion function.
    pub fn assert_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&MutationOutcome) -> bool + Send + Sync + 'static,
    {
        self.assertion.custom = Some(Box::new(f));
        self
    }
}

impl Default for AssertionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
