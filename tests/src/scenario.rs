//! Scenario definition and runner.

use rusqlite::Connection;
use serde_json::Value as Json;
use tether_mutation::MutationRequest;
use tether_session::{Tether, TetherConfig};

use crate::assertion::{Assertion, AssertionBuilder};
use crate::error::{ScenarioError, ScenarioResult};
use crate::fixtures;

/// One request and what it should do.
pub struct Step {
    pub name: String,
    pub request: MutationRequest,
    pub assertion: Assertion,
}

/// A sequence of requests run against one fresh blog database.
pub struct Scenario {
    name: String,
    config: TetherConfig,
    setup: Vec<String>,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: TetherConfig::default(),
            setup: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn config(mut self, config: TetherConfig) -> Self {
        self.config = config;
        self
    }

    /// SQL run after the schema is created, before the first step.
    pub fn seed(mut self, sql: impl Into<String>) -> Self {
        self.setup.push(sql.into());
        self
    }

    /// Add a step with its assertion.
    pub fn step<F>(mut self, name: &str, request: MutationRequest, f: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.steps.push(Step {
            name: name.to_string(),
            request,
            assertion: f(AssertionBuilder::new()).build(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run every step in order, stopping at the first failed assertion.
    ///
    /// Returns the connection so callers can inspect the final state.
    pub fn run(self) -> ScenarioResult<Connection> {
        let tether = fixtures::blog_tether(self.config.clone())
            .map_err(|e| ScenarioError::Setup(format!("{}: {}", self.name, e)))?;
        let mut conn = fixtures::blog_connection()?;
        for sql in &self.setup {
            conn.execute_batch(sql)?;
        }

        for step in &self.steps {
            let result = tether.execute(&mut conn, &step.request);
            let step_name = format!("{}::{}", self.name, step.name);
            step.assertion.verify(&step_name, &result, tether.catalog(), &conn)?;
        }

        Ok(conn)
    }

    /// The facade this scenario runs against.
    pub fn tether(&self) -> ScenarioResult<Tether> {
        fixtures::blog_tether(self.config.clone()).map_err(|e| ScenarioError::Setup(e.to_string()))
    }
}

/// Root create request.
pub fn create(table: &str, input: Json) -> MutationRequest {
    MutationRequest::create(table, input)
}

/// Root update by a single key column.
pub fn update(table: &str, column: &str, key: Json, patch: Json) -> MutationRequest {
    MutationRequest::update(table, [(column, key)], patch)
}

pub fn update_by_node_id(table: &str, node_id: &str, patch: Json) -> MutationRequest {
    MutationRequest::update_by_node_id(table, node_id, patch)
}
