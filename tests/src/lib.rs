//! Tether integration test framework.
//!
//! Scenarios run nested mutation requests against a real in-memory SQLite
//! database and check both the reported outcome and what is left in the
//! tables afterwards.
//!
//! ```ignore
//! use tether_tests::prelude::*;
//!
//! Scenario::new("fan_out")
//!     .step("create_user_with_posts", create("users", json!({...})), |a| a.inserted("posts", 2))
//!     .run()
//!     .unwrap();
//! ```

mod assertion;
mod error;
pub mod fixtures;
mod scenario;

pub use assertion::{Assertion, AssertionBuilder, ExpectedError};
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::{create, update, update_by_node_id, Scenario};

pub mod prelude {
    pub use crate::fixtures::{blog_catalog, blog_connection, blog_tether, count_rows, BLOG_DDL};
    pub use crate::{
        create, update, update_by_node_id, Assertion, AssertionBuilder, ExpectedError, Scenario, ScenarioError,
        ScenarioResult,
    };
    pub use serde_json::json;
    pub use tether_compiler::StatementKind;
    pub use tether_core::{row, Row, Value};
    pub use tether_mutation::MutationRequest;
    pub use tether_session::{SessionError, Tether, TetherConfig};
}
