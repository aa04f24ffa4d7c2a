//! Tether Mutation
//!
//! Turn one nested mutation request into a dependency graph of primitive
//! writes.
//!
//! Responsibilities:
//! - Validate nested input against the generated input types
//! - Encode every caller scalar through its attribute codec
//! - Decide which writes depend on which, via pending column bindings
//! - Reject conflicting or malformed input before any statement exists
//!
//! # Module Structure
//!
//! - `builder` - PlanBuilder, the entry point, and connector dispatch
//! - `ops/` - Individual sub-operations (create, connect, update, delete)
//! - `input` - Shared helpers for reading raw input objects
//! - `plan` - The plan graph and its topological order
//! - `request` - Root requests
//! - `path` - Nested input paths used in errors
//! - `error` - Error types for plan construction

mod builder;
mod error;
mod input;
mod ops;
mod path;
mod plan;
mod request;

pub use builder::PlanBuilder;
pub use error::{MutationError, MutationResult};
pub use path::NestedPath;
pub use plan::{Binding, Bindings, MutationPlan, NodeRole, PlanNode, PlanNodeId, PlanOperation};
pub use request::{MutationRequest, RootOperation};
