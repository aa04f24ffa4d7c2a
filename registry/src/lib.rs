//! Tether Type/Field Registry
//!
//! Derives the generated input surface of nested mutations from a
//! [`Catalog`](tether_catalog::Catalog):
//! - Deterministic names for connector, create, connect, update, delete and patch types
//! - A [`BuildContext`] that memoizes each type under a stable key
//! - An immutable [`Registry`] answering field and type lookups at request time
//!
//! Failures while generating one relationship are [`SchemaBuildError`]s; they
//! are logged and the affected fields omitted, never aborting the build.

mod builder;
mod context;
mod error;
mod inflection;
mod options;
mod registry;
mod types;

pub use builder::*;
pub use context::*;
pub use error::*;
pub use inflection::*;
pub use options::*;
pub use registry::*;
pub use types::*;
