//! Tether Compiler
//!
//! Transform a mutation plan into parameterized SQL statements.
//!
//! Responsibilities:
//! - Order statements by the plan's dependencies
//! - Render one statement per plan node with `?N` placeholders
//! - Keep RETURNING down to the columns something actually reads
//! - Defer parameters produced by earlier statements until dispatch

mod compiler;
mod error;
mod sql;
mod statement;

pub use compiler::{compile, Compiler};
pub use error::{CompileError, CompileResult};
pub use sql::quote_ident;
pub use statement::{CompiledPlan, CompiledStatement, ParamSlot, StatementKind};
