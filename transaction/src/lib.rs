//! Tether Transaction
//!
//! Run a compiled plan against SQLite as one all-or-nothing unit.
//!
//! Responsibilities:
//! - Open one immediate transaction per request
//! - Dispatch statements strictly in plan order
//! - Feed returned rows into later statements' deferred parameters
//! - Map store failures onto the nested input path that caused them
//! - Commit at the end; any failure rolls everything back

mod error;
mod executor;
mod options;
mod outcome;

pub use error::{TransactionError, TransactionResult};
pub use executor::Executor;
pub use options::ExecutorOptions;
pub use outcome::{MutationOutcome, StatementOutcome};
