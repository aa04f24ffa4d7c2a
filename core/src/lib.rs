//! Tether Core Types
//!
//! This crate provides the foundational types used throughout Tether:
//! - Value types (the Value enum with all storable scalar types)
//! - Codecs (per-attribute encode/decode between wire JSON and storage values)
//! - Rows (column name -> value maps returned from statements)
//! - Common error types and messages

mod codec;
mod error;
pub mod messages;
mod row;
mod value;

pub use codec::*;
pub use error::*;
pub use row::*;
pub use value::*;
