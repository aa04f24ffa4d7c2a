//! Tether Session
//!
//! The entry point for nested mutations.
//!
//! Responsibilities:
//! - Build the registry once per catalog and share it
//! - Load configuration
//! - Run requests through plan, compile and execute
//! - Encode node identifiers for callers

mod config;
mod error;
mod tether;

pub use config::TetherConfig;
pub use error::{SessionError, SessionResult};
pub use tether::Tether;
