//! Tether Relationship Catalog
//!
//! The catalog is the static model of the relational schema that nested
//! mutations are compiled against:
//! - Table descriptors (ordered attributes, unique constraints, foreign keys)
//! - Relationships derived from every foreign key, once per direction
//! - The opaque node identifier codec used by connect/update-by-identifier
//!
//! A [`Catalog`] is built once, validated, and read-only afterwards.

mod builder;
mod catalog;
mod node_id;
mod relationship;
mod types;

pub use builder::*;
pub use catalog::*;
pub use node_id::*;
pub use relationship::*;
pub use types::*;
