//! Table descriptor types.

use tether_core::Codec;

/// Definition of a table attribute (column).
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    /// Column name.
    pub name: String,
    /// Codec used to encode caller values for this column.
    pub codec: Codec,
    /// Whether NULL is accepted.
    pub nullable: bool,
    /// Whether the store supplies a value when none is given.
    pub has_default: bool,
}

impl AttributeDef {
    /// Create a NOT NULL attribute without a default.
    pub fn new(name: impl Into<String>, codec: Codec) -> Self {
        Self {
            name: name.into(),
            codec,
            nullable: false,
            has_default: false,
        }
    }

    /// Mark as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark as having a store-side default (serial keys, timestamps).
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Whether an insert must supply this attribute.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.has_default
    }
}

/// A unique constraint over an ordered list of attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueConstraint {
    pub name: String,
    pub attributes: Vec<String>,
    pub is_primary: bool,
}

impl UniqueConstraint {
    /// True if this constraint covers exactly the given attribute set (order-insensitive).
    pub fn covers_exactly(&self, attributes: &[String]) -> bool {
        self.attributes.len() == attributes.len()
            && self.attributes.iter().all(|a| attributes.contains(a))
    }
}

/// A foreign key declared on the referencing table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyDef {
    pub name: String,
    /// Columns on the declaring table.
    pub attributes: Vec<String>,
    pub references_table: String,
    /// Columns on the referenced table, positionally paired with `attributes`.
    pub references_attributes: Vec<String>,
}

/// Immutable description of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    pub name: String,
    /// Attributes in declaration order.
    pub attributes: Vec<AttributeDef>,
    pub uniques: Vec<UniqueConstraint>,
    pub foreign_keys: Vec<ForeignKeyDef>,
}

impl TableDescriptor {
    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check whether an attribute exists.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The primary key constraint, if declared.
    pub fn primary_key(&self) -> Option<&UniqueConstraint> {
        self.uniques.iter().find(|u| u.is_primary)
    }

    /// The unique constraint whose attributes are exactly `attributes`.
    pub fn unique_covering(&self, attributes: &[String]) -> Option<&UniqueConstraint> {
        self.uniques.iter().find(|u| u.covers_exactly(attributes))
    }

    /// The first unique constraint fully contained in `attributes`, primary key first.
    pub fn unique_containing(&self, attributes: &[String]) -> Option<&UniqueConstraint> {
        self.primary_key()
            .into_iter()
            .chain(self.uniques.iter().filter(|u| !u.is_primary))
            .find(|u| u.attributes.iter().all(|a| attributes.contains(a)))
    }

    /// Look up a unique constraint by name.
    pub fn unique(&self, name: &str) -> Option<&UniqueConstraint> {
        self.uniques.iter().find(|u| u.name == name)
    }
}

/// How many rows sit on the far side of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    Many,
}
