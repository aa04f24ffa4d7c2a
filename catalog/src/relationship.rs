//! Relationships derived from foreign keys.
//!
//! Every foreign key yields exactly two relationships: a forward one on the
//! referencing table and a reverse one on the referenced table. A
//! self-referencing key puts both on the same table.

use crate::{Cardinality, ForeignKeyDef, TableDescriptor};

/// One direction of a foreign key, seen from `local_table`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// Unique per local table: the constraint name, suffixed `_inverse` for reverse records.
    pub name: String,
    pub local_table: String,
    pub remote_table: String,
    /// Paired positionally with `remote_attributes`.
    pub local_attributes: Vec<String>,
    pub remote_attributes: Vec<String>,
    pub is_reverse: bool,
    pub cardinality: Cardinality,
    /// Name of the foreign key constraint this was derived from.
    pub constraint_name: String,
}

impl Relationship {
    /// Forward record: `fk_table` holds the key referencing `referenced`.
    pub fn forward(fk_table: &str, fk: &ForeignKeyDef) -> Self {
        Self {
            name: fk.name.clone(),
            local_table: fk_table.to_string(),
            remote_table: fk.references_table.clone(),
            local_attributes: fk.attributes.clone(),
            remote_attributes: fk.references_attributes.clone(),
            is_reverse: false,
            cardinality: Cardinality::One,
            constraint_name: fk.name.clone(),
        }
    }

    /// Reverse record on the referenced table. `fk_table` is the declaring table.
    pub fn reverse(fk_table: &TableDescriptor, fk: &ForeignKeyDef) -> Self {
        let cardinality = if fk_table.unique_covering(&fk.attributes).is_some() {
            Cardinality::One
        } else {
            Cardinality::Many
        };

        Self {
            name: format!("{}_inverse", fk.name),
            local_table: fk.references_table.clone(),
            remote_table: fk_table.name.clone(),
            local_attributes: fk.references_attributes.clone(),
            remote_attributes: fk.attributes.clone(),
            is_reverse: true,
            cardinality,
            constraint_name: fk.name.clone(),
        }
    }

    /// The table holding the foreign key columns.
    pub fn fk_table(&self) -> &str {
        if self.is_reverse {
            &self.remote_table
        } else {
            &self.local_table
        }
    }

    /// The foreign key columns, in constraint order.
    pub fn fk_attributes(&self) -> &[String] {
        if self.is_reverse {
            &self.remote_attributes
        } else {
            &self.local_attributes
        }
    }

    /// The table referenced by the foreign key.
    pub fn key_table(&self) -> &str {
        if self.is_reverse {
            &self.local_table
        } else {
            &self.remote_table
        }
    }

    /// The referenced columns, paired positionally with [`fk_attributes`](Self::fk_attributes).
    pub fn key_attributes(&self) -> &[String] {
        if self.is_reverse {
            &self.local_attributes
        } else {
            &self.remote_attributes
        }
    }

    /// Whether the far side holds at most one row.
    pub fn is_single(&self) -> bool {
        self.cardinality == Cardinality::One
    }

    /// Stable identity used to derive generated type keys.
    ///
    /// Covers the referencing table, its sorted key columns, the referenced
    /// table and the direction, so keys on the same columns that point at
    /// different tables stay apart.
    pub fn identity(&self) -> String {
        let mut attrs = self.fk_attributes().to_vec();
        attrs.sort();
        format!(
            "{}({})->{}:{}",
            self.fk_table(),
            attrs.join(","),
            self.key_table(),
            if self.is_reverse { "reverse" } else { "forward" }
        )
    }
}

/// Derive every relationship touching `table`: forward records for the keys
/// it declares, then reverse records for keys in `tables` that reference it.
pub fn derive_relationships(table: &TableDescriptor, tables: &[TableDescriptor]) -> Vec<Relationship> {
    let mut relationships: Vec<Relationship> = table
        .foreign_keys
        .iter()
        .map(|fk| Relationship::forward(&table.name, fk))
        .collect();

    for other in tables {
        for fk in other.foreign_keys.iter().filter(|fk| fk.references_table == table.name) {
            relationships.push(Relationship::reverse(other, fk));
        }
    }

    relationships
}
