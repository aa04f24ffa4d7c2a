//! The immutable Catalog.

use crate::{derive_relationships, CatalogError, CatalogResult, Relationship, TableDescriptor};
use std::collections::HashMap;

/// Immutable model of tables and their relationships.
///
/// Built once by [`CatalogBuilder`](crate::CatalogBuilder) or from introspected
/// parts via [`Catalog::from_parts`]; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Tables in declaration order.
    tables: Vec<TableDescriptor>,
    /// Table name to index.
    table_index: HashMap<String, usize>,
    /// Relationships keyed by local table.
    relationships: HashMap<String, Vec<Relationship>>,
}

impl Catalog {
    pub(crate) fn new(tables: Vec<TableDescriptor>, relationships: HashMap<String, Vec<Relationship>>) -> Self {
        let table_index = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();

        Self {
            tables,
            table_index,
            relationships,
        }
    }

    /// Assemble a catalog from descriptors and relationships produced by an
    /// external introspection step.
    ///
    /// Only structural consistency is checked: every relationship must join
    /// existing tables through existing attributes with matching arity. Unlike
    /// [`CatalogBuilder::build`](crate::CatalogBuilder::build), referenced columns
    /// are not required to carry a unique constraint; the registry reports that
    /// per relationship instead.
    pub fn from_parts(tables: Vec<TableDescriptor>, relationships: Vec<Relationship>) -> CatalogResult<Self> {
        let mut seen = HashMap::new();
        for (i, table) in tables.iter().enumerate() {
            if seen.insert(table.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateTable(table.name.clone()));
            }
        }

        let mut by_table: HashMap<String, Vec<Relationship>> = HashMap::new();
        for rel in relationships {
            let local = seen
                .get(&rel.local_table)
                .map(|&i| &tables[i])
                .ok_or_else(|| CatalogError::UnknownTable(rel.local_table.clone()))?;
            let remote = seen
                .get(&rel.remote_table)
                .map(|&i| &tables[i])
                .ok_or_else(|| CatalogError::UnknownTable(rel.remote_table.clone()))?;

            if rel.local_attributes.len() != rel.remote_attributes.len() || rel.local_attributes.is_empty() {
                return Err(CatalogError::arity_mismatch(
                    &rel.constraint_name,
                    rel.local_attributes.len(),
                    rel.remote_attributes.len(),
                ));
            }
            for attr in &rel.local_attributes {
                if !local.has_attr(attr) {
                    return Err(CatalogError::unknown_attribute(&local.name, attr));
                }
            }
            for attr in &rel.remote_attributes {
                if !remote.has_attr(attr) {
                    return Err(CatalogError::unknown_attribute(&remote.name, attr));
                }
            }

            let entry = by_table.entry(rel.local_table.clone()).or_default();
            if entry.iter().any(|r| r.name == rel.name) {
                return Err(CatalogError::DuplicateRelationship {
                    table: rel.local_table.clone(),
                    name: rel.name.clone(),
                });
            }
            entry.push(rel);
        }

        Ok(Self::new(tables, by_table))
    }

    // ==================== Table Lookups ====================

    /// Get a table by name.
    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.table_index.get(name).map(|&i| &self.tables[i])
    }

    /// Iterate all tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.iter()
    }

    /// Number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    // ==================== Relationship Lookups ====================

    /// Relationships local to `table`: forward records first, then reverse.
    pub fn relationships(&self, table: &str) -> &[Relationship] {
        self.relationships.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find a relationship local to `table` by name.
    pub fn relationship(&self, table: &str, name: &str) -> Option<&Relationship> {
        self.relationships(table).iter().find(|r| r.name == name)
    }

    /// Total relationship records across all tables.
    pub fn relationship_count(&self) -> usize {
        self.relationships.values().map(Vec::len).sum()
    }

    /// Recompute the relationships of one table from the declared keys.
    ///
    /// Agrees with the stored records for catalogs built by the builder.
    pub fn derive_relationships(&self, table: &str) -> Vec<Relationship> {
        match self.table(table) {
            Some(t) => derive_relationships(t, &self.tables),
            None => Vec::new(),
        }
    }
}
