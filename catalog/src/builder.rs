//! CatalogBuilder for constructing an immutable Catalog.

use crate::{derive_relationships, AttributeDef, Catalog, ForeignKeyDef, TableDescriptor, UniqueConstraint};
use std::collections::HashMap;
use thiserror::Error;

/// Result type for catalog construction.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur during catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate table name: {0}")]
    DuplicateTable(String),

    #[error("Duplicate attribute {attr} on table {table}")]
    DuplicateAttribute { table: String, attr: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown attribute {attr} on table {table}")]
    UnknownAttribute { table: String, attr: String },

    #[error("Table {0} declares more than one primary key")]
    MultiplePrimaryKeys(String),

    #[error("Constraint {constraint} must name at least one attribute")]
    EmptyConstraint { constraint: String },

    #[error("Foreign key {constraint} pairs {local} attributes with {remote} referenced attributes")]
    ArityMismatch {
        constraint: String,
        local: usize,
        remote: usize,
    },

    #[error("Foreign key {constraint} references {table}({attributes}) which no unique constraint covers")]
    MissingReferencedUnique {
        constraint: String,
        table: String,
        attributes: String,
    },

    #[error("Duplicate relationship {name} on table {table}")]
    DuplicateRelationship { table: String, name: String },
}

impl CatalogError {
    pub fn unknown_attribute(table: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            table: table.into(),
            attr: attr.into(),
        }
    }

    pub fn arity_mismatch(constraint: impl Into<String>, local: usize, remote: usize) -> Self {
        Self::ArityMismatch {
            constraint: constraint.into(),
            local,
            remote,
        }
    }

    pub fn missing_referenced_unique(
        constraint: impl Into<String>,
        table: impl Into<String>,
        attributes: &[String],
    ) -> Self {
        Self::MissingReferencedUnique {
            constraint: constraint.into(),
            table: table.into(),
            attributes: attributes.join(", "),
        }
    }
}

/// Builder for constructing an immutable Catalog.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    /// Tables in declaration order.
    tables: Vec<TableDescriptor>,
    /// Table name to index.
    table_names: HashMap<String, usize>,
}

impl CatalogBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table definition.
    pub fn add_table(&mut self, name: impl Into<String>) -> TableBuilder<'_> {
        TableBuilder {
            builder: self,
            name: name.into(),
            attributes: Vec::new(),
            uniques: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Validate every foreign key and build the immutable Catalog.
    pub fn build(self) -> CatalogResult<Catalog> {
        for table in &self.tables {
            for fk in &table.foreign_keys {
                let target = self
                    .table_names
                    .get(&fk.references_table)
                    .map(|&i| &self.tables[i])
                    .ok_or_else(|| CatalogError::UnknownTable(fk.references_table.clone()))?;

                for attr in &fk.references_attributes {
                    if !target.has_attr(attr) {
                        return Err(CatalogError::unknown_attribute(&target.name, attr));
                    }
                }

                if target.unique_covering(&fk.references_attributes).is_none() {
                    return Err(CatalogError::missing_referenced_unique(
                        &fk.name,
                        &target.name,
                        &fk.references_attributes,
                    ));
                }
            }
        }

        let relationships = self
            .tables
            .iter()
            .map(|t| (t.name.clone(), derive_relationships(t, &self.tables)))
            .collect();

        Ok(Catalog::new(self.tables, relationships))
    }
}

/// Builder for a table definition.
pub struct TableBuilder<'a> {
    builder: &'a mut CatalogBuilder,
    name: String,
    attributes: Vec<AttributeDef>,
    uniques: Vec<UniqueConstraint>,
    foreign_keys: Vec<ForeignKeyDef>,
}

impl<'a> TableBuilder<'a> {
    /// Add an attribute.
    pub fn attr(mut self, attr: AttributeDef) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Declare the primary key, named `<table>_pkey`.
    pub fn primary_key<S: AsRef<str>>(mut self, attributes: &[S]) -> Self {
        self.uniques.push(UniqueConstraint {
            name: format!("{}_pkey", self.name),
            attributes: to_strings(attributes),
            is_primary: true,
        });
        self
    }

    /// Declare a unique constraint, named `<table>_<attrs>_key`.
    pub fn unique<S: AsRef<str>>(mut self, attributes: &[S]) -> Self {
        let attributes = to_strings(attributes);
        self.uniques.push(UniqueConstraint {
            name: format!("{}_{}_key", self.name, attributes.join("_")),
            attributes,
            is_primary: false,
        });
        self
    }

    /// Declare a foreign key, named `<table>_<attrs>_fkey`.
    pub fn foreign_key<S: AsRef<str>, T: AsRef<str>>(
        self,
        attributes: &[S],
        references_table: impl Into<String>,
        references_attributes: &[T],
    ) -> Self {
        let attributes = to_strings(attributes);
        let name = format!("{}_{}_fkey", self.name, attributes.join("_"));
        self.foreign_key_named(name, &attributes, references_table, references_attributes)
    }

    /// Declare a foreign key with an explicit constraint name.
    pub fn foreign_key_named<S: AsRef<str>, T: AsRef<str>>(
        mut self,
        name: impl Into<String>,
        attributes: &[S],
        references_table: impl Into<String>,
        references_attributes: &[T],
    ) -> Self {
        self.foreign_keys.push(ForeignKeyDef {
            name: name.into(),
            attributes: to_strings(attributes),
            references_table: references_table.into(),
            references_attributes: to_strings(references_attributes),
        });
        self
    }

    /// Finish building this table.
    ///
    /// Checks everything local to the table; cross-table references are
    /// checked by [`CatalogBuilder::build`].
    pub fn done(self) -> CatalogResult<()> {
        if self.builder.table_names.contains_key(&self.name) {
            return Err(CatalogError::DuplicateTable(self.name));
        }

        for (i, attr) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.name == attr.name) {
                return Err(CatalogError::DuplicateAttribute {
                    table: self.name.clone(),
                    attr: attr.name.clone(),
                });
            }
        }

        if self.uniques.iter().filter(|u| u.is_primary).count() > 1 {
            return Err(CatalogError::MultiplePrimaryKeys(self.name));
        }

        let has_attr = |name: &str| self.attributes.iter().any(|a| a.name == name);

        for unique in &self.uniques {
            if unique.attributes.is_empty() {
                return Err(CatalogError::EmptyConstraint {
                    constraint: unique.name.clone(),
                });
            }
            if let Some(missing) = unique.attributes.iter().find(|a| !has_attr(a)) {
                return Err(CatalogError::unknown_attribute(&self.name, missing));
            }
        }

        for fk in &self.foreign_keys {
            if fk.attributes.is_empty() {
                return Err(CatalogError::EmptyConstraint {
                    constraint: fk.name.clone(),
                });
            }
            if fk.attributes.len() != fk.references_attributes.len() {
                return Err(CatalogError::arity_mismatch(
                    &fk.name,
                    fk.attributes.len(),
                    fk.references_attributes.len(),
                ));
            }
            if let Some(missing) = fk.attributes.iter().find(|a| !has_attr(a)) {
                return Err(CatalogError::unknown_attribute(&self.name, missing));
            }
        }

        let table = TableDescriptor {
            name: self.name.clone(),
            attributes: self.attributes,
            uniques: self.uniques,
            foreign_keys: self.foreign_keys,
        };

        self.builder
            .table_names
            .insert(self.name, self.builder.tables.len());
        self.builder.tables.push(table);

        Ok(())
    }
}

fn to_strings<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}
