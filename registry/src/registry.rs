//! The Registry - immutable lookup of the generated input surface.

use crate::{GeneratedType, InflectionOptions, Inflector, RelationshipFields, SchemaBuildError};
use std::collections::{BTreeMap, HashMap};

/// The Registry provides lookup of generated types and connector fields.
/// It is immutable after construction and safe to share across threads.
#[derive(Debug)]
pub struct Registry {
    inflector: Inflector,
    /// Generated types by name.
    types: HashMap<String, GeneratedType>,
    /// Connector surfaces by local table, in catalog relationship order.
    fields_by_table: HashMap<String, Vec<RelationshipFields>>,
    /// Attribute field name to attribute name, per table.
    attribute_fields: HashMap<String, BTreeMap<String, String>>,
    /// Patch type name per table.
    patch_types: HashMap<String, String>,
    /// Errors recovered during the build.
    diagnostics: Vec<SchemaBuildError>,
}

impl Registry {
    pub(crate) fn new(
        inflector: Inflector,
        types: HashMap<String, GeneratedType>,
        fields_by_table: HashMap<String, Vec<RelationshipFields>>,
        attribute_fields: HashMap<String, BTreeMap<String, String>>,
        patch_types: HashMap<String, String>,
        diagnostics: Vec<SchemaBuildError>,
    ) -> Self {
        Self {
            inflector,
            types,
            fields_by_table,
            attribute_fields,
            patch_types,
            diagnostics,
        }
    }

    // ==================== Type Lookups ====================

    /// Get a generated type by name.
    pub fn type_by_name(&self, name: &str) -> Option<&GeneratedType> {
        self.types.get(name)
    }

    /// Number of generated types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All generated type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    /// The patch type of a table.
    pub fn patch_type(&self, table: &str) -> Option<&GeneratedType> {
        self.patch_types.get(table).and_then(|name| self.types.get(name))
    }

    // ==================== Field Lookups ====================

    /// Every connector surface of `table`.
    pub fn mutation_fields(&self, table: &str) -> &[RelationshipFields] {
        self.fields_by_table.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The connector surface behind a connector field name on `table`.
    pub fn connector(&self, table: &str, field_name: &str) -> Option<&RelationshipFields> {
        self.mutation_fields(table)
            .iter()
            .find(|f| f.field_name() == field_name)
    }

    /// Attribute field name to attribute name for `table`.
    pub fn table_input_fields(&self, table: &str) -> Option<&BTreeMap<String, String>> {
        self.attribute_fields.get(table)
    }

    /// The attribute behind an input field name, if it is one.
    pub fn attribute_for_field(&self, table: &str, field_name: &str) -> Option<&str> {
        self.attribute_fields
            .get(table)
            .and_then(|fields| fields.get(field_name))
            .map(String::as_str)
    }

    /// The input field name for an attribute.
    pub fn field_for_attribute(&self, attribute: &str) -> String {
        self.inflector.attribute_field(attribute)
    }

    // ==================== Naming ====================

    pub fn options(&self) -> &InflectionOptions {
        self.inflector.options()
    }

    /// Field carrying the opaque identifier in node-id types.
    pub fn node_id_field(&self) -> String {
        self.inflector.node_id_field()
    }

    /// Field carrying the patch in update-by types.
    pub fn patch_field(&self) -> String {
        self.inflector.patch_field()
    }

    /// Errors recovered while building, in the order they occurred.
    pub fn build_errors(&self) -> &[SchemaBuildError] {
        &self.diagnostics
    }
}
