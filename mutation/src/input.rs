//! Reading and validating the caller's nested input.

use crate::{MutationError, MutationResult, NestedPath, PlanBuilder};
use serde_json::{Map, Value as Json};
use tether_catalog::{TableDescriptor, UniqueConstraint};
use tether_core::{messages, Value};
use tether_registry::{GeneratedType, GeneratedTypeKind, InputFieldKind};

pub(crate) type Object = Map<String, Json>;

/// Require an object.
pub(crate) fn as_object<'v>(value: &'v Json, path: &NestedPath) -> MutationResult<&'v Object> {
    value
        .as_object()
        .ok_or_else(|| MutationError::validation(path, messages::ERR_INPUT_NOT_OBJECT))
}

/// Items of a connector sub-field.
///
/// Single-valued slots take exactly one object. List-valued slots take an
/// array, or a single object treated as a one-element list.
pub(crate) fn items<'v>(value: &'v Json, single: bool, path: &NestedPath) -> MutationResult<Vec<(&'v Object, NestedPath)>> {
    match value {
        Json::Object(obj) => Ok(vec![(obj, path.clone())]),
        Json::Array(list) if !single => list
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = path.index(i);
                as_object(item, &item_path).map(|obj| (obj, item_path))
            })
            .collect(),
        _ if single => Err(MutationError::validation(path, messages::ERR_INPUT_NOT_OBJECT)),
        _ => Err(MutationError::validation(path, messages::ERR_INPUT_NOT_LIST)),
    }
}

/// Check `obj` against a generated type: no unknown fields, and for
/// lookup-style types every required field present.
pub(crate) fn check_fields(obj: &Object, ty: &GeneratedType, path: &NestedPath) -> MutationResult<()> {
    for field in obj.keys() {
        if !ty.has_field(field) {
            return Err(MutationError::unknown_field(path, &ty.name, field));
        }
    }

    // Create types mark NOT NULL columns required, but a nested connector may
    // supply them; the store has the final word there.
    if ty.kind != GeneratedTypeKind::Create {
        for field in ty.fields.iter().filter(|f| f.required) {
            if obj.get(&field.name).map_or(true, Json::is_null) {
                let message = match field.kind {
                    InputFieldKind::Attribute { .. } => messages::ERR_INCOMPLETE_KEY.to_string(),
                    _ => format!("Missing required field {} on {}", field.name, ty.name),
                };
                return Err(MutationError::validation(&path.field(&field.name), message));
            }
        }
    }
    Ok(())
}

impl<'a> PlanBuilder<'a> {
    pub(crate) fn table(&self, name: &str, path: &NestedPath) -> MutationResult<&'a TableDescriptor> {
        self.catalog
            .table(name)
            .ok_or_else(|| MutationError::unknown_table(path, name))
    }

    pub(crate) fn generated_type(&self, name: &str, path: &NestedPath) -> MutationResult<&'a GeneratedType> {
        self.registry
            .type_by_name(name)
            .ok_or_else(|| MutationError::validation(path, format!("Input type {} is not available", name)))
    }

    /// Encode one attribute value through its codec.
    pub(crate) fn encode(
        &self,
        table: &TableDescriptor,
        attribute: &str,
        json: &Json,
        path: &NestedPath,
    ) -> MutationResult<Value> {
        let def = table.attr(attribute).ok_or_else(|| {
            MutationError::validation(path, format!("Unknown attribute {} on {}", attribute, table.name))
        })?;

        if json.is_null() && !def.nullable {
            return Err(MutationError::validation(
                path,
                format!("Attribute {} of {} cannot be null", attribute, table.name),
            ));
        }

        def.codec
            .encode(json)
            .map_err(|e| MutationError::validation(path, e.to_string()))
    }

    /// Encode the attribute fields of `obj`, skipping connector fields.
    ///
    /// Fields that are neither are rejected.
    pub(crate) fn encode_scalars(
        &self,
        table: &TableDescriptor,
        obj: &Object,
        path: &NestedPath,
    ) -> MutationResult<Vec<(String, Value)>> {
        let mut values = Vec::new();
        for (field, json) in obj {
            match self.registry.attribute_for_field(&table.name, field) {
                Some(attribute) => {
                    let value = self.encode(table, attribute, json, &path.field(field))?;
                    values.push((attribute.to_string(), value));
                }
                None if self.registry.connector(&table.name, field).is_some() => {}
                None => return Err(MutationError::unknown_field(path, &table.name, field)),
            }
        }
        Ok(values)
    }

    /// Encode a key lookup: every attribute of `unique`, read by field name.
    pub(crate) fn key_values(
        &self,
        table: &TableDescriptor,
        unique: &UniqueConstraint,
        obj: &Object,
        path: &NestedPath,
    ) -> MutationResult<Vec<(String, Value)>> {
        unique
            .attributes
            .iter()
            .map(|attribute| {
                let field = self.registry.field_for_attribute(attribute);
                let field_path = path.field(&field);
                let json = obj
                    .get(&field)
                    .filter(|v| !v.is_null())
                    .ok_or_else(|| MutationError::validation(&field_path, messages::ERR_INCOMPLETE_KEY))?;
                Ok((attribute.clone(), self.encode(table, attribute, json, &field_path)?))
            })
            .collect()
    }

    /// Decode an opaque identifier into primary key values of `table`.
    pub(crate) fn node_id_values(
        &self,
        table: &TableDescriptor,
        id: &Json,
        path: &NestedPath,
    ) -> MutationResult<Vec<(String, Value)>> {
        let id = id
            .as_str()
            .ok_or_else(|| MutationError::validation(path, messages::ERR_NODE_ID_NOT_STRING))?;
        let (decoded_table, keys) = self
            .node_ids
            .decode(id)
            .map_err(|e| MutationError::validation(path, e.to_string()))?;

        if decoded_table != table.name {
            return Err(MutationError::validation(
                path,
                format!("Node identifier names table {}, expected {}", decoded_table, table.name),
            ));
        }

        let pk = table.primary_key().ok_or_else(|| {
            MutationError::validation(path, format!("Table {} has no primary key", table.name))
        })?;
        if pk.attributes.len() != keys.len() {
            return Err(MutationError::validation(
                path,
                format!(
                    "Node identifier carries {} key values, {} expects {}",
                    keys.len(),
                    table.name,
                    pk.attributes.len()
                ),
            ));
        }

        pk.attributes
            .iter()
            .zip(keys.iter())
            .map(|(attribute, json)| Ok((attribute.clone(), self.encode(table, attribute, json, path)?)))
            .collect()
    }
}
