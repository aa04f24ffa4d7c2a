//! RegistryBuilder: derives the generated input surface from a Catalog.

use crate::{
    BuildContext, ConnectorOperation, GeneratedType, GeneratedTypeKind, InflectionOptions, Inflector,
    InputField, InputFieldKind, MutationFieldDetails, MutationFieldSet, Registry, RelationshipFields,
    SchemaBuildError, SchemaResult,
};
use std::collections::{BTreeMap, HashMap};
use tether_catalog::{Catalog, Relationship, TableDescriptor, UniqueConstraint};
use tracing::{debug, warn};

/// Builder for constructing an immutable Registry from a Catalog.
pub struct RegistryBuilder<'c> {
    catalog: &'c Catalog,
    inflector: Inflector,
    /// Connector field names per table, aligned with `Catalog::relationships`.
    connector_names: HashMap<String, Vec<String>>,
    /// Errors recovered during the build.
    diagnostics: Vec<SchemaBuildError>,
}

impl<'c> RegistryBuilder<'c> {
    /// Create a new builder with default naming options.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            inflector: Inflector::default(),
            connector_names: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Use custom naming options.
    pub fn with_options(mut self, options: InflectionOptions) -> Self {
        self.inflector = Inflector::new(options);
        self
    }

    /// Build the Registry.
    ///
    /// Never fails as a whole: each relationship is built in its own
    /// recoverable step and a failing step is logged and omitted.
    pub fn build(mut self) -> Registry {
        let catalog = self.catalog;
        let mut ctx = BuildContext::new();

        for table in catalog.tables() {
            let names = self
                .inflector
                .connector_fields(table, catalog.relationships(&table.name));
            self.connector_names.insert(table.name.clone(), names);
        }

        let mut attribute_fields = HashMap::new();
        let mut patch_types = HashMap::new();
        for table in catalog.tables() {
            let fields: BTreeMap<String, String> = table
                .attributes
                .iter()
                .map(|a| (self.inflector.attribute_field(&a.name), a.name.clone()))
                .collect();
            attribute_fields.insert(table.name.clone(), fields);

            match self.ensure_patch(&mut ctx, table).map(|t| t.name.clone()) {
                Ok(name) => {
                    patch_types.insert(table.name.clone(), name);
                }
                Err(err) => self.recover(&table.name, "patch", err),
            }
        }

        let mut fields_by_table: HashMap<String, Vec<RelationshipFields>> = HashMap::new();
        for table in catalog.tables() {
            let relationships = catalog.relationships(&table.name);
            let names = self.connector_names.get(&table.name).cloned().unwrap_or_default();

            for (rel, field_name) in relationships.iter().zip(names) {
                match self.build_relationship(&mut ctx, rel, field_name) {
                    Ok(fields) => fields_by_table
                        .entry(table.name.clone())
                        .or_default()
                        .push(fields),
                    Err(err) => self.recover(&rel.name, "connector", err),
                }
            }
        }

        self.prune_dangling(&mut ctx);

        debug!(
            types = ctx.build_count(),
            recovered = self.diagnostics.len(),
            "registry built"
        );

        Registry::new(
            self.inflector,
            ctx.into_types(),
            fields_by_table,
            attribute_fields,
            patch_types,
            self.diagnostics,
        )
    }

    fn recover(&mut self, relationship: &str, field: &str, err: SchemaBuildError) {
        warn!(relationship, field, error = %err, "omitting generated field");
        self.diagnostics.push(err);
    }

    // ==================== Shared Types ====================

    /// Connector fields of `table`, referenced by type name.
    ///
    /// The connector types themselves are built when their relationship is
    /// visited; references left dangling by a failed relationship are pruned
    /// at the end of the build.
    fn connector_refs(&self, table: &str, skip_constraint: Option<&str>) -> Vec<InputField> {
        let names = self.connector_names.get(table);
        self.catalog
            .relationships(table)
            .iter()
            .enumerate()
            .filter(|(_, rel)| !(skip_constraint == Some(rel.constraint_name.as_str()) && !rel.is_reverse))
            .filter_map(|(i, rel)| {
                let name = names.and_then(|n| n.get(i))?;
                let field = InputField::new(
                    name.clone(),
                    InputFieldKind::Connector {
                        relationship: rel.name.clone(),
                        type_name: self.inflector.connector_type(rel),
                    },
                );
                Some(field)
            })
            .collect()
    }

    fn ensure_patch<'x>(&self, ctx: &'x mut BuildContext, table: &TableDescriptor) -> SchemaResult<&'x GeneratedType> {
        let key = format!("patch:{}", table.name);
        ctx.ensure_type(&key, |_| {
            let mut ty = GeneratedType::new(self.inflector.patch_type(&table.name), &key, GeneratedTypeKind::Patch);
            ty.fields.extend(table.attributes.iter().map(|a| {
                InputField::new(
                    self.inflector.attribute_field(&a.name),
                    InputFieldKind::Attribute {
                        attribute: a.name.clone(),
                        codec: a.codec,
                    },
                )
            }));
            ty.fields.extend(self.connector_refs(&table.name, None));
            Ok(ty)
        })
    }

    fn key_fields(&self, remote: &TableDescriptor, unique: &UniqueConstraint) -> SchemaResult<Vec<InputField>> {
        unique
            .attributes
            .iter()
            .map(|attr| {
                let def = remote.attr(attr).ok_or_else(|| SchemaBuildError::missing_unique(&unique.name, &remote.name, &unique.attributes))?;
                Ok(InputField::new(
                    self.inflector.attribute_field(attr),
                    InputFieldKind::Attribute {
                        attribute: attr.clone(),
                        codec: def.codec,
                    },
                )
                .required())
            })
            .collect()
    }

    fn node_id_field(&self) -> InputField {
        InputField::new(self.inflector.node_id_field(), InputFieldKind::NodeId).required()
    }

    // ==================== Relationship Fields ====================

    fn build_relationship(
        &mut self,
        ctx: &mut BuildContext,
        rel: &Relationship,
        field_name: String,
    ) -> SchemaResult<RelationshipFields> {
        let catalog = self.catalog;
        let remote = catalog
            .table(&rel.remote_table)
            .ok_or_else(|| SchemaBuildError::UnknownTable(rel.remote_table.clone()))?;

        let mut set = MutationFieldSet::new(MutationFieldDetails {
            field_name,
            type_name: self.inflector.connector_type(rel),
            unique: None,
        });

        match self.create_field(ctx, rel, remote) {
            Ok(details) => set.create = Some(details),
            Err(err) => self.recover(&rel.name, "create", err),
        }

        match self.connect_by_key_fields(ctx, rel, remote) {
            Ok(details) => set.connect_by_keys = details,
            Err(err) => self.recover(&rel.name, "connectByKey", err),
        }

        match self.update_by_key_fields(ctx, rel, remote) {
            Ok(details) => set.update_by_keys = details,
            Err(err) => self.recover(&rel.name, "updateByKey", err),
        }

        if rel.is_reverse {
            match self.delete_by_key_fields(ctx, remote) {
                Ok(details) => set.delete_by_keys = details,
                Err(err) => self.recover(&rel.name, "deleteByKey", err),
            }
        }

        if remote.primary_key().is_some() {
            match self.node_id_fields(ctx, rel, remote) {
                Ok((connect, update, delete)) => {
                    set.connect_by_node_id = Some(connect);
                    set.update_by_node_id = Some(update);
                    set.delete_by_node_id = delete;
                }
                Err(err) => self.recover(&rel.name, "nodeId", err),
            }
        } else {
            debug!(relationship = %rel.name, table = %remote.name, "no primary key, identifier fields skipped");
        }

        if set.is_empty() {
            return Err(SchemaBuildError::EmptyConnector {
                relationship: rel.name.clone(),
            });
        }

        let key = format!("connector:{}", rel.identity());
        let list = !rel.is_single();
        ctx.ensure_type(&key, |ctx| {
            let mut ty = GeneratedType::new(&set.input.type_name, &key, GeneratedTypeKind::Connector);
            for (op, details) in set.operations() {
                let target = ctx.lookup(&details.type_name)?;
                let mut field = InputField::new(&details.field_name, InputFieldKind::Object(target.name.clone()));
                // Deletes always accept a list on reverse relationships.
                if list || matches!(op, ConnectorOperation::DeleteByKey | ConnectorOperation::DeleteByNodeId) {
                    field = field.list();
                }
                ty.fields.push(field);
            }
            Ok(ty)
        })?;

        Ok(RelationshipFields {
            relationship: rel.clone(),
            fields: set,
        })
    }

    fn create_field(
        &self,
        ctx: &mut BuildContext,
        rel: &Relationship,
        remote: &TableDescriptor,
    ) -> SchemaResult<MutationFieldDetails> {
        let key = format!("create:{}", rel.identity());
        let name = ctx
            .ensure_type(&key, |_| {
                let mut ty = GeneratedType::new(self.inflector.create_type(rel), &key, GeneratedTypeKind::Create);
                // Reverse children get their foreign key from the parent.
                let seeded: &[String] = if rel.is_reverse { &rel.remote_attributes } else { &[] };
                for attr in remote.attributes.iter().filter(|a| !seeded.contains(&a.name)) {
                    let mut field = InputField::new(
                        self.inflector.attribute_field(&attr.name),
                        InputFieldKind::Attribute {
                            attribute: attr.name.clone(),
                            codec: attr.codec,
                        },
                    );
                    if attr.is_required() {
                        field = field.required();
                    }
                    ty.fields.push(field);
                }
                let skip = rel.is_reverse.then_some(rel.constraint_name.as_str());
                ty.fields.extend(self.connector_refs(&remote.name, skip));
                Ok(ty)
            })?
            .name
            .clone();

        Ok(MutationFieldDetails {
            field_name: self.inflector.create_field(),
            type_name: name,
            unique: None,
        })
    }

    fn connect_by_key_fields(
        &self,
        ctx: &mut BuildContext,
        rel: &Relationship,
        remote: &TableDescriptor,
    ) -> SchemaResult<Vec<MutationFieldDetails>> {
        if !rel.is_reverse && remote.unique_covering(&rel.remote_attributes).is_none() {
            return Err(SchemaBuildError::missing_unique(
                &rel.name,
                &remote.name,
                &rel.remote_attributes,
            ));
        }

        let mut details = Vec::new();
        for unique in &remote.uniques {
            let key = format!("connect_by_key:{}:{}", remote.name, unique.name);
            let name = ctx
                .ensure_type(&key, |_| {
                    let mut ty = GeneratedType::new(
                        self.inflector.connect_by_key_type(&remote.name, unique),
                        &key,
                        GeneratedTypeKind::ConnectByKey,
                    );
                    ty.fields = self.key_fields(remote, unique)?;
                    Ok(ty)
                })?
                .name
                .clone();
            details.push(MutationFieldDetails {
                field_name: self.inflector.connect_by_key_field(unique),
                type_name: name,
                unique: Some(unique.name.clone()),
            });
        }
        Ok(details)
    }

    fn update_by_key_fields(
        &self,
        ctx: &mut BuildContext,
        rel: &Relationship,
        remote: &TableDescriptor,
    ) -> SchemaResult<Vec<MutationFieldDetails>> {
        let patch = self.ensure_patch(ctx, remote)?.name.clone();

        let mut details = Vec::new();
        for unique in &remote.uniques {
            let key = format!("update_by_key:{}:{}", rel.identity(), unique.name);
            let name = ctx
                .ensure_type(&key, |_| {
                    let mut ty = GeneratedType::new(
                        self.inflector.update_by_key_type(rel, unique),
                        &key,
                        GeneratedTypeKind::UpdateByKey,
                    );
                    ty.fields = self.key_fields(remote, unique)?;
                    ty.fields.push(
                        InputField::new(self.inflector.patch_field(), InputFieldKind::Patch(patch.clone())).required(),
                    );
                    Ok(ty)
                })?
                .name
                .clone();
            details.push(MutationFieldDetails {
                field_name: self.inflector.update_by_key_field(unique),
                type_name: name,
                unique: Some(unique.name.clone()),
            });
        }
        Ok(details)
    }

    fn delete_by_key_fields(
        &self,
        ctx: &mut BuildContext,
        remote: &TableDescriptor,
    ) -> SchemaResult<Vec<MutationFieldDetails>> {
        let mut details = Vec::new();
        for unique in &remote.uniques {
            let key = format!("delete_by_key:{}:{}", remote.name, unique.name);
            let name = ctx
                .ensure_type(&key, |_| {
                    let mut ty = GeneratedType::new(
                        self.inflector.delete_by_key_type(&remote.name, unique),
                        &key,
                        GeneratedTypeKind::DeleteByKey,
                    );
                    ty.fields = self.key_fields(remote, unique)?;
                    Ok(ty)
                })?
                .name
                .clone();
            details.push(MutationFieldDetails {
                field_name: self.inflector.delete_by_key_field(unique),
                type_name: name,
                unique: Some(unique.name.clone()),
            });
        }
        Ok(details)
    }

    /// Connect, update and (reverse only) delete by identifier.
    fn node_id_fields(
        &self,
        ctx: &mut BuildContext,
        rel: &Relationship,
        remote: &TableDescriptor,
    ) -> SchemaResult<(MutationFieldDetails, MutationFieldDetails, Option<MutationFieldDetails>)> {
        let connect_key = format!("connect_by_node_id:{}", remote.name);
        let connect = ctx
            .ensure_type(&connect_key, |_| {
                let mut ty = GeneratedType::new(
                    self.inflector.connect_by_node_id_type(&remote.name),
                    &connect_key,
                    GeneratedTypeKind::ConnectByNodeId,
                );
                ty.fields.push(self.node_id_field());
                Ok(ty)
            })?
            .name
            .clone();

        let patch = self.ensure_patch(ctx, remote)?.name.clone();
        let update_key = format!("update_by_node_id:{}", rel.identity());
        let update = ctx
            .ensure_type(&update_key, |_| {
                let mut ty = GeneratedType::new(
                    self.inflector.update_by_node_id_type(rel),
                    &update_key,
                    GeneratedTypeKind::UpdateByNodeId,
                );
                ty.fields.push(self.node_id_field());
                ty.fields
                    .push(InputField::new(self.inflector.patch_field(), InputFieldKind::Patch(patch)).required());
                Ok(ty)
            })?
            .name
            .clone();

        let delete = if rel.is_reverse {
            let delete_key = format!("delete_by_node_id:{}", remote.name);
            let name = ctx
                .ensure_type(&delete_key, |_| {
                    let mut ty = GeneratedType::new(
                        self.inflector.delete_by_node_id_type(&remote.name),
                        &delete_key,
                        GeneratedTypeKind::DeleteByNodeId,
                    );
                    ty.fields.push(self.node_id_field());
                    Ok(ty)
                })?
                .name
                .clone();
            Some(MutationFieldDetails {
                field_name: self.inflector.delete_by_node_id_field(),
                type_name: name,
                unique: None,
            })
        } else {
            None
        };

        Ok((
            MutationFieldDetails {
                field_name: self.inflector.connect_by_node_id_field(),
                type_name: connect,
                unique: None,
            },
            MutationFieldDetails {
                field_name: self.inflector.update_by_node_id_field(),
                type_name: update,
                unique: None,
            },
            delete,
        ))
    }

    // ==================== Finalization ====================

    /// Drop fields whose referenced type never got built.
    fn prune_dangling(&mut self, ctx: &mut BuildContext) {
        let mut dangling = Vec::new();
        for name in ctx.type_names() {
            if let Ok(ty) = ctx.lookup(&name) {
                for field in &ty.fields {
                    if let Some(target) = field.referenced_type() {
                        if let Err(err) = ctx.lookup(target) {
                            dangling.push((name.clone(), field.name.clone(), err));
                        }
                    }
                }
            }
        }

        for (type_name, field_name, err) in dangling {
            if let Some(ty) = ctx.get_mut(&type_name) {
                ty.fields.retain(|f| f.name != field_name);
            }
            self.recover(&type_name, &field_name, err);
        }
    }
}
