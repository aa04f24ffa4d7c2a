//! Generated input type definitions.

use tether_catalog::Relationship;
use tether_core::Codec;

/// What a generated input type is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedTypeKind {
    /// Bundles every sub-operation for one relationship.
    Connector,
    /// Values for a nested insert.
    Create,
    ConnectByKey,
    ConnectByNodeId,
    UpdateByKey,
    UpdateByNodeId,
    DeleteByKey,
    DeleteByNodeId,
    /// Optional attributes of one table, shared by every update.
    Patch,
}

/// The shape of one input field.
#[derive(Debug, Clone, PartialEq)]
pub enum InputFieldKind {
    /// A scalar mapped onto a column.
    Attribute { attribute: String, codec: Codec },
    /// A nested input object of the named type.
    Object(String),
    /// An opaque row identifier.
    NodeId,
    /// A patch object of the named type.
    Patch(String),
    /// A nested connector for a relationship of the owning table.
    Connector {
        relationship: String,
        type_name: String,
    },
}

/// Definition of a field within a generated type.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub name: String,
    pub kind: InputFieldKind,
    /// Accepts a list (a single object is also accepted and wrapped).
    pub list: bool,
    pub required: bool,
}

impl InputField {
    pub fn new(name: impl Into<String>, kind: InputFieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            list: false,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Name of the generated type this field points at, if any.
    pub fn referenced_type(&self) -> Option<&str> {
        match &self.kind {
            InputFieldKind::Object(name) | InputFieldKind::Patch(name) => Some(name),
            InputFieldKind::Connector { type_name, .. } => Some(type_name),
            InputFieldKind::Attribute { .. } | InputFieldKind::NodeId => None,
        }
    }
}

/// A generated input type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedType {
    pub name: String,
    /// Memoization key the type was registered under.
    pub key: String,
    pub kind: GeneratedTypeKind,
    pub fields: Vec<InputField>,
}

impl GeneratedType {
    pub fn new(name: impl Into<String>, key: impl Into<String>, kind: GeneratedTypeKind) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            kind,
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// One generated sub-operation field on a connector.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationFieldDetails {
    pub field_name: String,
    pub type_name: String,
    /// Unique constraint backing key-based fields.
    pub unique: Option<String>,
}

/// The sub-operation a connector field performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorOperation {
    Create,
    ConnectByKey,
    ConnectByNodeId,
    UpdateByKey,
    UpdateByNodeId,
    DeleteByKey,
    DeleteByNodeId,
}

impl ConnectorOperation {
    /// Whether the operation binds the foreign key of a single-valued slot.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, ConnectorOperation::DeleteByKey | ConnectorOperation::DeleteByNodeId)
    }
}

/// Every generated sub-operation for one relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationFieldSet {
    /// The connector field on the parent input and its type.
    pub input: MutationFieldDetails,
    pub create: Option<MutationFieldDetails>,
    pub connect_by_keys: Vec<MutationFieldDetails>,
    pub connect_by_node_id: Option<MutationFieldDetails>,
    pub update_by_keys: Vec<MutationFieldDetails>,
    pub update_by_node_id: Option<MutationFieldDetails>,
    pub delete_by_keys: Vec<MutationFieldDetails>,
    pub delete_by_node_id: Option<MutationFieldDetails>,
}

impl MutationFieldSet {
    pub fn new(input: MutationFieldDetails) -> Self {
        Self {
            input,
            create: None,
            connect_by_keys: Vec::new(),
            connect_by_node_id: None,
            update_by_keys: Vec::new(),
            update_by_node_id: None,
            delete_by_keys: Vec::new(),
            delete_by_node_id: None,
        }
    }

    /// All present sub-operations in a fixed order.
    pub fn operations(&self) -> Vec<(ConnectorOperation, &MutationFieldDetails)> {
        let mut ops = Vec::new();
        if let Some(d) = &self.create {
            ops.push((ConnectorOperation::Create, d));
        }
        ops.extend(self.connect_by_keys.iter().map(|d| (ConnectorOperation::ConnectByKey, d)));
        if let Some(d) = &self.connect_by_node_id {
            ops.push((ConnectorOperation::ConnectByNodeId, d));
        }
        ops.extend(self.update_by_keys.iter().map(|d| (ConnectorOperation::UpdateByKey, d)));
        if let Some(d) = &self.update_by_node_id {
            ops.push((ConnectorOperation::UpdateByNodeId, d));
        }
        ops.extend(self.delete_by_keys.iter().map(|d| (ConnectorOperation::DeleteByKey, d)));
        if let Some(d) = &self.delete_by_node_id {
            ops.push((ConnectorOperation::DeleteByNodeId, d));
        }
        ops
    }

    /// Resolve a sub-field name on the connector input.
    pub fn operation(&self, field_name: &str) -> Option<(ConnectorOperation, &MutationFieldDetails)> {
        self.operations().into_iter().find(|(_, d)| d.field_name == field_name)
    }

    pub fn is_empty(&self) -> bool {
        self.operations().is_empty()
    }
}

/// A relationship together with its generated connector surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipFields {
    pub relationship: Relationship,
    pub fields: MutationFieldSet,
}

impl RelationshipFields {
    /// The connector field name on the parent input.
    pub fn field_name(&self) -> &str {
        &self.fields.input.field_name
    }
}
