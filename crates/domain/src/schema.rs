use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use fieldgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::field_path::FIELD_PATH_SEPARATOR;

/// Kind of a named type in a schema snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Object type with selectable fields.
    Object,
    /// Abstract interface with fields.
    Interface,
    /// Input object type.
    InputObject,
    /// Leaf scalar type.
    Scalar,
    /// Leaf enum type.
    Enum,
    /// Union of object types.
    Union,
}

impl TypeKind {
    /// Returns a stable storage value for the type kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Interface => "interface",
            Self::InputObject => "input_object",
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::Union => "union",
        }
    }

    /// Returns whether types of this kind may declare fields.
    #[must_use]
    pub fn has_fields(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::InputObject)
    }
}

impl FromStr for TypeKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "object" => Ok(Self::Object),
            "interface" => Ok(Self::Interface),
            "input_object" => Ok(Self::InputObject),
            "scalar" => Ok(Self::Scalar),
            "enum" => Ok(Self::Enum),
            "union" => Ok(Self::Union),
            _ => Err(AppError::Validation(format!("unknown type kind '{value}'"))),
        }
    }
}

/// Field type reference, possibly wrapped in list and non-null modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Reference to a named type.
    Named(String),
    /// List of the inner type.
    List(Box<TypeRef>),
    /// Non-null wrapper around the inner type.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a reference to a named type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps the reference in a list modifier.
    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Wraps the reference in a non-null modifier.
    #[must_use]
    pub fn non_null(self) -> Self {
        Self::NonNull(Box::new(self))
    }

    /// Returns the named type after stripping every modifier.
    #[must_use]
    pub fn named_type(&self) -> &str {
        let mut current = self;
        loop {
            match current {
                Self::Named(name) => return name.as_str(),
                Self::List(inner) | Self::NonNull(inner) => current = inner.as_ref(),
            }
        }
    }
}

/// One field of a schema type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldDescriptorDocument")]
pub struct FieldDescriptor {
    name: NonEmptyString,
    #[serde(rename = "type")]
    type_ref: TypeRef,
}

#[derive(Deserialize)]
struct FieldDescriptorDocument {
    name: String,
    #[serde(rename = "type")]
    type_ref: TypeRef,
}

impl TryFrom<FieldDescriptorDocument> for FieldDescriptor {
    type Error = AppError;

    fn try_from(value: FieldDescriptorDocument) -> Result<Self, Self::Error> {
        Self::new(value.name, value.type_ref)
    }
}

impl FieldDescriptor {
    /// Creates a validated field descriptor.
    ///
    /// Field names may not contain the path separator, so every dotted
    /// field path names exactly one chain of fields.
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> AppResult<Self> {
        if type_ref.named_type().trim().is_empty() {
            return Err(AppError::Validation(
                "field type reference must name a type".to_owned(),
            ));
        }

        let name = NonEmptyString::new(name)?;
        if name.as_str().contains(FIELD_PATH_SEPARATOR) {
            return Err(AppError::Validation(format!(
                "field name '{name}' must not contain '{FIELD_PATH_SEPARATOR}'"
            )));
        }

        Ok(Self { name, type_ref })
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the declared (possibly wrapped) type reference.
    #[must_use]
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Returns the named type after modifier stripping.
    #[must_use]
    pub fn named_type(&self) -> &str {
        self.type_ref.named_type()
    }
}

/// One named type of a schema snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TypeDescriptorDocument")]
pub struct TypeDescriptor {
    name: NonEmptyString,
    kind: TypeKind,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

#[derive(Deserialize)]
struct TypeDescriptorDocument {
    name: String,
    kind: TypeKind,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<TypeDescriptorDocument> for TypeDescriptor {
    type Error = AppError;

    fn try_from(value: TypeDescriptorDocument) -> Result<Self, Self::Error> {
        Self::new(value.name, value.kind, value.fields)
    }
}

impl TypeDescriptor {
    /// Creates a type descriptor with invariant checks.
    pub fn new(
        name: impl Into<String>,
        kind: TypeKind,
        fields: Vec<FieldDescriptor>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;

        if !kind.has_fields() && !fields.is_empty() {
            return Err(AppError::Validation(format!(
                "type '{}' of kind '{}' cannot declare fields",
                name,
                kind.as_str()
            )));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(AppError::Validation(format!(
                    "duplicate field '{}' in type '{}'",
                    field.name(),
                    name
                )));
            }
        }

        Ok(Self { name, kind, fields })
    }

    /// Creates an object type.
    pub fn object(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> AppResult<Self> {
        Self::new(name, TypeKind::Object, fields)
    }

    /// Creates a scalar type.
    pub fn scalar(name: impl Into<String>) -> AppResult<Self> {
        Self::new(name, TypeKind::Scalar, Vec::new())
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the type kind.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns whether this is an object type.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.kind == TypeKind::Object
    }

    /// Returns declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }
}

/// Immutable typed object graph used for one collector configuration epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaSnapshotDocument", into = "SchemaSnapshotDocument")]
pub struct SchemaSnapshot {
    types: HashMap<String, TypeDescriptor>,
}

#[derive(Serialize, Deserialize)]
struct SchemaSnapshotDocument {
    types: Vec<TypeDescriptor>,
}

impl TryFrom<SchemaSnapshotDocument> for SchemaSnapshot {
    type Error = AppError;

    fn try_from(value: SchemaSnapshotDocument) -> Result<Self, Self::Error> {
        Self::new(value.types)
    }
}

impl From<SchemaSnapshot> for SchemaSnapshotDocument {
    fn from(value: SchemaSnapshot) -> Self {
        let mut types: Vec<TypeDescriptor> = value.types.into_values().collect();
        types.sort_by(|left, right| left.name().cmp(right.name()));
        Self { types }
    }
}

impl SchemaSnapshot {
    /// Creates a snapshot, rejecting duplicate type names.
    pub fn new(types: Vec<TypeDescriptor>) -> AppResult<Self> {
        let mut indexed = HashMap::with_capacity(types.len());
        for descriptor in types {
            let name = descriptor.name().to_owned();
            if indexed.insert(name.clone(), descriptor).is_some() {
                return Err(AppError::Validation(format!(
                    "duplicate type '{name}' in schema snapshot"
                )));
            }
        }

        Ok(Self { types: indexed })
    }

    /// Parses a snapshot from its JSON document form.
    pub fn from_json_slice(bytes: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|error| AppError::Validation(format!("invalid schema snapshot: {error}")))
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Looks up a type by name, only if it is an object type.
    #[must_use]
    pub fn object_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.find_type(name)
            .filter(|descriptor| descriptor.is_object())
    }

    /// Returns the number of named types in the snapshot.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
