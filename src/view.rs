//! View derivation - projects a schema definition into the exposed
//! resource (mutable) and data-source (read-only) schemas.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::rules::resolve_identifier;
use crate::types::{PropertyType, SchemaDefinition, SchemaProperty, MAX_NESTING_DEPTH};

/// Exposed type of a derived field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    List { items: Box<FieldType> },
    Object { schema: SchemaView },
}

impl FieldType {
    /// Nested view of an object field, or of a list of objects.
    pub fn nested(&self) -> Option<&SchemaView> {
        match self {
            FieldType::Object { schema } => Some(schema),
            FieldType::List { items } => items.nested(),
            _ => None,
        }
    }
}

/// A field of a derived view with its behavioral flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    #[serde(flatten)]
    pub field_type: FieldType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    pub sensitive: bool,
    pub immutable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Derived schema of a resource or of a nested object, keyed by
/// terraform-compliant field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaView {
    /// Declared name of the root identifier property. It never appears in
    /// `fields`; it is exposed through the implicit `id` key instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Schema of the identifier value. Only data-source views carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_field: Option<Box<FieldSchema>>,
    pub fields: BTreeMap<String, FieldSchema>,
}

impl SchemaView {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewKind {
    Resource,
    DataSource,
}

/// Derive the mutable view used to create and update a resource.
///
/// The resolved identifier is excluded from the fields. A definition
/// without an identifier keeps all its properties.
///
/// # Errors
///
/// Returns `SchemaError::UnsupportedType` for properties whose type cannot
/// be exposed, or `SchemaError::CyclicSchema` if nesting runs too deep.
pub fn derive_resource_view(definition: &SchemaDefinition) -> Result<SchemaView, SchemaError> {
    let identifier = resolve_identifier(definition).ok();
    let mut view = derive_level(definition, ViewKind::Resource, identifier, &mut Vec::new())?;
    view.identifier = identifier.map(String::from);
    Ok(view)
}

/// Derive the read-only view used to look a resource up.
///
/// Every field is output-only except parent properties, which stay
/// required so the lookup can be scoped to its parent.
///
/// # Errors
///
/// Same as [`derive_resource_view`].
pub fn derive_data_source_view(definition: &SchemaDefinition) -> Result<SchemaView, SchemaError> {
    let identifier = resolve_identifier(definition).ok();
    let mut trail = Vec::new();
    let mut view = derive_level(definition, ViewKind::DataSource, identifier, &mut trail)?;

    if let Some(name) = identifier {
        let property = definition.property(name)?;
        trail.push(property.name.clone());
        let field = derive_field(property, ViewKind::DataSource, &mut trail)?;
        view.identifier_field = Some(Box::new(field));
    }
    view.identifier = identifier.map(String::from);

    Ok(view)
}

// --- Internal implementation ---

fn derive_level(
    definition: &SchemaDefinition,
    kind: ViewKind,
    skip: Option<&str>,
    trail: &mut Vec<String>,
) -> Result<SchemaView, SchemaError> {
    if trail.len() >= MAX_NESTING_DEPTH {
        return Err(SchemaError::CyclicSchema {
            path: trail.join("."),
            depth: MAX_NESTING_DEPTH,
        });
    }

    let mut fields = BTreeMap::new();
    let mut owners: BTreeMap<String, &str> = BTreeMap::new();
    for property in &definition.properties {
        if skip == Some(property.name.as_str()) {
            continue;
        }
        let name = property.terraform_name();
        if let Some(first) = owners.get(&name) {
            return Err(SchemaError::DuplicateField {
                field: name,
                first: qualified(trail, first),
                second: qualified(trail, &property.name),
            });
        }
        owners.insert(name.clone(), property.name.as_str());

        trail.push(property.name.clone());
        let field = derive_field(property, kind, trail)?;
        trail.pop();
        fields.insert(name, field);
    }

    Ok(SchemaView {
        identifier: None,
        identifier_field: None,
        fields,
    })
}

fn derive_field(
    property: &SchemaProperty,
    kind: ViewKind,
    trail: &mut Vec<String>,
) -> Result<FieldSchema, SchemaError> {
    let field_type = derive_type(property, kind, trail)?;

    let field = match kind {
        // Server-computed wins over required: a read-only or computed
        // property is never a mandatory input.
        ViewKind::Resource => {
            let computed = property.read_only || property.computed;
            let required = property.required && !computed;
            FieldSchema {
                field_type,
                required,
                optional: !required && !property.read_only,
                computed,
                force_new: property.force_new,
                sensitive: property.sensitive,
                immutable: property.immutable,
                default: property.default_value.clone(),
            }
        }
        ViewKind::DataSource if property.is_parent_property => FieldSchema {
            field_type,
            required: true,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: property.sensitive,
            immutable: false,
            default: None,
        },
        ViewKind::DataSource => FieldSchema {
            field_type,
            required: false,
            optional: false,
            computed: true,
            force_new: false,
            sensitive: property.sensitive,
            immutable: false,
            default: None,
        },
    };

    Ok(field)
}

fn derive_type(
    property: &SchemaProperty,
    kind: ViewKind,
    trail: &mut Vec<String>,
) -> Result<FieldType, SchemaError> {
    match property.property_type {
        PropertyType::String => Ok(FieldType::String),
        PropertyType::Integer => Ok(FieldType::Integer),
        PropertyType::Number => Ok(FieldType::Float),
        PropertyType::Boolean => Ok(FieldType::Boolean),
        PropertyType::Object => Ok(FieldType::Object {
            schema: derive_nested(property, kind, trail)?,
        }),
        PropertyType::List => {
            let items = match property.array_items_type {
                Some(PropertyType::String) => FieldType::String,
                Some(PropertyType::Integer) => FieldType::Integer,
                Some(PropertyType::Number) => FieldType::Float,
                Some(PropertyType::Boolean) => FieldType::Boolean,
                Some(PropertyType::Object) => FieldType::Object {
                    schema: derive_nested(property, kind, trail)?,
                },
                Some(PropertyType::List) => {
                    return Err(unsupported(trail, "list of list"));
                }
                None => return Err(unsupported(trail, "list without items type")),
            };
            Ok(FieldType::List {
                items: Box::new(items),
            })
        }
    }
}

fn derive_nested(
    property: &SchemaProperty,
    kind: ViewKind,
    trail: &mut Vec<String>,
) -> Result<SchemaView, SchemaError> {
    let nested = property
        .nested()
        .ok_or_else(|| unsupported(trail, "object without nested definition"))?;
    derive_level(nested, kind, None, trail)
}

fn qualified(trail: &[String], name: &str) -> String {
    trail
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join(".")
}

fn unsupported(trail: &[String], type_name: &str) -> SchemaError {
    SchemaError::UnsupportedType {
        property: trail.join("."),
        type_name: type_name.to_string(),
    }
}
