//! Core types for resource schema definitions.

use std::fmt;

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Terraform-compliant name of the implicit identifier property.
pub const ID_PROPERTY_NAME: &str = "id";

/// Conventional name of the property holding a resource's status.
pub const STATUS_PROPERTY_NAME: &str = "status";

/// Deepest nesting of object definitions walked before the definition is
/// treated as self-referencing.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Returns the terraform-compliant (lower snake case) form of a name.
pub fn terraform_name(name: &str) -> String {
    name.to_snake_case()
}

/// Kind of value a schema property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    List,
    Object,
}

impl PropertyType {
    /// Parse a type name as declared in a resource description.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(PropertyType::String),
            "integer" => Some(PropertyType::Integer),
            "number" => Some(PropertyType::Number),
            "boolean" => Some(PropertyType::Boolean),
            "list" | "array" => Some(PropertyType::List),
            "object" => Some(PropertyType::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::List => "list",
            PropertyType::Object => "object",
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, PropertyType::List | PropertyType::Object)
    }
}

impl TryFrom<String> for PropertyType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PropertyType::parse(&value).ok_or(SchemaError::UnsupportedType {
            property: String::new(),
            type_name: value,
        })
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named, typed field of a resource schema.
///
/// Object properties, and lists whose items are objects, own the nested
/// definition describing their fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_items_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_definition: Option<Box<SchemaDefinition>>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub force_new: bool,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub is_identifier: bool,
    #[serde(default)]
    pub is_status_identifier: bool,
    #[serde(default)]
    pub is_parent_property: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl SchemaProperty {
    /// Create a property with every flag cleared.
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            array_items_type: None,
            nested_definition: None,
            required: false,
            read_only: false,
            computed: false,
            sensitive: false,
            force_new: false,
            immutable: false,
            is_identifier: false,
            is_status_identifier: false,
            is_parent_property: false,
            default_value: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Boolean)
    }

    /// An object property whose fields are described by `definition`.
    pub fn object(name: impl Into<String>, definition: SchemaDefinition) -> Self {
        let mut property = Self::new(name, PropertyType::Object);
        property.nested_definition = Some(Box::new(definition));
        property
    }

    /// A list of primitive values.
    pub fn list(name: impl Into<String>, items: PropertyType) -> Self {
        let mut property = Self::new(name, PropertyType::List);
        property.array_items_type = Some(items);
        property
    }

    /// A list of objects whose fields are described by `definition`.
    pub fn list_of_objects(name: impl Into<String>, definition: SchemaDefinition) -> Self {
        let mut property = Self::list(name, PropertyType::Object);
        property.nested_definition = Some(Box::new(definition));
        property
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn identifier(mut self) -> Self {
        self.is_identifier = true;
        self
    }

    pub fn status_identifier(mut self) -> Self {
        self.is_status_identifier = true;
        self
    }

    pub fn parent_property(mut self) -> Self {
        self.is_parent_property = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Name used in the exposed schema (lower snake case).
    pub fn terraform_name(&self) -> String {
        terraform_name(&self.name)
    }

    /// A property the user may leave unset: neither required nor server-computed.
    pub fn is_optional(&self) -> bool {
        !self.required && !self.read_only
    }

    pub fn is_named_id(&self) -> bool {
        self.terraform_name() == ID_PROPERTY_NAME
    }

    pub fn is_named_status(&self) -> bool {
        self.terraform_name() == STATUS_PROPERTY_NAME
    }

    pub fn is_object(&self) -> bool {
        self.property_type == PropertyType::Object
    }

    /// Nested definition of an object (or list of objects) property.
    pub fn nested(&self) -> Option<&SchemaDefinition> {
        self.nested_definition.as_deref()
    }
}

/// Ordered collection of properties describing a resource (or a nested object).
///
/// Lookups are by name; ordering only matters for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub properties: Vec<SchemaProperty>,
}

impl SchemaDefinition {
    pub fn new(properties: Vec<SchemaProperty>) -> Self {
        Self { properties }
    }

    /// Look up a property by its declared name.
    pub fn property(&self, name: &str) -> Result<&SchemaProperty, SchemaError> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SchemaError::PropertyNotFound {
                name: name.to_string(),
            })
    }

    /// Look up a property by its terraform-compliant name.
    pub fn property_by_terraform_name(&self, name: &str) -> Result<&SchemaProperty, SchemaError> {
        self.properties
            .iter()
            .find(|p| p.terraform_name() == name)
            .ok_or_else(|| SchemaError::TerraformPropertyNotFound {
                name: name.to_string(),
            })
    }

    /// Names of the root properties that cannot change after creation.
    ///
    /// The property named `id` is never reported even if flagged.
    pub fn immutable_properties(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.immutable && !p.is_named_id())
            .map(|p| p.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_type_parse_valid() {
        assert_eq!(PropertyType::parse("string"), Some(PropertyType::String));
        assert_eq!(PropertyType::parse("integer"), Some(PropertyType::Integer));
        assert_eq!(PropertyType::parse("number"), Some(PropertyType::Number));
        assert_eq!(PropertyType::parse("boolean"), Some(PropertyType::Boolean));
        assert_eq!(PropertyType::parse("array"), Some(PropertyType::List));
        assert_eq!(PropertyType::parse("object"), Some(PropertyType::Object));
    }

    #[test]
    fn property_type_parse_invalid() {
        assert_eq!(PropertyType::parse(""), None);
        assert_eq!(PropertyType::parse("float"), None);
        assert_eq!(PropertyType::parse("String"), None);
    }

    #[test]
    fn terraform_names_are_snake_case() {
        assert_eq!(terraform_name("stringProp"), "string_prop");
        assert_eq!(terraform_name("ID"), "id");
        assert_eq!(terraform_name("nested-oobj"), "nested_oobj");
        assert_eq!(terraform_name("already_snake"), "already_snake");
    }

    #[test]
    fn property_lookup_by_name() {
        let def = SchemaDefinition::new(vec![SchemaProperty::string("existingPropertyName")]);
        assert_eq!(
            def.property("existingPropertyName").unwrap().name,
            "existingPropertyName"
        );

        let err = def.property("nonExistingPropertyName").unwrap_err();
        assert_eq!(
            err.to_string(),
            "property with name 'nonExistingPropertyName' not existing in resource schema definition"
        );
    }

    #[test]
    fn property_lookup_by_terraform_name() {
        let def = SchemaDefinition::new(vec![SchemaProperty::string("existingPropertyName")]);
        assert!(def
            .property_by_terraform_name("existing_property_name")
            .is_ok());

        let err = def
            .property_by_terraform_name("badTerraformPropertyName")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "property with terraform name 'badTerraformPropertyName' not existing in resource schema definition"
        );
    }

    #[test]
    fn immutable_properties_skip_id() {
        let def = SchemaDefinition::new(vec![
            SchemaProperty::string("id").immutable(),
            SchemaProperty::string("immutable_property").immutable(),
            SchemaProperty::string("mutable_property"),
        ]);
        assert_eq!(def.immutable_properties(), vec!["immutable_property"]);
    }

    #[test]
    fn deserialize_nested_definition() {
        let def: SchemaDefinition = serde_json::from_value(json!({
            "properties": [
                { "name": "id", "type": "string", "readOnly": true },
                {
                    "name": "listeners",
                    "type": "list",
                    "arrayItemsType": "object",
                    "nestedDefinition": {
                        "properties": [{ "name": "protocol", "type": "string", "defaultValue": "http" }]
                    }
                }
            ]
        }))
        .unwrap();

        let listeners = def.property("listeners").unwrap();
        assert_eq!(listeners.array_items_type, Some(PropertyType::Object));
        let protocol = listeners.nested().unwrap().property("protocol").unwrap();
        assert_eq!(protocol.default_value, Some(json!("http")));
        assert!(def.property("id").unwrap().read_only);
    }

    #[test]
    fn deserialize_unknown_type_fails() {
        let result: Result<SchemaProperty, _> =
            serde_json::from_value(json!({ "name": "x", "type": "float" }));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("non supported type 'float'"));
    }
}
