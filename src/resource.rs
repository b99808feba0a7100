//! Resource and operation descriptors.

use serde::{Deserialize, Serialize};

use crate::types::{terraform_name, SchemaDefinition};

/// Opaque reference to an authentication requirement, resolved by the
/// `Authenticator`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityScheme(pub String);

impl SecurityScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Header an operation declares, filled from provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderParameter {
    /// Header name as sent on the wire.
    pub name: String,
    /// Configuration property holding the value. Defaults to the snake case
    /// of `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposed_name: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl HeaderParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exposed_name: None,
            required: false,
        }
    }

    pub fn exposed_as(mut self, exposed_name: impl Into<String>) -> Self {
        self.exposed_name = Some(exposed_name.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Configuration property the user sets to provide this header.
    pub fn config_name(&self) -> String {
        match &self.exposed_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => terraform_name(&self.name),
        }
    }
}

/// What a single CRUD operation needs beyond its URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    #[serde(default)]
    pub header_parameters: Vec<HeaderParameter>,
    #[serde(default)]
    pub security_schemes: Vec<SecurityScheme>,
    /// Status codes the operation declares. Empty accepts any response.
    #[serde(default)]
    pub responses: Vec<u16>,
}

impl OperationDescriptor {
    pub fn accepts_status(&self, status: u16) -> bool {
        self.responses.is_empty() || self.responses.contains(&status)
    }
}

/// Operations served by the collection path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootOperations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<OperationDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<OperationDescriptor>,
}

/// Operations served by the instance path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOperations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<OperationDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<OperationDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationDescriptor>,
}

/// CRUD verbs a resource supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Operation {
    /// Whether the operation targets a single instance rather than the collection.
    pub fn is_instance(&self) -> bool {
        matches!(
            self,
            Operation::Read | Operation::Update | Operation::Delete
        )
    }
}

/// An API resource: its path template, operations and schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Collection path, e.g. `/v1/cdns/{cdn_id}/firewalls`.
    pub path: String,
    /// Host replacing the backend's (and skipping region selection).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default)]
    pub root_operations: RootOperations,
    #[serde(default)]
    pub instance_operations: InstanceOperations,
    #[serde(default)]
    pub schema: SchemaDefinition,
}

impl ResourceDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_operation(mut self, operation: Operation, descriptor: OperationDescriptor) -> Self {
        let slot = match operation {
            Operation::Create => &mut self.root_operations.create,
            Operation::List => &mut self.root_operations.list,
            Operation::Read => &mut self.instance_operations.read,
            Operation::Update => &mut self.instance_operations.update,
            Operation::Delete => &mut self.instance_operations.delete,
        };
        *slot = Some(descriptor);
        self
    }

    pub fn with_schema(mut self, schema: SchemaDefinition) -> Self {
        self.schema = schema;
        self
    }

    /// Host override, if the resource declares a non-empty one.
    pub fn host_override(&self) -> Option<&str> {
        self.host.as_deref().filter(|h| !h.is_empty())
    }

    /// Descriptor of an operation, if declared.
    pub fn operation(&self, operation: Operation) -> Option<&OperationDescriptor> {
        match operation {
            Operation::Create => self.root_operations.create.as_ref(),
            Operation::List => self.root_operations.list.as_ref(),
            Operation::Read => self.instance_operations.read.as_ref(),
            Operation::Update => self.instance_operations.update.as_ref(),
            Operation::Delete => self.instance_operations.delete.as_ref(),
        }
    }
}
