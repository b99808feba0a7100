//! OpenAPI CRUD
//!
//! Typed resource schemas and generic create/read/update/delete/list calls
//! over APIs described by OpenAPI.
//!
//! A resource is described once ([`ResourceDescriptor`]): its collection
//! path template, the operations it supports and the schema of its
//! payload. From that description this library
//!
//! - derives the exposed schemas: a mutable resource view and a read-only
//!   data-source view,
//! - resolves which property identifies an instance and where its status
//!   lives,
//! - builds collection and instance URLs from the backend configuration
//!   and the identifiers of parent resources,
//! - performs the HTTP calls, filling declared headers from provider
//!   configuration and authentication from an [`Authenticator`].
//!
//! # Example
//!
//! ```
//! use openapi_crud::{
//!     derive_resource_view, resolve_resource_url, ResourceDescriptor, SchemaDefinition,
//!     SchemaProperty, StaticBackend,
//! };
//!
//! let schema = SchemaDefinition::new(vec![
//!     SchemaProperty::string("id").read_only(),
//!     SchemaProperty::string("label").required(),
//!     SchemaProperty::string("cdn_id").parent_property(),
//! ]);
//!
//! // The identifier is never an ordinary field
//! let view = derive_resource_view(&schema).unwrap();
//! assert_eq!(view.identifier.as_deref(), Some("id"));
//! assert!(!view.contains("id"));
//! assert!(view.field("label").unwrap().required);
//!
//! let resource = ResourceDescriptor::new("/v1/cdns/{cdn_id}/firewalls").with_schema(schema);
//! let backend = StaticBackend::new("api.example.com").with_base_path("/api");
//! let url = resolve_resource_url(&resource, &backend, None, &["42".to_string()], Some("7"));
//! assert_eq!(url.unwrap(), "https://api.example.com/api/v1/cdns/42/firewalls/7");
//! ```
//!
//! # Flag Rules
//!
//! | Flag | Resource view | Data-source view |
//! |------|---------------|------------------|
//! | `required` | declared required, neither read-only nor computed | parent properties only |
//! | `optional` | not required and not read-only | never |
//! | `computed` | read-only or computed (never also `required`) | every non-parent field |
//! | `default` | passed through | dropped |
//!
//! # Identifier and Status Precedence
//!
//! | Resolution | First rule | Then |
//! |------------|------------|------|
//! | identifier | property named `id` | property flagged `isIdentifier` |
//! | status | property flagged `isStatusIdentifier` | property named `status` |

mod auth;
mod backend;
mod client;
mod error;
mod headers;
mod loader;
mod resource;
mod rules;
mod transport;
mod types;
mod url;
mod view;

pub use auth::{ApiKey, ApiKeyAuthenticator, ApiKeyLocation, AuthContext, Authenticator, NoAuth};
pub use backend::{BackendConfiguration, ProviderConfiguration, StaticBackend, REGION_PLACEHOLDER};
pub use client::{ApiResponse, Client};
pub use error::{
    AuthError, BackendError, ClientError, LoadError, RequestError, SchemaError, TransportError,
    UrlError,
};
pub use headers::{
    append_auth_headers, append_operation_headers, append_user_agent_header, default_user_agent,
    HeaderMap, USER_AGENT_HEADER,
};
pub use loader::{is_url, load_json, load_json_auto, load_json_str};
pub use resource::{
    HeaderParameter, InstanceOperations, Operation, OperationDescriptor, ResourceDescriptor,
    RootOperations, SecurityScheme,
};
pub use rules::{resolve_identifier, resolve_status};
pub use transport::{HttpMethod, Transport, TransportResponse};
pub use types::{
    terraform_name, PropertyType, SchemaDefinition, SchemaProperty, ID_PROPERTY_NAME,
    MAX_NESTING_DEPTH, STATUS_PROPERTY_NAME,
};
pub use self::url::{resolve_path, resolve_resource_url};
pub use view::{derive_data_source_view, derive_resource_view, FieldSchema, FieldType, SchemaView};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
#[cfg(feature = "remote")]
pub use transport::ReqwestTransport;
