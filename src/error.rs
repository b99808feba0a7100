//! Error types for schema derivation, URL resolution and API requests.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while inspecting or deriving views from a schema definition.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("non supported type '{type_name}' for property '{property}'")]
    UnsupportedType { property: String, type_name: String },

    #[error("schema nesting exceeds {depth} levels at '{path}' (self-referencing definition?)")]
    CyclicSchema { path: String, depth: usize },

    #[error("could not find any identifier property in the resource schema definition")]
    NoIdentifierFound,

    #[error("{}", no_status_message(.property))]
    NoStatusFound { property: Option<String> },

    #[error("properties '{first}' and '{second}' both map to field '{field}'")]
    DuplicateField {
        field: String,
        first: String,
        second: String,
    },

    #[error("property with name '{name}' not existing in resource schema definition")]
    PropertyNotFound { name: String },

    #[error("property with terraform name '{name}' not existing in resource schema definition")]
    TerraformPropertyNotFound { name: String },
}

fn no_status_message(property: &Option<String>) -> String {
    match property {
        Some(name) => format!("schema definition status property '{}' must be readOnly", name),
        None => "could not find any status property in the resource schema definition".to_string(),
    }
}

/// Failure reported by a `BackendConfiguration` accessor.
///
/// Displays as the raw message so it reaches the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by an `Authenticator`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors while building a resource URL.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("host and path are mandatory attributes to get the resource URL - host['{host}'], path['{path}']")]
    MissingBackendConfig { host: String, path: String },

    #[error("could not resolve sub-resource path correctly '{path}' with the given ids - more ids than path params: {}", fmt_ids(.ids))]
    TooManyParentIds { path: String, ids: Vec<String> },

    #[error("could not resolve sub-resource path correctly '{path}' with the given ids - missing ids to resolve the path params properly: {}", fmt_ids(.ids))]
    MissingParentIds { path: String, ids: Vec<String> },

    /// `value` is the offending text as reported: a bare instance ID, or a
    /// `[a b]` list of parent IDs.
    #[error("{context} ({value}) contains not supported characters (forward slashes)")]
    UnsupportedCharacter { context: String, value: String },

    #[error("could not build the resourceIDURL: required instance id value is missing")]
    MissingInstanceId,
}

/// Formats ids the way they appear in error messages: `[a b c]`.
pub(crate) fn fmt_ids(ids: &[String]) -> String {
    format!("[{}]", ids.join(" "))
}

/// Errors while configuring a request, before anything is sent.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("method '{method}' not supported")]
    UnsupportedMethod { method: String },

    #[error("required header '{header}' is missing the value. Please make sure the property '{property}' is configured with a value in the provider's terraform configuration")]
    MissingRequiredHeader { header: String, property: String },

    #[error(transparent)]
    AuthenticationFailed(#[from] AuthError),
}

/// Failures surfaced by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[cfg(feature = "remote")]
    #[error("failed to build HTTP client: {source}")]
    Setup {
        #[source]
        source: reqwest::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to call {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to call {url}: {message}")]
    Io { url: String, message: String },
}

/// Errors returned by the CRUD client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("failed to configure the API request for {method} {url}: {source}")]
    Configure {
        method: String,
        url: String,
        #[source]
        source: RequestError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid JSON in response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{method} {url} returned status {status}, expected one of {expected:?}")]
    UnexpectedStatus {
        method: String,
        url: String,
        status: u16,
        expected: Vec<u16>,
    },
}

/// Errors while loading JSON model documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid document: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl UrlError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl ClientError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Url(e) => e.exit_code(),
            ClientError::Configure { .. } => 2,
            ClientError::Transport(_) => 3,
            ClientError::Decode { .. } | ClientError::UnexpectedStatus { .. } => 1,
        }
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_header_names_header_and_property() {
        let err = RequestError::MissingRequiredHeader {
            header: "operationHeader".into(),
            property: "operation_header".into(),
        };
        assert_eq!(
            err.to_string(),
            "required header 'operationHeader' is missing the value. Please make sure the property 'operation_header' is configured with a value in the provider's terraform configuration"
        );
    }

    #[test]
    fn configure_error_carries_method_and_url() {
        let err = ClientError::Configure {
            method: "POST".into(),
            url: "".into(),
            source: AuthError::new("some error with prep auth").into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to configure the API request for POST : some error with prep auth"
        );
    }

    #[test]
    fn backend_error_propagates_verbatim() {
        let err: UrlError = BackendError::new("getHTTPScheme blew up").into();
        assert_eq!(err.to_string(), "getHTTPScheme blew up");
    }

    #[test]
    fn no_status_found_messages() {
        let err = SchemaError::NoStatusFound { property: None };
        assert_eq!(
            err.to_string(),
            "could not find any status property in the resource schema definition"
        );

        let err = SchemaError::NoStatusFound {
            property: Some("status".into()),
        };
        assert_eq!(
            err.to_string(),
            "schema definition status property 'status' must be readOnly"
        );
    }

    #[test]
    fn parent_id_lists_are_space_separated() {
        let err = UrlError::TooManyParentIds {
            path: "/v1/resource/{parent_id}/v17/subresource".into(),
            ids: vec!["-2".into()],
        };
        assert_eq!(
            err.to_string(),
            "could not resolve sub-resource path correctly '/v1/resource/{parent_id}/v17/subresource' with the given ids - more ids than path params: [-2]"
        );
    }

    #[test]
    fn exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("resource.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = ClientError::Url(UrlError::MissingInstanceId);
        assert_eq!(err.exit_code(), 2);

        let err = ClientError::UnexpectedStatus {
            method: "GET".into(),
            url: "http://host/v1".into(),
            status: 500,
            expected: vec![200],
        };
        assert_eq!(err.exit_code(), 1);
    }
}
