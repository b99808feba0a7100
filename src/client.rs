//! CRUD orchestration over a described API.
//!
//! Every public verb resolves the resource URL, then funnels into
//! [`Client::perform_request`]:
//!
//! | Verb | Method | URL |
//! |------|--------|-----|
//! | `create` | `POST` | collection |
//! | `list` | `GET` | collection |
//! | `read` | `GET` | instance |
//! | `update` | `PUT` | instance |
//! | `delete` | `DELETE` | instance |

use serde_json::Value;
use tracing::debug;

use crate::auth::{Authenticator, NoAuth};
use crate::backend::{BackendConfiguration, ProviderConfiguration};
use crate::error::{ClientError, RequestError};
use crate::headers::{
    append_auth_headers, append_operation_headers, append_user_agent_header, default_user_agent,
    HeaderMap,
};
use crate::resource::{Operation, OperationDescriptor, ResourceDescriptor};
use crate::transport::{HttpMethod, Transport};
use crate::url::resolve_resource_url;

/// Decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded body; `None` when the API answered with an empty body.
    pub payload: Option<Value>,
}

/// Generic CRUD client.
///
/// Holds no per-call state: every call reads the configuration it was
/// built with and shares nothing else.
pub struct Client<'a> {
    backend: &'a dyn BackendConfiguration,
    transport: &'a dyn Transport,
    authenticator: &'a dyn Authenticator,
    provider: ProviderConfiguration,
    user_agent: String,
}

impl<'a> Client<'a> {
    pub fn new(backend: &'a dyn BackendConfiguration, transport: &'a dyn Transport) -> Self {
        Self {
            backend,
            transport,
            authenticator: &NoAuth,
            provider: ProviderConfiguration::default(),
            user_agent: default_user_agent(),
        }
    }

    pub fn with_authenticator(mut self, authenticator: &'a dyn Authenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    pub fn with_provider(mut self, provider: ProviderConfiguration) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn create(
        &self,
        resource: &ResourceDescriptor,
        parent_ids: &[String],
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(resource, Operation::Create, parent_ids, None, Some(payload))
    }

    pub fn read(
        &self,
        resource: &ResourceDescriptor,
        parent_ids: &[String],
        id: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(resource, Operation::Read, parent_ids, Some(id), None)
    }

    pub fn update(
        &self,
        resource: &ResourceDescriptor,
        parent_ids: &[String],
        id: &str,
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(resource, Operation::Update, parent_ids, Some(id), Some(payload))
    }

    pub fn delete(
        &self,
        resource: &ResourceDescriptor,
        parent_ids: &[String],
        id: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(resource, Operation::Delete, parent_ids, Some(id), None)
    }

    pub fn list(
        &self,
        resource: &ResourceDescriptor,
        parent_ids: &[String],
    ) -> Result<ApiResponse, ClientError> {
        self.execute(resource, Operation::List, parent_ids, None, None)
    }

    /// Dispatch a single operation by verb.
    ///
    /// `id` is ignored by collection operations; `payload` is ignored by
    /// operations that send no body.
    pub fn call(
        &self,
        operation: Operation,
        resource: &ResourceDescriptor,
        parent_ids: &[String],
        id: Option<&str>,
        payload: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let id = if operation.is_instance() {
            Some(id.unwrap_or(""))
        } else {
            None
        };
        let payload = match operation {
            Operation::Create | Operation::Update => payload,
            _ => None,
        };
        self.execute(resource, operation, parent_ids, id, payload)
    }

    fn execute(
        &self,
        resource: &ResourceDescriptor,
        operation: Operation,
        parent_ids: &[String],
        id: Option<&str>,
        payload: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = resolve_resource_url(
            resource,
            self.backend,
            self.provider.region(),
            parent_ids,
            id,
        )?;

        let undeclared = OperationDescriptor::default();
        let descriptor = resource.operation(operation).unwrap_or(&undeclared);
        self.perform_request(method_for(operation).as_str(), &url, descriptor, payload)
    }

    /// Send one request and decode its response.
    ///
    /// # Errors
    ///
    /// Failures while building the request (unsupported method, missing
    /// required header, authentication) are wrapped in
    /// `ClientError::Configure` with the method and URL. Transport failures
    /// are returned as-is.
    pub fn perform_request(
        &self,
        method: &str,
        url: &str,
        operation: &OperationDescriptor,
        payload: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let configure = |source: RequestError| ClientError::Configure {
            method: method.to_string(),
            url: url.to_string(),
            source,
        };

        let http_method = HttpMethod::parse(method).map_err(configure)?;

        let mut headers = HeaderMap::new();
        append_operation_headers(&operation.header_parameters, &self.provider, &mut headers)
            .map_err(configure)?;

        let auth = self
            .authenticator
            .prepare(url, &operation.security_schemes)
            .map_err(|e| configure(e.into()))?;
        append_auth_headers(&auth.headers, &mut headers);
        let target = auth.url.as_deref().unwrap_or(url);

        append_user_agent_header(&self.user_agent, &mut headers);

        debug!(
            method = %http_method,
            url = %url,
            headers = ?headers.keys().collect::<Vec<_>>(),
            "sending request"
        );
        let response = self.transport.invoke(http_method, target, &headers, payload)?;
        debug!(method = %http_method, url = %url, status = response.status, "received response");

        if !operation.accepts_status(response.status) {
            return Err(ClientError::UnexpectedStatus {
                method: method.to_string(),
                url: url.to_string(),
                status: response.status,
                expected: operation.responses.clone(),
            });
        }

        let payload = if response.body.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(&response.body).map_err(|source| ClientError::Decode {
                    url: url.to_string(),
                    source,
                })?,
            )
        };

        Ok(ApiResponse {
            status: response.status,
            payload,
        })
    }
}

fn method_for(operation: Operation) -> HttpMethod {
    match operation {
        Operation::Create => HttpMethod::Post,
        Operation::Read | Operation::List => HttpMethod::Get,
        Operation::Update => HttpMethod::Put,
        Operation::Delete => HttpMethod::Delete,
    }
}
