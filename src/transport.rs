//! HTTP transport seam.
//!
//! The client never talks to the network itself; it hands a fully built
//! request to a [`Transport`]. [`ReqwestTransport`] is the bundled
//! implementation (feature `remote`).

use std::fmt;

use serde_json::Value;

use crate::error::{RequestError, TransportError};
use crate::headers::HeaderMap;

/// HTTP methods the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Parse an upper-case method name.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::UnsupportedMethod` for anything but
    /// `GET`, `POST`, `PUT` and `DELETE`.
    pub fn parse(method: &str) -> Result<Self, RequestError> {
        match method {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(RequestError::UnsupportedMethod {
                method: method.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a prepared request.
pub trait Transport {
    fn invoke(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> Result<TransportResponse, TransportError>;
}

#[cfg(feature = "remote")]
pub use remote::ReqwestTransport;

#[cfg(feature = "remote")]
mod remote {
    use std::time::Duration;

    use serde_json::Value;

    use super::{HttpMethod, Transport, TransportResponse};
    use crate::error::TransportError;
    use crate::headers::HeaderMap;

    /// Default timeout for API calls (30 seconds).
    const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

    /// Blocking `reqwest` transport.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::blocking::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Result<Self, TransportError> {
            Self::with_timeout(HTTP_TIMEOUT)
        }

        pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|source| TransportError::Setup { source })?;
            Ok(Self { client })
        }
    }

    impl Transport for ReqwestTransport {
        fn invoke(
            &self,
            method: HttpMethod,
            url: &str,
            headers: &HeaderMap,
            body: Option<&Value>,
        ) -> Result<TransportResponse, TransportError> {
            let method = match method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut request = self.client.request(method, url);
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            // The authenticator may have put a credential in the query string.
            let http_err = |source: reqwest::Error| TransportError::Http {
                url: without_query(url).to_string(),
                source: source.without_url(),
            };
            let response = request.send().map_err(http_err)?;
            let status = response.status().as_u16();
            let body = response.text().map_err(http_err)?;

            Ok(TransportResponse { status, body })
        }
    }

    pub(super) fn without_query(url: &str) -> &str {
        url.split(['?', '#']).next().unwrap_or(url)
    }
}
