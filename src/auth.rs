//! Authentication collaborators.
//!
//! An `Authenticator` turns the security schemes an operation declares into
//! headers and/or a replacement URL. A single call either succeeds
//! completely or fails; any caching is the authenticator's own business.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;
use crate::resource::SecurityScheme;

/// What an authenticator contributes to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub headers: BTreeMap<String, String>,
    /// Replaces the request URL when set.
    pub url: Option<String>,
}

pub trait Authenticator {
    /// Prepare authentication for a request to `url` requiring `schemes`.
    fn prepare(&self, url: &str, schemes: &[SecurityScheme]) -> Result<AuthContext, AuthError>;
}

/// Authenticator for APIs that need none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn prepare(&self, _url: &str, _schemes: &[SecurityScheme]) -> Result<AuthContext, AuthError> {
        Ok(AuthContext::default())
    }
}

/// Where an API key travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Header,
    Query,
}

/// A configured API key credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(rename = "in")]
    pub location: ApiKeyLocation,
    pub name: String,
    pub value: String,
}

/// API key authentication keyed by security scheme name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyAuthenticator {
    keys: BTreeMap<String, ApiKey>,
}

impl ApiKeyAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, scheme: impl Into<String>, key: ApiKey) -> Self {
        self.keys.insert(scheme.into(), key);
        self
    }

    pub fn header(
        self,
        scheme: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.with_key(
            scheme,
            ApiKey {
                location: ApiKeyLocation::Header,
                name: name.into(),
                value: value.into(),
            },
        )
    }

    pub fn query(
        self,
        scheme: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.with_key(
            scheme,
            ApiKey {
                location: ApiKeyLocation::Query,
                name: name.into(),
                value: value.into(),
            },
        )
    }
}

impl Authenticator for ApiKeyAuthenticator {
    fn prepare(&self, url: &str, schemes: &[SecurityScheme]) -> Result<AuthContext, AuthError> {
        let mut context = AuthContext::default();
        let mut query = Vec::new();

        for scheme in schemes {
            let key = self.keys.get(scheme.name()).ok_or_else(|| {
                AuthError::new(format!(
                    "security scheme '{}' has no configured credentials",
                    scheme.name()
                ))
            })?;
            match key.location {
                ApiKeyLocation::Header => {
                    context.headers.insert(key.name.clone(), key.value.clone());
                }
                ApiKeyLocation::Query => query.push(key),
            }
        }

        if !query.is_empty() {
            let mut parsed = Url::parse(url)
                .map_err(|e| AuthError::new(format!("cannot add API key to '{}': {}", url, e)))?;
            {
                let mut pairs = parsed.query_pairs_mut();
                for key in query {
                    pairs.append_pair(&key.name, &key.value);
                }
            }
            context.url = Some(parsed.to_string());
        }

        Ok(context)
    }
}
