//! Backend and provider configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Placeholder a multi-region host carries for the region name.
pub const REGION_PLACEHOLDER: &str = "${region}";

/// Where the described API lives.
///
/// Every accessor except `base_path` may fail; failures propagate to the
/// caller unchanged.
pub trait BackendConfiguration {
    fn scheme(&self) -> Result<String, BackendError>;
    fn host(&self) -> Result<String, BackendError>;
    fn is_multi_region(&self) -> Result<bool, BackendError>;
    fn regions(&self) -> Result<Vec<String>, BackendError>;
    fn default_region(&self) -> Result<String, BackendError>;
    fn host_for_region(&self, region: &str) -> Result<String, BackendError>;
    fn base_path(&self) -> String;
}

/// Backend configuration read from a JSON document.
///
/// ```json
/// {
///   "schemes": ["https"],
///   "host": "api.${region}.example.com",
///   "basePath": "/v1",
///   "regions": ["us-west1", "us-east1"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticBackend {
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
}

impl StaticBackend {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            schemes: vec!["https".to_string()],
            host: host.into(),
            base_path: String::new(),
            regions: Vec::new(),
        }
    }

    pub fn with_schemes(mut self, schemes: &[&str]) -> Self {
        self.schemes = schemes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_regions(mut self, regions: &[&str]) -> Self {
        self.regions = regions.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl BackendConfiguration for StaticBackend {
    /// Prefers https when both schemes are declared.
    fn scheme(&self) -> Result<String, BackendError> {
        let declared = |scheme: &str| self.schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme));
        if self.schemes.is_empty() || declared("https") {
            Ok("https".to_string())
        } else if declared("http") {
            Ok("http".to_string())
        } else {
            Err(BackendError::new(format!(
                "specified schemes {:?} are not supported",
                self.schemes
            )))
        }
    }

    fn host(&self) -> Result<String, BackendError> {
        Ok(self.host.clone())
    }

    fn is_multi_region(&self) -> Result<bool, BackendError> {
        Ok(!self.regions.is_empty() && self.host.contains(REGION_PLACEHOLDER))
    }

    fn regions(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.regions.clone())
    }

    fn default_region(&self) -> Result<String, BackendError> {
        self.regions
            .first()
            .cloned()
            .ok_or_else(|| BackendError::new("no regions declared for multi-region host"))
    }

    fn host_for_region(&self, region: &str) -> Result<String, BackendError> {
        if !self.regions.iter().any(|r| r == region) {
            return Err(BackendError::new(format!(
                "region {} not matching allowed ones {:?}",
                region, self.regions
            )));
        }
        Ok(self.host.replace(REGION_PLACEHOLDER, region))
    }

    fn base_path(&self) -> String {
        self.base_path.clone()
    }
}

/// Values the user configured for the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfiguration {
    /// Header values keyed by configuration property name.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Region selector for multi-region backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ProviderConfiguration {
    pub fn with_header(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(property.into(), value.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Configured value for a property; empty strings count as unset.
    pub fn value(&self, property: &str) -> Option<&str> {
        self.headers
            .get(property)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Region the user selected, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_prefers_https() {
        let backend = StaticBackend::new("host.com").with_schemes(&["http", "https"]);
        assert_eq!(backend.scheme().unwrap(), "https");

        let backend = StaticBackend::new("host.com").with_schemes(&["http"]);
        assert_eq!(backend.scheme().unwrap(), "http");

        let backend = StaticBackend::new("host.com").with_schemes(&["ws"]);
        assert!(backend.scheme().is_err());
    }

    #[test]
    fn multi_region_host() {
        let backend = StaticBackend::new("api.${region}.example.com")
            .with_regions(&["us-west1", "us-east1"]);
        assert!(backend.is_multi_region().unwrap());
        assert_eq!(backend.default_region().unwrap(), "us-west1");
        assert_eq!(
            backend.host_for_region("us-east1").unwrap(),
            "api.us-east1.example.com"
        );
        assert!(backend.host_for_region("eu-north1").is_err());
    }

    #[test]
    fn regions_without_placeholder_are_single_region() {
        let backend = StaticBackend::new("api.example.com").with_regions(&["us-west1"]);
        assert!(!backend.is_multi_region().unwrap());
    }

    #[test]
    fn provider_values_ignore_empty() {
        let config = ProviderConfiguration::default()
            .with_header("token", "")
            .with_header("request_id", "abc")
            .with_region("");
        assert_eq!(config.value("token"), None);
        assert_eq!(config.value("request_id"), Some("abc"));
        assert_eq!(config.region(), None);
    }

    #[test]
    fn deserialize_backend() {
        let backend: StaticBackend = serde_json::from_str(
            r#"{"schemes":["http"],"host":"wwww.host.com","basePath":"/api"}"#,
        )
        .unwrap();
        assert_eq!(backend.base_path(), "/api");
        assert_eq!(backend.scheme().unwrap(), "http");
    }
}
