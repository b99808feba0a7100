//! Document loading from various sources.
//!
//! Resource descriptors, schema definitions, backend and provider
//! configuration are all plain JSON documents. They can be loaded from
//! files, strings, and HTTP URLs.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't a valid document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a valid document.
pub fn load_json_str<T: DeserializeOwned>(content: &str) -> Result<T, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the server
/// answers with an error status, or `LoadError::InvalidJson` if the body
/// isn't a valid document.
#[cfg(feature = "remote")]
pub fn load_json_url<T: DeserializeOwned>(url: &str) -> Result<T, LoadError> {
    let network_err = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_err)?;

    let response = client
        .get(url)
        .send()
        .map_err(network_err)?
        .error_for_status()
        .map_err(network_err)?;

    let content = response.text().map_err(network_err)?;
    load_json_str(&content)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// Automatically detects whether the source is a URL or file path.
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_json_auto<T: DeserializeOwned>(source: &str) -> Result<T, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_json_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_json(Path::new(source))
    }
}
