//! Resource URL resolution.
//!
//! Builds `scheme://host[basePath]path[/instanceId]` from a resource's path
//! template, the backend configuration and the identifiers of the parent
//! resources. Resolution is pure: the same inputs always produce the same
//! URL or the same error.

use tracing::debug;

use crate::backend::BackendConfiguration;
use crate::error::{fmt_ids, UrlError};
use crate::resource::ResourceDescriptor;

/// Resolve the URL of a resource collection (`instance_id == None`) or of
/// a single instance.
///
/// `region` is the user-selected region; when absent a multi-region
/// backend's default region is used. A resource declaring its own host
/// skips region selection entirely.
///
/// # Errors
///
/// Backend accessor failures propagate unchanged. Otherwise returns
/// `UrlError::MissingBackendConfig` if host or path are empty,
/// `TooManyParentIds` / `MissingParentIds` if the parent IDs don't match the
/// template's parameters, `UnsupportedCharacter` if an ID contains a
/// forward slash, and `MissingInstanceId` for an empty instance ID.
pub fn resolve_resource_url(
    resource: &ResourceDescriptor,
    backend: &dyn BackendConfiguration,
    region: Option<&str>,
    parent_ids: &[String],
    instance_id: Option<&str>,
) -> Result<String, UrlError> {
    if let Some(id) = instance_id {
        check_instance_id(id)?;
    }

    let scheme = backend.scheme()?;
    let host = resolve_host(resource, backend, region)?;
    let base_path = backend.base_path();
    let path = resolve_path(&resource.path, parent_ids)?;

    if host.is_empty() || path.is_empty() {
        return Err(UrlError::MissingBackendConfig { host, path });
    }

    let mut url = format!("{}://{}{}", scheme, host, join_paths(&base_path, &path));
    if let Some(id) = instance_id {
        if url.ends_with('/') {
            url.pop();
        }
        url.push('/');
        url.push_str(id);
    }

    debug!(template = %resource.path, url = %url, "resolved resource URL");
    Ok(url)
}

/// Substitute parent IDs into a path template, in order.
///
/// Parameters are whole `{name}` segments where `name` is made of word
/// characters; `{{name}}` is therefore literal text and left as-is. Empty
/// interior segments (`//`) count as parameters that can never be resolved
/// sensibly. A template with no parameters ignores the parent IDs.
///
/// # Errors
///
/// See [`resolve_resource_url`].
pub fn resolve_path(template: &str, parent_ids: &[String]) -> Result<String, UrlError> {
    let mut segments: Vec<&str> = template.split('/').collect();
    let last = segments.len() - 1;

    let params: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(i, segment)| {
            is_path_parameter(segment) || (segment.is_empty() && *i != 0 && *i != last)
        })
        .map(|(i, _)| i)
        .collect();

    if params.is_empty() {
        return Ok(template.to_string());
    }

    if parent_ids.len() > params.len() {
        return Err(UrlError::TooManyParentIds {
            path: template.to_string(),
            ids: parent_ids[params.len()..].to_vec(),
        });
    }
    if parent_ids.len() < params.len() {
        return Err(UrlError::MissingParentIds {
            path: template.to_string(),
            ids: parent_ids.to_vec(),
        });
    }

    let invalid: Vec<String> = parent_ids
        .iter()
        .filter(|id| id.contains('/'))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(UrlError::UnsupportedCharacter {
            context: format!("parent IDs of path '{}'", template),
            value: fmt_ids(&invalid),
        });
    }

    for (index, id) in params.iter().zip(parent_ids) {
        segments[*index] = id.as_str();
    }
    Ok(segments.join("/"))
}

/// Whether a path segment is a `{name}` parameter.
fn is_path_parameter(segment: &str) -> bool {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .map(|name| name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(false)
}

fn resolve_host(
    resource: &ResourceDescriptor,
    backend: &dyn BackendConfiguration,
    region: Option<&str>,
) -> Result<String, UrlError> {
    if let Some(host) = resource.host_override() {
        return Ok(host.to_string());
    }

    if backend.is_multi_region()? {
        let region = match region.filter(|r| !r.is_empty()) {
            Some(region) => region.to_string(),
            None => backend.default_region()?,
        };
        return Ok(backend.host_for_region(&region)?);
    }

    Ok(backend.host()?)
}

/// Join base path and resource path with exactly one leading slash each.
fn join_paths(base_path: &str, path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        path
    } else if base.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("/{}{}", base, path)
    }
}

fn check_instance_id(id: &str) -> Result<(), UrlError> {
    if id.is_empty() {
        return Err(UrlError::MissingInstanceId);
    }
    if id.contains('/') {
        return Err(UrlError::UnsupportedCharacter {
            context: "instance ID".to_string(),
            value: id.to_string(),
        });
    }
    Ok(())
}
