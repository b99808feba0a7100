//! Request header pipeline.
//!
//! Headers are accumulated into one map by stages applied in a fixed order:
//!
//! 1. [`append_operation_headers`]: headers the operation declares, valued
//!    from provider configuration.
//! 2. [`append_auth_headers`]: headers from the authenticator. Never
//!    overwrites a header set by stage 1.
//! 3. [`append_user_agent_header`]: always last, always overwrites.
//!
//! Header names compare case-insensitively.

use std::collections::BTreeMap;

use tracing::warn;

use crate::backend::ProviderConfiguration;
use crate::error::RequestError;
use crate::resource::HeaderParameter;

pub type HeaderMap = BTreeMap<String, String>;

pub const USER_AGENT_HEADER: &str = "User-Agent";

/// Identification sent with every request unless the client overrides it.
pub fn default_user_agent() -> String {
    format!(
        "{}/{} ({}; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Fill declared header parameters from provider configuration.
///
/// Optional headers without a value are skipped. Values always overwrite,
/// since this is the first stage.
pub fn append_operation_headers(
    parameters: &[HeaderParameter],
    config: &ProviderConfiguration,
    headers: &mut HeaderMap,
) -> Result<(), RequestError> {
    for parameter in parameters {
        let property = parameter.config_name();
        match config.value(&property) {
            Some(value) => {
                remove_header(headers, &parameter.name);
                headers.insert(parameter.name.clone(), value.to_string());
            }
            None if parameter.required => {
                return Err(RequestError::MissingRequiredHeader {
                    header: parameter.name.clone(),
                    property,
                });
            }
            None => {}
        }
    }
    Ok(())
}

/// Add authentication headers, keeping any value already present.
pub fn append_auth_headers(auth_headers: &BTreeMap<String, String>, headers: &mut HeaderMap) {
    for (name, value) in auth_headers {
        if find_header(headers, name).is_some() {
            warn!(header = %name, "authentication header already set by the operation, keeping it");
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }
}

/// Set the identification header, replacing any spelling of it.
pub fn append_user_agent_header(user_agent: &str, headers: &mut HeaderMap) {
    remove_header(headers, USER_AGENT_HEADER);
    headers.insert(USER_AGENT_HEADER.to_string(), user_agent.to_string());
}

fn find_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn remove_header(headers: &mut HeaderMap, name: &str) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
}
