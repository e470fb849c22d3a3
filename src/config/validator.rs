//! Settings validation: identifiers that end up in SQL and gateway paths must be plain.

use crate::config::Settings;
use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

/// True when `name` can be spliced into SQL unquoted.
pub fn is_plain_identifier(name: &str) -> bool {
    identifier_re().is_match(name)
}

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let action = &settings.action;
    for (key, value) in [
        ("ACTION_NAME", action.action_name.as_str()),
        ("PACKAGE_NAME", action.package_name.as_str()),
    ] {
        if !is_plain_identifier(value) {
            return Err(ConfigError::Invalid {
                key,
                reason: format!("'{}' is not a plain identifier", value),
            });
        }
    }
    if !action.route_prefix.starts_with('/') || !action.route_prefix.ends_with('/') {
        return Err(ConfigError::Invalid {
            key: "ROUTE_PREFIX",
            reason: format!("'{}' must start and end with '/'", action.route_prefix),
        });
    }
    if !action.auth_path.starts_with('/') {
        return Err(ConfigError::Invalid {
            key: "AUTH_TOKEN_PATH",
            reason: format!("'{}' must start with '/'", action.auth_path),
        });
    }
    for (key, value) in [
        ("SERVER_URL", action.server_url.as_str()),
        ("APISIX_ADMIN_URL", settings.gateway.admin_url.as_str()),
        ("OW_API_HOST", settings.gateway.api_host.as_str()),
    ] {
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key,
                reason: format!("'{}' is not an http(s) URL", value),
            });
        }
    }
    Ok(())
}
