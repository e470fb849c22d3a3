//! Load settings from environment variables (with defaults) and resolve per-invocation values.

use crate::args::ArgumentBag;
use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;

pub const DEFAULT_ACTION_NAME: &str = "PrototipeFNC";
pub const DEFAULT_PACKAGE_NAME: &str = "PrototipeMicroservices";
pub const DEFAULT_ROUTE_PREFIX: &str = "/prototipe/api/v1/";

impl Settings {
    /// Read from the process environment. Call once at startup (after `.env` loading, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let action = ActionConfig {
            action_name: or("ACTION_NAME", DEFAULT_ACTION_NAME),
            package_name: or("PACKAGE_NAME", DEFAULT_PACKAGE_NAME),
            route_prefix: or("ROUTE_PREFIX", DEFAULT_ROUTE_PREFIX),
            server_url: or("SERVER_URL", "http://localhost:9080"),
            auth_path: or("AUTH_TOKEN_PATH", "/auth/token"),
            namespace: or("OW_NAMESPACE", "nuvolaris"),
            timeout_ms: parse_setting("ACTION_TIMEOUT_MS", get("ACTION_TIMEOUT_MS"), 60_000)?,
            ssl_verify: parse_setting("ACTION_SSL_VERIFY", get("ACTION_SSL_VERIFY"), false)?,
            bare_result: parse_setting("ACTION_BARE_RESULT", get("ACTION_BARE_RESULT"), true)?,
        };

        let database = DatabaseDefaults {
            host: or("DB_SERVER", "nuvolaris-postgres"),
            port: parse_setting("DB_PORT", get("DB_PORT"), 5432)?,
            name: or("DB_NAME", "nuvolaris"),
            user: get("DB_USER"),
            password: get("DB_PASSWORD"),
            action_name: get("ACTION_NAME"),
        };

        let body_template = match (get("APISIX_BODY_TEMPLATE"), get("APISIX_BODY_TEMPLATE_PATH")) {
            (Some(inline), _) => Some(inline),
            (None, Some(path)) => Some(
                std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::Load(format!("APISIX_BODY_TEMPLATE_PATH {}: {}", path, e)))?,
            ),
            (None, None) => None,
        };
        let gateway = GatewayConfig {
            admin_url: or("APISIX_ADMIN_URL", "http://apisix-admin:9280/apisix/admin")
                .trim_end_matches('/')
                .to_string(),
            admin_key: get("APISIX_ADMIN_KEY"),
            api_host: or("OW_API_HOST", "http://controller:3233"),
            body_template,
        };

        let settings = Settings {
            action,
            database,
            gateway,
        };
        validate(&settings)?;
        Ok(settings)
    }
}

fn parse_setting<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(s) => s.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("{}: {}", s, e),
        }),
    }
}

impl RepositoryConfig {
    /// Deployment values win; credentials and action name fall back to the argument bag.
    pub fn resolve(settings: &Settings, args: &ArgumentBag) -> Self {
        let db = &settings.database;
        let from_args = |key: &str| args.get_str(key).filter(|v| !v.is_empty());
        RepositoryConfig {
            host: db.host.clone(),
            port: db.port,
            database: db.name.clone(),
            user: db.user.clone().or_else(|| from_args("DB_USER")).unwrap_or_default(),
            password: db
                .password
                .clone()
                .or_else(|| from_args("DB_PASSWORD"))
                .unwrap_or_default(),
            action_name: db
                .action_name
                .clone()
                .or_else(|| from_args("ACTION_NAME"))
                .unwrap_or_else(|| settings.action.action_name.clone()),
        }
    }
}
