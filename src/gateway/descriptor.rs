//! Canonical description of the deployed function, derived from static config plus the caller's key.

use crate::args::ArgumentBag;
use crate::config::ActionConfig;
use crate::error::AppError;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Put,
    Delete,
    Patch,
    Post,
}

impl HttpVerb {
    /// Every verb the action answers, in registration order.
    pub const ALL: [HttpVerb; 5] = [
        HttpVerb::Get,
        HttpVerb::Put,
        HttpVerb::Delete,
        HttpVerb::Patch,
        HttpVerb::Post,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Post => "POST",
        }
    }

    /// Identifier-bearing verbs take `id` as a query parameter; the rest take a body.
    pub fn takes_id(&self) -> bool {
        matches!(self, HttpVerb::Get | HttpVerb::Delete)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpVerb {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpVerb::Get),
            "PUT" => Ok(HttpVerb::Put),
            "DELETE" => Ok(HttpVerb::Delete),
            "PATCH" => Ok(HttpVerb::Patch),
            "POST" => Ok(HttpVerb::Post),
            _ => Err(AppError::Validation(format!("HTTP method not supported: {}", s))),
        }
    }
}

/// Never derived from record data.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionDescriptor {
    pub http_methods: Vec<HttpVerb>,
    pub route: String,
    pub package: String,
    pub action: String,
    pub namespace: String,
    /// Return the bare action result instead of the full activation record.
    pub result: bool,
    pub ssl_verify: bool,
    pub timeout_ms: u32,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub server_url: String,
    pub auth_path: String,
}

impl FunctionDescriptor {
    pub fn build(config: &ActionConfig, args: &ArgumentBag) -> Self {
        FunctionDescriptor {
            http_methods: HttpVerb::ALL.to_vec(),
            route: config.route_prefix.clone(),
            package: config.package_name.clone(),
            action: config.action_name.clone(),
            namespace: config.namespace.clone(),
            result: config.bare_result,
            ssl_verify: config.ssl_verify,
            timeout_ms: config.timeout_ms,
            api_key: args.get_str("API_KEY").filter(|k| !k.trim().is_empty()),
            server_url: config.server_url.trim_end_matches('/').to_string(),
            auth_path: config.auth_path.clone(),
        }
    }

    /// Gateway route id: `<package>-<action>`.
    pub fn route_name(&self) -> String {
        format!("{}-{}", self.package, self.action)
    }

    /// Public path: `<route><action>`.
    pub fn uri(&self) -> String {
        format!("{}{}", self.route, self.action)
    }

    pub fn public_url(&self) -> String {
        format!("{}{}", self.server_url, self.uri())
    }

    pub fn auth_url(&self) -> String {
        format!("{}{}", self.server_url, self.auth_path)
    }
}
