//! Deployment configuration: static action identity, database defaults and gateway access.

/// Everything read from the environment once at process start.
#[derive(Clone, Debug)]
pub struct Settings {
    pub action: ActionConfig,
    pub database: DatabaseDefaults,
    pub gateway: GatewayConfig,
}

/// Static identity of the deployed action. Feeds the descriptor and the table name.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionConfig {
    pub action_name: String,
    pub package_name: String,
    /// Route prefix; the public path is `<route_prefix><action_name>`.
    pub route_prefix: String,
    /// Externally reachable base URL, published as the OpenAPI server.
    pub server_url: String,
    /// Path on `server_url` that issues bearer tokens.
    pub auth_path: String,
    pub namespace: String,
    pub timeout_ms: u32,
    pub ssl_verify: bool,
    /// Ask the gateway to return only the action result, without activation metadata.
    pub bare_result: bool,
}

/// Deployment-level database settings. Credentials may be left to the argument bag.
#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseDefaults {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Overrides `ActionConfig::action_name` for table naming when set.
    pub action_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GatewayConfig {
    /// Admin API base, routes are PUT to `<admin_url>/routes/<name>`.
    pub admin_url: String,
    pub admin_key: Option<String>,
    /// Controller host the gateway forwards invocations to.
    pub api_host: String,
    /// Request body transformation template for the `body-transformer` plugin.
    pub body_template: Option<String>,
}

/// Connection and naming parameters for one invocation's repository.
#[derive(Clone, Debug, PartialEq)]
pub struct RepositoryConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub action_name: String,
}
