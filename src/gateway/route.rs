//! APISIX route document: `{plugins, methods, name, uri}`.

use super::descriptor::{FunctionDescriptor, HttpVerb};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteConfig {
    pub plugins: RoutePlugins,
    pub methods: Vec<HttpVerb>,
    pub name: String,
    pub uri: String,
}

/// Token validation, backend invocation, request body transformation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoutePlugins {
    #[serde(rename = "jwt-auth")]
    pub jwt_auth: JwtAuthPlugin,
    pub openwhisk: OpenWhiskPlugin,
    #[serde(rename = "body-transformer")]
    pub body_transformer: BodyTransformerPlugin,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JwtAuthPlugin {
    #[serde(rename = "_meta")]
    pub meta: PluginMeta,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PluginMeta {
    pub disable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OpenWhiskPlugin {
    pub api_host: String,
    pub service_token: String,
    pub namespace: String,
    pub action: String,
    pub package: String,
    pub result: bool,
    pub ssl_verify: bool,
    /// Milliseconds, advisory for the gateway only.
    pub timeout: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodyTransformerPlugin {
    pub request: RequestTemplate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestTemplate {
    pub template: String,
}

impl RouteConfig {
    pub fn new(descriptor: &FunctionDescriptor, api_host: &str, service_token: &str, template: &str) -> Self {
        RouteConfig {
            plugins: RoutePlugins {
                jwt_auth: JwtAuthPlugin {
                    meta: PluginMeta { disable: false },
                },
                openwhisk: OpenWhiskPlugin {
                    api_host: api_host.to_string(),
                    service_token: service_token.to_string(),
                    namespace: descriptor.namespace.clone(),
                    action: descriptor.action.clone(),
                    package: descriptor.package.clone(),
                    result: descriptor.result,
                    ssl_verify: descriptor.ssl_verify,
                    timeout: descriptor.timeout_ms,
                },
                body_transformer: BodyTransformerPlugin {
                    request: RequestTemplate {
                        template: template.to_string(),
                    },
                },
            },
            methods: descriptor.http_methods.clone(),
            name: descriptor.route_name(),
            uri: descriptor.uri(),
        }
    }
}
