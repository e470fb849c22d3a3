//! Gateway setup and OpenAPI generation, run ahead of verb handling when explicitly requested.

use super::client::GatewayAdmin;
use super::descriptor::FunctionDescriptor;
use super::openapi::generate_openapi;
use super::route::RouteConfig;
use crate::args::ArgumentBag;
use crate::config::Settings;
use crate::error::AppError;
use crate::response::Outcome;
use serde_json::{json, Value};

pub const SETUP_ERROR: &str = "Errore durante la configurazione del gateway: ";
pub const SETUP_NOT_REQUIRED: &str = "Setup non richiesto";

#[derive(Clone, Debug, PartialEq)]
pub enum Provisioning {
    NotRequired,
    OpenApi(Value),
    Registered { route: String, config: Value, openapi: Value },
    Failed { message: String, details: Option<Value> },
}

impl Provisioning {
    /// Whether the dispatcher must stop here and return `into_outcome()`.
    pub fn short_circuits(&self) -> bool {
        !matches!(self, Provisioning::NotRequired)
    }

    pub fn into_outcome(self) -> Outcome {
        match self {
            Provisioning::NotRequired => Outcome::message(SETUP_NOT_REQUIRED),
            Provisioning::OpenApi(doc) => Outcome::result(doc),
            Provisioning::Registered { route, config, openapi } => Outcome::result(json!({
                "route": route,
                "config": config,
                "openapi": openapi,
            })),
            Provisioning::Failed { message, details: Some(d) } => Outcome::error_with_details(message, d),
            Provisioning::Failed { message, details: None } => Outcome::error(message),
        }
    }

    fn failed(e: AppError) -> Self {
        Provisioning::Failed {
            message: format!("{}{}", SETUP_ERROR, e),
            details: None,
        }
    }
}

/// OpenAPI wins over setup when both flags are present.
pub async fn setup_if_required(settings: &Settings, gateway: &dyn GatewayAdmin, args: &ArgumentBag) -> Provisioning {
    let descriptor = FunctionDescriptor::build(&settings.action, args);

    if args.flag("generateopenapi", "TRUE") {
        tracing::info!(action = %descriptor.action, "generating openapi document");
        return Provisioning::OpenApi(generate_openapi(&descriptor));
    }
    if !args.flag("setupapisix", "TRUE") {
        return Provisioning::NotRequired;
    }

    let Some(api_key) = descriptor.api_key.clone() else {
        tracing::warn!(route = %descriptor.route_name(), "gateway setup requested without API_KEY");
        return Provisioning::failed(AppError::Validation("API_KEY is required for gateway setup".into()));
    };
    let Some(template) = settings.gateway.body_template.as_deref() else {
        tracing::warn!(route = %descriptor.route_name(), "gateway setup requested without body template");
        return Provisioning::failed(AppError::TemplateMissing);
    };

    let route = RouteConfig::new(&descriptor, &settings.gateway.api_host, &api_key, template);
    let config = match serde_json::to_value(&route) {
        Ok(v) => v,
        Err(e) => return Provisioning::failed(AppError::Gateway(e.to_string())),
    };

    let name = descriptor.route_name();
    match gateway.put_route(&name, &config).await {
        Ok(reply) if reply.is_success() => {
            tracing::info!(route = %name, status = reply.status, "gateway route registered");
            Provisioning::Registered {
                route: name,
                config,
                openapi: generate_openapi(&descriptor),
            }
        }
        Ok(reply) => {
            tracing::warn!(route = %name, status = reply.status, "gateway rejected route");
            Provisioning::Failed {
                message: reply.body.clone(),
                details: Some(json!({
                    "status": reply.status,
                    "response": reply.body_json(),
                    "config": config,
                })),
            }
        }
        Err(e) => {
            tracing::warn!(route = %name, error = %e, "gateway unreachable");
            Provisioning::Failed {
                message: format!("{}{}", SETUP_ERROR, e),
                details: Some(json!({ "config": config })),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::client::testing::RecordingGateway;

    fn settings(template: Option<&str>) -> Settings {
        let template = template.map(str::to_string);
        Settings::from_lookup(move |k| match k {
            "APISIX_BODY_TEMPLATE" => template.clone(),
            _ => None,
        })
        .unwrap()
    }

    fn bag(v: Value) -> ArgumentBag {
        ArgumentBag::from_value(v)
    }

    #[tokio::test]
    async fn nothing_requested() {
        let gw = RecordingGateway::replying(200, "{}");
        let p = setup_if_required(&settings(Some("t")), &gw, &bag(json!({ "method": "GET" }))).await;
        assert_eq!(p, Provisioning::NotRequired);
        assert!(!p.short_circuits());
        assert_eq!(p.into_outcome().result_value().unwrap()["message"], SETUP_NOT_REQUIRED);
        assert_eq!(gw.put_count(), 0);
    }

    #[tokio::test]
    async fn openapi_never_contacts_gateway() {
        let gw = RecordingGateway::replying(200, "{}");
        let args = bag(json!({ "generateopenapi": "true", "setupapisix": "TRUE", "API_KEY": "k" }));
        let p = setup_if_required(&settings(Some("t")), &gw, &args).await;
        match p {
            Provisioning::OpenApi(doc) => assert_eq!(doc["openapi"], "3.0.0"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(gw.put_count(), 0);
    }

    #[tokio::test]
    async fn setup_puts_route_and_attaches_openapi() {
        let gw = RecordingGateway::replying(201, "{\"key\":\"/apisix/routes/x\"}");
        let args = bag(json!({ "setupapisix": true, "API_KEY": "svc-token" }));
        let p = setup_if_required(&settings(Some("{{ body }}")), &gw, &args).await;

        let puts = gw.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "PrototipeMicroservices-PrototipeFNC");
        assert_eq!(puts[0].1["plugins"]["openwhisk"]["service_token"], "svc-token");

        let out = p.into_outcome();
        let v = out.result_value().unwrap();
        assert_eq!(v["route"], "PrototipeMicroservices-PrototipeFNC");
        assert_eq!(v["config"]["uri"], "/prototipe/api/v1/PrototipeFNC");
        assert_eq!(v["openapi"]["openapi"], "3.0.0");
    }

    #[tokio::test]
    async fn rejected_setup_carries_body_and_config() {
        let gw = RecordingGateway::replying(401, "{\"error_msg\":\"invalid api key\"}");
        let args = bag(json!({ "setupapisix": "TRUE", "API_KEY": "k" }));
        let out = setup_if_required(&settings(Some("t")), &gw, &args).await.into_outcome();
        match out {
            Outcome::Failure { error, details } => {
                assert_eq!(error, "{\"error_msg\":\"invalid api key\"}");
                let d = details.unwrap();
                assert_eq!(d["status"], 401);
                assert_eq!(d["response"]["error_msg"], "invalid api key");
                assert_eq!(d["config"]["name"], "PrototipeMicroservices-PrototipeFNC");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_prefixed() {
        let gw = RecordingGateway::unreachable("connection refused");
        let args = bag(json!({ "setupapisix": "TRUE", "API_KEY": "k" }));
        let out = setup_if_required(&settings(Some("t")), &gw, &args).await.into_outcome();
        assert_eq!(
            out.error_message(),
            Some("Errore durante la configurazione del gateway: gateway: connection refused")
        );
    }

    #[tokio::test]
    async fn setup_fails_closed_without_key_or_template() {
        let gw = RecordingGateway::replying(200, "{}");
        let p = setup_if_required(&settings(Some("t")), &gw, &bag(json!({ "setupapisix": "TRUE" }))).await;
        assert!(p.short_circuits());
        assert!(p.into_outcome().error_message().unwrap().ends_with("API_KEY is required for gateway setup"));

        let args = bag(json!({ "setupapisix": "TRUE", "API_KEY": "k" }));
        let out = setup_if_required(&settings(None), &gw, &args).await.into_outcome();
        assert!(out.error_message().unwrap().starts_with(SETUP_ERROR));
        assert_eq!(gw.put_count(), 0);
    }
}
