//! Gateway admin API access. The client is built once per process and passed in explicitly.

use crate::config::GatewayConfig;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Raw answer from the admin API; non-2xx is data, not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayReply {
    pub status: u16,
    pub body: String,
}

impl GatewayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as JSON when it parses, otherwise as a plain string.
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

#[async_trait]
pub trait GatewayAdmin: Send + Sync {
    /// Idempotent PUT of a route document under `name`. `Err` only for transport failures.
    async fn put_route(&self, name: &str, config: &Value) -> Result<GatewayReply, AppError>;
}

pub struct ApisixAdminClient {
    client: reqwest::Client,
    admin_url: String,
    admin_key: Option<String>,
}

impl ApisixAdminClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build()?;
        Ok(ApisixAdminClient {
            client,
            admin_url: config.admin_url.trim_end_matches('/').to_string(),
            admin_key: config.admin_key.clone(),
        })
    }

    pub fn route_url(&self, name: &str) -> String {
        format!("{}/routes/{}", self.admin_url, name)
    }
}

#[async_trait]
impl GatewayAdmin for ApisixAdminClient {
    async fn put_route(&self, name: &str, config: &Value) -> Result<GatewayReply, AppError> {
        let url = self.route_url(name);
        tracing::debug!(url = %url, "PUT gateway route");
        let mut request = self.client.put(&url).json(config);
        if let Some(ref key) = self.admin_key {
            request = request.header("X-API-KEY", key);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(GatewayReply { status, body })
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every PUT and answers with a canned reply (or a transport error).
    pub struct RecordingGateway {
        reply: Result<GatewayReply, String>,
        pub puts: Mutex<Vec<(String, Value)>>,
    }

    impl RecordingGateway {
        pub fn replying(status: u16, body: &str) -> Self {
            RecordingGateway {
                reply: Ok(GatewayReply {
                    status,
                    body: body.to_string(),
                }),
                puts: Mutex::new(Vec::new()),
            }
        }

        pub fn unreachable(message: &str) -> Self {
            RecordingGateway {
                reply: Err(message.to_string()),
                puts: Mutex::new(Vec::new()),
            }
        }

        pub fn put_count(&self) -> usize {
            self.puts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GatewayAdmin for RecordingGateway {
        async fn put_route(&self, name: &str, config: &Value) -> Result<GatewayReply, AppError> {
            self.puts.lock().unwrap().push((name.to_string(), config.clone()));
            self.reply.clone().map_err(AppError::Gateway)
        }
    }
}
