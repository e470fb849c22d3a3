//! Process-lifetime state shared by every invocation: settings and the gateway admin client.

use crate::config::Settings;
use crate::error::AppError;
use crate::gateway::{ApisixAdminClient, GatewayAdmin};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub gateway: Arc<dyn GatewayAdmin>,
}

impl AppState {
    /// Builds the admin client once; invocations reuse it.
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let gateway = ApisixAdminClient::new(&settings.gateway)?;
        Ok(AppState {
            settings: Arc::new(settings),
            gateway: Arc::new(gateway),
        })
    }

    pub fn with_gateway(settings: Settings, gateway: Arc<dyn GatewayAdmin>) -> Self {
        AppState {
            settings: Arc::new(settings),
            gateway,
        }
    }
}
