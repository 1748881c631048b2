//! Simulated checkout backend.

use async_trait::async_trait;
use tracing::debug;
use turbo_cart::prelude::*;

use crate::scenario::{GatewayConfig, GatewayMode};

/// Answers every checkout the way the scenario says, after a fixed delay.
pub struct SimulatedGateway {
    config: GatewayConfig,
}

impl SimulatedGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CheckoutGateway for SimulatedGateway {
    async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse, GatewayError> {
        debug!(
            checkout_id = %request.id,
            payload = %request.to_json().unwrap_or_default(),
            "simulated gateway received checkout"
        );
        tokio::time::sleep(self.config.latency()).await;

        match self.config.mode {
            GatewayMode::Accept => Ok(CheckoutResponse::accepted()),
            GatewayMode::Reject => Ok(CheckoutResponse::rejected()),
            GatewayMode::Fail => Err(match &self.config.message {
                Some(message) => GatewayError::Transport(message.clone()),
                None => GatewayError::Unavailable,
            }),
        }
    }
}
