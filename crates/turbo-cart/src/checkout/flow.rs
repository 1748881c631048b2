//! Checkout call orchestration.

use std::time::Duration;

use crate::checkout::{CheckoutGateway, CheckoutRequest, CheckoutResponse, GatewayError};

/// What a checkout request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The gateway accepted the order and the cart was cleared.
    Completed,
    /// The gateway declined the order; the cart is unchanged.
    Rejected,
    /// The call failed; the cart is unchanged.
    Failed { message: String },
    /// Another checkout was already in flight; nothing was sent.
    AlreadyInFlight,
}

impl CheckoutOutcome {
    /// Check if the order went through.
    pub fn is_completed(&self) -> bool {
        matches!(self, CheckoutOutcome::Completed)
    }
}

/// Call the gateway, optionally bounded by a timeout.
///
/// With `timeout = None` the call may wait forever; there is no cancellation.
pub async fn call_gateway<G>(
    gateway: &G,
    request: &CheckoutRequest,
    timeout: Option<Duration>,
) -> Result<CheckoutResponse, GatewayError>
where
    G: CheckoutGateway + ?Sized,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, gateway.checkout(request))
            .await
            .map_err(|_| GatewayError::Timeout(limit))?,
        None => gateway.checkout(request).await,
    }
}
