//! Checkout gateway contract.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::ids::{CheckoutId, ProductId};

/// Payload of one checkout attempt: the cart contents captured at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Identifier of this attempt.
    pub id: CheckoutId,
    /// Product id -> quantity.
    pub items: BTreeMap<ProductId, u64>,
}

impl CheckoutRequest {
    /// Create a request for a snapshot of cart items.
    pub fn new(items: BTreeMap<ProductId, u64>) -> Self {
        Self {
            id: CheckoutId::generate(),
            items,
        }
    }

    /// Wire form of the payload, e.g. `{"p1":2,"p2":1}`.
    pub fn to_json(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Total units in the payload.
    pub fn unit_count(&self) -> u64 {
        self.items.values().fold(0u64, |acc, q| acc.saturating_add(*q))
    }
}

/// Normal completion of a checkout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Whether the backend accepted the order.
    pub success: bool,
}

impl CheckoutResponse {
    /// An accepted checkout.
    pub fn accepted() -> Self {
        Self { success: true }
    }

    /// A business-level rejection.
    pub fn rejected() -> Self {
        Self { success: false }
    }
}

/// Transport-level failure of a checkout call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("checkout timed out after {0:?}")]
    Timeout(Duration),

    /// The caller stopped waiting before the gateway answered.
    #[error("checkout abandoned")]
    Abandoned,

    /// The call failed without any detail.
    #[error("")]
    Unavailable,
}

impl GatewayError {
    /// Human-readable description, empty when none is available.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// The external checkout backend.
///
/// Implementations only perform the call; the cart decides what the outcome
/// means for its state.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Submit a checkout request.
    async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse, GatewayError>;
}
