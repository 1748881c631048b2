//! Checkout status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checkout::CheckoutRequest;
use crate::error::CartError;
use crate::ids::CheckoutId;

/// Flat three-state view of the checkout lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckoutPhase {
    /// Idle, or the last checkout succeeded.
    #[default]
    Ready,
    /// A checkout request is in flight.
    Loading,
    /// The last checkout failed.
    Error,
}

impl CheckoutPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Ready => "READY",
            CheckoutPhase::Loading => "LOADING",
            CheckoutPhase::Error => "ERROR",
        }
    }
}

impl FromStr for CheckoutPhase {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "READY" => Ok(CheckoutPhase::Ready),
            "LOADING" => Ok(CheckoutPhase::Loading),
            "ERROR" => Ok(CheckoutPhase::Error),
            _ => Err(CartError::Serialization(format!("unknown checkout phase: {}", s))),
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the last checkout ended in the error phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutFailure {
    /// The gateway answered and declined the order.
    Rejected,
    /// The call itself failed.
    Transport {
        /// Failure detail, possibly empty.
        message: String,
    },
}

impl CheckoutFailure {
    /// Message shown to the shopper; empty for a plain rejection.
    pub fn message(&self) -> &str {
        match self {
            CheckoutFailure::Rejected => "",
            CheckoutFailure::Transport { message } => message,
        }
    }
}

/// Checkout lifecycle as a tagged variant.
///
/// Only the in-flight variant carries a request, and only the failed variant
/// carries a message, so a stale message while loading cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutStatus {
    #[default]
    Idle,
    InFlight {
        /// Payload captured when the attempt started.
        request: CheckoutRequest,
    },
    Failed(CheckoutFailure),
}

impl CheckoutStatus {
    /// Flat phase for this status.
    pub fn phase(&self) -> CheckoutPhase {
        match self {
            CheckoutStatus::Idle => CheckoutPhase::Ready,
            CheckoutStatus::InFlight { .. } => CheckoutPhase::Loading,
            CheckoutStatus::Failed(_) => CheckoutPhase::Error,
        }
    }

    /// Error message; empty unless failed with detail.
    pub fn error_message(&self) -> &str {
        match self {
            CheckoutStatus::Failed(failure) => failure.message(),
            _ => "",
        }
    }

    /// Id of the in-flight attempt, if any.
    pub fn in_flight_id(&self) -> Option<&CheckoutId> {
        match self {
            CheckoutStatus::InFlight { request } => Some(&request.id),
            _ => None,
        }
    }
}
