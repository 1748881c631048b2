//! Checkout module.
//!
//! Contains the gateway contract, the checkout status state machine and the
//! async call wrapper used by the store.

mod flow;
mod gateway;
mod status;

pub use flow::{call_gateway, CheckoutOutcome};
pub use gateway::{CheckoutGateway, CheckoutRequest, CheckoutResponse, GatewayError};
pub use status::{CheckoutFailure, CheckoutPhase, CheckoutStatus};
