//! Scenario files: a catalog, a simulated gateway and a list of cart steps.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_cart::prelude::*;

/// A scripted cart session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Store configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Simulated checkout backend.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Product catalog.
    #[serde(default)]
    pub products: Vec<ProductRecord>,

    /// Steps to replay, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a file (TOML, or JSON for `.json`).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON scenario: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML scenario: {}", path.display()))
        }
    }

    /// Build the catalog described by the scenario.
    pub fn catalog(&self) -> InMemoryCatalog {
        self.products.iter().cloned().collect()
    }
}

/// One cart operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Add { product: ProductId },
    Remove { product: ProductId },
    Set { product: ProductId, quantity: i64 },
    Checkout,
}

impl Step {
    /// Short description for output.
    pub fn describe(&self) -> String {
        match self {
            Step::Add { product } => format!("add {}", product),
            Step::Remove { product } => format!("remove {}", product),
            Step::Set { product, quantity } => format!("set {} = {}", product, quantity),
            Step::Checkout => "checkout".to_string(),
        }
    }
}

/// How the simulated gateway answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayMode {
    #[default]
    Accept,
    Reject,
    Fail,
}

/// Simulated gateway settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Answer given to every checkout.
    #[serde(default)]
    pub mode: GatewayMode,

    /// Artificial latency before answering.
    #[serde(default)]
    pub latency_ms: u64,

    /// Failure detail used in `fail` mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GatewayConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
