//! Store configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// Cart store configuration, read from TOML:
///
/// ```toml
/// [checkout]
/// timeout_ms = 5000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Checkout workflow configuration.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl StoreConfig {
    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CartError> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CartError::Config(format!("failed to read {}: {}", path.display(), e)))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| CartError::Config(e.to_string()))
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, CartError> {
        toml::to_string_pretty(self).map_err(|e| CartError::Serialization(e.to_string()))
    }
}

/// Checkout workflow configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Give up on the gateway after this many milliseconds. Unset means wait
    /// for as long as the gateway takes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl CheckoutConfig {
    /// Gateway timeout, if any. A zero timeout counts as unset.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
