//! Show the effective store configuration.

use anyhow::{Context, Result};
use turbo_cart::prelude::StoreConfig;

use super::ConfigArgs;
use crate::output::Output;

/// Run the config command.
pub async fn run(args: ConfigArgs, output: &Output) -> Result<()> {
    let config = match &args.path {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("Failed to load store config: {}", path.display()))?,
        None => StoreConfig::default(),
    };

    if output.is_json() {
        output.json(&config);
        return Ok(());
    }

    output.header("Store Configuration");
    let text = config.to_toml_string()?;
    if text.trim().is_empty() {
        output.info("defaults (checkout waits for the gateway without a timeout)");
    } else {
        println!("{}", text.trim_end());
    }
    Ok(())
}
