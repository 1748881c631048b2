//! Cart CLI - replay scripted cart sessions.
//!
//! Commands:
//! - `cart run <scenario>` - Replay a scenario and print the final cart
//! - `cart config` - Show the effective store configuration

mod commands;
mod gateway;
mod output;
mod scenario;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, RunArgs};

/// Cart CLI - Replay cart sessions against a simulated checkout gateway
#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file
    Run(RunArgs),

    /// Show the effective store configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose.
    let default_filter = if cli.verbose { "turbo_cart=debug,cart=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let output = output::Output::new(cli.json);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, &output).await,
        Commands::Config(args) => commands::config::run(args, &output).await,
    };

    if let Err(e) = result {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
