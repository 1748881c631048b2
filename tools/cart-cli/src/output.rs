//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use turbo_cart::prelude::CheckoutPhase;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a step in a process.
    pub fn step(&self, num: usize, total: usize, msg: &str) {
        if self.json {
            return;
        }
        println!(
            "{} {}",
            style(format!("[{}/{}]", num, total)).dim(),
            msg
        );
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Create a spinner for the checkout wait.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored badge for a checkout phase.
pub fn phase_badge(phase: CheckoutPhase) -> String {
    match phase {
        CheckoutPhase::Ready => style(phase.as_str()).green().to_string(),
        CheckoutPhase::Loading => style(phase.as_str()).yellow().to_string(),
        CheckoutPhase::Error => style(phase.as_str()).red().to_string(),
    }
}
