//! Replay a scenario against a fresh cart.

use anyhow::Result;
use serde::Serialize;
use turbo_cart::prelude::*;

use super::RunArgs;
use crate::gateway::SimulatedGateway;
use crate::output::{phase_badge, Output};
use crate::scenario::{Scenario, Step};

/// Final state of a replayed session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(flatten)]
    pub cart: CartSnapshot,
    pub item_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_error: Option<String>,
}

impl Report {
    fn collect(store: &CartStore, catalog: &InMemoryCatalog) -> Self {
        let (total_price, total_error) = match store.total_price(catalog) {
            Ok(price) => (Some(price), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            cart: store.snapshot(),
            item_count: store.item_count(),
            total_price,
            total_error,
        }
    }
}

/// Run the run command.
pub async fn run(args: RunArgs, output: &Output) -> Result<()> {
    let mut scenario = Scenario::load(&args.scenario)?;
    if let Some(timeout_ms) = args.timeout_ms {
        scenario.store.checkout.timeout_ms = Some(timeout_ms);
    }

    let catalog = scenario.catalog();
    let store = CartStore::with_config(&scenario.store);
    let gateway = SimulatedGateway::new(scenario.gateway.clone());

    output.header(&format!("Replaying {}", args.scenario.display()));

    let total = scenario.steps.len();
    for (i, step) in scenario.steps.iter().enumerate() {
        output.step(i + 1, total, &step.describe());
        apply_step(&store, &gateway, step, output).await;
    }

    let report = Report::collect(&store, &catalog);
    print_report(&report, output);
    Ok(())
}

async fn apply_step(store: &CartStore, gateway: &SimulatedGateway, step: &Step, output: &Output) {
    match step {
        Step::Add { product } => store.add_to_cart(product),
        Step::Remove { product } => store.remove_from_cart(product),
        Step::Set { product, quantity } => store.update_quantity(product, *quantity),
        Step::Checkout => {
            let spinner = output.spinner("Waiting for checkout gateway...");
            let outcome = store.request_checkout(gateway).await;
            spinner.finish_and_clear();

            match outcome {
                CheckoutOutcome::Completed => output.success("Checkout completed"),
                CheckoutOutcome::Rejected => output.warn("Checkout rejected by gateway"),
                CheckoutOutcome::Failed { message } if message.is_empty() => {
                    output.warn("Checkout failed")
                }
                CheckoutOutcome::Failed { message } => {
                    output.warn(&format!("Checkout failed: {}", message))
                }
                CheckoutOutcome::AlreadyInFlight => output.info("Checkout already in flight"),
            }
        }
    }
}

fn print_report(report: &Report, output: &Output) {
    if output.is_json() {
        output.json(report);
        return;
    }

    output.header("Cart");
    if report.cart.items.is_empty() {
        output.info("(empty)");
    }
    for (product, quantity) in &report.cart.items {
        output.kv(product.as_str(), &quantity.to_string());
    }

    output.header("Summary");
    output.kv("checkout", &phase_badge(report.cart.checkout_state));
    if !report.cart.error_message.is_empty() {
        output.kv("error", &report.cart.error_message);
    }
    output.kv("items", &report.item_count.to_string());
    match (&report.total_price, &report.total_error) {
        (Some(price), _) => output.kv("total", price),
        (None, Some(error)) => output.warn(&format!("Total unavailable: {}", error)),
        (None, None) => {}
    }
}
