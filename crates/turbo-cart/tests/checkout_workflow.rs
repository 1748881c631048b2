//! End-to-end checkout workflow tests through the shared store handle.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use turbo_cart::prelude::*;

fn pid(id: &str) -> ProductId {
    ProductId::new(id)
}

fn sample_catalog(p2_price: &str) -> InMemoryCatalog {
    [
        ProductRecord::new("p1", "Mug", Money::parse("3.00").unwrap()),
        ProductRecord::new("p2", "Tea", Money::parse(p2_price).unwrap()),
    ]
    .into_iter()
    .collect()
}

/// Store holding `{p1: 2, p2: 1}`.
fn sample_store() -> CartStore {
    let store = CartStore::new();
    store.add_to_cart(&pid("p1"));
    store.add_to_cart(&pid("p1"));
    store.add_to_cart(&pid("p2"));
    store
}

/// Answers every request with the same result and records the payloads.
struct ScriptedGateway {
    result: Result<CheckoutResponse, GatewayError>,
    seen: Mutex<Vec<CheckoutRequest>>,
}

impl ScriptedGateway {
    fn new(result: Result<CheckoutResponse, GatewayError>) -> Self {
        Self {
            result,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<CheckoutRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutGateway for ScriptedGateway {
    async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse, GatewayError> {
        self.seen.lock().unwrap().push(request.clone());
        self.result.clone()
    }
}

/// Blocks until the test releases it.
struct PausedGateway {
    release: Mutex<Option<oneshot::Receiver<Result<CheckoutResponse, GatewayError>>>>,
    calls: Mutex<u32>,
}

impl PausedGateway {
    fn new() -> (Self, oneshot::Sender<Result<CheckoutResponse, GatewayError>>) {
        let (tx, rx) = oneshot::channel();
        let gateway = Self {
            release: Mutex::new(Some(rx)),
            calls: Mutex::new(0),
        };
        (gateway, tx)
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CheckoutGateway for PausedGateway {
    async fn checkout(&self, _request: &CheckoutRequest) -> Result<CheckoutResponse, GatewayError> {
        *self.calls.lock().unwrap() += 1;
        let release = self.release.lock().unwrap().take();
        match release {
            Some(rx) => rx.await.unwrap_or(Err(GatewayError::Unavailable)),
            None => Err(GatewayError::Unavailable),
        }
    }
}

#[tokio::test]
async fn checkout_success_clears_cart() {
    let store = sample_store();
    let gateway = ScriptedGateway::new(Ok(CheckoutResponse::accepted()));

    let outcome = store.request_checkout(&gateway).await;

    assert_eq!(outcome, CheckoutOutcome::Completed);
    let snapshot = store.snapshot();
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.checkout_state, CheckoutPhase::Ready);
    assert_eq!(store.item_count(), 0);

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].to_json().unwrap(), r#"{"p1":2,"p2":1}"#);
}

#[tokio::test]
async fn checkout_rejection_keeps_cart() {
    let store = sample_store();
    let before = store.snapshot().items;
    let gateway = ScriptedGateway::new(Ok(CheckoutResponse::rejected()));

    let outcome = store.request_checkout(&gateway).await;

    assert_eq!(outcome, CheckoutOutcome::Rejected);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.items, before);
    assert_eq!(snapshot.checkout_state, CheckoutPhase::Error);
    assert_eq!(snapshot.error_message, "");
    assert_eq!(
        store.checkout_status(),
        CheckoutStatus::Failed(CheckoutFailure::Rejected)
    );
}

#[tokio::test]
async fn transport_failure_keeps_cart_and_reports_message() {
    let store = sample_store();
    let gateway = ScriptedGateway::new(Err(GatewayError::Http { status: 502 }));

    let outcome = store.request_checkout(&gateway).await;

    assert_eq!(
        outcome,
        CheckoutOutcome::Failed {
            message: "HTTP error: 502".into()
        }
    );
    assert_eq!(store.quantity(&pid("p1")), 2);
    assert_eq!(store.quantity(&pid("p2")), 1);
    assert_eq!(store.checkout_phase(), CheckoutPhase::Error);
    assert_eq!(store.error_message(), "HTTP error: 502");

    // The cart stays editable after a failure.
    store.update_quantity(&pid("p2"), 4);
    assert_eq!(store.item_count(), 6);
}

#[tokio::test]
async fn edits_while_loading_apply_immediately_and_are_cleared_on_success() {
    let store = sample_store();
    let (gateway, release) = PausedGateway::new();

    let checkout = store.request_checkout(&gateway);
    let shopper = async {
        // `join!` polls the checkout first, so it is already waiting on the gateway.
        assert_eq!(store.checkout_phase(), CheckoutPhase::Loading);
        assert_eq!(store.error_message(), "");

        store.add_to_cart(&pid("p3"));
        assert_eq!(store.quantity(&pid("p3")), 1);
        assert_eq!(store.item_count(), 4);

        // A second request is not sent while one is loading.
        let second = store.request_checkout(&gateway).await;
        assert_eq!(second, CheckoutOutcome::AlreadyInFlight);

        release.send(Ok(CheckoutResponse::accepted())).unwrap();
    };

    let (outcome, ()) = futures::join!(checkout, shopper);

    assert_eq!(outcome, CheckoutOutcome::Completed);
    assert_eq!(gateway.calls(), 1);
    // Resolution acts on the whole cart, including the line added mid-flight.
    assert!(store.snapshot().items.is_empty());
    assert_eq!(store.checkout_phase(), CheckoutPhase::Ready);
}

#[tokio::test]
async fn in_flight_request_carries_captured_payload() {
    let store = sample_store();
    let (gateway, release) = PausedGateway::new();

    let checkout = store.request_checkout(&gateway);
    let shopper = async {
        store.remove_from_cart(&pid("p1"));
        match store.checkout_status() {
            CheckoutStatus::InFlight { request } => {
                assert_eq!(request.items.get(&pid("p1")), Some(&2));
            }
            other => panic!("expected in-flight status, got {:?}", other),
        }
        release.send(Ok(CheckoutResponse::rejected())).unwrap();
    };

    let (outcome, ()) = futures::join!(checkout, shopper);

    assert_eq!(outcome, CheckoutOutcome::Rejected);
    // Rejection keeps the live items, not the captured payload.
    assert_eq!(store.quantity(&pid("p1")), 0);
    assert_eq!(store.quantity(&pid("p2")), 1);
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_fails_checkout() {
    struct NeverGateway;

    #[async_trait]
    impl CheckoutGateway for NeverGateway {
        async fn checkout(&self, _request: &CheckoutRequest) -> Result<CheckoutResponse, GatewayError> {
            std::future::pending().await
        }
    }

    let config = StoreConfig::from_toml_str("[checkout]\ntimeout_ms = 1500\n").unwrap();
    let store = CartStore::with_config(&config);
    store.add_to_cart(&pid("p1"));

    let outcome = store.request_checkout(&NeverGateway).await;

    assert_eq!(
        outcome,
        CheckoutOutcome::Failed {
            message: "checkout timed out after 1.5s".into()
        }
    );
    assert_eq!(store.checkout_phase(), CheckoutPhase::Error);
    assert_eq!(store.quantity(&pid("p1")), 1);
}

#[tokio::test(start_paused = true)]
async fn dropped_checkout_fails_attempt_and_allows_retry() {
    struct NeverGateway;

    #[async_trait]
    impl CheckoutGateway for NeverGateway {
        async fn checkout(&self, _request: &CheckoutRequest) -> Result<CheckoutResponse, GatewayError> {
            std::future::pending().await
        }
    }

    let store = CartStore::new();
    store.add_to_cart(&pid("p1"));

    // No store timeout; the caller gives up instead.
    let waited =
        tokio::time::timeout(Duration::from_secs(1), store.request_checkout(&NeverGateway)).await;
    assert!(waited.is_err());

    assert_eq!(store.checkout_phase(), CheckoutPhase::Error);
    assert_eq!(store.error_message(), "checkout abandoned");
    assert_eq!(store.quantity(&pid("p1")), 1);

    let gateway = ScriptedGateway::new(Ok(CheckoutResponse::accepted()));
    assert_eq!(store.request_checkout(&gateway).await, CheckoutOutcome::Completed);
    assert_eq!(store.checkout_phase(), CheckoutPhase::Ready);
    assert_eq!(store.item_count(), 0);
}

#[test]
fn total_price_scenario() {
    let store = sample_store();
    let catalog = sample_catalog("5.25");

    assert_eq!(store.total_price(&catalog).unwrap(), "11.25");
    assert_eq!(store.item_count(), 3);
}

#[test]
fn total_price_is_memoized_until_inputs_change() {
    let store = sample_store();
    let mut catalog = sample_catalog("5.00");

    assert_eq!(store.total_price(&catalog).unwrap(), "11.00");
    assert_eq!(store.total_price(&catalog).unwrap(), "11.00");
    assert_eq!(store.view_stats().total_recomputations, 1);

    store.update_quantity(&pid("p2"), 2);
    assert_eq!(store.total_price(&catalog).unwrap(), "16.00");
    assert_eq!(store.view_stats().total_recomputations, 2);

    catalog.insert(ProductRecord::new("p2", "Tea", Money::from_cents(525)));
    assert_eq!(store.total_price(&catalog).unwrap(), "16.50");
    assert_eq!(store.view_stats().total_recomputations, 3);

    // Reads never mutate.
    store.snapshot();
    store.item_count();
    assert_eq!(store.total_price(&catalog).unwrap(), "16.50");
    assert_eq!(store.view_stats().total_recomputations, 3);
}

#[test]
fn missing_catalog_entry_fails_total_without_touching_cart() {
    let store = sample_store();
    store.add_to_cart(&pid("discontinued"));
    let catalog = sample_catalog("5.25");

    assert_eq!(
        store.total_price(&catalog),
        Err(CartError::ProductNotFound(pid("discontinued")))
    );
    assert_eq!(store.item_count(), 4);

    store.remove_from_cart(&pid("discontinued"));
    assert_eq!(store.total_price(&catalog).unwrap(), "11.25");
}
