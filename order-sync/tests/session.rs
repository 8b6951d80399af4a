// order-sync/tests/session.rs
// End-to-end session tests against a backend whose responses are released by hand

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use order_sync::{
    DashboardOptions, LoadState, OrderBackend, OrderRecord, OrderSession, OrderStatus, SyncError,
    SyncOutcome,
};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use storefront_client::{ClientError, ClientResult};
use tokio::sync::oneshot;

struct Call {
    id: String,
    status: OrderStatus,
    reply: Option<oneshot::Sender<ClientResult<()>>>,
}

struct GatedBackend {
    ready: AtomicBool,
    /// `None` makes the fetch fail
    orders: Mutex<Option<Vec<OrderRecord>>>,
    calls: Mutex<Vec<Call>>,
}

impl GatedBackend {
    fn new(orders: Vec<OrderRecord>) -> Arc<Self> {
        Arc::new(Self {
            ready: AtomicBool::new(true),
            orders: Mutex::new(Some(orders)),
            calls: Mutex::new(Vec::new()),
        })
    }

    async fn wait_for_calls(&self, n: usize) {
        for _ in 0..400 {
            if self.calls.lock().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {} status calls", n);
    }

    fn resolve(&self, index: usize, result: ClientResult<()>) {
        let reply = self.calls.lock()[index]
            .reply
            .take()
            .expect("call already resolved");
        let _ = reply.send(result);
    }
}

#[async_trait]
impl OrderBackend for GatedBackend {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<OrderRecord>> {
        self.orders
            .lock()
            .clone()
            .ok_or_else(|| ClientError::Internal("database unavailable".into()))
    }

    async fn update_status(&self, id: &str, status: &OrderStatus) -> ClientResult<()> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(Call {
            id: id.to_string(),
            status: status.clone(),
            reply: Some(tx),
        });
        rx.await
            .unwrap_or_else(|_| Err(ClientError::Internal("dropped".into())))
    }
}

fn fixture() -> Vec<OrderRecord> {
    vec![
        OrderRecord::new("a", "Alice", "Lamp", OrderStatus::Pending)
            .with_unit_price(Decimal::new(20, 0))
            .with_quantity(2)
            .with_total(Decimal::new(40, 0))
            .with_order_date("2024-01-10T10:00:00Z"),
        OrderRecord::new("b", "Bob", "Desk", OrderStatus::Pending)
            .with_quantity(1)
            .with_total(Decimal::new(120, 0))
            .with_order_date("2024-02-11T10:00:00Z"),
        OrderRecord::new("c", "Alice", "Chair", OrderStatus::Completed)
            .with_quantity(4)
            .with_total(Decimal::new(80, 0))
            .with_order_date("2024-02-12T10:00:00Z"),
        OrderRecord::new("d", "Carol", "Lamp", OrderStatus::Cancelled)
            .with_quantity(1)
            .with_total(Decimal::new(20, 0))
            .with_order_date("2024-03-01T10:00:00Z"),
    ]
}

async fn loaded_session(backend: Arc<GatedBackend>) -> Arc<OrderSession<GatedBackend>> {
    let session = Arc::new(OrderSession::new(
        backend,
        DashboardOptions::default().with_current_year(2024),
    ));
    assert_eq!(session.refresh().await.unwrap(), 4);
    session
}

fn status(session: &OrderSession<GatedBackend>, id: &str) -> OrderStatus {
    session.store().read().status_of(id).cloned().unwrap()
}

#[tokio::test]
async fn test_refresh_and_dashboard() {
    let session = loaded_session(GatedBackend::new(fixture())).await;
    assert_eq!(session.load_state(), LoadState::Loaded { count: 4 });

    let dashboard = session.dashboard().unwrap();
    assert_eq!(dashboard.partition.completed_count, 1);
    // Cancelled counts as not completed
    assert_eq!(dashboard.partition.pending_count, 3);

    let groups: Vec<_> = dashboard
        .pending_groups
        .iter()
        .map(|g| g.customer_name.as_str())
        .collect();
    assert_eq!(groups, vec!["Alice", "Bob", "Carol"]);

    // Ranking spans every status
    assert_eq!(dashboard.top_sellers[0].product_name, "Desk");
    assert_eq!(dashboard.top_sellers[1].product_name, "Chair");
    assert_eq!(dashboard.top_sellers[2].total, Decimal::new(60, 0));

    // Series only has the completed chair sale
    assert_eq!(dashboard.monthly_sales.products, vec!["Chair"]);
    assert_eq!(dashboard.monthly_sales.rows.len(), 1);
    assert_eq!(dashboard.monthly_sales.rows[0].label, "February 2024");
}

#[tokio::test]
async fn test_fetch_failure_shows_no_data() {
    let backend = GatedBackend::new(fixture());
    let session = loaded_session(backend.clone()).await;

    *backend.orders.lock() = None;
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, SyncError::FetchFailed(_)));
    assert!(matches!(session.load_state(), LoadState::Failed { .. }));
    assert!(session.store().read().is_empty());
    assert!(matches!(session.dashboard(), Err(SyncError::LoadFailed(_))));
    assert!(session.order_list_view().is_err());
}

#[tokio::test]
async fn test_missing_token_defers_everything() {
    let backend = GatedBackend::new(fixture());
    backend.ready.store(false, Ordering::SeqCst);
    let session = OrderSession::new(backend.clone(), DashboardOptions::default());

    assert!(matches!(session.refresh().await, Err(SyncError::NotReady)));
    assert_eq!(session.load_state(), LoadState::Idle);
    assert!(matches!(session.dashboard(), Err(SyncError::NotLoaded)));

    backend.ready.store(true, Ordering::SeqCst);
    assert_eq!(session.refresh().await.unwrap(), 4);

    backend.ready.store(false, Ordering::SeqCst);
    let err = session.toggle_completed("a", true).await.unwrap_err();
    assert!(matches!(err, SyncError::NotReady));
    assert_eq!(status(&session, "a"), OrderStatus::Pending);
    assert!(backend.calls.lock().is_empty());
}

#[tokio::test]
async fn test_failed_toggle_rolls_back_and_dashboard_follows() {
    let backend = GatedBackend::new(fixture());
    let session = loaded_session(backend.clone()).await;

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_completed("b", true).await })
    };
    backend.wait_for_calls(1).await;

    // Optimistic value visible while the request is in flight
    assert_eq!(status(&session, "b"), OrderStatus::Completed);
    assert!(session.sync().is_applying("b"));
    let dashboard = session.dashboard().unwrap();
    assert_eq!(dashboard.partition.completed_count, 2);
    assert_eq!(dashboard.monthly_sales.products, vec!["Desk", "Chair"]);

    backend.resolve(0, Err(ClientError::Internal("rejected".into())));
    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(
        err,
        SyncError::StatusUpdateFailed { ref id, restored: OrderStatus::Pending, .. } if id == "b"
    ));

    assert_eq!(status(&session, "b"), OrderStatus::Pending);
    let dashboard = session.dashboard().unwrap();
    assert_eq!(dashboard.partition.completed_count, 1);
    assert_eq!(dashboard.monthly_sales.products, vec!["Chair"]);
}

#[tokio::test]
async fn test_out_of_order_responses_are_isolated_per_order() {
    let backend = GatedBackend::new(fixture());
    let session = loaded_session(backend.clone()).await;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_completed("a", true).await })
    };
    backend.wait_for_calls(1).await;
    let second = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_completed("b", true).await })
    };
    backend.wait_for_calls(2).await;

    // b resolves first, and fails
    backend.resolve(1, Err(ClientError::Timeout));
    assert!(second.await.unwrap().is_err());
    assert_eq!(status(&session, "a"), OrderStatus::Completed);
    assert_eq!(status(&session, "b"), OrderStatus::Pending);

    backend.resolve(0, Ok(()));
    assert_eq!(first.await.unwrap().unwrap(), SyncOutcome::Confirmed);
    assert_eq!(status(&session, "a"), OrderStatus::Completed);
    assert_eq!(session.sync().in_flight(), 0);
}

#[tokio::test]
async fn test_newer_toggle_supersedes_older() {
    let backend = GatedBackend::new(fixture());
    let session = loaded_session(backend.clone()).await;

    let check = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_completed("a", true).await })
    };
    backend.wait_for_calls(1).await;
    let uncheck = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_completed("a", false).await })
    };
    backend.wait_for_calls(2).await;

    {
        let calls = backend.calls.lock();
        assert_eq!(calls[0].id, "a");
        assert_eq!(calls[0].status, OrderStatus::Completed);
        assert_eq!(calls[1].status, OrderStatus::Pending);
    }

    backend.resolve(1, Ok(()));
    assert_eq!(uncheck.await.unwrap().unwrap(), SyncOutcome::Confirmed);

    // The older request's late failure must not clobber the newer state
    backend.resolve(0, Err(ClientError::Internal("late".into())));
    assert_eq!(check.await.unwrap().unwrap(), SyncOutcome::Superseded);
    assert_eq!(status(&session, "a"), OrderStatus::Pending);
}

#[tokio::test]
async fn test_refresh_discards_in_flight_changes() {
    let backend = GatedBackend::new(fixture());
    let session = loaded_session(backend.clone()).await;

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_completed("a", true).await })
    };
    backend.wait_for_calls(1).await;

    // The server snapshot now says Completed
    let mut fresh = fixture();
    fresh[0].status = OrderStatus::Completed;
    *backend.orders.lock() = Some(fresh);
    session.refresh().await.unwrap();

    backend.resolve(0, Err(ClientError::Internal("late".into())));
    assert_eq!(task.await.unwrap().unwrap(), SyncOutcome::Superseded);
    assert_eq!(status(&session, "a"), OrderStatus::Completed);
}

#[tokio::test]
async fn test_expand_state_through_order_list() {
    let backend = GatedBackend::new(fixture());
    let session = loaded_session(backend.clone()).await;

    assert!(session.toggle_group("Alice"));
    assert!(session.toggle_group("Bob"));
    let view = session.order_list_view().unwrap();
    let expanded: Vec<_> = view
        .groups
        .iter()
        .filter(|g| g.expanded)
        .map(|g| g.customer_name.as_str())
        .collect();
    assert_eq!(expanded, vec!["Bob"]);

    assert!(!session.toggle_group("Bob"));
    assert_eq!(session.expanded_group(), None);

    // Completing Bob's only order removes his group and its expansion
    session.toggle_group("Bob");
    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_completed("b", true).await })
    };
    backend.wait_for_calls(1).await;
    backend.resolve(0, Ok(()));
    task.await.unwrap().unwrap();

    let view = session.order_list_view().unwrap();
    assert!(view.groups.iter().all(|g| g.customer_name != "Bob"));
    assert!(view.expanded_group().is_none());
    assert_eq!(session.expanded_group(), None);
    assert_eq!(view.completed_count, 2);
}
