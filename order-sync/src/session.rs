//! OrderSession - one view session over the shop's orders
//!
//! Owns the store, the sync engine, the dashboard cache and the expand
//! state. Every component reads the same store; none keeps a second copy.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared::OrderStatus;
use storefront_client::HttpClient;

use crate::backend::OrderBackend;
use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardCache, DashboardOptions};
use crate::error::{SyncError, SyncResult};
use crate::store::{OrderStore, SharedOrderStore};
use crate::sync::{OrderStatusSync, SyncOutcome};
use crate::view_state::{ExpandState, OrderListView};

/// Bulk fetch state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded {
        count: usize,
    },
    /// No partial data is kept after a failed fetch
    Failed {
        message: String,
    },
}

pub struct OrderSession<B: ?Sized> {
    backend: Arc<B>,
    store: SharedOrderStore,
    sync: OrderStatusSync<B>,
    load_state: RwLock<LoadState>,
    cache: Mutex<DashboardCache>,
    expand: Mutex<ExpandState>,
    options: DashboardOptions,
}

impl<B: ?Sized> std::fmt::Debug for OrderSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSession")
            .field("load_state", &*self.load_state.read())
            .field("orders", &self.store.read().len())
            .field("sync", &self.sync)
            .finish()
    }
}

impl OrderSession<HttpClient> {
    /// Session backed by the HTTP client described by `config`
    pub fn connect(config: &Config) -> SyncResult<Self> {
        let client = config.client.build_http_client()?;
        Ok(Self::new(Arc::new(client), config.dashboard_options()))
    }
}

impl<B: OrderBackend + ?Sized> OrderSession<B> {
    pub fn new(backend: Arc<B>, options: DashboardOptions) -> Self {
        let store = OrderStore::shared();
        let sync = OrderStatusSync::new(store.clone(), backend.clone());
        Self {
            backend,
            store,
            sync,
            load_state: RwLock::new(LoadState::Idle),
            cache: Mutex::new(DashboardCache::new()),
            expand: Mutex::new(ExpandState::new()),
            options,
        }
    }

    pub fn store(&self) -> &SharedOrderStore {
        &self.store
    }

    pub fn sync(&self) -> &OrderStatusSync<B> {
        &self.sync
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state.read().clone()
    }

    /// Fetch the order set and replace the store wholesale
    ///
    /// Without a token nothing is requested and the state is left alone. On
    /// failure the store is emptied and the session enters `Failed`.
    pub async fn refresh(&self) -> SyncResult<usize> {
        if !self.backend.is_ready() {
            tracing::debug!("Order fetch deferred, backend not ready");
            return Err(SyncError::NotReady);
        }

        *self.load_state.write() = LoadState::Loading;

        match self.backend.fetch_orders().await {
            Ok(records) => {
                let count = self.sync.replace_orders(records);
                *self.load_state.write() = LoadState::Loaded { count };
                tracing::info!(count, "Orders loaded");
                Ok(count)
            }
            Err(e) => {
                self.sync.replace_orders(Vec::new());
                self.expand.lock().collapse();
                *self.load_state.write() = LoadState::Failed {
                    message: e.to_string(),
                };
                tracing::error!(error = %e, "Order fetch failed");
                Err(SyncError::FetchFailed(e))
            }
        }
    }

    /// "Mark as done" checkbox: checked -> Completed, unchecked -> Pending
    pub async fn toggle_completed(&self, id: &str, checked: bool) -> SyncResult<SyncOutcome> {
        self.set_status(id, OrderStatus::from_checked(checked)).await
    }

    pub async fn set_status(&self, id: &str, status: OrderStatus) -> SyncResult<SyncOutcome> {
        self.sync.toggle(id, status).await
    }

    /// All derived views for the current order set
    pub fn dashboard(&self) -> SyncResult<Arc<Dashboard>> {
        match &*self.load_state.read() {
            LoadState::Loaded { .. } => {}
            LoadState::Failed { message } => return Err(SyncError::LoadFailed(message.clone())),
            LoadState::Idle | LoadState::Loading => return Err(SyncError::NotLoaded),
        }

        let store = self.store.read();
        Ok(self.cache.lock().get_or_compute(&store, &self.options))
    }

    /// Expand or collapse a customer's pending orders; returns the new state
    pub fn toggle_group(&self, customer_name: &str) -> bool {
        self.expand.lock().toggle(customer_name)
    }

    pub fn expanded_group(&self) -> Option<String> {
        self.expand.lock().expanded().map(str::to_string)
    }

    /// The order page, with a vanished expanded group collapsed
    pub fn order_list_view(&self) -> SyncResult<OrderListView> {
        let dashboard = self.dashboard()?;
        let mut expand = self.expand.lock();
        expand.retain(|key| {
            dashboard
                .pending_groups
                .iter()
                .any(|g| g.customer_name == key)
        });
        Ok(OrderListView::compose(&dashboard, &expand))
    }
}
