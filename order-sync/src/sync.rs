//! OrderStatusSync - optimistic status changes against the backend
//!
//! # Flow
//!
//! ```text
//! toggle(id, status)
//!     ├─ 1. Readiness check (no token -> NotReady, nothing applied)
//!     ├─ 2. begin: store.set_status_optimistic, previous status captured
//!     ├─ 3. await backend.update_status (no lock held)
//!     └─ 4. settle
//!         ├─ newest request for id, Ok   -> Confirmed
//!         ├─ newest request for id, Err  -> RolledBack (store.revert)
//!         └─ older request for id        -> Superseded (ignored)
//! ```
//!
//! Requests for one id form a chain while any of them is in flight. The
//! chain tracks the last status the server is known to hold, which is what a
//! failed newest request rolls back to. A request is attempted exactly once.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use shared::{OrderRecord, OrderStatus};
use storefront_client::ClientResult;

use crate::backend::OrderBackend;
use crate::error::{SyncError, SyncResult};
use crate::store::SharedOrderStore;

/// Terminal outcome of a request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The optimistic value is now authoritative
    Confirmed,
    /// A newer request for the same order started first; this response was
    /// not applied
    Superseded,
}

/// A change in the `Applying` state, returned by [`OrderStatusSync::begin`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    id: String,
    ticket: u64,
    requested: OrderStatus,
    previous: OrderStatus,
}

impl PendingChange {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn requested(&self) -> &OrderStatus {
        &self.requested
    }

    /// Status the record had right before this change was applied
    pub fn previous(&self) -> &OrderStatus {
        &self.previous
    }
}

#[derive(Debug)]
struct Chain {
    first_ticket: u64,
    latest: u64,
    outstanding: usize,
    /// Last status the server is known to hold
    server_status: OrderStatus,
    server_ticket: u64,
    /// The newest request failed and was rolled back
    rolled_back: bool,
}

pub struct OrderStatusSync<B: ?Sized> {
    store: SharedOrderStore,
    backend: Arc<B>,
    chains: Mutex<HashMap<String, Chain>>,
    next_ticket: AtomicU64,
}

impl<B: ?Sized> std::fmt::Debug for OrderStatusSync<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStatusSync")
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl<B: OrderBackend + ?Sized> OrderStatusSync<B> {
    /// Apply `status` optimistically, send it, then confirm or roll back
    pub async fn toggle(&self, id: &str, status: OrderStatus) -> SyncResult<SyncOutcome> {
        if !self.backend.is_ready() {
            tracing::debug!(order_id = %id, "Status change refused, backend not ready");
            return Err(SyncError::NotReady);
        }

        let change = self.begin(id, status)?;
        let result = self
            .backend
            .update_status(&change.id, &change.requested)
            .await;
        self.settle(change, result)
    }
}

impl<B: ?Sized> OrderStatusSync<B> {
    pub fn new(store: SharedOrderStore, backend: Arc<B>) -> Self {
        Self {
            store,
            backend,
            chains: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &SharedOrderStore {
        &self.store
    }

    /// Idle -> Applying: apply the new status locally
    pub fn begin(&self, id: &str, status: OrderStatus) -> SyncResult<PendingChange> {
        // Lock order: store, then chains
        let mut store = self.store.write();
        let previous = store
            .set_status_optimistic(id, status.clone())
            .ok_or_else(|| SyncError::UnknownOrder(id.to_string()))?;
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);

        let mut chains = self.chains.lock();
        let chain = chains.entry(id.to_string()).or_insert_with(|| Chain {
            first_ticket: ticket,
            latest: ticket,
            outstanding: 0,
            server_status: previous.clone(),
            server_ticket: 0,
            rolled_back: false,
        });
        if chain.outstanding > 0 {
            tracing::debug!(
                order_id = %id,
                superseded = chain.latest,
                ticket,
                "Superseding in-flight status change"
            );
        }
        chain.latest = ticket;
        chain.outstanding += 1;
        chain.rolled_back = false;

        tracing::info!(
            order_id = %id,
            from = %previous,
            to = %status,
            ticket,
            "Status applied optimistically"
        );

        Ok(PendingChange {
            id: id.to_string(),
            ticket,
            requested: status,
            previous,
        })
    }

    /// Applying -> Confirmed | RolledBack, or ignored when superseded
    pub fn settle(
        &self,
        change: PendingChange,
        result: ClientResult<()>,
    ) -> SyncResult<SyncOutcome> {
        let mut store = self.store.write();
        let mut chains = self.chains.lock();

        // Responses from before the last reset belong to a discarded order set
        let Some(chain) = chains
            .get_mut(&change.id)
            .filter(|chain| change.ticket >= chain.first_ticket)
        else {
            tracing::debug!(
                order_id = %change.id,
                ticket = change.ticket,
                "Response for discarded order set ignored"
            );
            return Ok(SyncOutcome::Superseded);
        };

        chain.outstanding = chain.outstanding.saturating_sub(1);
        let is_latest = change.ticket == chain.latest;

        let outcome = match result {
            Ok(()) => {
                if change.ticket > chain.server_ticket {
                    chain.server_status = change.requested.clone();
                    chain.server_ticket = change.ticket;
                }

                if is_latest {
                    tracing::info!(
                        order_id = %change.id,
                        status = %change.requested,
                        "Status change confirmed"
                    );
                    Ok(SyncOutcome::Confirmed)
                } else if chain.rolled_back && change.ticket == chain.server_ticket {
                    // Nothing optimistic left to protect, the server holds this value
                    store.revert(&change.id, change.requested.clone());
                    tracing::info!(
                        order_id = %change.id,
                        status = %change.requested,
                        "Late confirmation applied after rollback"
                    );
                    Ok(SyncOutcome::Superseded)
                } else {
                    tracing::debug!(
                        order_id = %change.id,
                        ticket = change.ticket,
                        "Superseded status change confirmed, ignored"
                    );
                    Ok(SyncOutcome::Superseded)
                }
            }
            Err(source) if is_latest => {
                let restored = chain.server_status.clone();
                store.revert(&change.id, restored.clone());
                chain.rolled_back = true;
                tracing::warn!(
                    order_id = %change.id,
                    requested = %change.requested,
                    restored = %restored,
                    error = %source,
                    "Status change failed, rolled back"
                );
                Err(SyncError::StatusUpdateFailed {
                    id: change.id.clone(),
                    restored,
                    source,
                })
            }
            Err(source) => {
                tracing::debug!(
                    order_id = %change.id,
                    ticket = change.ticket,
                    error = %source,
                    "Superseded status change failed, ignored"
                );
                Ok(SyncOutcome::Superseded)
            }
        };

        if chain.outstanding == 0 {
            chains.remove(&change.id);
        }
        outcome
    }

    /// Whether a change for `id` is in the `Applying` state
    pub fn is_applying(&self, id: &str) -> bool {
        self.chains.lock().contains_key(id)
    }

    /// Number of orders with a change in flight
    pub fn in_flight(&self) -> usize {
        self.chains.lock().len()
    }

    /// Swap in a fresh order set and forget every chain
    ///
    /// Both happen under one store guard, so a response for the old set can
    /// never land on the new one. Returns the number of records held.
    pub fn replace_orders(&self, records: Vec<OrderRecord>) -> usize {
        let mut store = self.store.write();
        let count = store.load(records);
        self.reset();
        count
    }

    /// Forget all chains; responses still in flight will be ignored
    ///
    /// Called when the order set is replaced.
    pub fn reset(&self) {
        let mut chains = self.chains.lock();
        if !chains.is_empty() {
            tracing::debug!(
                pending = chains.len(),
                "Dropping in-flight status changes for replaced order set"
            );
        }
        chains.clear();
    }
}
