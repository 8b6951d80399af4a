//! OrderStore - the order set of one view session
//!
//! Readers always see the latest locally-applied state, optimistic or
//! confirmed. Status mutation is crate-private: only [`crate::OrderStatusSync`]
//! applies and reverts statuses.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared::{OrderRecord, OrderStatus};

/// Store handle shared between the session, the sync engine and readers
pub type SharedOrderStore = Arc<RwLock<OrderStore>>;

#[derive(Debug, Default)]
pub struct OrderStore {
    records: Vec<OrderRecord>,
    /// id -> position in `records`
    index: HashMap<String, usize>,
    /// Bumped by every change; derived views are cached against it
    revision: u64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedOrderStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Replace the whole collection
    ///
    /// A repeated id keeps the position of its first occurrence and the
    /// content of its last one. Returns the number of records held.
    pub fn load(&mut self, records: Vec<OrderRecord>) -> usize {
        let mut kept: Vec<OrderRecord> = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        let mut duplicates = 0usize;

        for record in records {
            match index.get(&record.id) {
                Some(&pos) => {
                    duplicates += 1;
                    kept[pos] = record;
                }
                None => {
                    index.insert(record.id.clone(), kept.len());
                    kept.push(record);
                }
            }
        }

        if duplicates > 0 {
            tracing::warn!(duplicates, "Duplicate order ids in fetch, kept last copy");
        }

        self.records = kept;
        self.index = index;
        self.revision += 1;
        tracing::debug!(
            count = self.records.len(),
            revision = self.revision,
            "Order set loaded"
        );
        self.records.len()
    }

    /// Drop every record (failed fetch, session end)
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.revision += 1;
    }

    pub fn all(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&OrderRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn status_of(&self, id: &str) -> Option<&OrderStatus> {
        self.get(id).map(|r| &r.status)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply `new_status` in place and hand back the value it replaced
    ///
    /// `None` (and no change) when the id is unknown.
    pub(crate) fn set_status_optimistic(
        &mut self,
        id: &str,
        new_status: OrderStatus,
    ) -> Option<OrderStatus> {
        let pos = *self.index.get(id)?;
        let previous = std::mem::replace(&mut self.records[pos].status, new_status);
        self.revision += 1;
        Some(previous)
    }

    /// Restore a status captured earlier; `false` when the id is gone
    pub(crate) fn revert(&mut self, id: &str, previous: OrderStatus) -> bool {
        let Some(&pos) = self.index.get(id) else {
            return false;
        };
        self.records[pos].status = previous;
        self.revision += 1;
        true
    }
}
