//! Presentation-local state
//!
//! Nothing here is persisted or sent to the backend.

use std::collections::HashMap;

use serde::Serialize;
use shared::OrderRecord;

use crate::dashboard::Dashboard;

/// Exclusive expand/collapse: at most one group open at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
    expanded: Option<String>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `key` (closing any other) or close it if already open
    ///
    /// Returns whether `key` is expanded afterwards.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.is_expanded(key) {
            self.expanded = None;
            false
        } else {
            self.expanded = Some(key.to_string());
            true
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.as_deref() == Some(key)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Collapse if the expanded key no longer passes `exists`
    pub fn retain(&mut self, exists: impl Fn(&str) -> bool) {
        if self.expanded.as_deref().is_some_and(|key| !exists(key)) {
            self.expanded = None;
        }
    }
}

/// Current image per product, wrapping at both ends
#[derive(Debug, Clone, Default)]
pub struct ImageCarousel {
    indices: HashMap<String, usize>,
}

impl ImageCarousel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shown index, or `None` when the product has no images
    ///
    /// An index left over from a longer image list falls back to the first
    /// image.
    pub fn current(&self, product_id: &str, image_count: usize) -> Option<usize> {
        if image_count == 0 {
            return None;
        }
        let index = self.indices.get(product_id).copied().unwrap_or(0);
        Some(if index < image_count { index } else { 0 })
    }

    pub fn next(&mut self, product_id: &str, image_count: usize) -> Option<usize> {
        let index = (self.current(product_id, image_count)? + 1) % image_count;
        self.indices.insert(product_id.to_string(), index);
        Some(index)
    }

    pub fn prev(&mut self, product_id: &str, image_count: usize) -> Option<usize> {
        let current = self.current(product_id, image_count)?;
        let index = if current == 0 { image_count - 1 } else { current - 1 };
        self.indices.insert(product_id.to_string(), index);
        Some(index)
    }

    /// Jump to `index`; out-of-range requests are ignored
    pub fn select(&mut self, product_id: &str, index: usize, image_count: usize) -> Option<usize> {
        if index >= image_count {
            return None;
        }
        self.indices.insert(product_id.to_string(), index);
        Some(index)
    }
}

/// One customer's pending orders with its expand flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub customer_name: String,
    pub expanded: bool,
    pub orders: Vec<OrderRecord>,
}

/// The order page: counts, completed list and pending groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderListView {
    pub total_orders: usize,
    pub pending_count: usize,
    pub completed_count: usize,
    pub completed: Vec<OrderRecord>,
    pub groups: Vec<GroupView>,
}

impl OrderListView {
    pub fn compose(dashboard: &Dashboard, expand: &ExpandState) -> Self {
        Self {
            total_orders: dashboard.total_orders,
            pending_count: dashboard.partition.pending_count,
            completed_count: dashboard.partition.completed_count,
            completed: dashboard.completed.clone(),
            groups: dashboard
                .pending_groups
                .iter()
                .map(|group| GroupView {
                    customer_name: group.customer_name.clone(),
                    expanded: expand.is_expanded(&group.customer_name),
                    orders: group.orders.clone(),
                })
                .collect(),
        }
    }

    pub fn expanded_group(&self) -> Option<&GroupView> {
        self.groups.iter().find(|g| g.expanded)
    }
}
