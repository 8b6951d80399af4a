//! Completed vs. not-completed split

use serde::Serialize;
use shared::{OrderRecord, OrderStatus};

/// Order counts by completion
///
/// Anything that is not exactly `Completed` counts as pending, so a
/// `Cancelled` or `Shipped` order lands in `pending_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusPartition {
    pub pending_count: usize,
    pub completed_count: usize,
}

impl StatusPartition {
    pub fn total(&self) -> usize {
        self.pending_count + self.completed_count
    }
}

pub fn partition(orders: &[OrderRecord]) -> StatusPartition {
    let completed_count = orders.iter().filter(|o| o.status.is_completed()).count();
    StatusPartition {
        pending_count: orders.len() - completed_count,
        completed_count,
    }
}

/// Completed orders in input order
pub fn completed_orders(orders: &[OrderRecord]) -> Vec<&OrderRecord> {
    orders.iter().filter(|o| o.status.is_completed()).collect()
}

/// Count per distinct status value, in first-seen order
pub fn status_breakdown(orders: &[OrderRecord]) -> Vec<(OrderStatus, usize)> {
    let mut counts: Vec<(OrderStatus, usize)> = Vec::new();
    for order in orders {
        match counts.iter_mut().find(|(status, _)| *status == order.status) {
            Some((_, count)) => *count += 1,
            None => counts.push((order.status.clone(), 1)),
        }
    }
    counts
}
