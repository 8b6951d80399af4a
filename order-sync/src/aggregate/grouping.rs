//! Pending orders grouped by customer

use std::collections::HashMap;

use serde::Serialize;
use shared::OrderRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerGroup {
    pub customer_name: String,
    pub orders: Vec<OrderRecord>,
}

/// Group not-completed orders by exact customer name
///
/// Groups appear in the order their first order was seen, and orders keep
/// their input order inside a group. Names are compared byte for byte.
pub fn group_pending_by_customer(orders: &[OrderRecord]) -> Vec<CustomerGroup> {
    let mut groups: Vec<CustomerGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for order in orders.iter().filter(|o| !o.status.is_completed()) {
        let pos = *positions
            .entry(order.customer_name.as_str())
            .or_insert_with(|| {
                groups.push(CustomerGroup {
                    customer_name: order.customer_name.clone(),
                    orders: Vec::new(),
                });
                groups.len() - 1
            });
        groups[pos].orders.push(order.clone());
    }

    groups
}
