//! Top sellers by accumulated order total

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::OrderRecord;

/// Length of the dashboard's top-seller list
pub const TOP_SELLER_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotal {
    pub product_name: String,
    pub total: Decimal,
}

/// Sum `order_total` per product over all orders, highest first
///
/// Every status counts, not only completed orders. Ties keep the order in
/// which products were first encountered. Orders without a usable total add
/// nothing, and neither does a total that would overflow the product's sum.
pub fn top_sellers(orders: &[OrderRecord], limit: usize) -> Vec<ProductTotal> {
    let mut totals: Vec<ProductTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for order in orders {
        let Some(amount) = order.order_total else {
            tracing::debug!(order_id = %order.id, "Skipping order without total in ranking");
            continue;
        };
        let pos = *positions
            .entry(order.product_name.as_str())
            .or_insert_with(|| {
                totals.push(ProductTotal {
                    product_name: order.product_name.clone(),
                    total: Decimal::ZERO,
                });
                totals.len() - 1
            });
        match totals[pos].total.checked_add(amount) {
            Some(sum) => totals[pos].total = sum,
            None => tracing::warn!(
                order_id = %order.id,
                product = %order.product_name,
                "Skipping order total that overflows product sum in ranking"
            ),
        }
    }

    // Stable: equal totals stay in encounter order
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals.truncate(limit);
    totals
}
