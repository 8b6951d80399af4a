//! Year-over-year monthly revenue

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::OrderRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    /// 1-12
    pub month: u32,
    /// Month name, e.g. "March"
    pub label: String,
    pub previous_year: Decimal,
    pub current_year: Decimal,
}

/// Revenue per calendar month for two consecutive years
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueComparison {
    pub current_year: i32,
    pub previous_year: i32,
    /// Always twelve entries, January first
    pub months: Vec<MonthlyRevenue>,
}

/// Sum `order_total` per month of `current_year` and the year before
///
/// All statuses count. Orders from other years, or without a usable date or
/// total, are left out, as is a total that would overflow its month's sum.
pub fn revenue_comparison(orders: &[OrderRecord], tz: Tz, current_year: i32) -> RevenueComparison {
    let previous_year = current_year - 1;
    let mut months: Vec<MonthlyRevenue> = (1..=12)
        .map(|month| MonthlyRevenue {
            month,
            label: NaiveDate::from_ymd_opt(current_year, month, 1)
                .map(|d| d.format("%B").to_string())
                .unwrap_or_default(),
            previous_year: Decimal::ZERO,
            current_year: Decimal::ZERO,
        })
        .collect();

    for order in orders {
        let (Some(at), Some(amount)) = (order.ordered_at(tz), order.order_total) else {
            continue;
        };
        let slot = &mut months[at.month0() as usize];
        let sum = if at.year() == current_year {
            &mut slot.current_year
        } else if at.year() == previous_year {
            &mut slot.previous_year
        } else {
            continue;
        };
        match sum.checked_add(amount) {
            Some(total) => *sum = total,
            None => tracing::warn!(
                order_id = %order.id,
                month = slot.month,
                "Skipping order total that overflows monthly revenue"
            ),
        }
    }

    RevenueComparison {
        current_year,
        previous_year,
        months,
    }
}
