//! Monthly sales series: quantity sold per product per calendar month

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;
use shared::OrderRecord;

/// Calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: &impl Datelike) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Display label, e.g. "January 2024"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }
}

/// One row of the chart: quantities aligned with [`SalesSeries::products`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub month: YearMonth,
    pub label: String,
    pub quantities: Vec<u64>,
}

/// Dense month x product matrix of completed-order quantities
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SalesSeries {
    /// One series line per product, first-seen order
    pub products: Vec<String>,
    /// Chronological, only months that have data
    pub rows: Vec<MonthRow>,
    /// Completed orders left out for an unusable date or quantity
    pub skipped: usize,
}

impl SalesSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup; `None` only when the month or product is not in the series
    pub fn quantity(&self, month: YearMonth, product: &str) -> Option<u64> {
        let column = self.products.iter().position(|p| p == product)?;
        self.rows
            .iter()
            .find(|row| row.month == month)
            .map(|row| row.quantities[column])
    }
}

/// Sum completed quantities by (month, product)
///
/// Months come from `order_date`, falling back to `order_updated_at`, read in
/// `tz`. Every product gets a value in every month row, zero if it sold
/// nothing that month.
pub fn monthly_sales_series(orders: &[OrderRecord], tz: Tz) -> SalesSeries {
    let mut products: Vec<String> = Vec::new();
    let mut columns: HashMap<&str, usize> = HashMap::new();
    let mut cells: BTreeMap<YearMonth, HashMap<usize, u64>> = BTreeMap::new();
    let mut skipped = 0usize;

    for order in orders.iter().filter(|o| o.status.is_completed()) {
        let Some(at) = order.ordered_at(tz) else {
            tracing::debug!(
                order_id = %order.id,
                date = ?order.effective_date(),
                "Skipping order with unusable date in monthly series"
            );
            skipped += 1;
            continue;
        };
        let Some(quantity) = order.quantity else {
            tracing::debug!(
                order_id = %order.id,
                "Skipping order without quantity in monthly series"
            );
            skipped += 1;
            continue;
        };

        let column = *columns
            .entry(order.product_name.as_str())
            .or_insert_with(|| {
                products.push(order.product_name.clone());
                products.len() - 1
            });

        *cells
            .entry(YearMonth::of(&at))
            .or_default()
            .entry(column)
            .or_insert(0) += u64::from(quantity);
    }

    let rows = cells
        .into_iter()
        .map(|(month, sums)| MonthRow {
            month,
            label: month.label(),
            quantities: (0..products.len())
                .map(|column| sums.get(&column).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    if skipped > 0 {
        tracing::warn!(skipped, "Monthly sales series skipped malformed orders");
    }

    SalesSeries {
        products,
        rows,
        skipped,
    }
}
