//! Dashboard - every derived view of the order set, memoized on the store revision

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use shared::OrderRecord;

use crate::aggregate::{
    self, CustomerGroup, ProductTotal, RevenueComparison, SalesSeries, StatusPartition,
    TOP_SELLER_LIMIT,
};
use crate::store::OrderStore;

/// Parameters the derived views depend on besides the orders
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    /// Zone used to assign orders to calendar months
    pub timezone: Tz,
    pub top_sellers_limit: usize,
    /// "Current" year of the revenue comparison; `None` follows the clock
    pub current_year: Option<i32>,
}

impl DashboardOptions {
    /// Options for `timezone`, with the revenue year following the clock
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            top_sellers_limit: TOP_SELLER_LIMIT,
            current_year: None,
        }
    }

    pub fn with_top_sellers_limit(mut self, limit: usize) -> Self {
        self.top_sellers_limit = limit;
        self
    }

    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    /// Revenue year as of `now`, read in the dashboard zone unless pinned
    pub fn year_at(&self, now: DateTime<Utc>) -> i32 {
        self.current_year
            .unwrap_or_else(|| now.with_timezone(&self.timezone).year())
    }

    /// Copy with the revenue year fixed as of `now`
    pub fn pinned_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            current_year: Some(self.year_at(now)),
            ..self.clone()
        }
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_orders: usize,
    pub partition: StatusPartition,
    pub completed: Vec<OrderRecord>,
    pub pending_groups: Vec<CustomerGroup>,
    pub monthly_sales: SalesSeries,
    pub top_sellers: Vec<ProductTotal>,
    pub revenue: RevenueComparison,
}

impl Dashboard {
    pub fn compute(orders: &[OrderRecord], options: &DashboardOptions) -> Self {
        Self {
            total_orders: orders.len(),
            partition: aggregate::partition(orders),
            completed: aggregate::completed_orders(orders)
                .into_iter()
                .cloned()
                .collect(),
            pending_groups: aggregate::group_pending_by_customer(orders),
            monthly_sales: aggregate::monthly_sales_series(orders, options.timezone),
            top_sellers: aggregate::top_sellers(orders, options.top_sellers_limit),
            revenue: aggregate::revenue_comparison(
                orders,
                options.timezone,
                options.year_at(Utc::now()),
            ),
        }
    }
}

/// Last computed dashboard and the store revision it was computed from
#[derive(Debug, Default)]
pub struct DashboardCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    revision: u64,
    options: DashboardOptions,
    dashboard: Arc<Dashboard>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dashboard if the store has not changed since, else recompute
    pub fn get_or_compute(&mut self, store: &OrderStore, options: &DashboardOptions) -> Arc<Dashboard> {
        self.get_or_compute_at(store, options, Utc::now())
    }

    /// As [`Self::get_or_compute`], with the revenue year resolved as of `now`
    ///
    /// A year rollover invalidates the cached entry even when the store is
    /// unchanged.
    pub fn get_or_compute_at(
        &mut self,
        store: &OrderStore,
        options: &DashboardOptions,
        now: DateTime<Utc>,
    ) -> Arc<Dashboard> {
        let options = options.pinned_at(now);
        if let Some(entry) = &self.entry
            && entry.revision == store.revision()
            && entry.options == options
        {
            return entry.dashboard.clone();
        }

        let dashboard = Arc::new(Dashboard::compute(store.all(), &options));
        tracing::debug!(
            revision = store.revision(),
            orders = dashboard.total_orders,
            "Dashboard recomputed"
        );
        self.entry = Some(CacheEntry {
            revision: store.revision(),
            options,
            dashboard: dashboard.clone(),
        });
        dashboard
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::OrderStatus;

    fn options() -> DashboardOptions {
        DashboardOptions::default().with_current_year(2024)
    }

    fn store() -> OrderStore {
        let mut store = OrderStore::new();
        store.load(vec![
            OrderRecord::new("1", "Alice", "Lamp", OrderStatus::Pending)
                .with_quantity(1)
                .with_total(rust_decimal::Decimal::new(10, 0))
                .with_order_date("2024-01-05T00:00:00Z"),
            OrderRecord::new("2", "Bob", "Desk", OrderStatus::Completed)
                .with_quantity(2)
                .with_total(rust_decimal::Decimal::new(30, 0))
                .with_order_date("2024-02-05T00:00:00Z"),
        ]);
        store
    }

    #[test]
    fn test_compute_bundles_all_views() {
        let store = store();
        let dashboard = Dashboard::compute(store.all(), &options());
        assert_eq!(dashboard.total_orders, 2);
        assert_eq!(dashboard.partition.pending_count, 1);
        assert_eq!(dashboard.completed.len(), 1);
        assert_eq!(dashboard.pending_groups[0].customer_name, "Alice");
        assert_eq!(dashboard.monthly_sales.products, vec!["Desk"]);
        assert_eq!(dashboard.top_sellers[0].product_name, "Desk");
        assert_eq!(dashboard.revenue.months[0].current_year, rust_decimal::Decimal::new(10, 0));
    }

    #[test]
    fn test_cache_hits_until_store_changes() {
        let mut store = store();
        let mut cache = DashboardCache::new();

        let first = cache.get_or_compute(&store, &options());
        let again = cache.get_or_compute(&store, &options());
        assert!(Arc::ptr_eq(&first, &again));

        store.set_status_optimistic("1", OrderStatus::Completed);
        let after = cache.get_or_compute(&store, &options());
        assert!(!Arc::ptr_eq(&first, &after));
        assert_eq!(after.partition.completed_count, 2);
        assert!(after.pending_groups.is_empty());
    }

    #[test]
    fn test_cache_misses_on_option_change() {
        let store = store();
        let mut cache = DashboardCache::new();
        let first = cache.get_or_compute(&store, &options());
        let narrow = cache.get_or_compute(&store, &options().with_top_sellers_limit(1));
        assert!(!Arc::ptr_eq(&first, &narrow));
        assert_eq!(narrow.top_sellers.len(), 1);

        cache.invalidate();
        let fresh = cache.get_or_compute(&store, &options().with_top_sellers_limit(1));
        assert!(!Arc::ptr_eq(&narrow, &fresh));
        assert_eq!(*narrow, *fresh);
    }

    #[test]
    fn test_revenue_year_follows_clock_across_new_year() {
        let store = store();
        let mut cache = DashboardCache::new();
        let unpinned = DashboardOptions::default();
        let before = "2024-12-31T23:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let after = "2025-01-01T00:30:00Z".parse::<DateTime<Utc>>().unwrap();

        let old_year = cache.get_or_compute_at(&store, &unpinned, before);
        assert_eq!(old_year.revenue.current_year, 2024);
        assert!(Arc::ptr_eq(
            &old_year,
            &cache.get_or_compute_at(&store, &unpinned, before)
        ));

        let new_year = cache.get_or_compute_at(&store, &unpinned, after);
        assert_eq!(new_year.revenue.current_year, 2025);
        assert_eq!(new_year.revenue.previous_year, 2024);
        assert_eq!(new_year.revenue.months[0].previous_year, rust_decimal::Decimal::new(10, 0));
    }

    #[test]
    fn test_year_is_read_in_dashboard_zone() {
        let now = "2024-12-31T23:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let helsinki = DashboardOptions::new(chrono_tz::Europe::Helsinki);
        assert_eq!(helsinki.year_at(now), 2025);
        assert_eq!(helsinki.with_current_year(2020).year_at(now), 2020);
    }
}
