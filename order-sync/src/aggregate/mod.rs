//! Dashboard aggregations
//!
//! Pure functions over an order slice. Every call recomputes from the full
//! set; a record with a malformed field is skipped only by the view that
//! needed that field.

pub mod grouping;
pub mod monthly;
pub mod partition;
pub mod ranking;
pub mod revenue;

pub use grouping::{CustomerGroup, group_pending_by_customer};
pub use monthly::{MonthRow, SalesSeries, YearMonth, monthly_sales_series};
pub use partition::{StatusPartition, completed_orders, partition, status_breakdown};
pub use ranking::{ProductTotal, TOP_SELLER_LIMIT, top_sellers};
pub use revenue::{MonthlyRevenue, RevenueComparison, revenue_comparison};
