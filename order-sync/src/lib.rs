//! Order state synchronization and dashboard aggregation
//!
//! - [`OrderStore`]: the order set of one view session, single owner of all
//!   status mutation
//! - [`OrderStatusSync`]: optimistic status changes confirmed or rolled back
//!   against the backend, newest request per order wins
//! - [`aggregate`]: pure derivations (status partition, pending orders by
//!   customer, monthly sales matrix, top sellers, revenue comparison)
//! - [`Dashboard`]: all aggregates, memoized on the store revision
//! - [`view_state`]: expand/collapse and image carousel state
//! - [`OrderSession`]: wires the above to an [`OrderBackend`]

pub mod aggregate;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logger;
pub mod session;
pub mod store;
pub mod sync;
pub mod view_state;

pub use backend::OrderBackend;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardCache, DashboardOptions};
pub use error::{SyncError, SyncResult};
pub use session::{LoadState, OrderSession};
pub use store::{OrderStore, SharedOrderStore};
pub use sync::{OrderStatusSync, PendingChange, SyncOutcome};
pub use view_state::{ExpandState, GroupView, ImageCarousel, OrderListView};

pub use shared::{OrderRecord, OrderStatus};
