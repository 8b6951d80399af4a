//! Order Model

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::{lenient_decimal, lenient_u32, parse_timestamp, string_or_number};

/// Order status as reported by the shop backend
///
/// The backend knows `Pending`, `Processing`, `Shipped`, `Cancelled` and
/// `Completed`. Anything else is kept verbatim in [`OrderStatus::Other`] so a
/// record never fails to load because of a new status value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Cancelled,
    Completed,
    Other(String),
}

impl OrderStatus {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Completed => "Completed",
            OrderStatus::Other(s) => s,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Status selected by the "mark as done" checkbox
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            OrderStatus::Completed
        } else {
            OrderStatus::Pending
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "Pending" => OrderStatus::Pending,
            "Processing" => OrderStatus::Processing,
            "Shipped" => OrderStatus::Shipped,
            "Cancelled" => OrderStatus::Cancelled,
            "Completed" => OrderStatus::Completed,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match OrderStatus::from(value.as_str()) {
            OrderStatus::Other(_) => OrderStatus::Other(value),
            known => known,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(OrderStatus::from)
    }
}

/// One order line as listed by `shops/order-list-view/`
///
/// Only `status` changes after the fetch. Numeric fields are parsed leniently:
/// a malformed value loads as `None` and the record stays in the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(rename = "order_status", default)]
    pub status: OrderStatus,
    /// Grouping key of the pending-order view (not unique per customer)
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub product_name: String,
    /// Unit price in currency unit
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub product_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub quantity: Option<u32>,
    /// Order total in currency unit, supplied by the backend as-is
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub order_total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_unit: Option<String>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub order_updated_at: Option<String>,
    /// Free-text product description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderRecord {
    /// Minimal record, mostly useful for fixtures
    pub fn new(
        id: impl Into<String>,
        customer_name: impl Into<String>,
        product_name: impl Into<String>,
        status: OrderStatus,
    ) -> Self {
        let id = id.into();
        Self {
            order_number: format!("ORD-{}", id),
            id,
            status,
            customer_name: customer_name.into(),
            customer_email: None,
            customer_phone: None,
            customer_address: None,
            shop_name: None,
            product_name: product_name.into(),
            product_price: None,
            quantity: None,
            order_total: None,
            currency_unit: None,
            order_date: None,
            order_updated_at: None,
            product_property: None,
            note: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_total(mut self, total: Decimal) -> Self {
        self.order_total = Some(total);
        self
    }

    pub fn with_unit_price(mut self, price: Decimal) -> Self {
        self.product_price = Some(price);
        self
    }

    pub fn with_order_date(mut self, date: impl Into<String>) -> Self {
        self.order_date = Some(date.into());
        self
    }

    pub fn with_updated_at(mut self, date: impl Into<String>) -> Self {
        self.order_updated_at = Some(date.into());
        self
    }

    /// Raw timestamp used for bucketing: `order_date`, or `order_updated_at`
    /// when the order date is missing or blank
    pub fn effective_date(&self) -> Option<&str> {
        match self.order_date.as_deref() {
            Some(date) if !date.trim().is_empty() => Some(date),
            _ => self
                .order_updated_at
                .as_deref()
                .filter(|date| !date.trim().is_empty()),
        }
    }

    /// Effective timestamp in the given timezone, `None` if absent or unparsable
    pub fn ordered_at(&self, tz: Tz) -> Option<DateTime<Tz>> {
        self.effective_date().and_then(|raw| parse_timestamp(raw, tz))
    }
}

/// Body of `PATCH shops/order-editor/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub order_status: OrderStatus,
}

impl OrderStatusUpdate {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            order_status: status,
        }
    }
}
