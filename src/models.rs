use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supplying vendor as embedded in an order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// One inventory/delivery entry, keyed by `item_id`.
///
/// Everything beyond the key is optional: records come from an external
/// file and the resolver degrades missing context to documented fallback
/// strings instead of rejecting the record. Only a missing or unparseable
/// `order_date` is treated as malformed, and only once a case actually
/// needs the date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub item_id: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub vendor: Option<Vendor>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub hospital_department: Option<String>,
    #[serde(default)]
    pub stock_before_order: Option<i64>,
    #[serde(default)]
    pub current_inventory: Option<i64>,
    /// "Yes" marks hospital-critical medicine orders.
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub external_factor_encitation: Option<String>,
    /// Strict `YYYY-MM-DD`; parsed lazily by the case resolver.
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub estimated_days_promised: Option<i64>,
    #[serde(default)]
    pub buffer_days_given: Option<i64>,
    /// Vendor distance in kilometers.
    #[serde(default)]
    pub distance: Option<f64>,
}
