//! Synthetic inventory data for exercising the case resolver.
//!
//! Records are drawn from small fixed catalogs so generated datasets look
//! like the production ones: a handful of medicines, two vendors with
//! per-item prices and fixed delivery distances, and a few canned external
//! factor descriptions.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::models::{OrderRecord, Vendor};

const ITEMS: [&str; 3] = ["Paracetamol", "Ibuprofen", "Amoxicillin"];

const DEPARTMENTS: [&str; 3] = ["Emergency", "Pediatrics", "Surgery"];

const EXTERNAL_FACTORS: [&str; 4] = [
    "Clear weather, Moderate traffic",
    "Rainy weather, Heavy traffic",
    "Sunny weather, Light traffic",
    "Foggy weather, Delayed traffic",
];

/// Orders land within 42 days after this date.
const ORDER_WINDOW_START: (i32, u32, u32) = (2024, 10, 31);

struct VendorCatalog {
    name: &'static str,
    details: &'static str,
    distance_km: f64,
    unit_prices: [(&'static str, Decimal); 3],
}

impl VendorCatalog {
    fn unit_price_for(&self, item: &str) -> Decimal {
        self.unit_prices
            .iter()
            .find(|(name, _)| *name == item)
            .map(|(_, price)| *price)
            .unwrap_or(Decimal::ZERO)
    }
}

static VENDORS: [VendorCatalog; 2] = [
    VendorCatalog {
        name: "PharmaCorp",
        details: "4 star",
        distance_km: 50.0,
        unit_prices: [
            ("Paracetamol", dec!(2.5)),
            ("Ibuprofen", dec!(3.0)),
            ("Amoxicillin", dec!(5.0)),
        ],
    },
    VendorCatalog {
        name: "MediSupply",
        details: "3 star",
        distance_km: 75.0,
        unit_prices: [
            ("Paracetamol", dec!(2.0)),
            ("Ibuprofen", dec!(2.8)),
            ("Amoxicillin", dec!(4.8)),
        ],
    },
];

/// Generate `n` randomized order records, each with a fresh unique id.
pub fn generate<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<OrderRecord> {
    let (y, m, d) = ORDER_WINDOW_START;
    let window_start = NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date");

    (0..n)
        .map(|_| {
            let item = *ITEMS.choose(rng).expect("non-empty catalog");
            let vendor = VENDORS.choose(rng).expect("non-empty catalog");
            let quantity: i64 = rng.gen_range(20..=150);
            let unit_price = vendor.unit_price_for(item);
            let total_price = unit_price * Decimal::from(quantity);
            let order_date = window_start + Duration::days(rng.gen_range(1..=42));
            let priority = if rng.gen_bool(0.5) { "Yes" } else { "No" };

            OrderRecord {
                item_id: Uuid::new_v4().to_string(),
                item_name: Some(item.to_string()),
                vendor: Some(Vendor {
                    name: Some(vendor.name.to_string()),
                    details: Some(vendor.details.to_string()),
                }),
                quantity: Some(quantity),
                unit_price: Some(unit_price),
                total_price: Some(total_price),
                hospital_department: Some(
                    DEPARTMENTS.choose(rng).expect("non-empty catalog").to_string(),
                ),
                stock_before_order: Some(rng.gen_range(200..=1000)),
                current_inventory: Some(rng.gen_range(10..=80)),
                priority: Some(priority.to_string()),
                external_factor_encitation: Some(
                    EXTERNAL_FACTORS.choose(rng).expect("non-empty catalog").to_string(),
                ),
                order_date: Some(order_date.format("%Y-%m-%d").to_string()),
                estimated_days_promised: Some(rng.gen_range(7..=15)),
                buffer_days_given: Some(rng.gen_range(2..=5)),
                distance: Some(vendor.distance_km),
            }
        })
        .collect()
}

/// Write the records as an indented JSON array, the format the dataset
/// loader reads at startup.
pub fn write_json(path: impl AsRef<Path>, records: &[OrderRecord]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}
