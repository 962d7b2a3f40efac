use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{info, instrument};

use crate::dataset::Dataset;
use crate::errors::ServiceError;
use crate::models::OrderRecord;
use crate::services::adjudication::AdjudicationClient;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SYSTEM_PROMPT: &str = "You are an expert case solver for dispute settlements. \
    Ensure fairness in analysis. Provide concise answers, but elaborate if requested.";

const FIELD_FALLBACK: &str = "Unknown";
const EXTERNAL_FACTORS_FALLBACK: &str = "None provided";

/// Resolves delivery-delay cases against the loaded inventory dataset.
///
/// On-time orders get a fixed reply without leaving the process; late ones
/// have their vendor-fault verdict delegated to the injected adjudicator.
#[derive(Clone)]
pub struct CaseService {
    dataset: Arc<Dataset>,
    adjudicator: Arc<dyn AdjudicationClient>,
}

impl CaseService {
    pub fn new(dataset: Arc<Dataset>, adjudicator: Arc<dyn AdjudicationClient>) -> Self {
        Self {
            dataset,
            adjudicator,
        }
    }

    /// Resolve a case against today's date.
    pub async fn resolve_case(&self, item_id: &str) -> Result<String, ServiceError> {
        self.resolve_case_at(item_id, Utc::now().date_naive()).await
    }

    /// Resolve a case against an explicit calendar date.
    ///
    /// Comparing whole dates keeps the delay count independent of the time
    /// of day the request arrives. A request on the expected delivery date
    /// itself takes the late branch with a delay of zero days.
    #[instrument(skip(self, item_id), fields(item_id = %item_id))]
    pub async fn resolve_case_at(
        &self,
        item_id: &str,
        today: NaiveDate,
    ) -> Result<String, ServiceError> {
        let record = self
            .dataset
            .find(item_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Item ID {} not found", item_id)))?;

        let expected = expected_delivery_date(record)?;

        if today < expected {
            info!(%expected, "order still within its promised window");
            return Ok(format!(
                "The order with ID {} should be delivered soon.",
                item_id
            ));
        }

        let delay_days = (today - expected).num_days();
        info!(delay_days, "order past its expected delivery date, adjudicating fault");

        let prompt = build_adjudication_prompt(record, delay_days);
        let decision = self.adjudicator.complete(SYSTEM_PROMPT, &prompt).await?;

        Ok(format!(
            "Decision on the order with ID {}: {}",
            item_id,
            decision.trim()
        ))
    }
}

/// Order date plus the promised and buffer day counts. The day counts
/// default to zero when the record omits them; a missing or unparseable
/// order date makes the record malformed.
fn expected_delivery_date(record: &OrderRecord) -> Result<NaiveDate, ServiceError> {
    let raw = record.order_date.as_deref().ok_or_else(|| {
        ServiceError::MalformedRecord(format!("order {} has no order_date", record.item_id))
    })?;

    let order_date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        ServiceError::MalformedRecord(format!(
            "order {} has invalid order_date {:?}: {}",
            record.item_id, raw, e
        ))
    })?;

    let promised = record.estimated_days_promised.unwrap_or(0);
    let buffer = record.buffer_days_given.unwrap_or(0);

    order_date
        .checked_add_signed(Duration::days(promised + buffer))
        .ok_or_else(|| {
            ServiceError::MalformedRecord(format!(
                "order {} delivery window overflows the calendar",
                record.item_id
            ))
        })
}

fn build_adjudication_prompt(record: &OrderRecord, delay_days: i64) -> String {
    let vendor_name = record
        .vendor
        .as_ref()
        .and_then(|v| v.name.as_deref())
        .unwrap_or(FIELD_FALLBACK);
    let item_name = record.item_name.as_deref().unwrap_or(FIELD_FALLBACK);
    let quantity = display_or_unknown(record.quantity.as_ref());
    let external_factors = record
        .external_factor_encitation
        .as_deref()
        .unwrap_or(EXTERNAL_FACTORS_FALLBACK);
    let distance = display_or_unknown(record.distance.as_ref());
    let priority = record.priority.as_deref().unwrap_or(FIELD_FALLBACK);
    let stock_before_order = display_or_unknown(record.stock_before_order.as_ref());
    let current_inventory = display_or_unknown(record.current_inventory.as_ref());

    format!(
        "The delivery of an order by {} is delayed by {} days. Here are the details:\n\
         Item Name: {}\n\
         Quantity: {}\n\
         External Factors: {}\n\
         Distance: {} km\n\
         Priority: {}\n\
         Stock Before Order: {} units\n\
         Current Inventory: {} units\n\
         Based on these details, determine if the vendor is at fault or if they can be exempted. \
         Do not give mixed or confusing answers. The vendor is either at fault or not. \
         Consider that priority is for hospital medicines, and a delay of more than three days \
         past the buffer time is unacceptable.",
        vendor_name,
        delay_days,
        item_name,
        quantity,
        external_factors,
        distance,
        priority,
        stock_before_order,
        current_inventory,
    )
}

fn display_or_unknown<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| FIELD_FALLBACK.to_string(), ToString::to_string)
}
