use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Money;

use super::calculate::{ReceiptQuantity, SettlementOutput, SettlementResult};
use super::period::Granularity;

/// The condition one settlement run was executed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementCondition {
    pub products: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

/// Committed settlement record: the condition, the receipt inputs and the
/// computed results, sealed together. Immutable once saved; a rerun creates
/// a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub price_change_id: String,
    pub condition: SettlementCondition,
    pub receipts: Vec<ReceiptQuantity>,
    pub results: Vec<SettlementResult>,
    pub grand_total: Money,
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    pub fn commit(
        price_change_id: impl Into<String>,
        condition: SettlementCondition,
        receipts: Vec<ReceiptQuantity>,
        output: SettlementOutput,
    ) -> Self {
        Settlement {
            id: Uuid::new_v4().to_string(),
            price_change_id: price_change_id.into(),
            condition,
            receipts,
            results: output.results,
            grand_total: output.grand_total,
            created_at: Utc::now(),
        }
    }
}
