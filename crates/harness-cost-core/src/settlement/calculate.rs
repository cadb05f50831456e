use std::collections::HashMap;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CostEngineError;
use crate::types::{with_metadata, ComputationOutput, Money, Quantity};
use crate::CostResult;

use super::period::{Granularity, PeriodRange};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Received quantity for one product in one period bucket, supplied by the
/// caller per settlement run. Keys must match the run's granularity format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptQuantity {
    pub product_code: String,
    pub period: String,
    pub quantity: Quantity,
}

/// Per-unit purchase-cost delta for one product, taken from a committed
/// price change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPriceDiff {
    pub product_code: String,
    pub unit_price_diff: Money,
}

/// Input for one settlement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementInput {
    /// Committed price change this run settles, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_id: Option<String>,
    pub diffs: Vec<ProductPriceDiff>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
    pub receipts: Vec<ReceiptQuantity>,
}

/// Settlement detail for one period bucket.
/// Invariant: `amount = quantity x unit_price_diff`, exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDetail {
    pub period: String,
    pub quantity: Quantity,
    pub amount: Money,
}

/// Settlement outcome for one product.
/// Invariant: `settlement_amount` equals both the period-amount sum and
/// `total_quantity x unit_price_diff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub product_code: String,
    pub total_quantity: Quantity,
    pub unit_price_diff: Money,
    pub settlement_amount: Money,
    pub periods: Vec<PeriodDetail>,
}

/// Settlement outcome across every product in the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementOutput {
    pub results: Vec<SettlementResult>,
    pub grand_total: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Aggregate a price-change delta against received quantities, bucketed by
/// the requested granularity. Period amounts are never rounded mid-run, so
/// the per-product total stays exactly linear in the quantities.
pub fn calculate_settlement(
    input: &SettlementInput,
) -> CostResult<ComputationOutput<SettlementOutput>> {
    let start_time = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    // (product, period) -> quantity; duplicate receipt rows accumulate
    let mut quantities: HashMap<(&str, &str), Quantity> = HashMap::new();
    for receipt in &input.receipts {
        *quantities
            .entry((receipt.product_code.as_str(), receipt.period.as_str()))
            .or_insert(Decimal::ZERO) += receipt.quantity;
    }

    let range = PeriodRange::new(input.start, input.end, input.granularity);
    let mut results: Vec<SettlementResult> = Vec::with_capacity(input.diffs.len());
    let mut grand_total = Decimal::ZERO;

    for diff in &input.diffs {
        let mut periods: Vec<PeriodDetail> = Vec::new();
        let mut total_quantity = Decimal::ZERO;
        let mut settlement_amount = Decimal::ZERO;

        for period in range.iter() {
            let quantity = quantities
                .get(&(diff.product_code.as_str(), period.as_str()))
                .copied()
                .unwrap_or(Decimal::ZERO);
            let amount = quantity * diff.unit_price_diff;

            total_quantity += quantity;
            settlement_amount += amount;
            periods.push(PeriodDetail {
                period,
                quantity,
                amount,
            });
        }

        if total_quantity.is_zero() {
            warnings.push(format!(
                "no receipts for product '{}' between {} and {}",
                diff.product_code, input.start, input.end
            ));
        }

        grand_total += settlement_amount;
        results.push(SettlementResult {
            product_code: diff.product_code.clone(),
            total_quantity,
            unit_price_diff: diff.unit_price_diff,
            settlement_amount,
            periods,
        });
    }

    let elapsed = start_time.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Receipt-weighted price-change settlement",
        input,
        warnings,
        elapsed,
        SettlementOutput {
            results,
            grand_total,
        },
    ))
}

/// Range problems are rejected before any computation begins.
fn validate(input: &SettlementInput) -> CostResult<()> {
    if input.start > input.end {
        return Err(CostEngineError::Range(format!(
            "settlement start {} is after end {}",
            input.start, input.end
        )));
    }
    for receipt in &input.receipts {
        if receipt.quantity < Decimal::ZERO {
            return Err(CostEngineError::Range(format!(
                "received quantity for product '{}' in period '{}' is negative",
                receipt.product_code, receipt.period
            )));
        }
    }
    Ok(())
}
