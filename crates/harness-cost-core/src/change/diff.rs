use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::costing::breakdown::{breakdown_for_lines, CostBreakdown};
use crate::masterdata::{BomLine, MasterData};
use crate::rates::RateConfig;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::CostResult;

use super::apply::{apply_changes, ChangeItem};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a before/after cost comparison of a proposed change set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffInput {
    pub product_code: String,
    pub baseline: Vec<BomLine>,
    pub master: MasterData,
    pub rates: RateConfig,
    pub changes: Vec<ChangeItem>,
}

/// Category-level deltas between two breakdowns (after minus before).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDiff {
    pub material_cost: Money,
    pub labor_cost: Money,
    pub expense: Money,
    pub manufacturing_cost: Money,
    pub purchase_cost: Money,
}

impl CostDiff {
    /// All-zero diff for a product whose change set is empty.
    pub fn zero() -> Self {
        CostDiff {
            material_cost: Decimal::ZERO,
            labor_cost: Decimal::ZERO,
            expense: Decimal::ZERO,
            manufacturing_cost: Decimal::ZERO,
            purchase_cost: Decimal::ZERO,
        }
    }

    pub(crate) fn between(before: &CostBreakdown, after: &CostBreakdown) -> Self {
        CostDiff {
            material_cost: after.material_cost.total() - before.material_cost.total(),
            labor_cost: after.labor_cost.total() - before.labor_cost.total(),
            expense: after.expense.total() - before.expense.total(),
            manufacturing_cost: after.manufacturing_cost.total()
                - before.manufacturing_cost.total(),
            purchase_cost: after.purchase_cost.total() - before.purchase_cost.total(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.material_cost.is_zero()
            && self.labor_cost.is_zero()
            && self.expense.is_zero()
            && self.manufacturing_cost.is_zero()
            && self.purchase_cost.is_zero()
    }
}

/// Before/after/diff view of one proposed change set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComparison {
    pub before: CostBreakdown,
    pub after: CostBreakdown,
    pub diff: CostDiff,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Preview the financial impact of a change set before it is committed:
/// breakdown of the baseline, breakdown of the changed BOM, and the
/// category-level difference.
pub fn compare_costs(input: &DiffInput) -> CostResult<ComputationOutput<CostComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let before = breakdown_for_lines(
        &input.product_code,
        &input.baseline,
        &input.master,
        &input.rates,
        &mut warnings,
    )?;

    let after_lines = apply_changes(&input.baseline, &input.changes)?;

    let mut after_warnings: Vec<String> = Vec::new();
    let after = breakdown_for_lines(
        &input.product_code,
        &after_lines,
        &input.master,
        &input.rates,
        &mut after_warnings,
    )?;
    for warning in after_warnings {
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    }

    let diff = CostDiff::between(&before, &after);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Before/after purchase-cost comparison",
        input,
        warnings,
        elapsed,
        CostComparison {
            before,
            after,
            diff,
        },
    ))
}
