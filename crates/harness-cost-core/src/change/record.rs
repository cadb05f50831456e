use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::breakdown::CostBreakdown;
use crate::masterdata::BomLine;
use crate::types::Money;

use super::apply::{ChangeItem, LineUpdate};
use super::diff::CostComparison;

/// Which cost category a committed change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Material,
    Process,
    Combined,
}

/// Committed price-change record: the change instructions together with the
/// realized before/after/diff summary. Built once at commit time and never
/// edited; history is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChange {
    pub id: String,
    pub product_code: String,
    pub change_type: ChangeType,
    pub reason: String,
    /// ECO / change-order reference, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_order: Option<String>,
    pub effective_date: NaiveDate,
    pub items: Vec<ChangeItem>,
    pub comparison: CostComparison,
    pub created_at: DateTime<Utc>,
}

impl PriceChange {
    /// Seal a previewed comparison into the append-only history. The change
    /// type is derived from what the items actually touch.
    pub fn commit(
        product_code: impl Into<String>,
        reason: impl Into<String>,
        change_order: Option<String>,
        effective_date: NaiveDate,
        items: Vec<ChangeItem>,
        comparison: CostComparison,
    ) -> Self {
        let change_type = classify(&items, &comparison.before);
        PriceChange {
            id: Uuid::new_v4().to_string(),
            product_code: product_code.into(),
            change_type,
            reason: reason.into(),
            change_order,
            effective_date,
            items,
            comparison,
            created_at: Utc::now(),
        }
    }

    /// Per-unit purchase-cost delta; the multiplier for settlement runs.
    pub fn unit_price_diff(&self) -> Money {
        self.comparison.diff.purchase_cost
    }
}

/// A NEW or MODIFIED item names its side directly; a DELETED item is looked
/// up in the before-breakdown's line detail to learn which side it was on.
fn classify(items: &[ChangeItem], before: &CostBreakdown) -> ChangeType {
    let mut touches_material = false;
    let mut touches_process = false;

    for item in items {
        match item {
            ChangeItem::New { line } => match line {
                BomLine::Material(_) => touches_material = true,
                BomLine::Process(_) => touches_process = true,
            },
            ChangeItem::Modified { update, .. } => match update {
                LineUpdate::Material { .. } => touches_material = true,
                LineUpdate::Process { .. } => touches_process = true,
            },
            ChangeItem::Deleted { code } => {
                if before
                    .material_lines
                    .iter()
                    .any(|line| line.material_code == *code)
                {
                    touches_material = true;
                }
                if before
                    .process_lines
                    .iter()
                    .any(|line| line.process_code == *code)
                {
                    touches_process = true;
                }
            }
            ChangeItem::Unchanged { .. } => {}
        }
    }

    match (touches_material, touches_process) {
        (true, true) => ChangeType::Combined,
        (false, true) => ChangeType::Process,
        // an all-UNCHANGED set is a material change of zero by convention
        _ => ChangeType::Material,
    }
}
