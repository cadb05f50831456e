use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::masterdata::{BomLine, MasterData};
use crate::rates::RateConfig;
use crate::types::{round_money, with_metadata, ComputationOutput, ModeSplit, Money};
use crate::CostResult;

use super::line::{material_line_cost, process_line_cost, MaterialCostLine, ProcessCostLine};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a full purchase-cost breakdown of one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownInput {
    pub product_code: String,
    /// Ordered BOM lines for the product
    pub lines: Vec<BomLine>,
    /// Master records resolved by the caller; a dangling reference aborts
    /// the whole calculation
    pub master: MasterData,
    pub rates: RateConfig,
}

/// Full purchase-cost breakdown for one product. Built fresh on every
/// calculation request and never mutated afterwards; a new change produces a
/// new breakdown.
///
/// Invariants:
/// - `manufacturing_cost = material_cost + labor_cost + expense`
/// - `purchase_cost.total() = manufacturing_cost.total() + the four overheads`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub product_code: String,
    /// Net material cost (base + scrap) by work-mode
    pub material_cost: ModeSplit,
    pub labor_cost: ModeSplit,
    pub expense: ModeSplit,
    pub manufacturing_cost: ModeSplit,
    pub material_management_cost: Money,
    pub general_management_cost: Money,
    pub defect_cost: Money,
    pub profit: Money,
    pub purchase_cost: ModeSplit,
    /// Line detail retained for tabular display
    pub material_lines: Vec<MaterialCostLine>,
    pub process_lines: Vec<ProcessCostLine>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the full cost breakdown for one product.
pub fn calculate_breakdown(
    input: &BreakdownInput,
) -> CostResult<ComputationOutput<CostBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let breakdown = breakdown_for_lines(
        &input.product_code,
        &input.lines,
        &input.master,
        &input.rates,
        &mut warnings,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "BOM purchase-cost breakdown (overheads on grand totals)",
        input,
        warnings,
        elapsed,
        breakdown,
    ))
}

/// Core aggregation, shared with the before/after passes of the diff engine.
pub(crate) fn breakdown_for_lines(
    product_code: &str,
    lines: &[BomLine],
    master: &MasterData,
    rates: &RateConfig,
    warnings: &mut Vec<String>,
) -> CostResult<CostBreakdown> {
    let mut material_cost = ModeSplit::ZERO;
    let mut labor_cost = ModeSplit::ZERO;
    let mut expense = ModeSplit::ZERO;
    let mut material_lines: Vec<MaterialCostLine> = Vec::new();
    let mut process_lines: Vec<ProcessCostLine> = Vec::new();

    for line in lines {
        match line {
            BomLine::Material(m) => {
                let material = master.material(&m.material_code)?;
                let costed = material_line_cost(material, m);
                material_cost.accumulate(costed.work_mode, costed.net_material_cost);
                material_lines.push(costed);
            }
            BomLine::Process(p) => {
                let process = master.process(&p.process_code)?;
                let costed = process_line_cost(process, p);
                if costed.degenerate {
                    warnings.push(format!(
                        "process '{}' cannot produce (non-positive cycle time or efficiency); labor cost and production volume set to zero",
                        costed.process_code
                    ));
                }
                labor_cost.accumulate(costed.work_mode, costed.labor_cost);
                expense.accumulate(costed.work_mode, costed.expense);
                process_lines.push(costed);
            }
        }
    }

    let manufacturing_cost = material_cost + labor_cost + expense;

    // Overheads are charged on grand totals regardless of the mode split
    let conversion = labor_cost.total() + expense.total();
    let material_management_cost =
        round_money(material_cost.total() * rates.material_management_rate());
    let general_management_cost = round_money(conversion * rates.general_management_rate());
    let defect_cost = round_money(manufacturing_cost.total() * rates.defect_rate());
    let profit = round_money((conversion + general_management_cost) * rates.profit_rate());

    let overhead = material_management_cost + general_management_cost + defect_cost + profit;
    let purchase_cost = prorate_purchase(manufacturing_cost, overhead);

    Ok(CostBreakdown {
        product_code: product_code.to_string(),
        material_cost,
        labor_cost,
        expense,
        manufacturing_cost,
        material_management_cost,
        general_management_cost,
        defect_cost,
        profit,
        purchase_cost,
        material_lines,
        process_lines,
    })
}

/// Split the purchase cost by work-mode: each mode carries its own
/// manufacturing cost plus its manufacturing-share of the overhead. The
/// in-house share is computed first and outsource takes the exact remainder,
/// so the split always sums to the grand total.
fn prorate_purchase(manufacturing: ModeSplit, overhead: Money) -> ModeSplit {
    let total = manufacturing.total();
    if total.is_zero() {
        // overhead is zero whenever manufacturing cost is zero
        return manufacturing;
    }
    let in_house = manufacturing.in_house + round_money(overhead * manufacturing.in_house / total);
    ModeSplit {
        in_house,
        outsource: total + overhead - in_house,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masterdata::{Material, MaterialLine, Process, ProcessLine};
    use crate::types::WorkMode;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample_rates() -> RateConfig {
        RateConfig::new(dec!(0.01), dec!(0.10), dec!(0.01), dec!(0.10)).unwrap()
    }

    fn sample_master() -> MasterData {
        MasterData::new(
            [Material {
                code: "WIRE-0050".into(),
                name: "AVSS 0.5sq wire".into(),
                specification: None,
                unit: "M".into(),
                unit_price: dec!(100.0000),
                scrap_rate: Some(dec!(0.05)),
                effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            }],
            [Process {
                code: "CRIMP-01".into(),
                name: "Terminal crimping".into(),
                work_mode: WorkMode::InHouse,
                cycle_time: dec!(3.6),
                workers: dec!(1),
                labor_rate: dec!(18000),
                efficiency: None,
                expense: dec!(50),
            }],
        )
    }

    fn sample_lines() -> Vec<BomLine> {
        vec![
            BomLine::Material(MaterialLine {
                material_code: "WIRE-0050".into(),
                quantity: dec!(2),
                work_mode: None,
                unit_price_override: None,
            }),
            BomLine::Process(ProcessLine {
                process_code: "CRIMP-01".into(),
                cycle_time: None,
                workers: None,
            }),
        ]
    }

    #[test]
    fn test_reference_breakdown() {
        // material 210 + labor 18 + expense 50 = manufacturing 278
        // mgmt 2.10, general 6.80, defect 2.78, profit 7.48 -> purchase 297.16
        let input = BreakdownInput {
            product_code: "HARN-001".into(),
            lines: sample_lines(),
            master: sample_master(),
            rates: sample_rates(),
        };
        let output = calculate_breakdown(&input).unwrap();
        let b = &output.result;

        assert_eq!(b.material_cost.total(), dec!(210.00));
        assert_eq!(b.labor_cost.total(), dec!(18.00));
        assert_eq!(b.expense.total(), dec!(50.00));
        assert_eq!(b.manufacturing_cost.total(), dec!(278.00));
        assert_eq!(b.material_management_cost, dec!(2.10));
        assert_eq!(b.general_management_cost, dec!(6.80));
        assert_eq!(b.defect_cost, dec!(2.78));
        assert_eq!(b.profit, dec!(7.48));
        assert_eq!(b.purchase_cost.total(), dec!(297.16));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_unknown_material_aborts() {
        let mut lines = sample_lines();
        lines.push(BomLine::Material(MaterialLine {
            material_code: "GHOST".into(),
            quantity: dec!(1),
            work_mode: None,
            unit_price_override: None,
        }));
        let input = BreakdownInput {
            product_code: "HARN-001".into(),
            lines,
            master: sample_master(),
            rates: sample_rates(),
        };
        assert!(calculate_breakdown(&input).is_err());
    }

    #[test]
    fn test_degenerate_line_warns_but_completes() {
        let mut master = sample_master();
        master.processes.get_mut("CRIMP-01").unwrap().cycle_time = dec!(0);
        let input = BreakdownInput {
            product_code: "HARN-001".into(),
            lines: sample_lines(),
            master,
            rates: sample_rates(),
        };
        let output = calculate_breakdown(&input).unwrap();

        assert_eq!(output.warnings.len(), 1);
        assert!(output.result.process_lines[0].degenerate);
        assert_eq!(output.result.labor_cost.total(), dec!(0));
        // expense still flows through
        assert_eq!(output.result.expense.total(), dec!(50.00));
    }

    #[test]
    fn test_mode_split_sums_to_total() {
        let mut master = sample_master();
        master.processes.insert(
            "ASSY-90".into(),
            Process {
                code: "ASSY-90".into(),
                name: "Subassembly".into(),
                work_mode: WorkMode::Outsource,
                cycle_time: dec!(12),
                workers: dec!(2),
                labor_rate: dec!(15000),
                efficiency: None,
                expense: dec!(30),
            },
        );
        let mut lines = sample_lines();
        lines.push(BomLine::Process(ProcessLine {
            process_code: "ASSY-90".into(),
            cycle_time: None,
            workers: None,
        }));

        let input = BreakdownInput {
            product_code: "HARN-001".into(),
            lines,
            master,
            rates: sample_rates(),
        };
        let b = calculate_breakdown(&input).unwrap().result;

        assert_eq!(
            b.purchase_cost.in_house + b.purchase_cost.outsource,
            b.manufacturing_cost.total()
                + b.material_management_cost
                + b.general_management_cost
                + b.defect_cost
                + b.profit
        );
        assert!(b.purchase_cost.outsource > Decimal::ZERO);
    }

    #[test]
    fn test_empty_bom_is_all_zero() {
        let input = BreakdownInput {
            product_code: "HARN-001".into(),
            lines: vec![],
            master: sample_master(),
            rates: sample_rates(),
        };
        let b = calculate_breakdown(&input).unwrap().result;

        assert_eq!(b.purchase_cost.total(), Decimal::ZERO);
        assert!(b.material_lines.is_empty());
        assert!(b.process_lines.is_empty());
    }
}
