use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::masterdata::{Material, MaterialLine, Process, ProcessLine};
use crate::types::{round_money, round_unit, Money, Quantity, WorkMode};

const SECONDS_PER_HOUR: Decimal = dec!(3600);
const FULL_EFFICIENCY: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Monetary cost of a single material line.
/// Invariant: `net_material_cost = material_cost + scrap_cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCostLine {
    pub material_code: String,
    pub work_mode: WorkMode,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub material_cost: Money,
    pub scrap_cost: Money,
    pub net_material_cost: Money,
}

/// Monetary cost of a single process line.
/// Invariant: `total_process_cost = labor_cost + expense`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCostLine {
    pub process_code: String,
    pub work_mode: WorkMode,
    pub cycle_time: Decimal,
    pub workers: Decimal,
    /// Units per hour at the configured efficiency
    pub production_volume: Decimal,
    pub labor_cost: Money,
    pub expense: Money,
    pub total_process_cost: Money,
    /// Set when cycle time was not positive; the line computed with zero
    /// output instead of aborting the sheet
    pub degenerate: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Cost one material line. A line-level price override wins over the master
/// price; scrap is charged on top of the base material cost.
pub fn material_line_cost(material: &Material, line: &MaterialLine) -> MaterialCostLine {
    let unit_price = line.unit_price_override.unwrap_or(material.unit_price);
    let material_cost = round_money(line.quantity * unit_price);
    let scrap_rate = material.scrap_rate.unwrap_or(Decimal::ZERO);
    let scrap_cost = round_money(material_cost * scrap_rate);
    let net_material_cost = material_cost + scrap_cost;

    MaterialCostLine {
        material_code: material.code.clone(),
        work_mode: line.work_mode.unwrap_or(WorkMode::InHouse),
        quantity: line.quantity,
        unit_price,
        material_cost,
        scrap_cost,
        net_material_cost,
    }
}

/// Cost one process line. Line-level cycle-time and crew overrides win over
/// the process master; expense is the configured per-unit figure and is not
/// derived here.
pub fn process_line_cost(process: &Process, line: &ProcessLine) -> ProcessCostLine {
    let cycle_time = line.cycle_time.unwrap_or(process.cycle_time);
    let workers = line.workers.unwrap_or(process.workers);
    let efficiency = process.efficiency.unwrap_or(FULL_EFFICIENCY);

    // A step that cannot produce degrades to zero output; one bad line must
    // not block the rest of the cost sheet.
    let degenerate = cycle_time <= Decimal::ZERO || efficiency <= Decimal::ZERO;

    let (production_volume, labor_cost) = if degenerate {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let volume = round_unit(SECONDS_PER_HOUR / cycle_time * efficiency / FULL_EFFICIENCY);
        // labor = workers * rate / effective production, kept in the
        // cycle-time form to avoid compounding the volume rounding
        let labor = round_money(
            workers * process.labor_rate * cycle_time / SECONDS_PER_HOUR * FULL_EFFICIENCY
                / efficiency,
        );
        (volume, labor)
    };

    let expense = round_money(process.expense);
    let total_process_cost = labor_cost + expense;

    ProcessCostLine {
        process_code: process.code.clone(),
        work_mode: process.work_mode,
        cycle_time,
        workers,
        production_volume,
        labor_cost,
        expense,
        total_process_cost,
        degenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wire() -> Material {
        Material {
            code: "WIRE-0050".into(),
            name: "AVSS 0.5sq wire".into(),
            specification: None,
            unit: "M".into(),
            unit_price: dec!(100.0000),
            scrap_rate: Some(dec!(0.05)),
            effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    fn crimping() -> Process {
        Process {
            code: "CRIMP-01".into(),
            name: "Terminal crimping".into(),
            work_mode: WorkMode::InHouse,
            cycle_time: dec!(3.6),
            workers: dec!(1),
            labor_rate: dec!(18000),
            efficiency: None,
            expense: dec!(50),
        }
    }

    #[test]
    fn test_material_line_reference_values() {
        // qty 2 x 100 = 200; scrap 200 x 0.05 = 10; net 210
        let line = MaterialLine {
            material_code: "WIRE-0050".into(),
            quantity: dec!(2),
            work_mode: None,
            unit_price_override: None,
        };
        let costed = material_line_cost(&wire(), &line);

        assert_eq!(costed.material_cost, dec!(200.00));
        assert_eq!(costed.scrap_cost, dec!(10.00));
        assert_eq!(costed.net_material_cost, dec!(210.00));
        assert_eq!(costed.work_mode, WorkMode::InHouse);
    }

    #[test]
    fn test_material_line_without_scrap_rate() {
        let mut material = wire();
        material.scrap_rate = None;
        let line = MaterialLine {
            material_code: "WIRE-0050".into(),
            quantity: dec!(3),
            work_mode: Some(WorkMode::Outsource),
            unit_price_override: None,
        };
        let costed = material_line_cost(&material, &line);

        assert_eq!(costed.scrap_cost, dec!(0.00));
        assert_eq!(costed.net_material_cost, costed.material_cost);
        assert_eq!(costed.work_mode, WorkMode::Outsource);
    }

    #[test]
    fn test_material_line_price_override() {
        let line = MaterialLine {
            material_code: "WIRE-0050".into(),
            quantity: dec!(2),
            work_mode: None,
            unit_price_override: Some(dec!(110.0000)),
        };
        let costed = material_line_cost(&wire(), &line);
        assert_eq!(costed.unit_price, dec!(110.0000));
        assert_eq!(costed.material_cost, dec!(220.00));
    }

    #[test]
    fn test_process_line_reference_values() {
        // 3600 / 3.6 = 1000 units/hour; labor = 1 * 18000 * 3.6 / 3600 = 18
        let line = ProcessLine {
            process_code: "CRIMP-01".into(),
            cycle_time: None,
            workers: None,
        };
        let costed = process_line_cost(&crimping(), &line);

        assert_eq!(costed.production_volume, dec!(1000.0000));
        assert_eq!(costed.labor_cost, dec!(18.00));
        assert_eq!(costed.expense, dec!(50.00));
        assert_eq!(costed.total_process_cost, dec!(68.00));
        assert!(!costed.degenerate);
    }

    #[test]
    fn test_process_line_efficiency_scales_labor() {
        // At 80% efficiency the same step yields 800 units/hour and labor
        // rises to 18 / 0.8 = 22.50
        let mut process = crimping();
        process.efficiency = Some(dec!(80));
        let line = ProcessLine {
            process_code: "CRIMP-01".into(),
            cycle_time: None,
            workers: None,
        };
        let costed = process_line_cost(&process, &line);

        assert_eq!(costed.production_volume, dec!(800.0000));
        assert_eq!(costed.labor_cost, dec!(22.50));
    }

    #[test]
    fn test_zero_cycle_time_degrades_instead_of_panicking() {
        let line = ProcessLine {
            process_code: "CRIMP-01".into(),
            cycle_time: Some(dec!(0)),
            workers: None,
        };
        let costed = process_line_cost(&crimping(), &line);

        assert!(costed.degenerate);
        assert_eq!(costed.production_volume, dec!(0));
        assert_eq!(costed.labor_cost, dec!(0));
        // expense still counts; it is an opaque per-unit input
        assert_eq!(costed.total_process_cost, dec!(50.00));
    }

    #[test]
    fn test_line_overrides_win_over_master() {
        let line = ProcessLine {
            process_code: "CRIMP-01".into(),
            cycle_time: Some(dec!(7.2)),
            workers: Some(dec!(2)),
        };
        let costed = process_line_cost(&crimping(), &line);

        // labor = 2 * 18000 * 7.2 / 3600 = 72
        assert_eq!(costed.labor_cost, dec!(72.00));
        assert_eq!(costed.production_volume, dec!(500.0000));
    }
}
