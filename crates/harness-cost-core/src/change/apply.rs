use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CostEngineError;
use crate::masterdata::BomLine;
use crate::types::{Money, Quantity};
use crate::CostResult;

/// Field patch for a MODIFIED change. Only the fields the change names are
/// replaced; everything else keeps its baseline value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineUpdate {
    Material {
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<Quantity>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit_price: Option<Money>,
    },
    Process {
        #[serde(skip_serializing_if = "Option::is_none")]
        cycle_time: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        workers: Option<Decimal>,
    },
}

/// One line-level change instruction. The payload shape rules out illegal
/// states: a DELETED item cannot carry after-values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeItem {
    New { line: BomLine },
    Modified { code: String, update: LineUpdate },
    Deleted { code: String },
    Unchanged { code: String },
}

/// Apply a change set to a baseline BOM, producing the working line list for
/// the after-pass. The baseline is never mutated.
pub fn apply_changes(baseline: &[BomLine], changes: &[ChangeItem]) -> CostResult<Vec<BomLine>> {
    let mut working: Vec<BomLine> = baseline.to_vec();

    for change in changes {
        match change {
            ChangeItem::New { line } => {
                if working.iter().any(|existing| existing.code() == line.code()) {
                    return Err(CostEngineError::DataIntegrity {
                        entity: "bom line".to_string(),
                        code: line.code().to_string(),
                        reason: "NEW item duplicates an existing code".to_string(),
                    });
                }
                working.push(line.clone());
            }
            ChangeItem::Modified { code, update } => {
                let line = working
                    .iter_mut()
                    .find(|line| line.code() == code)
                    .ok_or_else(|| CostEngineError::unknown("bom line", code))?;
                apply_update(line, code, update)?;
            }
            ChangeItem::Deleted { code } => {
                let index = working
                    .iter()
                    .position(|line| line.code() == code.as_str())
                    .ok_or_else(|| CostEngineError::unknown("bom line", code))?;
                // removed outright, not just flagged
                working.remove(index);
            }
            ChangeItem::Unchanged { code } => {
                if !working.iter().any(|line| line.code() == code.as_str()) {
                    return Err(CostEngineError::unknown("bom line", code));
                }
            }
        }
    }

    Ok(working)
}

fn apply_update(line: &mut BomLine, code: &str, update: &LineUpdate) -> CostResult<()> {
    match (line, update) {
        (
            BomLine::Material(material),
            LineUpdate::Material {
                quantity,
                unit_price,
            },
        ) => {
            if let Some(quantity) = quantity {
                material.quantity = *quantity;
            }
            if let Some(unit_price) = unit_price {
                material.unit_price_override = Some(*unit_price);
            }
            Ok(())
        }
        (
            BomLine::Process(process),
            LineUpdate::Process {
                cycle_time,
                workers,
            },
        ) => {
            if let Some(cycle_time) = cycle_time {
                process.cycle_time = Some(*cycle_time);
            }
            if let Some(workers) = workers {
                process.workers = Some(*workers);
            }
            Ok(())
        }
        _ => Err(CostEngineError::InvalidInput {
            field: "update".to_string(),
            reason: format!("change for '{code}' does not match the line kind"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masterdata::{MaterialLine, ProcessLine};
    use rust_decimal_macros::dec;

    fn baseline() -> Vec<BomLine> {
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
    fn test_new_appends() {
        let changes = vec![ChangeItem::New {
            line: BomLine::Material(MaterialLine {
                material_code: "TUBE-020".into(),
                quantity: dec!(0.5),
                work_mode: None,
                unit_price_override: None,
            }),
        }];
        let after = apply_changes(&baseline(), &changes).unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(after[2].code(), "TUBE-020");
    }

    #[test]
    fn test_duplicate_new_rejected() {
        let changes = vec![ChangeItem::New {
            line: BomLine::Material(MaterialLine {
                material_code: "WIRE-0050".into(),
                quantity: dec!(1),
                work_mode: None,
                unit_price_override: None,
            }),
        }];
        let err = apply_changes(&baseline(), &changes).unwrap_err();
        assert!(matches!(err, CostEngineError::DataIntegrity { .. }));
    }

    #[test]
    fn test_modified_patches_named_fields_only() {
        let changes = vec![ChangeItem::Modified {
            code: "WIRE-0050".into(),
            update: LineUpdate::Material {
                quantity: None,
                unit_price: Some(dec!(120.0000)),
            },
        }];
        let after = apply_changes(&baseline(), &changes).unwrap();
        match &after[0] {
            BomLine::Material(line) => {
                // quantity untouched, price overridden
                assert_eq!(line.quantity, dec!(2));
                assert_eq!(line.unit_price_override, Some(dec!(120.0000)));
            }
            other => panic!("expected material line, got {other:?}"),
        }
    }

    #[test]
    fn test_modified_kind_mismatch_rejected() {
        let changes = vec![ChangeItem::Modified {
            code: "CRIMP-01".into(),
            update: LineUpdate::Material {
                quantity: Some(dec!(1)),
                unit_price: None,
            },
        }];
        let err = apply_changes(&baseline(), &changes).unwrap_err();
        assert!(matches!(err, CostEngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_deleted_removes_line() {
        let changes = vec![ChangeItem::Deleted {
            code: "CRIMP-01".into(),
        }];
        let after = apply_changes(&baseline(), &changes).unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].code(), "WIRE-0050");
    }

    #[test]
    fn test_unknown_target_rejected() {
        for change in [
            ChangeItem::Modified {
                code: "GHOST".into(),
                update: LineUpdate::Process {
                    cycle_time: Some(dec!(5)),
                    workers: None,
                },
            },
            ChangeItem::Deleted {
                code: "GHOST".into(),
            },
            ChangeItem::Unchanged {
                code: "GHOST".into(),
            },
        ] {
            assert!(apply_changes(&baseline(), &[change]).is_err());
        }
    }

    #[test]
    fn test_baseline_not_mutated() {
        let base = baseline();
        let changes = vec![ChangeItem::Deleted {
            code: "WIRE-0050".into(),
        }];
        let _ = apply_changes(&base, &changes).unwrap();
        assert_eq!(base.len(), 2);
    }
}
