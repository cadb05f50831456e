use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CostEngineError;
use crate::types::Rate;
use crate::CostResult;

/// The four configurable overhead ratios applied by every breakdown.
///
/// Fields are private: construction goes through [`RateConfig::new`], which
/// rejects ratios outside [0, 1] up front rather than at calculation time.
/// A configuration change replaces the whole value; fields are never mutated
/// one by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RateConfigRepr", into = "RateConfigRepr")]
pub struct RateConfig {
    material_management_rate: Rate,
    general_management_rate: Rate,
    defect_rate: Rate,
    profit_rate: Rate,
}

impl RateConfig {
    pub fn new(
        material_management_rate: Rate,
        general_management_rate: Rate,
        defect_rate: Rate,
        profit_rate: Rate,
    ) -> CostResult<Self> {
        Ok(RateConfig {
            material_management_rate: checked("material_management_rate", material_management_rate)?,
            general_management_rate: checked("general_management_rate", general_management_rate)?,
            defect_rate: checked("defect_rate", defect_rate)?,
            profit_rate: checked("profit_rate", profit_rate)?,
        })
    }

    pub fn material_management_rate(&self) -> Rate {
        self.material_management_rate
    }

    pub fn general_management_rate(&self) -> Rate {
        self.general_management_rate
    }

    pub fn defect_rate(&self) -> Rate {
        self.defect_rate
    }

    pub fn profit_rate(&self) -> Rate {
        self.profit_rate
    }
}

fn checked(field: &str, value: Rate) -> CostResult<Rate> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(CostEngineError::Precision {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Wire mirror of [`RateConfig`]; deserialization funnels through the same
/// range checks as the constructor.
#[derive(Serialize, Deserialize)]
struct RateConfigRepr {
    material_management_rate: Rate,
    general_management_rate: Rate,
    defect_rate: Rate,
    profit_rate: Rate,
}

impl TryFrom<RateConfigRepr> for RateConfig {
    type Error = CostEngineError;

    fn try_from(repr: RateConfigRepr) -> CostResult<Self> {
        RateConfig::new(
            repr.material_management_rate,
            repr.general_management_rate,
            repr.defect_rate,
            repr.profit_rate,
        )
    }
}

impl From<RateConfig> for RateConfigRepr {
    fn from(rates: RateConfig) -> Self {
        RateConfigRepr {
            material_management_rate: rates.material_management_rate,
            general_management_rate: rates.general_management_rate,
            defect_rate: rates.defect_rate,
            profit_rate: rates.profit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_rates() {
        let rates = RateConfig::new(dec!(0.01), dec!(0.10), dec!(0.01), dec!(0.10)).unwrap();
        assert_eq!(rates.general_management_rate(), dec!(0.10));
    }

    #[test]
    fn test_rate_above_one_rejected() {
        let err = RateConfig::new(dec!(0.01), dec!(1.5), dec!(0.01), dec!(0.10)).unwrap_err();
        assert!(matches!(
            err,
            CostEngineError::Precision { ref field, .. } if field == "general_management_rate"
        ));
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(RateConfig::new(dec!(-0.01), dec!(0.10), dec!(0.01), dec!(0.10)).is_err());
    }

    #[test]
    fn test_deserialization_applies_range_checks() {
        let bad = serde_json::json!({
            "material_management_rate": "0.01",
            "general_management_rate": "0.10",
            "defect_rate": "2.00",
            "profit_rate": "0.10"
        });
        assert!(serde_json::from_value::<RateConfig>(bad).is_err());
    }
}
