use std::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Physical quantities (consumption, received units)
pub type Quantity = Decimal;

/// Currency amounts are carried at 2 decimal places
pub const MONEY_DP: u32 = 2;

/// Unit prices and quantities are carried at 4 decimal places
pub const UNIT_DP: u32 = 4;

/// Round a currency amount to its 2-decimal scale, midpoint away from zero.
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a unit price or quantity to its 4-decimal scale.
pub fn round_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(UNIT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether a manufacturing step runs in-house or at an outside supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkMode {
    InHouse,
    Outsource,
}

/// An amount split by work-mode. The grand total is always derived, never
/// stored, so the split cannot drift from its sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSplit {
    pub in_house: Money,
    pub outsource: Money,
}

impl ModeSplit {
    pub const ZERO: ModeSplit = ModeSplit {
        in_house: Decimal::ZERO,
        outsource: Decimal::ZERO,
    };

    pub fn total(&self) -> Money {
        self.in_house + self.outsource
    }

    pub fn get(&self, mode: WorkMode) -> Money {
        match mode {
            WorkMode::InHouse => self.in_house,
            WorkMode::Outsource => self.outsource,
        }
    }

    pub fn accumulate(&mut self, mode: WorkMode, amount: Money) {
        match mode {
            WorkMode::InHouse => self.in_house += amount,
            WorkMode::Outsource => self.outsource += amount,
        }
    }
}

impl Add for ModeSplit {
    type Output = ModeSplit;

    fn add(self, rhs: ModeSplit) -> ModeSplit {
        ModeSplit {
            in_house: self.in_house + rhs.in_house,
            outsource: self.outsource + rhs.outsource,
        }
    }
}

impl Sub for ModeSplit {
    type Output = ModeSplit;

    fn sub(self, rhs: ModeSplit) -> ModeSplit {
        ModeSplit {
            in_house: self.in_house - rhs.in_house,
            outsource: self.outsource - rhs.outsource,
        }
    }
}

// Serialized form carries the derived total for downstream display; it is
// ignored on the way back in.
impl Serialize for ModeSplit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ModeSplit", 3)?;
        state.serialize_field("in_house", &self.in_house)?;
        state.serialize_field("outsource", &self.outsource)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

#[derive(Deserialize)]
struct ModeSplitRepr {
    in_house: Money,
    outsource: Money,
}

impl<'de> Deserialize<'de> for ModeSplit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = ModeSplitRepr::deserialize(deserializer)?;
        Ok(ModeSplit {
            in_house: repr.in_house,
            outsource: repr.outsource,
        })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
