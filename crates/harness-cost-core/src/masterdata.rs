use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CostEngineError;
use crate::types::{Money, Quantity, Rate, WorkMode};
use crate::CostResult;

/// Raw-material master record. Versioned by effective date; a record is
/// never edited once a calculation snapshot references it — price revisions
/// create a new record with a later effective date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Identity code; the matching key for BOM lines and change items
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    /// Unit of measure (EA, M, KG, ...)
    pub unit: String,
    /// Unit price at 4-decimal precision
    pub unit_price: Money,
    /// Fraction of material cost lost to waste, charged back as scrap cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrap_rate: Option<Rate>,
    pub effective_date: NaiveDate,
}

/// Process master record for one manufacturing step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// Identity code; the matching key for BOM lines and change items
    pub code: String,
    pub name: String,
    pub work_mode: WorkMode,
    /// Seconds to produce one unit at this step
    pub cycle_time: Decimal,
    /// Crew size at the step
    pub workers: Decimal,
    /// Hourly labor rate
    pub labor_rate: Money,
    /// Line efficiency in percent; 100 when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<Decimal>,
    /// Configured per-unit equipment overhead for this step
    pub expense: Money,
}

/// Material consumption line of a BOM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLine {
    pub material_code: String,
    pub quantity: Quantity,
    /// Explicit mode for materials consumed by an outsourced step;
    /// in-house when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<WorkMode>,
    /// Proposed price for an uncommitted change; the master price otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_override: Option<Money>,
}

/// Process step line of a BOM. Cycle time and crew fall back to the
/// referenced process master when not overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessLine {
    pub process_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_time: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<Decimal>,
}

/// One line of a product's bill of materials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BomLine {
    Material(MaterialLine),
    Process(ProcessLine),
}

impl BomLine {
    /// Identity code of the referenced master record.
    pub fn code(&self) -> &str {
        match self {
            BomLine::Material(line) => &line.material_code,
            BomLine::Process(line) => &line.process_code,
        }
    }
}

/// Resolved master records for one calculation run, keyed by identity code.
/// The engine never fetches data; the caller resolves everything up front.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterData {
    pub materials: HashMap<String, Material>,
    pub processes: HashMap<String, Process>,
}

impl MasterData {
    pub fn new(
        materials: impl IntoIterator<Item = Material>,
        processes: impl IntoIterator<Item = Process>,
    ) -> Self {
        MasterData {
            materials: materials
                .into_iter()
                .map(|m| (m.code.clone(), m))
                .collect(),
            processes: processes
                .into_iter()
                .map(|p| (p.code.clone(), p))
                .collect(),
        }
    }

    pub fn material(&self, code: &str) -> CostResult<&Material> {
        self.materials
            .get(code)
            .ok_or_else(|| CostEngineError::unknown("material", code))
    }

    pub fn process(&self, code: &str) -> CostResult<&Process> {
        self.processes
            .get(code)
            .ok_or_else(|| CostEngineError::unknown("process", code))
    }
}
