use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CostEngineError {
    #[error("Data integrity: {entity} '{code}' — {reason}")]
    DataIntegrity {
        entity: String,
        code: String,
        reason: String,
    },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid range: {0}")]
    Range(String),

    #[error("Invalid rate: {field} must lie in [0, 1], got {value}")]
    Precision { field: String, value: Decimal },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CostEngineError {
    /// Unknown master-data or change-target reference.
    pub fn unknown(entity: &str, code: &str) -> Self {
        CostEngineError::DataIntegrity {
            entity: entity.to_string(),
            code: code.to_string(),
            reason: "not found in the supplied data".to_string(),
        }
    }
}

impl From<serde_json::Error> for CostEngineError {
    fn from(e: serde_json::Error) -> Self {
        CostEngineError::SerializationError(e.to_string())
    }
}
