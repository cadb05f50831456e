pub mod error;
pub mod masterdata;
pub mod rates;
pub mod types;

#[cfg(feature = "costing")]
pub mod costing;

#[cfg(feature = "change")]
pub mod change;

#[cfg(feature = "settlement")]
pub mod settlement;

pub use error::CostEngineError;
pub use types::*;

/// Standard result type for all cost-engine operations
pub type CostResult<T> = Result<T, CostEngineError>;
