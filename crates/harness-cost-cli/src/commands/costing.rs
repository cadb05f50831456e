use clap::Args;
use serde_json::Value;

use harness_cost_core::costing::breakdown::{calculate_breakdown, BreakdownInput};

use crate::input;

/// Arguments for the breakdown command
#[derive(Args)]
pub struct BreakdownArgs {
    /// Path to a breakdown input JSON file (product, BOM lines, master data,
    /// rates); reads piped stdin when omitted
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_breakdown(args: BreakdownArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: BreakdownInput = input::resolve(args.input.as_deref())?;
    let output = calculate_breakdown(&input)?;
    Ok(serde_json::to_value(&output)?)
}
