use clap::Args;
use serde_json::Value;

use harness_cost_core::change::diff::{compare_costs, DiffInput};

use crate::input;

/// Arguments for the diff command
#[derive(Args)]
pub struct DiffArgs {
    /// Path to a diff input JSON file (baseline BOM, master data, rates and
    /// the proposed change items); reads piped stdin when omitted
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_diff(args: DiffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: DiffInput = input::resolve(args.input.as_deref())?;
    let output = compare_costs(&input)?;
    Ok(serde_json::to_value(&output)?)
}
