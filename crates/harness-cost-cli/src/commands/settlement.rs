use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::Value;

use harness_cost_core::settlement::calculate::{calculate_settlement, SettlementInput};
use harness_cost_core::settlement::period::{Granularity, PeriodRange};

use crate::input;

/// Arguments for the settlement command
#[derive(Args)]
pub struct SettlementArgs {
    /// Path to a settlement input JSON file (per-product unit-price diffs,
    /// date range, granularity and receipt quantities); reads piped stdin
    /// when omitted
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_settlement(args: SettlementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: SettlementInput = input::resolve(args.input.as_deref())?;
    let output = calculate_settlement(&input)?;
    Ok(serde_json::to_value(&output)?)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Daily,
    Monthly,
    Yearly,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Daily => Granularity::Daily,
            GranularityArg::Monthly => Granularity::Monthly,
            GranularityArg::Yearly => Granularity::Yearly,
        }
    }
}

/// Arguments for the periods command
#[derive(Args)]
pub struct PeriodsArgs {
    /// Range start (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Range end, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Bucket size
    #[arg(long, default_value = "monthly")]
    pub granularity: GranularityArg,
}

pub fn run_periods(args: PeriodsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let range = PeriodRange::new(args.start, args.end, args.granularity.into());
    let periods: Vec<String> = range.iter().collect();

    Ok(serde_json::json!({
        "start": args.start,
        "end": args.end,
        "granularity": Granularity::from(args.granularity),
        "periods": periods,
    }))
}
