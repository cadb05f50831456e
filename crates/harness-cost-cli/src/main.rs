mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::change::DiffArgs;
use commands::costing::BreakdownArgs;
use commands::settlement::{PeriodsArgs, SettlementArgs};

/// Purchase-price cost and settlement calculations
#[derive(Parser)]
#[command(
    name = "hcost",
    version,
    about = "Purchase-price cost and settlement calculations",
    long_about = "A CLI for wiring-harness purchase-price accounting with decimal \
                  precision. Computes BOM cost breakdowns, previews the financial \
                  impact of material/process changes, and settles price-change \
                  deltas against received quantities."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full purchase-cost breakdown for one product's BOM
    Breakdown(BreakdownArgs),
    /// Before/after/diff comparison for a proposed change set
    Diff(DiffArgs),
    /// Settle a price-change delta against received quantities
    Settlement(SettlementArgs),
    /// Enumerate settlement period keys for a date range
    Periods(PeriodsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Breakdown(args) => commands::costing::run_breakdown(args),
        Commands::Diff(args) => commands::change::run_diff(args),
        Commands::Settlement(args) => commands::settlement::run_settlement(args),
        Commands::Periods(args) => commands::settlement::run_periods(args),
        Commands::Version => {
            println!("hcost {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
