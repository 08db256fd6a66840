pub mod check;
pub mod run;
pub mod types;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "payrun",
    about = "Payroll journal transformation CLI for general-ledger import."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform a payroll extract into a balanced ledger journal.
    Run {
        /// Journal type key (see `payrun types`)
        journal_type: String,
        /// Payroll extract CSV
        #[arg(long)]
        input: String,
        /// Target month name, e.g. June
        #[arg(long)]
        month: String,
        /// Calendar year, e.g. 2025
        #[arg(long)]
        year: i32,
        /// Cost-centre reference CSV (location/department names and codes)
        #[arg(long = "cost-centres")]
        cost_centres: Option<String>,
        /// Lump sum to apportion (apLevy only)
        #[arg(long)]
        total: Option<f64>,
        /// Output journal CSV
        #[arg(long)]
        output: String,
    },
    /// List supported journal types.
    Types,
    /// Re-check the debit/credit balance of an existing journal file.
    Check {
        /// Journal CSV previously produced by `run`
        file: String,
    },
}
