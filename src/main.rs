mod allocator;
mod assembler;
mod cli;
mod codemap;
mod derive;
mod error;
mod export;
mod fmt;
mod journal;
mod normalize;
mod pipeline;
mod resolver;
mod rules;
mod settings;
mod source;

use clap::Parser;

use cli::run::RunArgs;
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            journal_type,
            input,
            month,
            year,
            cost_centres,
            total,
            output,
        } => cli::run::run(RunArgs {
            journal_type: &journal_type,
            input: &input,
            month: &month,
            year,
            cost_centres: cost_centres.as_deref(),
            total,
            output: &output,
        }),
        Commands::Types => cli::types::run(),
        Commands::Check { file } => cli::check::run(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
