mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::proforma::ProformaArgs;
use commands::time_value::{IrrArgs, NpvArgs};
use commands::upstream::{ClassifyOpexArgs, FeedstockDefaultsArgs};

/// Feasibility economics for RNG and wastewater capital projects
#[derive(Parser)]
#[command(
    name = "rngpf",
    version,
    about = "Financial pro-forma engine for RNG and wastewater capital projects",
    long_about = "Runs multi-year cash-flow projections for anaerobic-digestion / RNG \
                  and wastewater capital projects with decimal precision: revenue-market \
                  branches, declining emissions credits, debt amortization, and \
                  IRR / NPV / MOIC / payback metrics."
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
    /// Run a full pro-forma from a scenario file or stdin
    Proforma(ProformaArgs),
    /// Internal rate of return of a cash-flow series (bisection)
    Irr(IrrArgs),
    /// Net present value of a cash-flow series
    Npv(NpvArgs),
    /// Bucket an opex line-item list into canonical categories
    ClassifyOpex(ClassifyOpexArgs),
    /// Derive default cost drivers and a blended CI score from feedstocks
    FeedstockDefaults(FeedstockDefaultsArgs),
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
        Commands::Proforma(args) => commands::proforma::run_proforma(args),
        Commands::Irr(args) => commands::time_value::run_irr(args),
        Commands::Npv(args) => commands::time_value::run_npv(args),
        Commands::ClassifyOpex(args) => commands::upstream::run_classify_opex(args),
        Commands::FeedstockDefaults(args) => commands::upstream::run_feedstock_defaults(args),
        Commands::Version => {
            println!("rngpf {}", env!("CARGO_PKG_VERSION"));
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
