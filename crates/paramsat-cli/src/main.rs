//! paramsat CLI - runs the configured SAT oracle over DIMACS files.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paramsat")]
#[command(author, version, about = "Drive an external SAT solver over CNF problems", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Solver configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a DIMACS CNF problem with the external solver
    Solve(commands::solve::SolveArgs),
    /// Check a solver answer against a DIMACS CNF problem
    Check(commands::check::CheckArgs),
    /// Print the effective solver configuration
    Config(config::SolverOverrides),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve(args) => {
            let solver = config::load(cli.config.as_deref())?;
            commands::solve::run(args.overrides.apply(solver), &args)
        }
        Commands::Check(args) => commands::check::run(args),
        Commands::Config(overrides) => {
            let solver = overrides.apply(config::load(cli.config.as_deref())?);
            print!("{}", solver.to_toml()?);
            Ok(())
        }
    }
}
