//! Solve command.

use crate::config::SolverOverrides;
use anyhow::Context;
use clap::Args;
use paramsat_format::{DimacsCnf, SolverAnswer};
use paramsat_kit::{ExternalSolver, Oracle, SolverConfig};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args)]
pub struct SolveArgs {
    /// Input DIMACS CNF file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file for the model
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: SolverOverrides,
}

/// Renders a model as a competition-style value line.
pub fn model_line(model: &[i64]) -> String {
    let literals: Vec<String> = model.iter().map(ToString::to_string).collect();
    format!("v {} 0\n", literals.join(" "))
}

pub fn run(config: SolverConfig, args: &SolveArgs) -> anyhow::Result<()> {
    tracing::info!("Loading problem from {:?}", args.input);
    let file = fs::File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let cnf = DimacsCnf::from_reader(file)?;
    tracing::info!(
        "Loaded DIMACS: {} vars, {} clauses",
        cnf.num_vars,
        cnf.clauses.len()
    );

    let solver = ExternalSolver::new(config);
    let start = Instant::now();
    let answer = solver.solve(&cnf)?;
    let elapsed = start.elapsed();

    match answer {
        Some(SolverAnswer::Sat(model)) => {
            if !cnf.is_satisfied_by(&model) {
                anyhow::bail!(
                    "solver {} returned a model that violates the problem",
                    solver.config().command
                );
            }
            println!("s SATISFIABLE");
            if let Some(output) = &args.output {
                fs::write(output, model_line(&model))
                    .with_context(|| format!("cannot write {}", output.display()))?;
            }
        }
        Some(SolverAnswer::Unsat) => println!("s UNSATISFIABLE"),
        None => println!("s UNKNOWN"),
    }

    println!("c Time: {:.3}s", elapsed.as_secs_f64());
    Ok(())
}
