//! Check command.

use anyhow::Context;
use clap::Args;
use paramsat_format::{DimacsCnf, SolverAnswer};
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// DIMACS CNF problem
    #[arg(required = true)]
    pub problem: PathBuf,

    /// Solver output (minisat or competition format)
    #[arg(required = true)]
    pub answer: PathBuf,
}

/// Verifies `answer` against `cnf`; returns the status line to print.
pub fn verify(cnf: &DimacsCnf, answer: &str) -> anyhow::Result<&'static str> {
    match SolverAnswer::parse(answer) {
        Some(SolverAnswer::Sat(model)) => {
            if let Some(clause) = cnf.clauses.iter().position(|clause| {
                !clause.iter().any(|lit| model.contains(lit))
            }) {
                anyhow::bail!("model violates clause {} of the problem", clause + 1);
            }
            Ok("s SATISFIABLE")
        }
        // Refutations carry no certificate to check.
        Some(SolverAnswer::Unsat) => Ok("s UNSATISFIABLE"),
        None => anyhow::bail!("answer is neither SAT nor UNSAT"),
    }
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let file = fs::File::open(&args.problem)
        .with_context(|| format!("cannot open {}", args.problem.display()))?;
    let cnf = DimacsCnf::from_reader(file)?;
    let answer = fs::read_to_string(&args.answer)
        .with_context(|| format!("cannot read {}", args.answer.display()))?;
    println!("{}", verify(&cnf, &answer)?);
    Ok(())
}
