//! Solver answers.
//!
//! Two shapes are understood:
//! - the result-file form written by minisat-style solvers
//!   (`SAT` followed by literals ending in `0`, or `UNSAT`);
//! - the competition form printed on stdout (`s SATISFIABLE` with `v` lines,
//!   or `s UNSATISFIABLE`).
//!
//! Everything else is undecided.

/// A decided solver answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverAnswer {
    /// Satisfiable with the listed literals (terminating `0` stripped).
    Sat(Vec<i64>),
    /// Unsatisfiable.
    Unsat,
}

impl SolverAnswer {
    /// Parses solver output. Returns `None` when the output decides nothing.
    #[must_use]
    pub fn parse(output: &str) -> Option<Self> {
        let mut lines = output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with("c ") && *l != "c");

        let first = lines.next()?;
        match first {
            "UNSAT" | "UNSATISFIABLE" | "s UNSATISFIABLE" => Some(Self::Unsat),
            "SAT" | "SATISFIABLE" => {
                let rest: Vec<&str> = lines.collect();
                parse_literals(rest.iter().flat_map(|l| l.split_whitespace())).map(Self::Sat)
            }
            "s SATISFIABLE" => {
                let tokens = lines
                    .filter_map(|l| l.strip_prefix('v'))
                    .flat_map(str::split_whitespace);
                parse_literals(tokens).map(Self::Sat)
            }
            _ => {
                tracing::debug!("Undecided solver output starting with {:?}", first);
                None
            }
        }
    }
}

/// Reads literals up to the terminating 0. A missing terminator means the
/// output was cut short.
fn parse_literals<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<Vec<i64>> {
    let mut literals = Vec::new();
    for token in tokens {
        let lit: i64 = match token.parse() {
            Ok(lit) => lit,
            Err(_) => {
                tracing::warn!("Unparsable literal {:?} in solver output", token);
                return None;
            }
        };
        if lit == 0 {
            return Some(literals);
        }
        literals.push(lit);
    }
    tracing::warn!("Solver model is not terminated by 0");
    None
}
