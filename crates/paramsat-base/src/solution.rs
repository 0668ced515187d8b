//! Solver answers read back as sets of true variables.

use crate::atom::{Atom, Variable, TRUTH_INDEX};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Either "unsatisfiable" or the set of variable indices that are true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    trues: Option<BTreeSet<u32>>,
}

impl Solution {
    /// The unsatisfiable answer.
    #[must_use]
    pub const fn unsatisfiable() -> Self {
        Self { trues: None }
    }

    /// Creates a satisfying solution from the set of true indices.
    pub fn from_true_indices(indices: impl IntoIterator<Item = u32>) -> Self {
        let mut trues: BTreeSet<u32> = indices.into_iter().collect();
        trues.insert(TRUTH_INDEX);
        Self { trues: Some(trues) }
    }

    /// Creates a satisfying solution from a DIMACS-style literal list.
    pub fn from_dimacs(literals: &[i64]) -> Self {
        Self::from_true_indices(
            literals
                .iter()
                .filter(|&&l| l > 0)
                .filter_map(|&l| u32::try_from(l).ok()),
        )
    }

    /// Returns whether this is a satisfying solution.
    #[must_use]
    pub const fn is_satisfiable(&self) -> bool {
        self.trues.is_some()
    }

    /// Returns whether the variable with this index is true.
    #[must_use]
    pub fn check_index(&self, index: u32) -> bool {
        self.trues
            .as_ref()
            .is_some_and(|trues| trues.contains(&index))
    }

    /// Returns whether the variable is true.
    #[must_use]
    pub fn check_variable(&self, var: &Variable) -> bool {
        self.check_index(var.index())
    }

    /// Returns whether the atom holds.
    #[must_use]
    pub fn check_atom(&self, atom: &Atom) -> bool {
        self.is_satisfiable() && self.check_variable(atom.variable()) == atom.is_positive()
    }

    /// Returns the true indices in ascending order (empty when unsatisfiable).
    pub fn true_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.trues.iter().flat_map(|trues| trues.iter().copied())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.trues {
            None => f.write_str("UNSAT"),
            Some(trues) => {
                write!(f, "SAT [")?;
                for (i, index) in trues.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{index}")?;
                }
                write!(f, "]")
            }
        }
    }
}
