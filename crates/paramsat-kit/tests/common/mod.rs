//! Test-only oracle: a plain DPLL search, plus model enumeration.

#![allow(dead_code)]

use paramsat_kit::{DimacsCnf, Oracle, Result, SolverAnswer};

/// Decides problems in-process with unit propagation and backtracking.
pub struct Dpll;

impl Oracle for Dpll {
    fn solve(&self, cnf: &DimacsCnf) -> Result<Option<SolverAnswer>> {
        Ok(Some(match dpll(cnf) {
            Some(model) => {
                assert!(cnf.is_satisfied_by(&model), "DPLL returned a non-model");
                SolverAnswer::Sat(model)
            }
            None => SolverAnswer::Unsat,
        }))
    }
}

/// A satisfying assignment as signed literals, or `None` if there is none.
pub fn dpll(cnf: &DimacsCnf) -> Option<Vec<i64>> {
    let mut values = vec![0i8; cnf.num_vars + 1];
    if search(&cnf.clauses, &mut values) {
        Some(
            (1..=cnf.num_vars as i64)
                .map(|v| if values[v as usize] > 0 { v } else { -v })
                .collect(),
        )
    } else {
        None
    }
}

fn value_of(values: &[i8], lit: i64) -> i8 {
    let v = values[lit.unsigned_abs() as usize];
    if lit > 0 {
        v
    } else {
        -v
    }
}

fn search(clauses: &[Vec<i64>], values: &mut Vec<i8>) -> bool {
    let mut trail = Vec::new();
    loop {
        let mut changed = false;
        for clause in clauses {
            let mut open = None;
            let mut open_count = 0;
            let mut satisfied = false;
            for &lit in clause {
                match value_of(values, lit) {
                    1 => {
                        satisfied = true;
                        break;
                    }
                    0 => {
                        open_count += 1;
                        open = Some(lit);
                    }
                    _ => {}
                }
            }
            if satisfied {
                continue;
            }
            match (open_count, open) {
                (0, _) => {
                    undo(values, &trail);
                    return false;
                }
                (1, Some(lit)) => {
                    values[lit.unsigned_abs() as usize] = if lit > 0 { 1 } else { -1 };
                    trail.push(lit.unsigned_abs() as usize);
                    changed = true;
                }
                _ => {}
            }
        }
        if !changed {
            break;
        }
    }
    let Some(var) = (1..values.len()).find(|&v| values[v] == 0) else {
        return true;
    };
    for choice in [1, -1] {
        values[var] = choice;
        if search(clauses, values) {
            return true;
        }
    }
    values[var] = 0;
    undo(values, &trail);
    false
}

fn undo(values: &mut [i8], trail: &[usize]) {
    for &var in trail {
        values[var] = 0;
    }
}

/// Every distinct restriction of a model to `project` (variable indices).
pub fn projected_models(cnf: &DimacsCnf, project: &[u32]) -> Vec<Vec<i64>> {
    let mut problem = cnf.clone();
    let mut found = Vec::new();
    while let Some(model) = dpll(&problem) {
        let projection: Vec<i64> = project
            .iter()
            .map(|&v| model[v as usize - 1])
            .collect();
        problem.clauses.push(projection.iter().map(|&l| -l).collect());
        found.push(projection);
        assert!(found.len() <= 1 << project.len(), "enumeration did not terminate");
    }
    found
}
