//! The requirements of a program and their compilation to CNF.

use crate::declarations::Declarations;
use crate::formula::Formula;
use crate::oracle::Oracle;
use crate::state::ProgramState;
use paramsat_base::{ClauseCollection, Error, Result, Solution};
use paramsat_format::{DimacsCnf, SolverAnswer};
use paramsat_param::Assignment;
use serde::Serialize;

/// Closed formulas that must all hold, over one set of declarations.
#[derive(Debug, Default)]
pub struct RequirementsList {
    declarations: Declarations,
    formulas: Vec<Formula>,
    last_cnf: Option<String>,
}

/// Inspection summary of a requirements list.
#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub variables: Vec<VariableEntry>,
    pub requirements: Vec<String>,
    pub clauses: usize,
    pub cnf_bytes: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct VariableEntry {
    pub index: u32,
    pub name: String,
}

impl RequirementsList {
    /// Creates an empty list over `declarations`.
    pub fn new(declarations: Declarations) -> Self {
        Self {
            declarations,
            formulas: Vec::new(),
            last_cnf: None,
        }
    }

    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    pub fn declarations_mut(&mut self) -> &mut Declarations {
        &mut self.declarations
    }

    /// Adds a requirement. The formula must have no free parameters; it is
    /// instantiated right away.
    pub fn add(&mut self, formula: Formula) -> Result<()> {
        let free = formula.query_parameters();
        if !free.is_empty() {
            return Err(Error::invalid(format!(
                "requirement {formula} has free parameters {free:?}"
            )));
        }
        let ground = formula.instantiate(&Assignment::new())?;
        tracing::debug!("Added requirement {}", ground);
        self.formulas.push(ground);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// Compiles every declaration and requirement into a fresh collection.
    pub fn build(&self) -> Result<ClauseCollection> {
        let mut col = ClauseCollection::new(self.declarations.registry());
        self.declarations.add_well_definedness(&mut col)?;
        let well_defined = col.len();
        for formula in &self.formulas {
            formula.add_clauses(&mut col)?;
        }
        tracing::info!(
            "Compiled {} requirements: {} clauses ({} well-definedness) over {} variables",
            self.formulas.len(),
            col.len(),
            well_defined,
            self.declarations.registry().len()
        );
        Ok(col)
    }

    /// Compiles and asks `oracle`. `None` means the oracle could not decide.
    pub fn solve(&mut self, oracle: &dyn Oracle) -> Result<Option<Solution>> {
        let col = self.build()?;
        let cnf = DimacsCnf::from_collection(&col);
        self.last_cnf = Some(cnf.to_dimacs());
        match oracle.solve(&cnf)? {
            Some(SolverAnswer::Sat(literals)) => {
                tracing::info!("Requirements are satisfiable");
                Ok(Some(Solution::from_dimacs(&literals)))
            }
            Some(SolverAnswer::Unsat) => {
                tracing::info!("Requirements are unsatisfiable");
                Ok(Some(Solution::unsatisfiable()))
            }
            None => {
                tracing::warn!("Solvability undetermined");
                Ok(None)
            }
        }
    }

    /// Wraps a satisfying solution for reading values back.
    pub fn state(&self, solution: Solution) -> Result<ProgramState> {
        ProgramState::new(solution, &self.declarations)
    }

    /// The CNF text of the last [`RequirementsList::solve`] call.
    pub fn cnf_text(&self) -> Option<&str> {
        self.last_cnf.as_deref()
    }

    /// Summary of the list as pretty JSON.
    pub fn debug_report(&self) -> Result<String> {
        let clauses = self.build()?.len();
        let variables = (1u32..)
            .zip(self.declarations.registry().names())
            .map(|(index, name)| VariableEntry { index, name })
            .collect();
        let report = DebugReport {
            variables,
            requirements: self.formulas.iter().map(ToString::to_string).collect(),
            clauses,
            cnf_bytes: self.last_cnf.as_ref().map(String::len),
        };
        serde_json::to_string_pretty(&report).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::BoolFamily;
    use crate::quantified::QuantifiedAtom;
    use paramsat_param::{PExpression, Parameter, ParameterList};
    use std::cell::RefCell;

    /// Answers every problem the same way and remembers what it was asked.
    struct Scripted {
        answer: Option<SolverAnswer>,
        asked: RefCell<Vec<DimacsCnf>>,
    }

    impl Oracle for Scripted {
        fn solve(&self, cnf: &DimacsCnf) -> Result<Option<SolverAnswer>> {
            self.asked.borrow_mut().push(cnf.clone());
            Ok(self.answer.clone())
        }
    }

    fn scripted(answer: Option<SolverAnswer>) -> Scripted {
        Scripted {
            answer,
            asked: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_open_formula_rejected() {
        let mut decls = Declarations::new();
        let params = ParameterList::new(vec![Parameter::new(
            "i",
            PExpression::constant(0),
            PExpression::constant(3),
        )])
        .unwrap();
        let b: BoolFamily = decls.declare_bool_family("b", params).unwrap();
        let mut reqs = RequirementsList::new(decls);
        let open = Formula::atom(QuantifiedAtom::member(&b, vec![PExpression::param("i")]));
        assert!(matches!(reqs.add(open), Err(Error::InvalidModel(_))));
        assert!(reqs.is_empty());
    }

    #[test]
    fn test_solve_outcomes() {
        let mut decls = Declarations::new();
        let x = decls.declare_bool("x").unwrap();
        let mut reqs = RequirementsList::new(decls);
        reqs.add(x.clone().into()).unwrap();

        let sat = scripted(Some(SolverAnswer::Sat(vec![1, 2])));
        let solution = reqs.solve(&sat).unwrap().unwrap();
        assert!(solution.check_atom(&x));
        let asked = sat.asked.borrow();
        // ⊤ and the requirement itself.
        assert_eq!(asked[0].clauses, vec![vec![1], vec![2]]);
        assert_eq!(reqs.cnf_text(), Some("p cnf 2 2\n1 0\n2 0\n"));

        let unsat = scripted(Some(SolverAnswer::Unsat));
        assert!(!reqs.solve(&unsat).unwrap().unwrap().is_satisfiable());

        let undecided = scripted(None);
        assert!(reqs.solve(&undecided).unwrap().is_none());
    }

    #[test]
    fn test_debug_report() {
        let mut decls = Declarations::new();
        let x = decls.declare_bool("x").unwrap();
        let mut reqs = RequirementsList::new(decls);
        reqs.add(x.into()).unwrap();
        let report: serde_json::Value = serde_json::from_str(&reqs.debug_report().unwrap()).unwrap();
        assert_eq!(report["clauses"], 1);
        assert_eq!(report["requirements"][0], "x");
        assert_eq!(report["variables"][1]["name"], "x");
        assert!(report["cnf_bytes"].is_null());
    }
}
