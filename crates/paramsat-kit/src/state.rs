//! Reading values back out of a satisfying solution.

use crate::declarations::Declarations;
use crate::family::{BoolFamily, IntegerFamily};
use crate::integer::ClosedInteger;
use paramsat_base::{Atom, Error, Result, Solution, Variable};
use paramsat_param::{Assignment, BoolLookup, PExpression};
use std::collections::HashMap;

/// A model together with the declarations it assigns.
#[derive(Debug, Clone)]
pub struct ProgramState {
    solution: Solution,
    bool_families: HashMap<String, BoolFamily>,
}

impl ProgramState {
    /// Wraps a satisfying solution; unsatisfiable outcomes carry no values.
    pub fn new(solution: Solution, declarations: &Declarations) -> Result<Self> {
        if !solution.is_satisfiable() {
            return Err(Error::invalid(
                "an unsatisfiable outcome has no values to read",
            ));
        }
        let bool_families = declarations
            .bool_families()
            .iter()
            .map(|f| (f.name().to_string(), f.clone()))
            .collect();
        Ok(Self {
            solution,
            bool_families,
        })
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn query_atom(&self, atom: &Atom) -> bool {
        self.solution.check_atom(atom)
    }

    pub fn query_integer(&self, value: &ClosedInteger) -> i64 {
        value.value(&self.solution)
    }

    /// Value of an integer family member at index expressions evaluated
    /// under `assignment`.
    pub fn query_member(
        &self,
        family: &IntegerFamily,
        indices: &[PExpression],
        assignment: &Assignment,
    ) -> Result<i64> {
        let index = indices
            .iter()
            .map(|e| e.evaluate(assignment))
            .collect::<Result<Vec<_>>>()?;
        Ok(family.query_var(&index)?.value(&self.solution))
    }

    /// Value of a boolean family member; indices outside the family read as
    /// false.
    pub fn query_bool_member(
        &self,
        family: &BoolFamily,
        indices: &[PExpression],
        assignment: &Assignment,
    ) -> Result<bool> {
        let index = indices
            .iter()
            .map(|e| e.evaluate(assignment))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.query_atom(&family.atom_or_false(&index)?))
    }
}

impl BoolLookup for ProgramState {
    fn variable(&self, var: &Variable) -> Result<bool> {
        Ok(self.solution.check_variable(var))
    }

    fn member(&self, family: &str, index: &[i64]) -> Result<bool> {
        let family = self
            .bool_families
            .get(family)
            .ok_or_else(|| Error::invalid(format!("no boolean family named {family}")))?;
        Ok(self.query_atom(&family.atom_or_false(index)?))
    }
}
