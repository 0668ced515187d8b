//! Declared program variables.

use crate::binary::BinaryVariable;
use crate::family::{BinaryFamily, BoolFamily, RangeFamily};
use crate::range::RangeVariable;
use paramsat_base::{Atom, ClauseCollection, Error, Result, VariableRegistry};
use paramsat_param::{Assignment, PConstraint, PExpression, ParameterList};
use std::collections::HashSet;

/// Every variable and family of one compilation, and the registry they
/// allocate from.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    registry: VariableRegistry,
    names: HashSet<String>,
    bools: Vec<Atom>,
    ranges: Vec<RangeVariable>,
    binaries: Vec<BinaryVariable>,
    bool_families: Vec<BoolFamily>,
    range_families: Vec<RangeFamily>,
    binary_families: Vec<BinaryFamily>,
}

/// Checks that `name` is an identifier.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\'')
}

impl Declarations {
    /// Creates an empty declaration set with a fresh registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry every declared variable lives in.
    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    fn claim(&mut self, name: &str) -> Result<()> {
        if !is_identifier(name) {
            return Err(Error::invalid(format!("illegal variable name {name:?}")));
        }
        if !self.names.insert(name.to_string()) {
            return Err(Error::invalid(format!("variable {name} is already declared")));
        }
        Ok(())
    }

    /// Declares a boolean variable.
    pub fn declare_bool(&mut self, name: &str) -> Result<Atom> {
        self.claim(name)?;
        let atom = self.registry.atom(name);
        tracing::debug!("Declared boolean {}", name);
        self.bools.push(atom.clone());
        Ok(atom)
    }

    /// Declares a range variable over `min..=max`.
    pub fn declare_range(&mut self, name: &str, min: i64, max: i64) -> Result<RangeVariable> {
        self.claim(name)?;
        let var = RangeVariable::new(&self.registry, name, min, max)?;
        tracing::debug!("Declared range variable {} ∈ [{}, {}]", name, min, max);
        self.ranges.push(var.clone());
        Ok(var)
    }

    /// Declares a range variable over the values of `min..=max` satisfying
    /// `restriction`, which refers to the value by the variable's own name.
    pub fn declare_restricted_range(
        &mut self,
        name: &str,
        min: i64,
        max: i64,
        restriction: &PConstraint,
    ) -> Result<RangeVariable> {
        self.claim(name)?;
        let var = RangeVariable::restricted(
            &self.registry,
            name,
            min,
            max,
            restriction,
            name,
            &Assignment::new(),
        )?;
        tracing::debug!(
            "Declared range variable {} ∈ [{}, {}] | {} ({} values)",
            name,
            min,
            max,
            restriction,
            var.values().count()
        );
        self.ranges.push(var.clone());
        Ok(var)
    }

    /// Declares a binary variable over `min..=max`.
    pub fn declare_binary(&mut self, name: &str, min: i64, max: i64) -> Result<BinaryVariable> {
        self.claim(name)?;
        let var = BinaryVariable::new(&self.registry, name, min, max)?;
        tracing::debug!(
            "Declared binary variable {} ∈ [{}, {}] ({} bits)",
            name,
            min,
            max,
            var.view().length()
        );
        self.binaries.push(var.clone());
        Ok(var)
    }

    /// Declares a family of booleans.
    pub fn declare_bool_family(&mut self, name: &str, params: ParameterList) -> Result<BoolFamily> {
        self.claim(name)?;
        let family = BoolFamily::new_bool(&self.registry, name, params)?;
        tracing::debug!("Declared boolean family {}[{}]", name, family.parameters());
        self.bool_families.push(family.clone());
        Ok(family)
    }

    /// Declares a family of range variables with index-dependent bounds.
    pub fn declare_range_family(
        &mut self,
        name: &str,
        params: ParameterList,
        min: PExpression,
        max: PExpression,
        restriction: Option<PConstraint>,
    ) -> Result<RangeFamily> {
        self.claim(name)?;
        let family = RangeFamily::new_range(&self.registry, name, params, min, max, restriction)?;
        tracing::debug!("Declared range family {}[{}]", name, family.parameters());
        self.range_families.push(family.clone());
        Ok(family)
    }

    /// Declares a family of binary variables with index-dependent bounds.
    pub fn declare_binary_family(
        &mut self,
        name: &str,
        params: ParameterList,
        min: PExpression,
        max: PExpression,
    ) -> Result<BinaryFamily> {
        self.claim(name)?;
        let family = BinaryFamily::new_binary(&self.registry, name, params, min, max)?;
        tracing::debug!("Declared binary family {}[{}]", name, family.parameters());
        self.binary_families.push(family.clone());
        Ok(family)
    }

    /// Returns the boolean family declared as `name`.
    pub fn bool_family(&self, name: &str) -> Option<&BoolFamily> {
        self.bool_families.iter().find(|f| f.name() == name)
    }

    /// Returns the declared boolean families.
    pub fn bool_families(&self) -> &[BoolFamily] {
        &self.bool_families
    }

    /// Returns the declared boolean variables.
    pub fn bools(&self) -> &[Atom] {
        &self.bools
    }

    /// Returns the declared range variables.
    pub fn ranges(&self) -> &[RangeVariable] {
        &self.ranges
    }

    /// Returns the declared binary variables.
    pub fn binaries(&self) -> &[BinaryVariable] {
        &self.binaries
    }

    /// Emits the well-definedness clauses of every declared variable and of
    /// every member of every declared family.
    pub fn add_well_definedness(&self, col: &mut ClauseCollection) -> Result<()> {
        for var in &self.ranges {
            var.add_well_definedness(col);
        }
        for var in &self.binaries {
            var.add_well_definedness(col)?;
        }
        for family in &self.range_families {
            family.add_well_definedness(col)?;
        }
        for family in &self.binary_families {
            family.add_well_definedness(col)?;
        }
        Ok(())
    }
}
