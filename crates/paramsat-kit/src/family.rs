//! Parametrized families of boolean, range and binary variables.
//!
//! A family binds a name and a closed parameter list to a lazily filled
//! [`ParamTree`]. Member `x` at index `(1, 2)` is named `x[1,2]`.
//! [`Family::lookup`] reports out-of-domain indices as values, while
//! [`Family::query_var`] turns them into [`Error::InvalidModel`].

use crate::binary::BinaryVariable;
use crate::integer::ClosedInteger;
use crate::range::RangeVariable;
use paramsat_base::{Atom, ClauseCollection, Error, Result, VariableRegistry};
use paramsat_param::{Assignment, Lookup, PConstraint, PExpression, ParamTree, ParameterList};
use std::fmt;
use std::rc::Rc;

/// Name of the member of `family` at `index`.
#[must_use]
pub fn member_name(family: &str, index: &[i64]) -> String {
    let parts: Vec<String> = index.iter().map(ToString::to_string).collect();
    format!("{family}[{}]", parts.join(","))
}

/// A named family of objects indexed by a parameter list.
pub struct Family<T> {
    name: Rc<str>,
    tree: Rc<ParamTree<T>>,
    registry: VariableRegistry,
}

pub type BoolFamily = Family<Atom>;
pub type RangeFamily = Family<RangeVariable>;
pub type BinaryFamily = Family<BinaryVariable>;

impl<T> Clone for Family<T> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            tree: Rc::clone(&self.tree),
            registry: self.registry.clone(),
        }
    }
}

impl<T> fmt::Debug for Family<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Family")
            .field("name", &self.name)
            .field("tree", &self.tree)
            .finish()
    }
}

impl<T: 'static> Family<T> {
    fn build(
        registry: &VariableRegistry,
        name: &str,
        params: ParameterList,
        generate: impl Fn(&str, &Assignment) -> Result<T> + 'static,
    ) -> Result<Self> {
        let names: Vec<String> = params.names().map(str::to_string).collect();
        let family = name.to_string();
        let tree = ParamTree::new(params, move |assignment| {
            let index = names
                .iter()
                .map(|n| assignment.get(n))
                .collect::<Result<Vec<_>>>()?;
            generate(&member_name(&family, &index), assignment)
        })?;
        Ok(Self {
            name: Rc::from(name),
            tree: Rc::new(tree),
            registry: registry.clone(),
        })
    }
}

impl<T> Family<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterList {
        self.tree.parameters()
    }

    /// Internal lookup: out-of-domain indices are reported, not fatal.
    pub fn lookup(&self, index: &[i64]) -> Result<Lookup<T>> {
        self.tree.lookup(index)
    }

    /// Public entry point: the index must name a member.
    pub fn query_var(&self, index: &[i64]) -> Result<Rc<T>> {
        self.tree.require(index).map_err(|e| match e {
            Error::InvalidModel(message) => {
                Error::InvalidModel(format!("{}: {message}", self.name))
            }
            other => other,
        })
    }

    /// Every member with its index, in enumeration order.
    pub fn instances(&self) -> Result<Vec<(Vec<i64>, Rc<T>)>> {
        self.tree.instances()
    }
}

impl Family<Atom> {
    /// A family of plain boolean variables.
    pub fn new_bool(registry: &VariableRegistry, name: &str, params: ParameterList) -> Result<Self> {
        let reg = registry.clone();
        Self::build(registry, name, params, move |member, _| Ok(reg.atom(member)))
    }

    /// The member atom, or `¬⊤` when the index is outside the domain.
    pub fn atom_or_false(&self, index: &[i64]) -> Result<Atom> {
        Ok(match self.lookup(index)? {
            Lookup::Found(atom) => (*atom).clone(),
            Lookup::OutOfRange { .. } | Lookup::RestrictionViolated { .. } => {
                self.registry.falsity()
            }
        })
    }
}

/// Checks that index-dependent bounds only mention the family's parameters.
fn check_bounds(
    name: &str,
    params: &ParameterList,
    exprs: &[&PExpression],
    restriction: Option<&PConstraint>,
) -> Result<()> {
    let declared: Vec<&str> = params.names().collect();
    let mut referenced = std::collections::BTreeSet::new();
    for e in exprs {
        referenced.extend(e.query_parameters());
    }
    if let Some(r) = restriction {
        referenced.extend(r.query_parameters().into_iter().filter(|n| n != name));
    }
    for n in referenced {
        if !declared.contains(&n.as_str()) {
            return Err(Error::invalid(format!(
                "bounds of family {name} refer to {n}, which is not one of its parameters"
            )));
        }
    }
    Ok(())
}

impl Family<RangeVariable> {
    /// A family of range variables whose bounds (and optional restriction
    /// over the family name) may depend on the index.
    pub fn new_range(
        registry: &VariableRegistry,
        name: &str,
        params: ParameterList,
        min: PExpression,
        max: PExpression,
        restriction: Option<PConstraint>,
    ) -> Result<Self> {
        check_bounds(name, &params, &[&min, &max], restriction.as_ref())?;
        let reg = registry.clone();
        let value_name = name.to_string();
        Self::build(registry, name, params, move |member, assignment| {
            let lo = min.evaluate(assignment)?;
            let hi = max.evaluate(assignment)?;
            match &restriction {
                None => RangeVariable::new(&reg, member, lo, hi),
                Some(r) => {
                    RangeVariable::restricted(&reg, member, lo, hi, r, &value_name, assignment)
                }
            }
        })
    }

    /// Monotonicity clauses of every member.
    pub fn add_well_definedness(&self, col: &mut ClauseCollection) -> Result<()> {
        let members = self.instances()?;
        tracing::debug!("Range family {} has {} members", self.name, members.len());
        for (_, var) in members {
            var.add_well_definedness(col);
        }
        Ok(())
    }
}

impl Family<BinaryVariable> {
    /// A family of binary variables whose bounds may depend on the index.
    pub fn new_binary(
        registry: &VariableRegistry,
        name: &str,
        params: ParameterList,
        min: PExpression,
        max: PExpression,
    ) -> Result<Self> {
        check_bounds(name, &params, &[&min, &max], None)?;
        let reg = registry.clone();
        Self::build(registry, name, params, move |member, assignment| {
            BinaryVariable::new(&reg, member, min.evaluate(assignment)?, max.evaluate(assignment)?)
        })
    }

    /// Bound clauses of every member.
    pub fn add_well_definedness(&self, col: &mut ClauseCollection) -> Result<()> {
        let members = self.instances()?;
        tracing::debug!("Binary family {} has {} members", self.name, members.len());
        for (_, var) in members {
            var.add_well_definedness(col)?;
        }
        Ok(())
    }
}

/// A range or binary family, as referenced from integer terms.
#[derive(Debug, Clone)]
pub enum IntegerFamily {
    Range(RangeFamily),
    Binary(BinaryFamily),
}

impl IntegerFamily {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Range(f) => f.name(),
            Self::Binary(f) => f.name(),
        }
    }

    /// The member at `index` as a closed integer; the index must be valid.
    pub fn query_var(&self, index: &[i64]) -> Result<ClosedInteger> {
        Ok(match self {
            Self::Range(f) => ClosedInteger::Range((*f.query_var(index)?).clone()),
            Self::Binary(f) => ClosedInteger::Binary((*f.query_var(index)?).clone()),
        })
    }
}

impl From<RangeFamily> for IntegerFamily {
    fn from(family: RangeFamily) -> Self {
        Self::Range(family)
    }
}

impl From<BinaryFamily> for IntegerFamily {
    fn from(family: BinaryFamily) -> Self {
        Self::Binary(family)
    }
}
