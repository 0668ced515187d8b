//! Ordered parameter declarations with dependent bounds.

use crate::assignment::{Assignment, Substitution};
use crate::constraint::PConstraint;
use crate::expression::PExpression;
use paramsat_base::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// One integer parameter: inclusive bounds plus an optional restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: String,
    min: PExpression,
    max: PExpression,
    restriction: PConstraint,
}

impl Parameter {
    /// A parameter ranging over `min..=max`.
    pub fn new(name: impl Into<String>, min: impl Into<PExpression>, max: impl Into<PExpression>) -> Self {
        Self {
            name: name.into(),
            min: min.into(),
            max: max.into(),
            restriction: PConstraint::Top,
        }
    }

    /// Adds a restriction that values must satisfy. It may mention the
    /// parameter itself.
    #[must_use]
    pub fn with_restriction(mut self, restriction: PConstraint) -> Self {
        self.restriction = restriction;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn min(&self) -> &PExpression {
        &self.min
    }

    #[must_use]
    pub fn max(&self) -> &PExpression {
        &self.max
    }

    #[must_use]
    pub fn restriction(&self) -> &PConstraint {
        &self.restriction
    }

    fn substitute(&self, subst: &Substitution) -> Self {
        let inner = subst.without([self.name.as_str()]);
        Self {
            name: self.name.clone(),
            min: self.min.substitute(subst),
            max: self.max.substitute(subst),
            restriction: self.restriction.substitute(&inner),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ∈ [{}, {}]", self.name, self.min, self.max)?;
        if self.restriction != PConstraint::Top {
            write!(f, " | {}", self.restriction)?;
        }
        Ok(())
    }
}

/// Result of checking a concrete tuple against a parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    /// The tuple is in the domain; carries the outer assignment extended by
    /// every parameter.
    Valid(Assignment),
    /// A value fell outside its bounds.
    OutOfRange { parameter: String },
    /// A value was within bounds but failed the restriction.
    RestrictionViolated { parameter: String },
}

/// An ordered list of parameters whose bounds may refer to earlier ones.
///
/// The list is validated on construction: names are unique and no bound
/// refers to a later parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParameterList {
    params: Vec<Parameter>,
}

impl ParameterList {
    /// Builds and validates a list.
    pub fn new(params: Vec<Parameter>) -> Result<Self> {
        let declared: BTreeSet<&str> = params.iter().map(|p| p.name.as_str()).collect();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for p in &params {
            if seen.contains(p.name.as_str()) {
                return Err(Error::invalid(format!("duplicate parameter {}", p.name)));
            }
            let mut bound_names = p.min.query_parameters();
            bound_names.extend(p.max.query_parameters());
            for name in &bound_names {
                if declared.contains(name.as_str()) && !seen.contains(name.as_str()) {
                    return Err(Error::invalid(format!(
                        "bounds of parameter {} refer to {name}, which is not declared before it",
                        p.name
                    )));
                }
            }
            seen.insert(p.name.as_str());
            for name in &p.restriction.query_parameters() {
                if declared.contains(name.as_str()) && !seen.contains(name.as_str()) {
                    return Err(Error::invalid(format!(
                        "restriction of parameter {} refers to later parameter {name}",
                        p.name
                    )));
                }
            }
        }
        Ok(Self { params })
    }

    /// The empty list; its only assignment is the outer one.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Names mentioned by bounds or restrictions that the list itself does
    /// not declare.
    #[must_use]
    pub fn query_parameters(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for p in &self.params {
            p.min.collect_parameters(&mut out);
            p.max.collect_parameters(&mut out);
            p.restriction.collect_parameters(&mut out);
        }
        for p in &self.params {
            out.remove(&p.name);
        }
        out
    }

    /// Substitutes free names; declared names shadow the substitution from
    /// their declaration on.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        let mut current = subst.clone();
        let mut params = Vec::with_capacity(self.params.len());
        for p in &self.params {
            params.push(p.substitute(&current));
            current.remove(&p.name);
        }
        Self { params }
    }

    /// Calls `visit` with `outer` extended by every tuple in the domain, in
    /// lexicographic order.
    pub fn for_each_assignment(
        &self,
        outer: &Assignment,
        visit: &mut dyn FnMut(&Assignment) -> Result<()>,
    ) -> Result<()> {
        self.enumerate(0, outer, visit)
    }

    fn enumerate(
        &self,
        depth: usize,
        current: &Assignment,
        visit: &mut dyn FnMut(&Assignment) -> Result<()>,
    ) -> Result<()> {
        let Some(p) = self.params.get(depth) else {
            return visit(current);
        };
        let lo = p.min.evaluate(current)?;
        let hi = p.max.evaluate(current)?;
        for value in lo..=hi {
            let next = current.extended(&p.name, value);
            if p.restriction.evaluate(&next)? {
                self.enumerate(depth + 1, &next, visit)?;
            }
        }
        Ok(())
    }

    /// Every assignment of the domain, in lexicographic order.
    pub fn assignments(&self, outer: &Assignment) -> Result<Vec<Assignment>> {
        let mut out = Vec::new();
        self.for_each_assignment(outer, &mut |a| {
            out.push(a.clone());
            Ok(())
        })?;
        Ok(out)
    }

    /// Checks a tuple against the domain.
    pub fn membership(&self, values: &[i64], outer: &Assignment) -> Result<Membership> {
        if values.len() != self.params.len() {
            return Err(Error::invalid(format!(
                "expected {} indices, got {}",
                self.params.len(),
                values.len()
            )));
        }
        let mut current = outer.clone();
        for (p, &value) in self.params.iter().zip(values) {
            let lo = p.min.evaluate(&current)?;
            let hi = p.max.evaluate(&current)?;
            if value < lo || value > hi {
                return Ok(Membership::OutOfRange {
                    parameter: p.name.clone(),
                });
            }
            current.put(p.name.as_str(), value);
            if !p.restriction.evaluate(&current)? {
                return Ok(Membership::RestrictionViolated {
                    parameter: p.name.clone(),
                });
            }
        }
        Ok(Membership::Valid(current))
    }
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> PExpression {
        PExpression::param(name)
    }

    fn c(v: i64) -> PExpression {
        PExpression::constant(v)
    }

    fn triangle() -> ParameterList {
        // i ∈ [0, 2], j ∈ [i, 2]
        ParameterList::new(vec![Parameter::new("i", c(0), c(2)), Parameter::new("j", p("i"), c(2))]).unwrap()
    }

    #[test]
    fn test_dependent_enumeration() {
        let list = triangle();
        let tuples: Vec<(i64, i64)> = list
            .assignments(&Assignment::new())
            .unwrap()
            .iter()
            .map(|a| (a.get("i").unwrap(), a.get("j").unwrap()))
            .collect();
        assert_eq!(tuples, vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_empty_list_has_one_assignment() {
        let outer: Assignment = [("n", 3)].into_iter().collect();
        let all = ParameterList::empty().assignments(&outer).unwrap();
        assert_eq!(all, vec![outer]);
    }

    #[test]
    fn test_empty_range() {
        let list = ParameterList::new(vec![Parameter::new("i", c(3), c(1))]).unwrap();
        assert!(list.assignments(&Assignment::new()).unwrap().is_empty());
    }

    #[test]
    fn test_restriction_filters() {
        let even = PConstraint::equal(PExpression::modulo(p("i"), c(2)), c(0));
        let list = ParameterList::new(vec![Parameter::new("i", c(0), c(5)).with_restriction(even)]).unwrap();
        let values: Vec<i64> = list
            .assignments(&Assignment::new())
            .unwrap()
            .iter()
            .map(|a| a.get("i").unwrap())
            .collect();
        assert_eq!(values, vec![0, 2, 4]);
        assert_eq!(
            list.membership(&[3], &Assignment::new()).unwrap(),
            Membership::RestrictionViolated {
                parameter: "i".to_string()
            }
        );
    }

    #[test]
    fn test_validation() {
        let dup = ParameterList::new(vec![Parameter::new("i", c(0), c(1)), Parameter::new("i", c(0), c(1))]);
        assert!(dup.is_err());
        let forward =
            ParameterList::new(vec![Parameter::new("i", c(0), p("j")), Parameter::new("j", c(0), c(1))]);
        assert!(forward.is_err());
        let external = ParameterList::new(vec![Parameter::new("i", c(0), p("n"))]).unwrap();
        assert_eq!(
            external.query_parameters().into_iter().collect::<Vec<_>>(),
            vec!["n"]
        );
    }

    #[test]
    fn test_membership() {
        let list = triangle();
        let outer = Assignment::new();
        assert!(matches!(list.membership(&[1, 2], &outer).unwrap(), Membership::Valid(_)));
        assert_eq!(
            list.membership(&[2, 1], &outer).unwrap(),
            Membership::OutOfRange {
                parameter: "j".to_string()
            }
        );
        assert_eq!(
            list.membership(&[3, 3], &outer).unwrap(),
            Membership::OutOfRange {
                parameter: "i".to_string()
            }
        );
        assert!(list.membership(&[1], &outer).is_err());
    }

    #[test]
    fn test_external_bound_needs_outer() {
        let list = ParameterList::new(vec![Parameter::new("i", c(1), p("n"))]).unwrap();
        assert!(list.assignments(&Assignment::new()).is_err());
        let outer: Assignment = [("n", 2)].into_iter().collect();
        assert_eq!(list.assignments(&outer).unwrap().len(), 2);

        let mut subst = Substitution::new();
        subst.put("n", PExpression::constant(4));
        let closed = list.substitute(&subst);
        assert!(closed.query_parameters().is_empty());
        assert_eq!(closed.assignments(&Assignment::new()).unwrap().len(), 4);
    }
}
