//! Integer expressions over parameters.
//!
//! The constructor functions (`sum`, `product`, ...) fold constants and drop
//! neutral elements, so substituting a full assignment always yields a
//! [`PExpression::Constant`].

use crate::assignment::{Assignment, Substitution};
use crate::function::IntFunction;
use paramsat_base::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// An integer-valued expression over parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PExpression {
    Constant(i64),
    Parameter(String),
    Sum(Box<PExpression>, Box<PExpression>),
    Product(Box<PExpression>, Box<PExpression>),
    /// Integer division truncating toward zero.
    Div(Box<PExpression>, Box<PExpression>),
    Mod(Box<PExpression>, Box<PExpression>),
    Min(Box<PExpression>, Box<PExpression>),
    Max(Box<PExpression>, Box<PExpression>),
    Apply(IntFunction, Vec<PExpression>),
}

impl PExpression {
    #[must_use]
    pub fn constant(value: i64) -> Self {
        Self::Constant(value)
    }

    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Parameter(name.into())
    }

    /// `a + b`.
    #[must_use]
    pub fn sum(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Constant(x), Self::Constant(y)) => match x.checked_add(y) {
                Some(v) => Self::Constant(v),
                None => Self::Sum(Box::new(Self::Constant(x)), Box::new(Self::Constant(y))),
            },
            (Self::Constant(0), e) | (e, Self::Constant(0)) => e,
            // (e + c1) + c2  =>  e + (c1 + c2)
            (Self::Sum(e, inner), Self::Constant(c2)) => match *inner {
                Self::Constant(c1) if c1.checked_add(c2).is_some() => {
                    Self::sum(*e, Self::Constant(c1 + c2))
                }
                other => Self::Sum(
                    Box::new(Self::Sum(e, Box::new(other))),
                    Box::new(Self::Constant(c2)),
                ),
            },
            (Self::Constant(c), e) => Self::sum(e, Self::Constant(c)),
            (a, b) => Self::Sum(Box::new(a), Box::new(b)),
        }
    }

    /// `a - b`.
    #[must_use]
    pub fn difference(a: Self, b: Self) -> Self {
        Self::sum(a, Self::product(Self::Constant(-1), b))
    }

    /// `a * b`.
    #[must_use]
    pub fn product(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Constant(x), Self::Constant(y)) => match x.checked_mul(y) {
                Some(v) => Self::Constant(v),
                None => Self::Product(Box::new(Self::Constant(x)), Box::new(Self::Constant(y))),
            },
            (Self::Constant(0), _) | (_, Self::Constant(0)) => Self::Constant(0),
            (Self::Constant(1), e) | (e, Self::Constant(1)) => e,
            (a, b) => Self::Product(Box::new(a), Box::new(b)),
        }
    }

    /// `a / b`, truncating.
    #[must_use]
    pub fn div(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Constant(x), Self::Constant(y)) if y != 0 => match x.checked_div(y) {
                Some(v) => Self::Constant(v),
                None => Self::Div(Box::new(Self::Constant(x)), Box::new(Self::Constant(y))),
            },
            (e, Self::Constant(1)) => e,
            (a, b) => Self::Div(Box::new(a), Box::new(b)),
        }
    }

    /// `a % b`, with the sign of `a`.
    #[must_use]
    pub fn modulo(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Constant(x), Self::Constant(y)) if y != 0 => match x.checked_rem(y) {
                Some(v) => Self::Constant(v),
                None => Self::Mod(Box::new(Self::Constant(x)), Box::new(Self::Constant(y))),
            },
            (a, b) => Self::Mod(Box::new(a), Box::new(b)),
        }
    }

    #[must_use]
    pub fn min(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Constant(x), Self::Constant(y)) => Self::Constant(x.min(y)),
            (a, b) if a == b => a,
            (a, b) => Self::Min(Box::new(a), Box::new(b)),
        }
    }

    #[must_use]
    pub fn max(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Constant(x), Self::Constant(y)) => Self::Constant(x.max(y)),
            (a, b) if a == b => a,
            (a, b) => Self::Max(Box::new(a), Box::new(b)),
        }
    }

    /// Applies a table function; folds when every argument is constant and
    /// the function is defined there.
    #[must_use]
    pub fn apply(function: IntFunction, args: Vec<Self>) -> Self {
        let constants: Option<Vec<i64>> = args.iter().map(Self::as_constant).collect();
        if let Some(values) = constants {
            if let Ok(v) = function.apply(&values) {
                return Self::Constant(v);
            }
        }
        Self::Apply(function, args)
    }

    /// Returns the value if this is a constant.
    #[must_use]
    pub fn as_constant(&self) -> Option<i64> {
        match self {
            Self::Constant(v) => Some(*v),
            _ => None,
        }
    }

    /// Evaluates under a concrete assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<i64> {
        let overflow = || Error::invalid(format!("integer overflow evaluating {self}"));
        match self {
            Self::Constant(v) => Ok(*v),
            Self::Parameter(name) => assignment.get(name),
            Self::Sum(a, b) => a
                .evaluate(assignment)?
                .checked_add(b.evaluate(assignment)?)
                .ok_or_else(overflow),
            Self::Product(a, b) => a
                .evaluate(assignment)?
                .checked_mul(b.evaluate(assignment)?)
                .ok_or_else(overflow),
            Self::Div(a, b) => {
                let (x, y) = (a.evaluate(assignment)?, b.evaluate(assignment)?);
                if y == 0 {
                    return Err(Error::invalid(format!("division by zero in {self}")));
                }
                x.checked_div(y).ok_or_else(overflow)
            }
            Self::Mod(a, b) => {
                let (x, y) = (a.evaluate(assignment)?, b.evaluate(assignment)?);
                if y == 0 {
                    return Err(Error::invalid(format!("modulo by zero in {self}")));
                }
                x.checked_rem(y).ok_or_else(overflow)
            }
            Self::Min(a, b) => Ok(a.evaluate(assignment)?.min(b.evaluate(assignment)?)),
            Self::Max(a, b) => Ok(a.evaluate(assignment)?.max(b.evaluate(assignment)?)),
            Self::Apply(function, args) => {
                let values = args
                    .iter()
                    .map(|a| a.evaluate(assignment))
                    .collect::<Result<Vec<_>>>()?;
                function.apply(&values)
            }
        }
    }

    /// Replaces bound parameters and simplifies.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        match self {
            Self::Constant(v) => Self::Constant(*v),
            Self::Parameter(name) => subst.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Sum(a, b) => Self::sum(a.substitute(subst), b.substitute(subst)),
            Self::Product(a, b) => Self::product(a.substitute(subst), b.substitute(subst)),
            Self::Div(a, b) => Self::div(a.substitute(subst), b.substitute(subst)),
            Self::Mod(a, b) => Self::modulo(a.substitute(subst), b.substitute(subst)),
            Self::Min(a, b) => Self::min(a.substitute(subst), b.substitute(subst)),
            Self::Max(a, b) => Self::max(a.substitute(subst), b.substitute(subst)),
            Self::Apply(function, args) => Self::apply(
                function.clone(),
                args.iter().map(|a| a.substitute(subst)).collect(),
            ),
        }
    }

    /// Substitutes a concrete assignment.
    #[must_use]
    pub fn substitute_assignment(&self, assignment: &Assignment) -> Self {
        self.substitute(&Substitution::from_assignment(assignment))
    }

    /// Names of the parameters this expression mentions.
    #[must_use]
    pub fn query_parameters(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_parameters(&mut out);
        out
    }

    pub(crate) fn collect_parameters(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Constant(_) => {}
            Self::Parameter(name) => {
                out.insert(name.clone());
            }
            Self::Sum(a, b)
            | Self::Product(a, b)
            | Self::Div(a, b)
            | Self::Mod(a, b)
            | Self::Min(a, b)
            | Self::Max(a, b) => {
                a.collect_parameters(out);
                b.collect_parameters(out);
            }
            Self::Apply(_, args) => {
                for arg in args {
                    arg.collect_parameters(out);
                }
            }
        }
    }
}

impl From<i64> for PExpression {
    fn from(value: i64) -> Self {
        Self::Constant(value)
    }
}

impl From<&str> for PExpression {
    fn from(name: &str) -> Self {
        Self::Parameter(name.to_string())
    }
}

impl fmt::Display for PExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Parameter(name) => f.write_str(name),
            Self::Sum(a, b) => write!(f, "({a} + {b})"),
            Self::Product(a, b) => write!(f, "({a} * {b})"),
            Self::Div(a, b) => write!(f, "({a} / {b})"),
            Self::Mod(a, b) => write!(f, "({a} % {b})"),
            Self::Min(a, b) => write!(f, "min({a}, {b})"),
            Self::Max(a, b) => write!(f, "max({a}, {b})"),
            Self::Apply(function, args) => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
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

    #[test]
    fn test_constant_folding() {
        assert_eq!(PExpression::sum(c(2), c(3)), c(5));
        assert_eq!(PExpression::product(c(4), c(-2)), c(-8));
        assert_eq!(PExpression::div(c(-7), c(2)), c(-3));
        assert_eq!(PExpression::modulo(c(-7), c(2)), c(-1));
        assert_eq!(PExpression::min(c(1), c(9)), c(1));
        assert_eq!(PExpression::max(c(1), c(9)), c(9));
    }

    #[test]
    fn test_neutral_elements() {
        assert_eq!(PExpression::sum(p("i"), c(0)), p("i"));
        assert_eq!(PExpression::product(c(1), p("i")), p("i"));
        assert_eq!(PExpression::product(p("i"), c(0)), c(0));
        assert_eq!(PExpression::div(p("i"), c(1)), p("i"));
    }

    #[test]
    fn test_nested_constant_offsets_merge() {
        let e = PExpression::sum(PExpression::sum(p("i"), c(1)), c(2));
        assert_eq!(e, PExpression::sum(p("i"), c(3)));
        assert_eq!(e.to_string(), "(i + 3)");
        let back = PExpression::sum(PExpression::sum(p("i"), c(1)), c(-1));
        assert_eq!(back, p("i"));
    }

    #[test]
    fn test_substitute_full_assignment_is_constant() {
        let e = PExpression::max(
            PExpression::difference(p("n"), p("i")),
            PExpression::product(p("i"), c(2)),
        );
        let a: Assignment = [("n", 10), ("i", 3)].into_iter().collect();
        assert_eq!(e.substitute_assignment(&a), c(7));
        assert_eq!(e.evaluate(&a).unwrap(), 7);
    }

    #[test]
    fn test_partial_substitution() {
        let e = PExpression::sum(p("i"), p("j"));
        let a: Assignment = [("i", 2)].into_iter().collect();
        let s = e.substitute_assignment(&a);
        assert_eq!(s.query_parameters(), BTreeSet::from(["j".to_string()]));
        assert!(s.evaluate(&Assignment::new()).is_err());
    }

    #[test]
    fn test_evaluate_errors() {
        assert!(matches!(
            p("k").evaluate(&Assignment::new()),
            Err(Error::UndefinedParameter(_))
        ));
        let a: Assignment = [("k", 0)].into_iter().collect();
        assert!(PExpression::div(c(1), p("k")).evaluate(&a).is_err());
    }

    #[test]
    fn test_apply_folds() {
        let f = IntFunction::from_table("sq", 1, (0..4).map(|i| (vec![i], i * i)), None).unwrap();
        let e = PExpression::apply(f.clone(), vec![p("i")]);
        assert_eq!(e.to_string(), "sq(i)");
        let a: Assignment = [("i", 3)].into_iter().collect();
        assert_eq!(e.substitute_assignment(&a), c(9));
        // Outside the table the application stays symbolic.
        let b: Assignment = [("i", 8)].into_iter().collect();
        assert_eq!(
            e.substitute_assignment(&b),
            PExpression::Apply(f, vec![c(8)])
        );
    }
}
