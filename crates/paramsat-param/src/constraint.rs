//! Boolean conditions over parameters.

use crate::assignment::{Assignment, Substitution};
use crate::expression::PExpression;
use paramsat_base::{Error, Result, Variable};
use std::collections::BTreeSet;
use std::fmt;

/// Resolves boolean program variables while evaluating a constraint.
///
/// Constraints that mention variables can only be evaluated once a model is
/// known; the lookup supplies their values.
pub trait BoolLookup {
    /// Value of a plain boolean variable.
    fn variable(&self, var: &Variable) -> Result<bool>;

    /// Value of a boolean family member.
    fn member(&self, family: &str, index: &[i64]) -> Result<bool>;
}

/// Lookup used when no model exists yet.
struct NoModel;

impl BoolLookup for NoModel {
    fn variable(&self, var: &Variable) -> Result<bool> {
        Err(Error::invalid(format!(
            "variable {var} cannot be evaluated without a model"
        )))
    }

    fn member(&self, family: &str, _index: &[i64]) -> Result<bool> {
        Err(Error::invalid(format!(
            "family {family} cannot be evaluated without a model"
        )))
    }
}

/// A boolean condition over parameters, optionally mentioning program
/// variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PConstraint {
    Top,
    Bottom,
    And(Box<PConstraint>, Box<PConstraint>),
    Or(Box<PConstraint>, Box<PConstraint>),
    Equal(PExpression, PExpression),
    NotEqual(PExpression, PExpression),
    Less(PExpression, PExpression),
    Variable {
        var: Variable,
        positive: bool,
    },
    Member {
        family: String,
        indices: Vec<PExpression>,
        positive: bool,
    },
}

impl PConstraint {
    /// Conjunction with trivial operands folded away.
    #[must_use]
    pub fn and(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Bottom, _) | (_, Self::Bottom) => Self::Bottom,
            (Self::Top, c) | (c, Self::Top) => c,
            (a, b) => Self::And(Box::new(a), Box::new(b)),
        }
    }

    /// Disjunction with trivial operands folded away.
    #[must_use]
    pub fn or(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Top, _) | (_, Self::Top) => Self::Top,
            (Self::Bottom, c) | (c, Self::Bottom) => c,
            (a, b) => Self::Or(Box::new(a), Box::new(b)),
        }
    }

    #[must_use]
    pub fn equal(a: PExpression, b: PExpression) -> Self {
        match (a.as_constant(), b.as_constant()) {
            (Some(x), Some(y)) => Self::from(x == y),
            _ => Self::Equal(a, b),
        }
    }

    #[must_use]
    pub fn not_equal(a: PExpression, b: PExpression) -> Self {
        match (a.as_constant(), b.as_constant()) {
            (Some(x), Some(y)) => Self::from(x != y),
            _ => Self::NotEqual(a, b),
        }
    }

    /// `a < b`.
    #[must_use]
    pub fn less(a: PExpression, b: PExpression) -> Self {
        match (a.as_constant(), b.as_constant()) {
            (Some(x), Some(y)) => Self::from(x < y),
            _ => Self::Less(a, b),
        }
    }

    /// `a ≤ b`, expressed as `a < b + 1`.
    #[must_use]
    pub fn less_eq(a: PExpression, b: PExpression) -> Self {
        Self::less(a, PExpression::sum(b, PExpression::Constant(1)))
    }

    /// `a > b`.
    #[must_use]
    pub fn greater(a: PExpression, b: PExpression) -> Self {
        Self::less(b, a)
    }

    /// `a ≥ b`.
    #[must_use]
    pub fn greater_eq(a: PExpression, b: PExpression) -> Self {
        Self::less_eq(b, a)
    }

    /// A plain boolean program variable.
    #[must_use]
    pub fn variable(var: Variable) -> Self {
        Self::Variable {
            var,
            positive: true,
        }
    }

    /// A member of a boolean family.
    #[must_use]
    pub fn member(family: impl Into<String>, indices: Vec<PExpression>) -> Self {
        Self::Member {
            family: family.into(),
            indices,
            positive: true,
        }
    }

    /// Pushes negation through: `¬(a < b)` becomes `b < a + 1`.
    #[must_use]
    pub fn negate(&self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::And(a, b) => Self::or(a.negate(), b.negate()),
            Self::Or(a, b) => Self::and(a.negate(), b.negate()),
            Self::Equal(a, b) => Self::not_equal(a.clone(), b.clone()),
            Self::NotEqual(a, b) => Self::equal(a.clone(), b.clone()),
            Self::Less(a, b) => Self::less_eq(b.clone(), a.clone()),
            Self::Variable { var, positive } => Self::Variable {
                var: var.clone(),
                positive: !positive,
            },
            Self::Member {
                family,
                indices,
                positive,
            } => Self::Member {
                family: family.clone(),
                indices: indices.clone(),
                positive: !positive,
            },
        }
    }

    /// Evaluates a constraint that mentions no program variables.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<bool> {
        self.evaluate_with(assignment, &NoModel)
    }

    /// Evaluates with program variables resolved through `lookup`.
    pub fn evaluate_with(&self, assignment: &Assignment, lookup: &dyn BoolLookup) -> Result<bool> {
        Ok(match self {
            Self::Top => true,
            Self::Bottom => false,
            Self::And(a, b) => {
                a.evaluate_with(assignment, lookup)? && b.evaluate_with(assignment, lookup)?
            }
            Self::Or(a, b) => {
                a.evaluate_with(assignment, lookup)? || b.evaluate_with(assignment, lookup)?
            }
            Self::Equal(a, b) => a.evaluate(assignment)? == b.evaluate(assignment)?,
            Self::NotEqual(a, b) => a.evaluate(assignment)? != b.evaluate(assignment)?,
            Self::Less(a, b) => a.evaluate(assignment)? < b.evaluate(assignment)?,
            Self::Variable { var, positive } => lookup.variable(var)? == *positive,
            Self::Member {
                family,
                indices,
                positive,
            } => {
                let index = indices
                    .iter()
                    .map(|e| e.evaluate(assignment))
                    .collect::<Result<Vec<_>>>()?;
                lookup.member(family, &index)? == *positive
            }
        })
    }

    /// Replaces bound parameters and simplifies.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        match self {
            Self::Top | Self::Bottom | Self::Variable { .. } => self.clone(),
            Self::And(a, b) => Self::and(a.substitute(subst), b.substitute(subst)),
            Self::Or(a, b) => Self::or(a.substitute(subst), b.substitute(subst)),
            Self::Equal(a, b) => Self::equal(a.substitute(subst), b.substitute(subst)),
            Self::NotEqual(a, b) => Self::not_equal(a.substitute(subst), b.substitute(subst)),
            Self::Less(a, b) => Self::less(a.substitute(subst), b.substitute(subst)),
            Self::Member {
                family,
                indices,
                positive,
            } => Self::Member {
                family: family.clone(),
                indices: indices.iter().map(|e| e.substitute(subst)).collect(),
                positive: *positive,
            },
        }
    }

    /// Substitutes a concrete assignment.
    #[must_use]
    pub fn substitute_assignment(&self, assignment: &Assignment) -> Self {
        self.substitute(&Substitution::from_assignment(assignment))
    }

    /// Returns whether the constraint simplifies to `Top`.
    #[must_use]
    pub fn is_top(&self) -> bool {
        self.substitute(&Substitution::new()) == Self::Top
    }

    /// Returns whether the constraint simplifies to `Bottom`.
    #[must_use]
    pub fn is_bottom(&self) -> bool {
        self.substitute(&Substitution::new()) == Self::Bottom
    }

    /// Names of the parameters this constraint mentions.
    #[must_use]
    pub fn query_parameters(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_parameters(&mut out);
        out
    }

    pub(crate) fn collect_parameters(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Top | Self::Bottom | Self::Variable { .. } => {}
            Self::And(a, b) | Self::Or(a, b) => {
                a.collect_parameters(out);
                b.collect_parameters(out);
            }
            Self::Equal(a, b) | Self::NotEqual(a, b) | Self::Less(a, b) => {
                a.collect_parameters(out);
                b.collect_parameters(out);
            }
            Self::Member { indices, .. } => {
                for e in indices {
                    e.collect_parameters(out);
                }
            }
        }
    }
}

impl From<bool> for PConstraint {
    fn from(value: bool) -> Self {
        if value {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

impl fmt::Display for PConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("true"),
            Self::Bottom => f.write_str("false"),
            Self::And(a, b) => write!(f, "({a} ∧ {b})"),
            Self::Or(a, b) => write!(f, "({a} ∨ {b})"),
            Self::Equal(a, b) => write!(f, "{a} = {b}"),
            Self::NotEqual(a, b) => write!(f, "{a} ≠ {b}"),
            Self::Less(a, b) => write!(f, "{a} < {b}"),
            Self::Variable { var, positive } => {
                if !positive {
                    f.write_str("¬")?;
                }
                write!(f, "{var}")
            }
            Self::Member {
                family,
                indices,
                positive,
            } => {
                if !positive {
                    f.write_str("¬")?;
                }
                write!(f, "{family}[")?;
                for (i, e) in indices.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{e}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramsat_base::VariableRegistry;

    fn p(name: &str) -> PExpression {
        PExpression::param(name)
    }

    fn c(v: i64) -> PExpression {
        PExpression::constant(v)
    }

    struct Fixed;

    impl BoolLookup for Fixed {
        fn variable(&self, var: &Variable) -> Result<bool> {
            Ok(var.name() == "on")
        }

        fn member(&self, _family: &str, index: &[i64]) -> Result<bool> {
            Ok(index.iter().sum::<i64>() % 2 == 0)
        }
    }

    #[test]
    fn test_negate_less() {
        let lt = PConstraint::less(p("i"), p("j"));
        let neg = lt.negate();
        assert_eq!(neg, PConstraint::Less(p("j"), PExpression::sum(p("i"), c(1))));
        for i in 0..3 {
            for j in 0..3 {
                let a: Assignment = [("i", i), ("j", j)].into_iter().collect();
                assert_eq!(lt.evaluate(&a).unwrap(), !neg.evaluate(&a).unwrap());
            }
        }
    }

    #[test]
    fn test_negate_de_morgan() {
        let k = PConstraint::or(
            PConstraint::equal(p("i"), c(1)),
            PConstraint::and(
                PConstraint::not_equal(p("j"), c(0)),
                PConstraint::less(p("i"), p("j")),
            ),
        );
        let neg = k.negate();
        for i in -1..3 {
            for j in -1..3 {
                let a: Assignment = [("i", i), ("j", j)].into_iter().collect();
                assert_eq!(k.evaluate(&a).unwrap(), !neg.evaluate(&a).unwrap());
            }
        }
    }

    #[test]
    fn test_substitute_to_top() {
        let k = PConstraint::less_eq(p("i"), c(4));
        let a: Assignment = [("i", 4)].into_iter().collect();
        assert!(k.substitute_assignment(&a).is_top());
        let b: Assignment = [("i", 5)].into_iter().collect();
        assert!(k.substitute_assignment(&b).is_bottom());
        assert!(!k.is_top());
    }

    #[test]
    fn test_trivial_folding() {
        let k = PConstraint::and(PConstraint::Top, PConstraint::equal(p("i"), c(2)));
        assert_eq!(k, PConstraint::Equal(p("i"), c(2)));
        assert!(PConstraint::or(PConstraint::Top, PConstraint::Bottom).is_top());
    }

    #[test]
    fn test_variables_need_model() {
        let registry = VariableRegistry::new();
        let on = registry.variable("on");
        let k = PConstraint::variable(on);
        assert!(k.evaluate(&Assignment::new()).is_err());
        assert!(k.evaluate_with(&Assignment::new(), &Fixed).unwrap());
        assert!(!k.negate().evaluate_with(&Assignment::new(), &Fixed).unwrap());

        let m = PConstraint::member("x", vec![p("i"), c(1)]);
        let a: Assignment = [("i", 1)].into_iter().collect();
        assert!(m.evaluate_with(&a, &Fixed).unwrap());
        assert_eq!(m.to_string(), "x[i, 1]");
        assert_eq!(m.negate().to_string(), "¬x[i, 1]");
    }

    #[test]
    fn test_query_parameters() {
        let k = PConstraint::and(
            PConstraint::less(p("i"), p("n")),
            PConstraint::member("x", vec![p("j")]),
        );
        let names: Vec<String> = k.query_parameters().into_iter().collect();
        assert_eq!(names, vec!["i", "j", "n"]);
    }
}
