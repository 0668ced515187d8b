//! Unary ("x ≥ v" ladder) integer variables.
//!
//! A variable ranging over `[min, max]` owns one atom per retained value
//! `v ∈ (min, max]`, meaning `x ≥ v`. Values excluded by a restriction get no
//! atom: asking for `x ≥ v` in such a gap returns the next retained threshold
//! above `v`, which has the same meaning.

use paramsat_base::{Atom, ClauseCollection, Error, MemoKey, Result, Solution, VariableRegistry};
use paramsat_param::{Assignment, PConstraint};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A bounded integer in the unary encoding.
#[derive(Clone)]
pub struct RangeVariable {
    inner: Rc<RangeInner>,
}

struct RangeInner {
    name: Rc<str>,
    min: i64,
    max: i64,
    /// Retained values above `min`, each with its `x ≥ v` atom.
    thresholds: BTreeMap<i64, Atom>,
    truth: Atom,
}

impl RangeVariable {
    /// A variable over every value of `min..=max`.
    pub fn new(registry: &VariableRegistry, name: &str, min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(Error::invalid(format!(
                "range variable {name} has an empty domain [{min}, {max}]"
            )));
        }
        Ok(Self::from_values(registry, name, (min..=max).collect()))
    }

    /// A variable over the values of `min..=max` admitted by `restriction`.
    ///
    /// The restriction may mention `value_name` (the variable's own value)
    /// and the names bound in `context`; anything else is rejected.
    pub fn restricted(
        registry: &VariableRegistry,
        name: &str,
        min: i64,
        max: i64,
        restriction: &PConstraint,
        value_name: &str,
        context: &Assignment,
    ) -> Result<Self> {
        for referenced in restriction.query_parameters() {
            if referenced != value_name && !context.contains(&referenced) {
                return Err(Error::invalid(format!(
                    "restriction of {name} refers to {referenced}; only {value_name} is allowed"
                )));
            }
        }
        let mut admitted = Vec::new();
        for value in min..=max {
            if restriction.evaluate(&context.extended(value_name, value))? {
                admitted.push(value);
            }
        }
        if admitted.is_empty() {
            return Err(Error::invalid(format!(
                "range variable {name} has an empty domain: no value of [{min}, {max}] satisfies {restriction}"
            )));
        }
        Ok(Self::from_values(registry, name, admitted))
    }

    /// `values` is sorted and non-empty.
    fn from_values(registry: &VariableRegistry, name: &str, values: Vec<i64>) -> Self {
        let min = values[0];
        let max = values[values.len() - 1];
        let thresholds = values[1..]
            .iter()
            .map(|&v| (v, registry.atom(&format!("{name}≥{v}"))))
            .collect();
        Self {
            inner: Rc::new(RangeInner {
                name: Rc::from(name),
                min,
                max,
                thresholds,
                truth: registry.truth(),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn min(&self) -> i64 {
        self.inner.min
    }

    #[must_use]
    pub fn max(&self) -> i64 {
        self.inner.max
    }

    /// The atom meaning `x ≥ value`.
    #[must_use]
    pub fn geq_atom(&self, value: i64) -> Atom {
        if value <= self.inner.min {
            return self.inner.truth.clone();
        }
        match self.inner.thresholds.range(value..).next() {
            Some((_, atom)) => atom.clone(),
            None => !&self.inner.truth,
        }
    }

    /// Retained values, in increasing order.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        std::iter::once(self.inner.min).chain(self.inner.thresholds.keys().copied())
    }

    /// Monotonicity of the ladder: `x ≥ v → x ≥ v'` for consecutive retained
    /// thresholds `v' < v`.
    pub fn add_well_definedness(&self, col: &mut ClauseCollection) {
        if !col.first_time(MemoKey::WellDefined(Rc::clone(&self.inner.name))) {
            return;
        }
        let atoms: Vec<&Atom> = self.inner.thresholds.values().collect();
        for pair in atoms.windows(2).rev() {
            col.add([!pair[1], pair[0].clone()]);
        }
    }

    /// Reads the value out of a model.
    #[must_use]
    pub fn value(&self, solution: &Solution) -> i64 {
        self.inner
            .thresholds
            .iter()
            .rev()
            .find(|(_, atom)| solution.check_atom(atom))
            .map_or(self.inner.min, |(&v, _)| v)
    }
}

impl fmt::Debug for RangeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeVariable")
            .field("name", &self.inner.name)
            .field("min", &self.inner.min)
            .field("max", &self.inner.max)
            .field("thresholds", &self.inner.thresholds.len())
            .finish()
    }
}

impl fmt::Display for RangeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramsat_param::PExpression;

    #[test]
    fn test_constant_thresholds() {
        let registry = VariableRegistry::new();
        let x = RangeVariable::new(&registry, "x", 1, 5).unwrap();
        for v in -3..=1 {
            assert!(x.geq_atom(v).is_true());
        }
        for v in 6..=9 {
            assert!(x.geq_atom(v).is_false());
        }
        assert_eq!(x.geq_atom(3).to_string(), "x≥3");
    }

    #[test]
    fn test_well_definedness_clauses() {
        let registry = VariableRegistry::new();
        let x = RangeVariable::new(&registry, "x", 1, 5).unwrap();
        let mut col = ClauseCollection::new(&registry);
        x.add_well_definedness(&mut col);
        let rendered: Vec<String> = col.clauses().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["x≥4 ∨ ¬x≥5", "x≥3 ∨ ¬x≥4", "x≥2 ∨ ¬x≥3"]);

        // Emitted once per collection.
        x.add_well_definedness(&mut col);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn test_restriction_collapses_gaps() {
        let registry = VariableRegistry::new();
        let not_three = PConstraint::not_equal(PExpression::param("y"), PExpression::constant(3));
        let y = RangeVariable::restricted(
            &registry,
            "y",
            1,
            5,
            &not_three,
            "y",
            &Assignment::new(),
        )
        .unwrap();
        assert_eq!(y.values().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
        assert_eq!(y.geq_atom(3), y.geq_atom(4));
        assert!(registry.index_of("y≥3").is_none());
    }

    #[test]
    fn test_restriction_tightens_bounds() {
        let registry = VariableRegistry::new();
        let small = PConstraint::less(PExpression::param("z"), PExpression::constant(3));
        let z = RangeVariable::restricted(&registry, "z", 0, 9, &small, "z", &Assignment::new())
            .unwrap();
        assert_eq!((z.min(), z.max()), (0, 2));
        assert!(z.geq_atom(3).is_false());
    }

    #[test]
    fn test_empty_domain() {
        let registry = VariableRegistry::new();
        let never = PConstraint::less(PExpression::param("y"), PExpression::constant(0));
        let err = RangeVariable::restricted(&registry, "y", 1, 5, &never, "y", &Assignment::new());
        assert!(matches!(err, Err(Error::InvalidModel(_))));
        assert!(RangeVariable::new(&registry, "w", 3, 2).is_err());
    }

    #[test]
    fn test_foreign_name_in_restriction() {
        let registry = VariableRegistry::new();
        let k = PConstraint::less(PExpression::param("y"), PExpression::param("n"));
        let err = RangeVariable::restricted(&registry, "y", 1, 5, &k, "y", &Assignment::new());
        assert!(err.is_err());
        let context: Assignment = [("n", 3)].into_iter().collect();
        let ok = RangeVariable::restricted(&registry, "y", 1, 5, &k, "y", &context).unwrap();
        assert_eq!(ok.max(), 2);
    }

    #[test]
    fn test_value() {
        let registry = VariableRegistry::new();
        let x = RangeVariable::new(&registry, "x", 1, 5).unwrap();
        let trues = ["x≥2", "x≥3"].map(|n| registry.index_of(n).unwrap());
        assert_eq!(x.value(&Solution::from_true_indices(trues)), 3);
        assert_eq!(x.value(&Solution::from_true_indices([])), 1);
    }
}
