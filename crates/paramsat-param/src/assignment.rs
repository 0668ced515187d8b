//! Concrete and symbolic bindings of parameter names.

use crate::expression::PExpression;
use paramsat_base::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A partial mapping from parameter names to integer values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<String, i64>,
}

impl Assignment {
    /// Creates an empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Result<i64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedParameter(name.to_string()))
    }

    /// Returns the value bound to `name`, if any.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// Returns whether `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Binds `name`, returning the previous value.
    pub fn put(&mut self, name: impl Into<String>, value: i64) -> Option<i64> {
        self.values.insert(name.into(), value)
    }

    /// Unbinds `name`. Unbinding an unbound name is an error.
    pub fn remove(&mut self, name: &str) -> Result<i64> {
        self.values
            .remove(name)
            .ok_or_else(|| Error::UndefinedParameter(name.to_string()))
    }

    /// Returns a copy of this assignment with `name` bound to `value`.
    #[must_use]
    pub fn extended(&self, name: &str, value: i64) -> Self {
        let mut next = self.clone();
        next.put(name, value);
        next
    }

    /// Iterates over the bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Returns the number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

/// A partial mapping from parameter names to symbolic expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: BTreeMap<String, PExpression>,
}

impl Substitution {
    /// Creates an empty substitution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns every binding of an assignment into a constant.
    #[must_use]
    pub fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            bindings: assignment
                .iter()
                .map(|(name, value)| (name.to_string(), PExpression::Constant(value)))
                .collect(),
        }
    }

    /// Returns the expression bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PExpression> {
        self.bindings.get(name)
    }

    /// Binds `name`, returning the previous expression.
    pub fn put(&mut self, name: impl Into<String>, expr: PExpression) -> Option<PExpression> {
        self.bindings.insert(name.into(), expr)
    }

    /// Unbinds `name`.
    pub fn remove(&mut self, name: &str) -> Option<PExpression> {
        self.bindings.remove(name)
    }

    /// Returns a copy without the given names; used when descending under
    /// binders that shadow them.
    #[must_use]
    pub fn without<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut next = self.clone();
        for name in names {
            next.bindings.remove(name);
        }
        next
    }

    /// Returns whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_undefined_is_error() {
        let a = Assignment::new();
        assert!(matches!(a.get("i"), Err(Error::UndefinedParameter(n)) if n == "i"));
    }

    #[test]
    fn test_remove_undefined_is_error() {
        let mut a = Assignment::new();
        a.put("i", 3);
        assert_eq!(a.remove("i").unwrap(), 3);
        assert!(a.remove("i").is_err());
    }

    #[test]
    fn test_extended_leaves_original() {
        let mut a = Assignment::new();
        a.put("i", 1);
        let b = a.extended("i", 2).extended("j", 5);
        assert_eq!(a.get("i").unwrap(), 1);
        assert!(!a.contains("j"));
        assert_eq!(b.get("i").unwrap(), 2);
        assert_eq!(b.to_string(), "{i=2, j=5}");
    }

    #[test]
    fn test_substitution_from_assignment() {
        let a: Assignment = [("n", 4)].into_iter().collect();
        let s = Substitution::from_assignment(&a);
        assert_eq!(s.get("n"), Some(&PExpression::Constant(4)));
        assert!(s.without(["n"]).is_empty());
    }
}
