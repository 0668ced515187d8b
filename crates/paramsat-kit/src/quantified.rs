//! Integer terms and atoms that may still mention free parameters.
//!
//! These mirror [`ClosedInteger`] and [`Atom`] but keep parameter
//! expressions symbolic. `substitute` only rewrites, `instantiate` evaluates
//! everything against an assignment and yields closed terms.

use crate::binary::BinaryVariable;
use crate::family::{BoolFamily, IntegerFamily};
use crate::integer::{ClosedInteger, Kind};
use crate::range::RangeVariable;
use paramsat_base::{Atom, Error, Result};
use paramsat_param::{Assignment, PExpression, ParameterList, Substitution};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

fn evaluate_indices(indices: &[PExpression], assignment: &Assignment) -> Result<Vec<i64>> {
    indices.iter().map(|e| e.evaluate(assignment)).collect()
}

fn write_indices(f: &mut fmt::Formatter<'_>, name: &str, indices: &[PExpression]) -> fmt::Result {
    write!(f, "{name}[")?;
    for (i, e) in indices.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{e}")?;
    }
    f.write_str("]")
}

/// A literal, possibly a member of a boolean family at symbolic indices.
#[derive(Debug, Clone)]
pub enum QuantifiedAtom {
    Atom(Atom),
    Member {
        family: BoolFamily,
        indices: Vec<PExpression>,
        positive: bool,
    },
}

impl QuantifiedAtom {
    #[must_use]
    pub fn member(family: &BoolFamily, indices: Vec<PExpression>) -> Self {
        Self::Member {
            family: family.clone(),
            indices,
            positive: true,
        }
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        match self {
            Self::Atom(a) => Self::Atom(!a),
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

    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        match self {
            Self::Atom(_) => self.clone(),
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

    /// The concrete literal. Members outside the family's domain are `¬⊤`
    /// (or `⊤` when negated).
    pub fn instantiate(&self, assignment: &Assignment) -> Result<Atom> {
        match self {
            Self::Atom(a) => Ok(a.clone()),
            Self::Member {
                family,
                indices,
                positive,
            } => {
                let atom = family.atom_or_false(&evaluate_indices(indices, assignment)?)?;
                Ok(if *positive { atom } else { !atom })
            }
        }
    }

    #[must_use]
    pub fn query_parameters(&self) -> BTreeSet<String> {
        match self {
            Self::Atom(_) => BTreeSet::new(),
            Self::Member { indices, .. } => {
                indices.iter().flat_map(PExpression::query_parameters).collect()
            }
        }
    }
}

impl From<Atom> for QuantifiedAtom {
    fn from(atom: Atom) -> Self {
        Self::Atom(atom)
    }
}

impl fmt::Display for QuantifiedAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(a) => write!(f, "{a}"),
            Self::Member {
                family,
                indices,
                positive,
            } => {
                if !positive {
                    f.write_str("¬")?;
                }
                write_indices(f, family.name(), indices)
            }
        }
    }
}

/// An integer term that may mention free parameters.
#[derive(Debug, Clone)]
pub enum QuantifiedInteger {
    Closed(ClosedInteger),
    Constant(PExpression),
    Member {
        family: IntegerFamily,
        indices: Vec<PExpression>,
    },
    Plus(Box<QuantifiedInteger>, Box<QuantifiedInteger>),
    Conditional {
        condition: QuantifiedAtom,
        then: Box<QuantifiedInteger>,
        otherwise: Box<QuantifiedInteger>,
    },
    Sum(Rc<QuantifiedSum>),
}

impl QuantifiedInteger {
    #[must_use]
    pub fn member(family: &IntegerFamily, indices: Vec<PExpression>) -> Self {
        Self::Member {
            family: family.clone(),
            indices,
        }
    }

    /// `left + right`; mixing range and binary terms is rejected here.
    pub fn plus(left: Self, right: Self) -> Result<Self> {
        left.kind().combine(right.kind())?;
        Ok(Self::Plus(Box::new(left), Box::new(right)))
    }

    /// `condition ? then : otherwise`.
    pub fn conditional(condition: QuantifiedAtom, then: Self, otherwise: Self) -> Result<Self> {
        then.kind().combine(otherwise.kind())?;
        Ok(Self::Conditional {
            condition,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    /// `Σ { body | params }`.
    #[must_use]
    pub fn sum(params: ParameterList, body: Self) -> Self {
        Self::Sum(Rc::new(QuantifiedSum::new(params, body)))
    }

    /// Which encodings can express the term, known before instantiation.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Closed(c) => c.kind(),
            Self::Constant(_) => Kind::Both,
            Self::Member { family, .. } => match family {
                IntegerFamily::Range(_) => Kind::Range,
                IntegerFamily::Binary(_) => Kind::Binary,
            },
            // Operands were checked on construction.
            Self::Plus(l, r) => l.kind().combine(r.kind()).unwrap_or(Kind::Both),
            Self::Conditional {
                then, otherwise, ..
            } => then.kind().combine(otherwise.kind()).unwrap_or(Kind::Both),
            Self::Sum(s) => s.body.kind(),
        }
    }

    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        match self {
            Self::Closed(_) => self.clone(),
            Self::Constant(e) => Self::Constant(e.substitute(subst)),
            Self::Member { family, indices } => Self::Member {
                family: family.clone(),
                indices: indices.iter().map(|e| e.substitute(subst)).collect(),
            },
            Self::Plus(l, r) => Self::Plus(Box::new(l.substitute(subst)), Box::new(r.substitute(subst))),
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => Self::Conditional {
                condition: condition.substitute(subst),
                then: Box::new(then.substitute(subst)),
                otherwise: Box::new(otherwise.substitute(subst)),
            },
            Self::Sum(s) => Self::Sum(Rc::new(s.substitute(subst))),
        }
    }

    /// Evaluates every parameter and returns the closed term. Constant
    /// sub-terms fold on the way up.
    pub fn instantiate(&self, assignment: &Assignment) -> Result<ClosedInteger> {
        match self {
            Self::Closed(c) => Ok(c.clone()),
            Self::Constant(e) => Ok(ClosedInteger::Constant(e.evaluate(assignment)?)),
            Self::Member { family, indices } => {
                family.query_var(&evaluate_indices(indices, assignment)?)
            }
            Self::Plus(l, r) => {
                ClosedInteger::plus(l.instantiate(assignment)?, r.instantiate(assignment)?)
            }
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => ClosedInteger::conditional(
                condition.instantiate(assignment)?,
                then.instantiate(assignment)?,
                otherwise.instantiate(assignment)?,
            ),
            Self::Sum(s) => s.instantiate(assignment),
        }
    }

    /// Free parameter names.
    #[must_use]
    pub fn query_parameters(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_parameters(&mut out);
        out
    }

    fn collect_parameters(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Closed(_) => {}
            Self::Constant(e) => out.extend(e.query_parameters()),
            Self::Member { indices, .. } => {
                for e in indices {
                    out.extend(e.query_parameters());
                }
            }
            Self::Plus(l, r) => {
                l.collect_parameters(out);
                r.collect_parameters(out);
            }
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => {
                out.extend(condition.query_parameters());
                then.collect_parameters(out);
                otherwise.collect_parameters(out);
            }
            Self::Sum(s) => out.extend(s.query_parameters()),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.query_parameters().is_empty()
    }
}

impl fmt::Display for QuantifiedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(c) => write!(f, "{c}"),
            Self::Constant(e) => write!(f, "{e}"),
            Self::Member { family, indices } => write_indices(f, family.name(), indices),
            Self::Plus(l, r) => write!(f, "({l}+{r})"),
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => write!(f, "({condition} ? {then} : {otherwise})"),
            Self::Sum(s) => write!(f, "{s}"),
        }
    }
}

impl From<ClosedInteger> for QuantifiedInteger {
    fn from(value: ClosedInteger) -> Self {
        Self::Closed(value)
    }
}

impl From<RangeVariable> for QuantifiedInteger {
    fn from(value: RangeVariable) -> Self {
        Self::Closed(value.into())
    }
}

impl From<BinaryVariable> for QuantifiedInteger {
    fn from(value: BinaryVariable) -> Self {
        Self::Closed(value.into())
    }
}

impl From<PExpression> for QuantifiedInteger {
    fn from(value: PExpression) -> Self {
        Self::Constant(value)
    }
}

impl From<i64> for QuantifiedInteger {
    fn from(value: i64) -> Self {
        Self::Closed(ClosedInteger::Constant(value))
    }
}

/// `Σ { body | params }` over every valid tuple of `params`.
#[derive(Debug, Clone)]
pub struct QuantifiedSum {
    params: ParameterList,
    body: QuantifiedInteger,
}

impl QuantifiedSum {
    #[must_use]
    pub fn new(params: ParameterList, body: QuantifiedInteger) -> Self {
        Self { params, body }
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterList {
        &self.params
    }

    #[must_use]
    pub fn body(&self) -> &QuantifiedInteger {
        &self.body
    }

    /// Free names of the body and of the bounds, minus the summation
    /// indices themselves.
    #[must_use]
    pub fn query_parameters(&self) -> BTreeSet<String> {
        let mut out = self.body.query_parameters();
        out.extend(self.params.query_parameters());
        for name in self.params.names() {
            out.remove(name);
        }
        out
    }

    /// Substitutes free names; the summation indices shadow `subst`.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        let inner = subst.without(self.params.names());
        Self {
            params: self.params.substitute(subst),
            body: self.body.substitute(&inner),
        }
    }

    /// Sums the body over every tuple.
    ///
    /// Constant summands are added up front; the remaining terms are folded
    /// as a balanced tree so the adder depth grows with `log n`.
    pub fn instantiate(&self, outer: &Assignment) -> Result<ClosedInteger> {
        let mut constant: i64 = 0;
        let mut terms = Vec::new();
        self.params.for_each_assignment(outer, &mut |assignment| {
            let term = self.body.instantiate(assignment)?;
            match term.as_constant() {
                Some(v) => {
                    constant = constant
                        .checked_add(v)
                        .ok_or_else(|| Error::invalid(format!("integer overflow in {self}")))?;
                }
                None => terms.push(term),
            }
            Ok(())
        })?;
        tracing::trace!("Sum {} has {} variable summands", self, terms.len());
        if constant != 0 {
            terms.push(ClosedInteger::Constant(constant));
        }
        balanced_sum(terms)
    }
}

fn balanced_sum(mut terms: Vec<ClosedInteger>) -> Result<ClosedInteger> {
    match terms.len() {
        0 => Ok(ClosedInteger::Constant(0)),
        1 => Ok(terms.swap_remove(0)),
        n => {
            let right = terms.split_off(n / 2);
            ClosedInteger::plus(balanced_sum(terms)?, balanced_sum(right)?)
        }
    }
}

impl fmt::Display for QuantifiedSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Σ{{{} | {}}}", self.body, self.params)
    }
}
