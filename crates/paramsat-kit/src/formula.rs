//! Boolean formulas over atoms and integer comparisons, and their
//! definitional (Tseitin) encoding.
//!
//! A formula is first instantiated: quantifiers expand into conjunctions and
//! disjunctions of their instances, family members resolve to atoms and
//! integer terms become [`ClosedInteger`]s. Emission then works on the
//! ground formula.
//!
//! Composite sub-formulas that must be referenced by a single literal get a
//! definitional atom named `⟦F⟧` after the canonical rendering of `F`. Only
//! the direction that is needed is defined:
//!
//! - `⟦F⟧ → F` when `F` occurs positively (inside `Or`, right of `→`),
//! - `F → ⟦F⟧` when it occurs negatively (left of `→`),
//! - both inside `↔`.
//!
//! Each direction is emitted at most once per [`ClauseCollection`].

use crate::gadgets::guarded;
use crate::integer::{emit_comparison, Relation};
use crate::quantified::{QuantifiedAtom, QuantifiedInteger};
use paramsat_base::{Atom, ClauseCollection, Error, MemoKey, Result};
use paramsat_param::{Assignment, PConstraint, ParameterList, Substitution};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// A boolean formula.
#[derive(Debug, Clone)]
pub enum Formula {
    Atom(QuantifiedAtom),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    Compare {
        relation: Relation,
        left: QuantifiedInteger,
        right: QuantifiedInteger,
    },
    /// Conjunction of `body` over every tuple of `params`.
    Forall {
        params: ParameterList,
        body: Box<Formula>,
    },
    /// Disjunction of `body` over every tuple of `params`.
    Exists {
        params: ParameterList,
        body: Box<Formula>,
    },
    /// A condition on parameters alone; true or false once they are bound.
    Condition(PConstraint),
}

impl Formula {
    pub fn atom(atom: impl Into<QuantifiedAtom>) -> Self {
        Self::Atom(atom.into())
    }

    #[must_use]
    pub fn and(parts: Vec<Self>) -> Self {
        Self::And(parts)
    }

    #[must_use]
    pub fn or(parts: Vec<Self>) -> Self {
        Self::Or(parts)
    }

    #[must_use]
    pub fn implies(premise: Self, conclusion: Self) -> Self {
        Self::Implies(Box::new(premise), Box::new(conclusion))
    }

    #[must_use]
    pub fn iff(left: Self, right: Self) -> Self {
        Self::Iff(Box::new(left), Box::new(right))
    }

    /// The empty conjunction.
    #[must_use]
    pub fn truth() -> Self {
        Self::And(Vec::new())
    }

    /// The empty disjunction.
    #[must_use]
    pub fn falsity() -> Self {
        Self::Or(Vec::new())
    }

    /// `left relation right`; fails when one side is range-only and the
    /// other binary-only.
    pub fn compare(
        relation: Relation,
        left: impl Into<QuantifiedInteger>,
        right: impl Into<QuantifiedInteger>,
    ) -> Result<Self> {
        let (left, right) = (left.into(), right.into());
        left.kind().combine(right.kind())?;
        Ok(Self::Compare {
            relation,
            left,
            right,
        })
    }

    pub fn geq(left: impl Into<QuantifiedInteger>, right: impl Into<QuantifiedInteger>) -> Result<Self> {
        Self::compare(Relation::Geq, left, right)
    }

    pub fn gt(left: impl Into<QuantifiedInteger>, right: impl Into<QuantifiedInteger>) -> Result<Self> {
        Self::compare(Relation::Gt, left, right)
    }

    pub fn eq(left: impl Into<QuantifiedInteger>, right: impl Into<QuantifiedInteger>) -> Result<Self> {
        Self::compare(Relation::Eq, left, right)
    }

    pub fn neq(left: impl Into<QuantifiedInteger>, right: impl Into<QuantifiedInteger>) -> Result<Self> {
        Self::compare(Relation::Neq, left, right)
    }

    #[must_use]
    pub fn forall(params: ParameterList, body: Self) -> Self {
        Self::Forall {
            params,
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn exists(params: ParameterList, body: Self) -> Self {
        Self::Exists {
            params,
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn condition(constraint: PConstraint) -> Self {
        Self::Condition(constraint)
    }

    /// The negation, pushed down to atoms and comparisons.
    #[must_use]
    pub fn negate(&self) -> Self {
        match self {
            Self::Atom(a) => Self::Atom(a.negate()),
            Self::And(parts) => Self::Or(parts.iter().map(Self::negate).collect()),
            Self::Or(parts) => Self::And(parts.iter().map(Self::negate).collect()),
            Self::Implies(a, b) => Self::And(vec![(**a).clone(), b.negate()]),
            Self::Iff(a, b) => Self::iff((**a).clone(), b.negate()),
            Self::Compare {
                relation,
                left,
                right,
            } => {
                let (relation, swap) = relation.negated();
                let (left, right) = if swap {
                    (right.clone(), left.clone())
                } else {
                    (left.clone(), right.clone())
                };
                Self::Compare {
                    relation,
                    left,
                    right,
                }
            }
            Self::Forall { params, body } => Self::exists(params.clone(), body.negate()),
            Self::Exists { params, body } => Self::forall(params.clone(), body.negate()),
            Self::Condition(c) => Self::Condition(c.negate()),
        }
    }

    /// Replaces free parameters; quantified names shadow `subst`.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        match self {
            Self::Atom(a) => Self::Atom(a.substitute(subst)),
            Self::And(parts) => Self::And(parts.iter().map(|p| p.substitute(subst)).collect()),
            Self::Or(parts) => Self::Or(parts.iter().map(|p| p.substitute(subst)).collect()),
            Self::Implies(a, b) => Self::implies(a.substitute(subst), b.substitute(subst)),
            Self::Iff(a, b) => Self::iff(a.substitute(subst), b.substitute(subst)),
            Self::Compare {
                relation,
                left,
                right,
            } => Self::Compare {
                relation: *relation,
                left: left.substitute(subst),
                right: right.substitute(subst),
            },
            Self::Forall { params, body } => {
                let inner = subst.without(params.names());
                Self::forall(params.substitute(subst), body.substitute(&inner))
            }
            Self::Exists { params, body } => {
                let inner = subst.without(params.names());
                Self::exists(params.substitute(subst), body.substitute(&inner))
            }
            Self::Condition(c) => Self::Condition(c.substitute(subst)),
        }
    }

    /// Resolves every parameter, expanding quantifiers over their domains.
    pub fn instantiate(&self, assignment: &Assignment) -> Result<Self> {
        Ok(match self {
            Self::Atom(a) => Self::Atom(QuantifiedAtom::Atom(a.instantiate(assignment)?)),
            Self::And(parts) => Self::And(instantiate_all(parts, assignment)?),
            Self::Or(parts) => Self::Or(instantiate_all(parts, assignment)?),
            Self::Implies(a, b) => {
                Self::implies(a.instantiate(assignment)?, b.instantiate(assignment)?)
            }
            Self::Iff(a, b) => Self::iff(a.instantiate(assignment)?, b.instantiate(assignment)?),
            Self::Compare {
                relation,
                left,
                right,
            } => Self::Compare {
                relation: *relation,
                left: QuantifiedInteger::Closed(left.instantiate(assignment)?),
                right: QuantifiedInteger::Closed(right.instantiate(assignment)?),
            },
            Self::Forall { params, body } => Self::And(expand(params, body, assignment)?),
            Self::Exists { params, body } => Self::Or(expand(params, body, assignment)?),
            Self::Condition(c) => {
                if c.evaluate(assignment)? {
                    Self::truth()
                } else {
                    Self::falsity()
                }
            }
        })
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
            Self::Atom(a) => out.extend(a.query_parameters()),
            Self::And(parts) | Self::Or(parts) => {
                for p in parts {
                    p.collect_parameters(out);
                }
            }
            Self::Implies(a, b) | Self::Iff(a, b) => {
                a.collect_parameters(out);
                b.collect_parameters(out);
            }
            Self::Compare { left, right, .. } => {
                out.extend(left.query_parameters());
                out.extend(right.query_parameters());
            }
            Self::Forall { params, body } | Self::Exists { params, body } => {
                let mut inner = body.query_parameters();
                inner.extend(params.query_parameters());
                for name in params.names() {
                    inner.remove(name);
                }
                out.extend(inner);
            }
            Self::Condition(c) => out.extend(c.query_parameters()),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.query_parameters().is_empty()
    }

    /// Instantiates a closed formula.
    fn ground(&self) -> Result<Self> {
        let free = self.query_parameters();
        if !free.is_empty() {
            return Err(Error::invalid(format!(
                "formula {self} has free parameters {free:?}"
            )));
        }
        self.instantiate(&Assignment::new())
    }

    /// Asserts the formula.
    pub fn add_clauses(&self, col: &mut ClauseCollection) -> Result<()> {
        let ground = self.ground()?;
        let before = col.len();
        ground.assert_under(col, None)?;
        tracing::debug!("Requirement {} added {} clauses", ground, col.len() - before);
        Ok(())
    }

    /// Asserts `atom → self`.
    pub fn add_clauses_if_implied_by(&self, atom: &Atom, col: &mut ClauseCollection) -> Result<()> {
        let ground = self.ground()?;
        let key = MemoKey::GuardImplies {
            guard: atom.to_dimacs(),
            formula: Rc::from(ground.to_string()),
        };
        if col.first_time(key) {
            ground.assert_under(col, Some(atom))?;
        }
        Ok(())
    }

    /// Asserts `self → atom`.
    pub fn add_clauses_if_implies(&self, atom: &Atom, col: &mut ClauseCollection) -> Result<()> {
        let ground = self.ground()?;
        let key = MemoKey::ImpliesGuard {
            guard: atom.to_dimacs(),
            formula: Rc::from(ground.to_string()),
        };
        if col.first_time(key) {
            ground.negate().assert_under(col, Some(&!atom))?;
        }
        Ok(())
    }

    /// Asserts `atom ↔ self`.
    pub fn add_clauses_def(&self, atom: &Atom, col: &mut ClauseCollection) -> Result<()> {
        self.add_clauses_if_implied_by(atom, col)?;
        self.add_clauses_if_implies(atom, col)
    }

    /// Emits clauses for `guard → self` on a ground formula.
    fn assert_under(&self, col: &mut ClauseCollection, guard: Option<&Atom>) -> Result<()> {
        match self {
            Self::Atom(a) => {
                let atom = a.instantiate(&Assignment::new())?;
                col.add(guarded(guard, vec![atom]));
            }
            Self::And(parts) => {
                for p in parts {
                    p.assert_under(col, guard)?;
                }
            }
            Self::Or(parts) => {
                let literals = parts
                    .iter()
                    .map(|p| p.implied_literal(col))
                    .collect::<Result<Vec<_>>>()?;
                col.add(guarded(guard, literals));
            }
            Self::Implies(a, b) => {
                let premise = a.implying_literal(col)?;
                let conclusion = b.implied_literal(col)?;
                col.add(guarded(guard, vec![!premise, conclusion]));
            }
            Self::Iff(a, b) => {
                let da = a.defined_literal(col)?;
                let db = b.defined_literal(col)?;
                col.add(guarded(guard, vec![!&da, db.clone()]));
                col.add(guarded(guard, vec![da, !db]));
            }
            Self::Compare {
                relation,
                left,
                right,
            } => {
                let empty = Assignment::new();
                let left = left.instantiate(&empty)?;
                let right = right.instantiate(&empty)?;
                emit_comparison(col, guard, *relation, &left, &right)?;
            }
            Self::Forall { .. } | Self::Exists { .. } | Self::Condition(_) => {
                self.instantiate(&Assignment::new())?.assert_under(col, guard)?;
            }
        }
        Ok(())
    }

    /// A literal `d` with `d → self` emitted into `col`.
    fn implied_literal(&self, col: &mut ClauseCollection) -> Result<Atom> {
        if let Some(literal) = self.as_literal(col)? {
            return Ok(literal);
        }
        let d = self.definitional_atom(col);
        if col.first_time(MemoKey::Implied(d.variable().index())) {
            self.assert_under(col, Some(&d))?;
        }
        Ok(d)
    }

    /// A literal `d` with `self → d` emitted into `col`.
    fn implying_literal(&self, col: &mut ClauseCollection) -> Result<Atom> {
        if let Some(literal) = self.as_literal(col)? {
            return Ok(literal);
        }
        let d = self.definitional_atom(col);
        if col.first_time(MemoKey::Implies(d.variable().index())) {
            self.negate().assert_under(col, Some(&!&d))?;
        }
        Ok(d)
    }

    /// A literal equivalent to `self`.
    fn defined_literal(&self, col: &mut ClauseCollection) -> Result<Atom> {
        let d = self.implied_literal(col)?;
        self.implying_literal(col)?;
        Ok(d)
    }

    /// Formulas that already are a single literal.
    fn as_literal(&self, col: &ClauseCollection) -> Result<Option<Atom>> {
        Ok(match self {
            Self::Atom(a) => Some(a.instantiate(&Assignment::new())?),
            Self::And(parts) if parts.is_empty() => Some(col.registry().truth()),
            Self::Or(parts) if parts.is_empty() => Some(col.registry().falsity()),
            _ => None,
        })
    }

    fn definitional_atom(&self, col: &ClauseCollection) -> Atom {
        col.registry().atom(&format!("⟦{self}⟧"))
    }
}

fn instantiate_all(parts: &[Formula], assignment: &Assignment) -> Result<Vec<Formula>> {
    parts.iter().map(|p| p.instantiate(assignment)).collect()
}

fn expand(params: &ParameterList, body: &Formula, outer: &Assignment) -> Result<Vec<Formula>> {
    let mut instances = Vec::new();
    params.for_each_assignment(outer, &mut |assignment| {
        instances.push(body.instantiate(assignment)?);
        Ok(())
    })?;
    Ok(instances)
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Formula], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "{p}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(a) => write!(f, "{a}"),
            Self::And(parts) if parts.is_empty() => f.write_str("⊤"),
            Self::Or(parts) if parts.is_empty() => f.write_str("⊥"),
            Self::And(parts) => write_joined(f, parts, "∧"),
            Self::Or(parts) => write_joined(f, parts, "∨"),
            Self::Implies(a, b) => write!(f, "({a} → {b})"),
            Self::Iff(a, b) => write!(f, "({a} ↔ {b})"),
            Self::Compare {
                relation,
                left,
                right,
            } => write!(f, "({left} {} {right})", relation.symbol()),
            Self::Forall { params, body } => write!(f, "(∀ {params}: {body})"),
            Self::Exists { params, body } => write!(f, "(∃ {params}: {body})"),
            Self::Condition(c) => write!(f, "[{c}]"),
        }
    }
}

impl From<Atom> for Formula {
    fn from(atom: Atom) -> Self {
        Self::Atom(atom.into())
    }
}

impl From<QuantifiedAtom> for Formula {
    fn from(atom: QuantifiedAtom) -> Self {
        Self::Atom(atom)
    }
}
