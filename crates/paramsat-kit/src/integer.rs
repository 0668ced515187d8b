//! Closed integers: constants, variables and their combinations.
//!
//! Every closed integer has a [`Kind`] telling which encodings can express
//! it. Constants, and combinators built only from constants, are `Both`;
//! a range variable anywhere makes the whole term `Range`, a binary variable
//! makes it `Binary`, and mixing the two is a [`Error::KindMismatch`].

use crate::binary::{self, bit_length, BinaryVariable, BinaryView};
use crate::gadgets::{self, guarded};
use crate::range::RangeVariable;
use paramsat_base::{Atom, ClauseCollection, Error, MemoKey, Result, Solution};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Which encodings can express an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Range,
    Binary,
    Both,
}

impl Kind {
    /// Kind of a term combining `self` and `other`.
    pub fn combine(self, other: Self) -> Result<Self> {
        match (self, other) {
            (Self::Both, k) | (k, Self::Both) => Ok(k),
            (a, b) if a == b => Ok(a),
            (a, b) => Err(Error::KindMismatch {
                expected: a.label(),
                actual: b.label(),
            }),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::Binary => "binary",
            Self::Both => "both",
        }
    }
}

/// Integer comparison relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Relation {
    Geq,
    Gt,
    Eq,
    Neq,
}

impl Relation {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Geq => "≥",
            Self::Gt => ">",
            Self::Eq => "=",
            Self::Neq => "≠",
        }
    }

    /// The relation equivalent to the negation of `left self right`, and
    /// whether its operands must be swapped: `¬(a ≥ b)` is `b > a`.
    #[must_use]
    pub const fn negated(self) -> (Self, bool) {
        match self {
            Self::Geq => (Self::Gt, true),
            Self::Gt => (Self::Geq, true),
            Self::Eq => (Self::Neq, false),
            Self::Neq => (Self::Eq, false),
        }
    }

    /// Evaluates the relation on values.
    #[must_use]
    pub const fn holds(self, a: i64, b: i64) -> bool {
        match self {
            Self::Geq => a >= b,
            Self::Gt => a > b,
            Self::Eq => a == b,
            Self::Neq => a != b,
        }
    }
}

/// An integer term with no free parameters.
#[derive(Debug, Clone)]
pub enum ClosedInteger {
    Constant(i64),
    Range(RangeVariable),
    Binary(BinaryVariable),
    Plus(Rc<PlusInteger>),
    Conditional(Rc<ConditionalInteger>),
}

/// `left + right`.
#[derive(Debug)]
pub struct PlusInteger {
    left: ClosedInteger,
    right: ClosedInteger,
    kind: Kind,
    min: i64,
    max: i64,
    rendering: String,
    /// Bounds were narrowed by [`ClosedInteger::with_practical_bounds`].
    narrowed: bool,
}

/// `condition ? then : otherwise`.
#[derive(Debug)]
pub struct ConditionalInteger {
    condition: Atom,
    then: ClosedInteger,
    otherwise: ClosedInteger,
    kind: Kind,
    min: i64,
    max: i64,
    rendering: String,
}

impl ClosedInteger {
    /// Sum of two closed integers; constants fold.
    pub fn plus(left: Self, right: Self) -> Result<Self> {
        let kind = left.kind().combine(right.kind())?;
        if let (Some(a), Some(b)) = (left.as_constant(), right.as_constant()) {
            return a
                .checked_add(b)
                .map(Self::Constant)
                .ok_or_else(|| Error::invalid(format!("integer overflow in {a} + {b}")));
        }
        if left.as_constant() == Some(0) {
            return Ok(right);
        }
        if right.as_constant() == Some(0) {
            return Ok(left);
        }
        let overflow = || Error::invalid(format!("bounds of ({left}+{right}) overflow"));
        let min = left.min().checked_add(right.min()).ok_or_else(overflow)?;
        let max = left.max().checked_add(right.max()).ok_or_else(overflow)?;
        let rendering = format!("({left}+{right})");
        Ok(Self::Plus(Rc::new(PlusInteger {
            left,
            right,
            kind,
            min,
            max,
            rendering,
            narrowed: false,
        })))
    }

    /// Selection by an atom; constant conditions and identical branches fold.
    pub fn conditional(condition: Atom, then: Self, otherwise: Self) -> Result<Self> {
        let kind = then.kind().combine(otherwise.kind())?;
        if condition.is_true() {
            return Ok(then);
        }
        if condition.is_false() {
            return Ok(otherwise);
        }
        if then.to_string() == otherwise.to_string() {
            return Ok(then);
        }
        let min = then.min().min(otherwise.min());
        let max = then.max().max(otherwise.max());
        let rendering = format!("({condition} ? {then} : {otherwise})");
        Ok(Self::Conditional(Rc::new(ConditionalInteger {
            condition,
            then,
            otherwise,
            kind,
            min,
            max,
            rendering,
        })))
    }

    /// Narrows the bounds a binary term is assumed to take, so its view
    /// needs fewer bits.
    ///
    /// Binary variables keep their atoms and drop high bits; binary sums get
    /// a shorter adder of their own. Constants, range terms and conditionals
    /// come back unchanged, as does anything whose bounds the new ones miss.
    #[must_use]
    pub fn with_practical_bounds(&self, min: i64, max: i64) -> Self {
        match self {
            Self::Binary(v) => Self::Binary(v.with_practical_bounds(min, max)),
            Self::Plus(p) if p.kind == Kind::Binary => {
                let (lo, hi) = (p.min.max(min), p.max.min(max));
                if lo > hi || (lo, hi) == (p.min, p.max) {
                    return self.clone();
                }
                Self::Plus(Rc::new(PlusInteger {
                    left: p.left.clone(),
                    right: p.right.clone(),
                    kind: p.kind,
                    min: lo,
                    max: hi,
                    rendering: format!("({}+{})∈[{lo},{hi}]", p.left, p.right),
                    narrowed: true,
                }))
            }
            _ => self.clone(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Constant(_) => Kind::Both,
            Self::Range(_) => Kind::Range,
            Self::Binary(_) => Kind::Binary,
            Self::Plus(p) => p.kind,
            Self::Conditional(c) => c.kind,
        }
    }

    /// Static lower bound.
    #[must_use]
    pub fn min(&self) -> i64 {
        match self {
            Self::Constant(c) => *c,
            Self::Range(v) => v.min(),
            Self::Binary(v) => v.min(),
            Self::Plus(p) => p.min,
            Self::Conditional(c) => c.min,
        }
    }

    /// Static upper bound.
    #[must_use]
    pub fn max(&self) -> i64 {
        match self {
            Self::Constant(c) => *c,
            Self::Range(v) => v.max(),
            Self::Binary(v) => v.max(),
            Self::Plus(p) => p.max,
            Self::Conditional(c) => c.max,
        }
    }

    #[must_use]
    pub fn as_constant(&self) -> Option<i64> {
        match self {
            Self::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// The atom meaning `self ≥ value` in the unary view. Threshold atoms of
    /// combinators are defined on first request.
    pub fn geq_atom(&self, value: i64, col: &mut ClauseCollection) -> Result<Atom> {
        if value <= self.min() {
            return Ok(col.registry().truth());
        }
        if value > self.max() {
            return Ok(col.registry().falsity());
        }
        match self {
            // Constants are fully decided by the bound checks above.
            Self::Constant(_) => Ok(col.registry().truth()),
            Self::Range(v) => Ok(v.geq_atom(value)),
            Self::Binary(_) => Err(Error::KindMismatch {
                expected: Kind::Range.label(),
                actual: Kind::Binary.label(),
            }),
            Self::Plus(p) => {
                let atom = col.registry().atom(&format!("{}≥{value}", p.rendering));
                if col.first_time(MemoKey::Defined(atom.variable().index())) {
                    p.define_threshold(value, &atom, col)?;
                }
                Ok(atom)
            }
            Self::Conditional(c) => {
                let t = c.then.geq_atom(value, col)?;
                let e = c.otherwise.geq_atom(value, col)?;
                if t == e {
                    return Ok(t);
                }
                let atom = col.registry().atom(&format!("{}≥{value}", c.rendering));
                if col.first_time(MemoKey::Defined(atom.variable().index())) {
                    gadgets::ite(col, &atom, &c.condition, &t, &e);
                }
                Ok(atom)
            }
        }
    }

    /// The two's-complement view, defining adder and multiplexer atoms on
    /// first request.
    pub fn binary_view(&self, col: &mut ClauseCollection) -> Result<BinaryView> {
        match self {
            Self::Constant(c) => Ok(BinaryView::constant(col.registry(), *c)),
            Self::Range(_) => Err(Error::KindMismatch {
                expected: Kind::Binary.label(),
                actual: Kind::Range.label(),
            }),
            Self::Binary(v) => Ok(v.view().clone()),
            Self::Plus(p) => {
                let a = p.left.binary_view(col)?;
                let b = p.right.binary_view(col)?;
                let length = if p.narrowed {
                    bit_length(p.min, p.max)
                } else {
                    a.length().max(b.length()).max(bit_length(p.min, p.max))
                };
                Ok(binary::add(col, &p.rendering, &a, &b, length, (p.min, p.max)))
            }
            Self::Conditional(c) => {
                let a = c.then.binary_view(col)?;
                let b = c.otherwise.binary_view(col)?;
                Ok(binary::select(col, &c.rendering, &c.condition, &a, &b))
            }
        }
    }

    /// Well-definedness of the variables this term is built from.
    pub fn add_well_definedness(&self, col: &mut ClauseCollection) -> Result<()> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Range(v) => {
                v.add_well_definedness(col);
                Ok(())
            }
            Self::Binary(v) => v.add_well_definedness(col),
            Self::Plus(p) => {
                p.left.add_well_definedness(col)?;
                p.right.add_well_definedness(col)
            }
            Self::Conditional(c) => {
                c.then.add_well_definedness(col)?;
                c.otherwise.add_well_definedness(col)
            }
        }
    }

    /// Reads the value out of a model.
    #[must_use]
    pub fn value(&self, solution: &Solution) -> i64 {
        match self {
            Self::Constant(c) => *c,
            Self::Range(v) => v.value(solution),
            Self::Binary(v) => v.value(solution),
            Self::Plus(p) => p.left.value(solution) + p.right.value(solution),
            Self::Conditional(c) => {
                if solution.check_atom(&c.condition) {
                    c.then.value(solution)
                } else {
                    c.otherwise.value(solution)
                }
            }
        }
    }
}

impl PlusInteger {
    /// Defines `sum ≥ i` from the operands' thresholds.
    ///
    /// Lower clauses `x ≥ a ∧ y ≥ i−a → s` and upper clauses
    /// `s → x ≥ a+1 ∨ y ≥ i−a` only range over the split points both operand
    /// ranges can reach, which keeps the count linear in the operand ranges.
    fn define_threshold(&self, i: i64, s: &Atom, col: &mut ClauseCollection) -> Result<()> {
        let (x, y) = (&self.left, &self.right);
        let lower = x.min().max(i - y.max())..=x.max().min(i - y.min());
        for a in lower {
            let xa = x.geq_atom(a, col)?;
            let yb = y.geq_atom(i - a, col)?;
            col.add([!xa, !yb, s.clone()]);
        }
        let upper = x.min().max(i - 1 - y.max())..=x.max().min(i - 1 - y.min());
        for a in upper {
            let xa = x.geq_atom(a + 1, col)?;
            let yb = y.geq_atom(i - a, col)?;
            col.add([!s, xa, yb]);
        }
        Ok(())
    }
}

impl fmt::Display for ClosedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{c}"),
            Self::Range(v) => write!(f, "{v}"),
            Self::Binary(v) => write!(f, "{v}"),
            Self::Plus(p) => f.write_str(&p.rendering),
            Self::Conditional(c) => f.write_str(&c.rendering),
        }
    }
}

impl From<i64> for ClosedInteger {
    fn from(value: i64) -> Self {
        Self::Constant(value)
    }
}

impl From<RangeVariable> for ClosedInteger {
    fn from(var: RangeVariable) -> Self {
        Self::Range(var)
    }
}

impl From<BinaryVariable> for ClosedInteger {
    fn from(var: BinaryVariable) -> Self {
        Self::Binary(var)
    }
}

/// Asserts `guard → left relation right`.
///
/// Terms involving a binary variable go through the bit-level comparators;
/// everything else uses the unary thresholds.
pub fn emit_comparison(
    col: &mut ClauseCollection,
    guard: Option<&Atom>,
    relation: Relation,
    left: &ClosedInteger,
    right: &ClosedInteger,
) -> Result<()> {
    match left.kind().combine(right.kind())? {
        Kind::Binary => {
            let a = left.binary_view(col)?;
            let b = right.binary_view(col)?;
            let name = format!("{left}{}{right}", relation.symbol());
            match relation {
                Relation::Geq => binary::compare(col, guard, &name, &a, &b, false),
                Relation::Gt => binary::compare(col, guard, &name, &a, &b, true),
                Relation::Eq => binary::equal(col, guard, &a, &b),
                Relation::Neq => binary::not_equal(col, guard, &name, &a, &b),
            }
            Ok(())
        }
        Kind::Range | Kind::Both => match relation {
            Relation::Geq => range_geq(col, guard, left, right, 0),
            Relation::Gt => range_geq(col, guard, left, right, 1),
            Relation::Eq => {
                range_geq(col, guard, left, right, 0)?;
                range_geq(col, guard, right, left, 0)
            }
            Relation::Neq => range_neq(col, guard, left, right),
        },
    }
}

/// `guard → a ≥ b + k` straight from the bounds of both sides.
fn range_geq(
    col: &mut ClauseCollection,
    guard: Option<&Atom>,
    a: &ClosedInteger,
    b: &ClosedInteger,
    k: i64,
) -> Result<()> {
    let (amin, amax, bmin, bmax) = (a.min(), a.max(), b.min(), b.max());
    if amax < bmin + k {
        col.add(guarded(guard, Vec::new()));
        return Ok(());
    }
    if bmin + k > amin {
        let floor = a.geq_atom(bmin + k, col)?;
        col.add(guarded(guard, vec![floor]));
    }
    for v in (amin - k).max(bmin) + 1..=(amax - k).min(bmax) {
        let bv = b.geq_atom(v, col)?;
        let av = a.geq_atom(v + k, col)?;
        col.add(guarded(guard, vec![!bv, av]));
    }
    if bmax > amax - k {
        let ceiling = b.geq_atom(amax - k + 1, col)?;
        col.add(guarded(guard, vec![!ceiling]));
    }
    Ok(())
}

/// `guard → a ≠ b`: for every value both can take, they do not both take it.
fn range_neq(
    col: &mut ClauseCollection,
    guard: Option<&Atom>,
    a: &ClosedInteger,
    b: &ClosedInteger,
) -> Result<()> {
    for v in a.min().max(b.min())..=a.max().min(b.max()) {
        let clause = vec![
            !a.geq_atom(v, col)?,
            a.geq_atom(v + 1, col)?,
            !b.geq_atom(v, col)?,
            b.geq_atom(v + 1, col)?,
        ];
        col.add(guarded(guard, clause));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramsat_base::VariableRegistry;

    fn range(registry: &VariableRegistry, name: &str, min: i64, max: i64) -> ClosedInteger {
        RangeVariable::new(registry, name, min, max).unwrap().into()
    }

    fn binary(registry: &VariableRegistry, name: &str, min: i64, max: i64) -> ClosedInteger {
        BinaryVariable::new(registry, name, min, max).unwrap().into()
    }

    #[test]
    fn test_kind_combine() {
        assert_eq!(Kind::Both.combine(Kind::Range).unwrap(), Kind::Range);
        assert_eq!(Kind::Binary.combine(Kind::Both).unwrap(), Kind::Binary);
        assert_eq!(Kind::Both.combine(Kind::Both).unwrap(), Kind::Both);
        assert!(matches!(
            Kind::Range.combine(Kind::Binary),
            Err(Error::KindMismatch {
                expected: "range",
                actual: "binary"
            })
        ));
    }

    #[test]
    fn test_plus_folds_constants() {
        let registry = VariableRegistry::new();
        let x = range(&registry, "x", 0, 3);
        let sum = ClosedInteger::plus(2.into(), 5.into()).unwrap();
        assert_eq!(sum.as_constant(), Some(7));
        let same = ClosedInteger::plus(x.clone(), 0.into()).unwrap();
        assert_eq!(same.to_string(), "x");
        let shifted = ClosedInteger::plus(x, 4.into()).unwrap();
        assert_eq!(shifted.to_string(), "(x+4)");
        assert_eq!((shifted.min(), shifted.max()), (4, 7));
    }

    #[test]
    fn test_mixing_kinds_is_rejected() {
        let registry = VariableRegistry::new();
        let x = range(&registry, "x", 0, 3);
        let y = binary(&registry, "y", 0, 3);
        assert!(matches!(
            ClosedInteger::plus(x.clone(), y.clone()),
            Err(Error::KindMismatch { .. })
        ));
        let c = registry.atom("c");
        assert!(ClosedInteger::conditional(c, x, y).is_err());
    }

    #[test]
    fn test_conditional_folds() {
        let registry = VariableRegistry::new();
        let x = range(&registry, "x", 0, 3);
        let y = range(&registry, "y", 1, 2);
        let picked = ClosedInteger::conditional(registry.truth(), x.clone(), y.clone()).unwrap();
        assert_eq!(picked.to_string(), "x");
        let same = ClosedInteger::conditional(registry.atom("c"), y.clone(), y).unwrap();
        assert_eq!(same.to_string(), "y");
        let c = ClosedInteger::conditional(registry.atom("c"), x, 5.into()).unwrap();
        assert_eq!(c.to_string(), "(c ? x : 5)");
        assert_eq!((c.min(), c.max()), (0, 5));
        assert_eq!(c.kind(), Kind::Range);
    }

    #[test]
    fn test_plus_thresholds_are_lazy() {
        let registry = VariableRegistry::new();
        let x = range(&registry, "x", 0, 5);
        let y = range(&registry, "y", 0, 5);
        let s = ClosedInteger::plus(x, y).unwrap();
        let mut col = ClauseCollection::new(&registry);
        let atom = s.geq_atom(1, &mut col).unwrap();
        assert_eq!(atom.to_string(), "(x+y)≥1");
        assert_eq!(col.len(), 3);
        assert!(registry.index_of("(x+y)≥2").is_none());
        // Asking again reuses the definition.
        s.geq_atom(1, &mut col).unwrap();
        assert_eq!(col.len(), 3);
        assert!(s.geq_atom(0, &mut col).unwrap().is_true());
        assert!(s.geq_atom(11, &mut col).unwrap().is_false());
    }

    #[test]
    fn test_range_addition_clause_counts() {
        let registry = VariableRegistry::new();
        let x = range(&registry, "x", 0, 5);
        let y = range(&registry, "y", 0, 5);
        let z = range(&registry, "z", 1, 2);
        let s = ClosedInteger::plus(x, y).unwrap();

        let mut col = ClauseCollection::new(&registry);
        emit_comparison(&mut col, None, Relation::Geq, &s, &z).unwrap();
        assert_eq!(col.len(), 10);

        let mut col = ClauseCollection::new(&registry);
        emit_comparison(&mut col, None, Relation::Geq, &z, &s).unwrap();
        assert_eq!(col.len(), 14);
    }

    #[test]
    fn test_range_comparison_shapes() {
        let registry = VariableRegistry::new();
        let a = range(&registry, "a", 0, 3);
        let b = range(&registry, "b", 5, 6);
        let mut col = ClauseCollection::new(&registry);
        emit_comparison(&mut col, None, Relation::Geq, &a, &b).unwrap();
        // Impossible: a single false clause.
        assert_eq!(col.len(), 1);
        assert_eq!(col.clauses()[0].to_string(), "¬⊤");

        let mut col = ClauseCollection::new(&registry);
        emit_comparison(&mut col, None, Relation::Geq, &b, &a).unwrap();
        assert!(col.is_empty());

        let mut col = ClauseCollection::new(&registry);
        emit_comparison(&mut col, None, Relation::Gt, &a, &ClosedInteger::Constant(1)).unwrap();
        let rendered: Vec<String> = col.clauses().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a≥2"]);
    }

    #[test]
    fn test_guarded_comparison() {
        let registry = VariableRegistry::new();
        let a = range(&registry, "a", 0, 3);
        let g = registry.atom("g");
        let mut col = ClauseCollection::new(&registry);
        emit_comparison(&mut col, Some(&g), Relation::Geq, &a, &ClosedInteger::Constant(2))
            .unwrap();
        let rendered: Vec<String> = col.clauses().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a≥2 ∨ ¬g"]);
    }

    #[test]
    fn test_binary_plus_definition_is_memoized() {
        let registry = VariableRegistry::new();
        let x = binary(&registry, "x", -8, 7);
        let y = binary(&registry, "y", -8, 7);
        let s = ClosedInteger::plus(x, y).unwrap();
        assert_eq!(s.kind(), Kind::Binary);
        let mut col = ClauseCollection::new(&registry);
        let first = s.binary_view(&mut col).unwrap();
        let emitted = col.len();
        let second = s.binary_view(&mut col).unwrap();
        assert_eq!(first, second);
        assert_eq!(col.len(), emitted);
        assert_eq!(first.length(), 4);
    }

    #[test]
    fn test_practical_bounds_shorten_views() {
        let registry = VariableRegistry::new();
        let x = binary(&registry, "x", -8, 7);
        let y = binary(&registry, "y", -8, 7);
        let mut col = ClauseCollection::new(&registry);

        let narrow_x = x.with_practical_bounds(0, 3);
        assert_eq!(narrow_x.to_string(), "x∈[0,3]");
        assert_eq!((narrow_x.min(), narrow_x.max()), (0, 3));
        let x_view = x.binary_view(&mut col).unwrap();
        let narrow_view = narrow_x.binary_view(&mut col).unwrap();
        assert_eq!(narrow_view.length(), 2);
        assert_eq!(narrow_view.bits(), &x_view.bits()[..2]);
        assert!(col.is_empty());

        let sum = ClosedInteger::plus(x, y).unwrap();
        let narrow_sum = sum.with_practical_bounds(-4, 3);
        assert_eq!(narrow_sum.to_string(), "(x+y)∈[-4,3]");
        assert_eq!(sum.binary_view(&mut col).unwrap().length(), 4);
        assert_eq!(narrow_sum.binary_view(&mut col).unwrap().length(), 2);
        // Narrowing again starts from the operands, not the old rendering.
        let narrower = narrow_sum.with_practical_bounds(0, 1);
        assert_eq!(narrower.to_string(), "(x+y)∈[0,1]");
    }

    #[test]
    fn test_practical_bounds_leave_other_terms_alone() {
        let registry = VariableRegistry::new();
        let constant = ClosedInteger::Constant(9);
        assert_eq!(constant.with_practical_bounds(0, 3).as_constant(), Some(9));
        let r = range(&registry, "r", 0, 9);
        assert_eq!(r.with_practical_bounds(2, 3).to_string(), "r");
        let x = binary(&registry, "x", 0, 7);
        // Disjoint and unchanged bounds are ignored.
        assert_eq!(x.with_practical_bounds(10, 12).to_string(), "x");
        assert_eq!(x.with_practical_bounds(-5, 20).to_string(), "x");
        let c = ClosedInteger::conditional(registry.atom("c"), x, 5.into()).unwrap();
        assert_eq!(c.with_practical_bounds(0, 1).to_string(), c.to_string());
    }

    #[test]
    fn test_views_check_kind() {
        let registry = VariableRegistry::new();
        let x = range(&registry, "x", 0, 3);
        let y = binary(&registry, "y", 0, 3);
        let mut col = ClauseCollection::new(&registry);
        assert!(x.binary_view(&mut col).is_err());
        assert!(y.geq_atom(1, &mut col).is_err());
    }

    #[test]
    fn test_relation_negation() {
        for relation in [Relation::Geq, Relation::Gt, Relation::Eq, Relation::Neq] {
            let (negated, swap) = relation.negated();
            for a in -2..=2 {
                for b in -2..=2 {
                    let (l, r) = if swap { (b, a) } else { (a, b) };
                    assert_eq!(relation.holds(a, b), !negated.holds(l, r));
                }
            }
        }
    }
}
