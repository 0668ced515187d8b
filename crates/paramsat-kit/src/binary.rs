//! Two's-complement integer variables.
//!
//! A binary integer is `length` bit atoms (bit 0 least significant) plus an
//! explicit sign atom; its value is `Σ bit_i·2^i − sign·2^length`. Reading a
//! bit above the length yields the sign, so operands of different lengths
//! line up without extra clauses.

use crate::gadgets::guarded;
use paramsat_base::{Atom, ClauseCollection, Error, MemoKey, Result, Solution, VariableRegistry};
use std::fmt;
use std::rc::Rc;

/// Smallest `L ≥ 1` with `−2^L ≤ min` and `max < 2^L`.
#[must_use]
pub fn bit_length(min: i64, max: i64) -> usize {
    let (min, max) = (i128::from(min), i128::from(max));
    let mut length = 1;
    while -(1i128 << length) > min || max >= (1i128 << length) {
        length += 1;
    }
    length
}

/// The bit-level view of a binary-encodable integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryView {
    bits: Vec<Atom>,
    sign: Atom,
}

impl BinaryView {
    pub(crate) fn new(bits: Vec<Atom>, sign: Atom) -> Self {
        Self { bits, sign }
    }

    /// Constant bit pattern over `⊤`/`¬⊤`; emits nothing.
    #[must_use]
    pub fn constant(registry: &VariableRegistry, value: i64) -> Self {
        let length = bit_length(value, value);
        let bits = (0..length)
            .map(|i| registry.constant((value >> i) & 1 == 1))
            .collect();
        Self {
            bits,
            sign: registry.constant(value < 0),
        }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.bits.len()
    }

    /// Bit `i`, sign-extended past the length.
    #[must_use]
    pub fn bit(&self, i: usize) -> &Atom {
        self.bits.get(i).unwrap_or(&self.sign)
    }

    /// The low `length` bits with the same sign atom.
    #[must_use]
    pub fn truncated(&self, length: usize) -> Self {
        Self {
            bits: self.bits[..length.min(self.bits.len())].to_vec(),
            sign: self.sign.clone(),
        }
    }

    #[must_use]
    pub fn bits(&self) -> &[Atom] {
        &self.bits
    }

    #[must_use]
    pub fn sign(&self) -> &Atom {
        &self.sign
    }

    /// Decodes the value from a model.
    #[must_use]
    pub fn value(&self, solution: &Solution) -> i64 {
        let magnitude: i64 = self
            .bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| solution.check_atom(bit))
            .map(|(i, _)| 1i64 << i)
            .sum();
        if solution.check_atom(&self.sign) {
            (i128::from(magnitude) - (1i128 << self.bits.len())) as i64
        } else {
            magnitude
        }
    }
}

/// A bounded integer in the two's-complement encoding.
#[derive(Clone)]
pub struct BinaryVariable {
    inner: Rc<BinaryInner>,
    practical: Option<Rc<PracticalBounds>>,
}

struct BinaryInner {
    name: Rc<str>,
    min: i64,
    max: i64,
    view: BinaryView,
}

/// Bounds the variable is assumed to stay within, and the shorter view
/// they allow.
struct PracticalBounds {
    min: i64,
    max: i64,
    view: BinaryView,
}

impl BinaryVariable {
    /// A variable over `min..=max`. Non-negative variables get `¬⊤` as their
    /// sign instead of a fresh atom.
    pub fn new(registry: &VariableRegistry, name: &str, min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(Error::invalid(format!(
                "binary variable {name} has an empty domain [{min}, {max}]"
            )));
        }
        let length = bit_length(min, max);
        let bits = (0..length)
            .map(|i| registry.atom(&format!("{name}#bit{i}")))
            .collect();
        let sign = if min >= 0 {
            registry.falsity()
        } else {
            registry.atom(&format!("{name}#sign"))
        };
        Ok(Self {
            inner: Rc::new(BinaryInner {
                name: Rc::from(name),
                min,
                max,
                view: BinaryView::new(bits, sign),
            }),
            practical: None,
        })
    }

    /// Narrows the bounds the variable is assumed to take.
    ///
    /// The result shares the declared atoms; its view keeps only the low
    /// bits the narrowed bounds need, which reads the same value whenever
    /// the assumption holds. Well-definedness stays the declared one.
    /// Bounds that miss the current ones leave the variable as it is.
    #[must_use]
    pub fn with_practical_bounds(&self, min: i64, max: i64) -> Self {
        let (lo, hi) = (self.min().max(min), self.max().min(max));
        if lo > hi || (lo, hi) == (self.min(), self.max()) {
            return self.clone();
        }
        let length = bit_length(lo, hi).min(self.inner.view.length());
        Self {
            inner: Rc::clone(&self.inner),
            practical: Some(Rc::new(PracticalBounds {
                min: lo,
                max: hi,
                view: self.inner.view.truncated(length),
            })),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn min(&self) -> i64 {
        self.practical.as_ref().map_or(self.inner.min, |p| p.min)
    }

    #[must_use]
    pub fn max(&self) -> i64 {
        self.practical.as_ref().map_or(self.inner.max, |p| p.max)
    }

    #[must_use]
    pub fn view(&self) -> &BinaryView {
        self.practical.as_ref().map_or(&self.inner.view, |p| &p.view)
    }

    /// Bound clauses `x ≥ min` and `max ≥ x`, each only when the bit width
    /// alone does not already imply it.
    pub fn add_well_definedness(&self, col: &mut ClauseCollection) -> Result<()> {
        if !col.first_time(MemoKey::WellDefined(Rc::clone(&self.inner.name))) {
            return Ok(());
        }
        let view = &self.inner.view;
        let length = view.length();
        let lowest = if view.sign().is_false() {
            0
        } else {
            -(1i128 << length)
        };
        let highest = (1i128 << length) - 1;
        let registry = col.registry().clone();
        if i128::from(self.inner.min) > lowest {
            let bound = BinaryView::constant(&registry, self.inner.min);
            let name = format!("{}≥{}", self.inner.name, self.inner.min);
            compare(col, None, &name, view, &bound, false);
        }
        if i128::from(self.inner.max) < highest {
            let bound = BinaryView::constant(&registry, self.inner.max);
            let name = format!("{}≥{}", self.inner.max, self.inner.name);
            compare(col, None, &name, &bound, view, false);
        }
        Ok(())
    }

    #[must_use]
    pub fn value(&self, solution: &Solution) -> i64 {
        self.inner.view.value(solution)
    }
}

impl fmt::Debug for BinaryVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryVariable")
            .field("name", &self.inner.name)
            .field("min", &self.min())
            .field("max", &self.max())
            .field("length", &self.view().length())
            .finish()
    }
}

impl fmt::Display for BinaryVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.practical {
            Some(p) => write!(f, "{}∈[{},{}]", self.inner.name, p.min, p.max),
            None => f.write_str(&self.inner.name),
        }
    }
}

/// Ripple-carry addition. `name` is the canonical rendering of the sum and
/// `length` covers the bounds `[min, max]` of the sum. When `length` also
/// covers both operands the sign closes the adder directly; a narrower sum
/// takes its sign from the adder's bit at `length`. Definitions are emitted
/// once per collection.
pub fn add(
    col: &mut ClauseCollection,
    name: &str,
    a: &BinaryView,
    b: &BinaryView,
    length: usize,
    (min, max): (i64, i64),
) -> BinaryView {
    let registry = col.registry().clone();
    let bits: Vec<Atom> = (0..length)
        .map(|i| registry.atom(&format!("{name}#bit{i}")))
        .collect();
    let sign = if min >= 0 {
        registry.falsity()
    } else if max < 0 {
        registry.truth()
    } else {
        registry.atom(&format!("{name}#sign"))
    };
    let view = BinaryView::new(bits, sign);

    if col.first_time(MemoKey::Defined(view.bits[0].variable().index())) {
        let mut carry = registry.falsity();
        for i in 0..length {
            let (ai, bi) = (a.bit(i), b.bit(i));
            crate::gadgets::xor3(col, &view.bits[i], ai, bi, &carry);
            // The carry out of the top bit only matters for the sign.
            if i + 1 == length && view.sign.is_constant() {
                break;
            }
            let next = registry.atom(&format!("{name}#carry{}", i + 1));
            crate::gadgets::majority(col, &next, ai, bi, &carry);
            carry = next;
        }
        if !view.sign.is_constant() {
            if length < a.length().max(b.length()) {
                // The sum fits in `length` bits, so every higher bit repeats
                // the sign.
                crate::gadgets::xor3(col, &view.sign, a.bit(length), b.bit(length), &carry);
            } else {
                // With the sum in range, sign = na + nb − carry, which on every
                // reachable combination equals majority(na, nb, ¬carry).
                crate::gadgets::majority(col, &view.sign, a.sign(), b.sign(), &!&carry);
            }
        }
    }
    view
}

/// Per-bit multiplexer `cond ? a : b`.
pub fn select(
    col: &mut ClauseCollection,
    name: &str,
    cond: &Atom,
    a: &BinaryView,
    b: &BinaryView,
) -> BinaryView {
    let registry = col.registry().clone();
    let length = a.length().max(b.length());
    let pick = |col: &mut ClauseCollection, label: String, x: &Atom, y: &Atom| {
        if x == y {
            return x.clone();
        }
        let r = registry.atom(&format!("{name}#{label}"));
        if col.first_time(MemoKey::Defined(r.variable().index())) {
            crate::gadgets::ite(col, &r, cond, x, y);
        }
        r
    };
    let bits = (0..length)
        .map(|i| pick(col, format!("bit{i}"), a.bit(i), b.bit(i)))
        .collect();
    let sign = pick(col, "sign".to_string(), a.sign(), b.sign());
    BinaryView::new(bits, sign)
}

/// Asserts `guard → a ≥ b` (or `a > b` when `strict`).
///
/// The sign case is settled at the top; below it a tower of prefix atoms
/// `P_k → a[k..0] ≥ b[k..0]` is built from the top bit down. Tower atoms are
/// one-directional and defined once per collection.
pub fn compare(
    col: &mut ClauseCollection,
    guard: Option<&Atom>,
    name: &str,
    a: &BinaryView,
    b: &BinaryView,
    strict: bool,
) {
    let registry = col.registry().clone();
    let length = a.length().max(b.length());
    let tower: Vec<Atom> = (0..length)
        .map(|k| registry.atom(&format!("({name})#p{k}")))
        .collect();
    for (k, p) in tower.iter().enumerate() {
        if !col.first_time(MemoKey::Implied(p.variable().index())) {
            continue;
        }
        let (ak, bk) = (a.bit(k), b.bit(k));
        if k == 0 {
            if strict {
                col.add([!p, ak.clone()]);
                col.add([!p, !bk]);
            } else {
                col.add([!p, ak.clone(), !bk]);
            }
        } else {
            let lower = &tower[k - 1];
            col.add([!p, ak.clone(), !bk]);
            col.add([!p, ak.clone(), lower.clone()]);
            col.add([!p, !bk, lower.clone()]);
        }
    }
    let (na, nb) = (a.sign(), b.sign());
    let top = &tower[length - 1];
    col.add(guarded(guard, vec![!na, nb.clone()]));
    col.add(guarded(guard, vec![!na, top.clone()]));
    col.add(guarded(guard, vec![nb.clone(), top.clone()]));
}

/// Asserts `guard → a = b`, bit by bit.
pub fn equal(col: &mut ClauseCollection, guard: Option<&Atom>, a: &BinaryView, b: &BinaryView) {
    let length = a.length().max(b.length());
    let pairs = (0..length)
        .map(|i| (a.bit(i), b.bit(i)))
        .chain(std::iter::once((a.sign(), b.sign())));
    for (x, y) in pairs {
        col.add(guarded(guard, vec![!x, y.clone()]));
        col.add(guarded(guard, vec![x.clone(), !y]));
    }
}

/// Asserts `guard → a ≠ b`: some bit (or the sign) differs.
pub fn not_equal(
    col: &mut ClauseCollection,
    guard: Option<&Atom>,
    name: &str,
    a: &BinaryView,
    b: &BinaryView,
) {
    let registry = col.registry().clone();
    let length = a.length().max(b.length());
    let pairs: Vec<(&Atom, &Atom, String)> = (0..length)
        .map(|i| (a.bit(i), b.bit(i), format!("d{i}")))
        .chain(std::iter::once((a.sign(), b.sign(), "dsign".to_string())))
        .collect();
    let mut witnesses = Vec::with_capacity(pairs.len());
    for (x, y, label) in pairs {
        let d = registry.atom(&format!("({name})#{label}"));
        if col.first_time(MemoKey::Implied(d.variable().index())) {
            crate::gadgets::differs(col, &d, x, y);
        }
        witnesses.push(d);
    }
    col.add(guarded(guard, witnesses));
}
