//! Clause gadgets shared by the integer encodings.
//!
//! Every gadget writes the defining clauses of an output atom in terms of
//! its inputs. Constant inputs (`⊤`/`¬⊤`) are fine: the collection drops
//! satisfied clauses and strips false literals.

use paramsat_base::{Atom, ClauseCollection};

/// `r ↔ (cond ? t : e)`.
pub fn ite(col: &mut ClauseCollection, r: &Atom, cond: &Atom, t: &Atom, e: &Atom) {
    // (¬cond ∨ ¬t ∨ r)   - if cond and t, then r
    // (¬cond ∨ t ∨ ¬r)   - if cond and not t, then not r
    // (cond ∨ ¬e ∨ r)    - if not cond and e, then r
    // (cond ∨ e ∨ ¬r)    - if not cond and not e, then not r
    col.add_all([
        [!cond, !t, r.clone()],
        [!cond, t.clone(), !r],
        [cond.clone(), !e, r.clone()],
        [cond.clone(), e.clone(), !r],
    ]);
}

/// `r ↔ a ⊕ b ⊕ c`.
pub fn xor3(col: &mut ClauseCollection, r: &Atom, a: &Atom, b: &Atom, c: &Atom) {
    col.add_all([
        // Odd number of true inputs → r
        [a.clone(), b.clone(), !c, r.clone()],
        [a.clone(), !b, c.clone(), r.clone()],
        [!a, b.clone(), c.clone(), r.clone()],
        [!a, !b, !c, r.clone()],
        // Even number of true inputs → ¬r
        [a.clone(), b.clone(), c.clone(), !r],
        [a.clone(), !b, !c, !r],
        [!a, b.clone(), !c, !r],
        [!a, !b, c.clone(), !r],
    ]);
}

/// `r ↔ at least two of {a, b, c}`.
pub fn majority(col: &mut ClauseCollection, r: &Atom, a: &Atom, b: &Atom, c: &Atom) {
    col.add_all([
        [!a, !b, r.clone()], // a ∧ b → r
        [!a, !c, r.clone()], // a ∧ c → r
        [!b, !c, r.clone()], // b ∧ c → r
        [a.clone(), b.clone(), !r], // ¬a ∧ ¬b → ¬r
        [a.clone(), c.clone(), !r], // ¬a ∧ ¬c → ¬r
        [b.clone(), c.clone(), !r], // ¬b ∧ ¬c → ¬r
    ]);
}

/// Appends `¬guard` so the clause only binds when the guard holds.
pub fn guarded(guard: Option<&Atom>, mut atoms: Vec<Atom>) -> Vec<Atom> {
    if let Some(g) = guard {
        atoms.push(!g);
    }
    atoms
}

/// `d → a ⊕ b`.
pub fn differs(col: &mut ClauseCollection, d: &Atom, a: &Atom, b: &Atom) {
    col.add_all([[!d, a.clone(), b.clone()], [!d, !a, !b]]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramsat_base::{Solution, VariableRegistry};

    /// Checks every assignment of the named inputs against `expected`.
    fn check_truth_table(
        col: &ClauseCollection,
        vars: &[Atom],
        output: &Atom,
        expected: impl Fn(&[bool]) -> bool,
    ) {
        for bits in 0..(1u32 << vars.len()) {
            let inputs: Vec<bool> = (0..vars.len()).map(|i| bits & (1 << i) != 0).collect();
            for out in [false, true] {
                let trues = vars
                    .iter()
                    .zip(&inputs)
                    .filter(|&(_, &v)| v)
                    .map(|(a, _)| a.variable().index())
                    .chain(out.then(|| output.variable().index()));
                let model = Solution::from_true_indices(trues);
                let satisfied = col
                    .clauses()
                    .iter()
                    .all(|c| c.atoms().iter().any(|a| model.check_atom(a)));
                assert_eq!(satisfied, out == expected(&inputs), "inputs {inputs:?} out {out}");
            }
        }
    }

    #[test]
    fn test_ite() {
        let registry = VariableRegistry::new();
        let [c, t, e, r] = ["c", "t", "e", "r"].map(|n| registry.atom(n));
        let mut col = ClauseCollection::new(&registry);
        ite(&mut col, &r, &c, &t, &e);
        assert_eq!(col.len(), 4);
        check_truth_table(&col, &[c, t, e], &r, |v| if v[0] { v[1] } else { v[2] });
    }

    #[test]
    fn test_xor3() {
        let registry = VariableRegistry::new();
        let [a, b, c, r] = ["a", "b", "c", "r"].map(|n| registry.atom(n));
        let mut col = ClauseCollection::new(&registry);
        xor3(&mut col, &r, &a, &b, &c);
        assert_eq!(col.len(), 8);
        check_truth_table(&col, &[a, b, c], &r, |v| v[0] ^ v[1] ^ v[2]);
    }

    #[test]
    fn test_majority() {
        let registry = VariableRegistry::new();
        let [a, b, c, r] = ["a", "b", "c", "r"].map(|n| registry.atom(n));
        let mut col = ClauseCollection::new(&registry);
        majority(&mut col, &r, &a, &b, &c);
        assert_eq!(col.len(), 6);
        check_truth_table(&col, &[a, b, c], &r, |v| {
            v.iter().filter(|&&x| x).count() >= 2
        });
    }

    #[test]
    fn test_constant_inputs_simplify() {
        let registry = VariableRegistry::new();
        let [a, b, r] = ["a", "b", "r"].map(|n| registry.atom(n));
        let mut col = ClauseCollection::new(&registry);
        // Carry-in fixed to false turns the majority into an AND.
        majority(&mut col, &r, &a, &b, &registry.falsity());
        assert_eq!(col.len(), 4);
        check_truth_table(&col, &[a, b], &r, |v| v[0] && v[1]);
    }
}
