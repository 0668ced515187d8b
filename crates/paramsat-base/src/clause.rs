//! Canonical clauses and the collection that clause generators emit into.

use crate::atom::{Atom, VariableRegistry};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// A disjunction of atoms, kept sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Clause {
    atoms: Vec<Atom>,
}

impl Clause {
    /// Creates a clause in canonical order.
    pub fn new(atoms: impl IntoIterator<Item = Atom>) -> Self {
        let mut atoms: Vec<Atom> = atoms.into_iter().collect();
        atoms.sort();
        atoms.dedup();
        Self { atoms }
    }

    /// Returns the atoms in canonical order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Returns the number of distinct atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Returns whether this is the empty (unsatisfiable) clause.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns whether the clause holds under every assignment.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        // Sorted order puts ¬v directly before v.
        self.atoms.iter().any(Atom::is_true)
            || self
                .atoms
                .windows(2)
                .any(|pair| pair[0].variable() == pair[1].variable())
    }

    /// Returns whether the clause contains the given atom.
    #[must_use]
    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.binary_search(atom).is_ok()
    }

    /// Converts to DIMACS literals (without the terminating 0).
    #[must_use]
    pub fn to_dimacs(&self) -> Vec<i64> {
        self.atoms.iter().map(Atom::to_dimacs).collect()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.atoms.is_empty() {
            return f.write_str("⊥");
        }
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ∨ ")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}

/// Memoization keys for clause groups that may be requested many times.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemoKey {
    /// Well-definedness clauses of the named object.
    WellDefined(Rc<str>),
    /// Both directions of the definition of an auxiliary variable.
    Defined(u32),
    /// The auxiliary variable implies what it stands for.
    Implied(u32),
    /// What the auxiliary variable stands for implies the variable.
    Implies(u32),
    /// `guard → formula` for a caller-supplied guard literal (DIMACS form).
    GuardImplies { guard: i64, formula: Rc<str> },
    /// `formula → guard` for a caller-supplied guard literal (DIMACS form).
    ImpliesGuard { guard: i64, formula: Rc<str> },
}

/// Append-only clause store shared by every generator of one compilation.
///
/// Clauses are normalized on the way in: anything satisfied by the constant
/// `⊤` is dropped and `¬⊤` literals are removed.
#[derive(Debug)]
pub struct ClauseCollection {
    registry: VariableRegistry,
    clauses: Vec<Clause>,
    done: HashSet<MemoKey>,
}

impl ClauseCollection {
    /// Creates an empty collection allocating auxiliaries from `registry`.
    #[must_use]
    pub fn new(registry: &VariableRegistry) -> Self {
        Self {
            registry: registry.clone(),
            clauses: Vec::new(),
            done: HashSet::new(),
        }
    }

    /// Returns the registry auxiliaries are allocated from.
    #[must_use]
    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Adds a clause; returns whether it was kept.
    pub fn add(&mut self, atoms: impl IntoIterator<Item = Atom>) -> bool {
        let clause = Clause::new(atoms);
        if clause.is_tautology() {
            return false;
        }
        let mut kept: Vec<Atom> = clause.atoms.iter().filter(|a| !a.is_false()).cloned().collect();
        if kept.is_empty() {
            kept.push(self.registry.falsity());
        }
        self.clauses.push(Clause { atoms: kept });
        true
    }

    /// Adds every clause of an iterator.
    pub fn add_all<I, C>(&mut self, clauses: I)
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = Atom>,
    {
        for clause in clauses {
            self.add(clause);
        }
    }

    /// Marks `key` as emitted and reports whether this is the first request.
    pub fn first_time(&mut self, key: MemoKey) -> bool {
        self.done.insert(key)
    }

    /// Returns whether `key` was already emitted.
    #[must_use]
    pub fn is_done(&self, key: &MemoKey) -> bool {
        self.done.contains(key)
    }

    /// Returns the stored clauses in emission order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns the number of stored clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns whether no clause was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
