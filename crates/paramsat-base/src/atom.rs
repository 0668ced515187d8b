//! Boolean variables, signed atoms and the name registry that owns them.

use serde::Serialize;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Index of the constant-true variable in every registry.
pub const TRUTH_INDEX: u32 = 1;

/// Name of the constant-true variable.
pub const TRUTH_NAME: &str = "⊤";

/// A name-addressed boolean unknown.
///
/// Equality, hashing and ordering only look at the index: the registry that
/// handed out the variable guarantees one index per name.
#[derive(Debug, Clone, Serialize)]
pub struct Variable {
    index: u32,
    name: Rc<str>,
}

impl Variable {
    /// Returns the dense, positive index of this variable.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns the name this variable was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates the positive atom of this variable.
    #[must_use]
    pub fn pos(&self) -> Atom {
        Atom::new(self.clone(), true)
    }

    /// Creates the negative atom of this variable.
    #[must_use]
    pub fn neg(&self) -> Atom {
        Atom::new(self.clone(), false)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A variable together with a polarity.
///
/// Atoms order by `(index, polarity)` with the negative atom first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Atom {
    var: Variable,
    positive: bool,
}

impl Atom {
    /// Creates an atom.
    #[must_use]
    pub const fn new(var: Variable, positive: bool) -> Self {
        Self { var, positive }
    }

    /// Returns the underlying variable.
    #[must_use]
    pub const fn variable(&self) -> &Variable {
        &self.var
    }

    /// Returns whether this atom asserts its variable.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.positive
    }

    /// Returns the negated atom.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            var: self.var.clone(),
            positive: !self.positive,
        }
    }

    /// Returns whether this is the constant-true atom.
    #[must_use]
    pub fn is_true(&self) -> bool {
        self.var.index == TRUTH_INDEX && self.positive
    }

    /// Returns whether this is the constant-false atom.
    #[must_use]
    pub fn is_false(&self) -> bool {
        self.var.index == TRUTH_INDEX && !self.positive
    }

    /// Returns whether this atom is one of the two constants.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.var.index == TRUTH_INDEX
    }

    /// Converts to DIMACS format (index for positive, -index for negative).
    #[must_use]
    pub fn to_dimacs(&self) -> i64 {
        let base = i64::from(self.var.index);
        if self.positive {
            base
        } else {
            -base
        }
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.var
            .cmp(&other.var)
            .then(self.positive.cmp(&other.positive))
    }
}

impl std::ops::Not for Atom {
    type Output = Atom;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl std::ops::Not for &Atom {
    type Output = Atom;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.var)
        } else {
            write!(f, "¬{}", self.var)
        }
    }
}

#[derive(Debug)]
struct RegistryInner {
    by_name: HashMap<Rc<str>, u32>,
    /// `names[i]` is the name of index `i + 1`.
    names: Vec<Rc<str>>,
    fresh_counter: u64,
}

impl RegistryInner {
    fn new() -> Self {
        let mut inner = Self {
            by_name: HashMap::new(),
            names: Vec::new(),
            fresh_counter: 0,
        };
        inner.intern(TRUTH_NAME);
        inner
    }

    fn intern(&mut self, name: &str) -> Variable {
        if let Some((key, &index)) = self.by_name.get_key_value(name) {
            return Variable {
                index,
                name: Rc::clone(key),
            };
        }
        let name: Rc<str> = Rc::from(name);
        self.names.push(Rc::clone(&name));
        let index = self.names.len() as u32;
        self.by_name.insert(Rc::clone(&name), index);
        Variable { index, name }
    }
}

/// The name → index registry of one compilation.
///
/// Cloning the registry clones the handle, not the table: every clone sees
/// the same variables. Index [`TRUTH_INDEX`] is always the constant-true
/// variable.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl VariableRegistry {
    /// Creates a registry holding only the constant-true variable.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner::new())),
        }
    }

    /// Returns the variable with the given name, registering it on first use.
    pub fn variable(&self, name: &str) -> Variable {
        self.inner.borrow_mut().intern(name)
    }

    /// Shorthand for the positive atom of [`Self::variable`].
    pub fn atom(&self, name: &str) -> Atom {
        self.variable(name).pos()
    }

    /// Registers a variable whose name has never been used before.
    pub fn fresh(&self, prefix: &str) -> Variable {
        let mut inner = self.inner.borrow_mut();
        loop {
            inner.fresh_counter += 1;
            let name = format!("{prefix}#{}", inner.fresh_counter);
            if !inner.by_name.contains_key(name.as_str()) {
                return inner.intern(&name);
            }
        }
    }

    /// Returns the constant-true atom.
    pub fn truth(&self) -> Atom {
        self.variable(TRUTH_NAME).pos()
    }

    /// Returns the constant-false atom.
    pub fn falsity(&self) -> Atom {
        self.variable(TRUTH_NAME).neg()
    }

    /// Returns `truth()` or `falsity()`.
    pub fn constant(&self, value: bool) -> Atom {
        if value {
            self.truth()
        } else {
            self.falsity()
        }
    }

    /// Looks up a variable by index.
    pub fn lookup(&self, index: u32) -> Option<Variable> {
        let inner = self.inner.borrow();
        let position = (index as usize).checked_sub(1)?;
        inner.names.get(position).map(|name| Variable {
            index,
            name: Rc::clone(name),
        })
    }

    /// Returns the index of a registered name.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.inner.borrow().by_name.get(name).copied()
    }

    /// Returns the highest index handed out so far.
    pub fn len(&self) -> usize {
        self.inner.borrow().names.len()
    }

    /// Returns whether only the constant-true variable is registered.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Returns every registered name in index order.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .names
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Forgets every variable. Only meant for use between independent runs.
    pub fn reset(&self) {
        *self.inner.borrow_mut() = RegistryInner::new();
    }
}

impl Default for VariableRegistry {
    fn default() -> Self {
        Self::new()
    }
}
