//! Named integer functions usable inside parameter expressions.

use paramsat_base::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A finite integer function given by a table, with an optional default
/// for arguments outside the table.
///
/// Functions are identified by name; two handles with the same name are
/// considered the same function.
#[derive(Clone)]
pub struct IntFunction {
    inner: Rc<FunctionInner>,
}

struct FunctionInner {
    name: String,
    arity: usize,
    table: HashMap<Vec<i64>, i64>,
    default: Option<i64>,
}

impl IntFunction {
    /// Builds a function from its table. Every key must have length `arity`.
    pub fn from_table(
        name: impl Into<String>,
        arity: usize,
        table: impl IntoIterator<Item = (Vec<i64>, i64)>,
        default: Option<i64>,
    ) -> Result<Self> {
        let name = name.into();
        let mut map = HashMap::new();
        for (args, value) in table {
            if args.len() != arity {
                return Err(Error::invalid(format!(
                    "function {name} has arity {arity} but table entry {args:?} has {} arguments",
                    args.len()
                )));
            }
            map.insert(args, value);
        }
        Ok(Self {
            inner: Rc::new(FunctionInner {
                name,
                arity,
                table: map,
                default,
            }),
        })
    }

    /// Function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.inner.arity
    }

    /// Applies the function.
    pub fn apply(&self, args: &[i64]) -> Result<i64> {
        if args.len() != self.inner.arity {
            return Err(Error::invalid(format!(
                "function {} applied to {} arguments, expected {}",
                self.inner.name,
                args.len(),
                self.inner.arity
            )));
        }
        self.inner
            .table
            .get(args)
            .copied()
            .or(self.inner.default)
            .ok_or_else(|| {
                Error::invalid(format!("function {} undefined at {args:?}", self.inner.name))
            })
    }
}

impl PartialEq for IntFunction {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name && self.inner.arity == other.inner.arity
    }
}

impl Eq for IntFunction {}

impl Hash for IntFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
        self.inner.arity.hash(state);
    }
}

impl fmt::Debug for IntFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntFunction({}/{})", self.inner.name, self.inner.arity)
    }
}
