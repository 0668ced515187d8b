//! Lazily materialized families of objects indexed by parameter tuples.

use crate::assignment::Assignment;
use crate::parameter::{Membership, ParameterList};
use paramsat_base::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Outcome of [`ParamTree::lookup`].
#[derive(Debug)]
pub enum Lookup<T> {
    Found(Rc<T>),
    OutOfRange { parameter: String },
    RestrictionViolated { parameter: String },
}

type Generator<T> = Box<dyn Fn(&Assignment) -> Result<T>>;

/// A family of objects, one per tuple of a closed parameter domain.
///
/// Objects are created on first lookup by calling the generator with the
/// assignment of the tuple and are cached afterwards, so a tuple always maps
/// to the same object.
pub struct ParamTree<T> {
    params: ParameterList,
    generator: Generator<T>,
    cache: RefCell<HashMap<Vec<i64>, Rc<T>>>,
}

impl<T> ParamTree<T> {
    /// Creates a tree over a parameter list that mentions no outside names.
    pub fn new(
        params: ParameterList,
        generator: impl Fn(&Assignment) -> Result<T> + 'static,
    ) -> Result<Self> {
        let free = params.query_parameters();
        if !free.is_empty() {
            return Err(Error::invalid(format!(
                "parameter list [{params}] refers to unbound names {free:?}"
            )));
        }
        Ok(Self {
            params,
            generator: Box::new(generator),
            cache: RefCell::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterList {
        &self.params
    }

    /// Looks up the object of a tuple, creating it if needed.
    pub fn lookup(&self, index: &[i64]) -> Result<Lookup<T>> {
        if let Some(found) = self.cache.borrow().get(index) {
            return Ok(Lookup::Found(Rc::clone(found)));
        }
        let assignment = match self.params.membership(index, &Assignment::new())? {
            Membership::Valid(assignment) => assignment,
            Membership::OutOfRange { parameter } => return Ok(Lookup::OutOfRange { parameter }),
            Membership::RestrictionViolated { parameter } => {
                return Ok(Lookup::RestrictionViolated { parameter })
            }
        };
        // The generator may look up other members, so the cache is not
        // borrowed while it runs.
        let object = Rc::new((self.generator)(&assignment)?);
        tracing::trace!("Materialized member {:?}", index);
        let mut cache = self.cache.borrow_mut();
        let entry = cache.entry(index.to_vec()).or_insert(object);
        Ok(Lookup::Found(Rc::clone(entry)))
    }

    /// Looks up the object of a tuple that must be in the domain.
    pub fn require(&self, index: &[i64]) -> Result<Rc<T>> {
        match self.lookup(index)? {
            Lookup::Found(object) => Ok(object),
            Lookup::OutOfRange { parameter } => Err(Error::invalid(format!(
                "index {index:?} is out of range for parameter {parameter}"
            ))),
            Lookup::RestrictionViolated { parameter } => Err(Error::invalid(format!(
                "index {index:?} violates the restriction of parameter {parameter}"
            ))),
        }
    }

    /// Every member of the domain in lexicographic tuple order.
    pub fn instances(&self) -> Result<Vec<(Vec<i64>, Rc<T>)>> {
        let mut tuples = Vec::new();
        let names: Vec<&str> = self.params.names().collect();
        self.params.for_each_assignment(&Assignment::new(), &mut |a| {
            let tuple = names
                .iter()
                .map(|name| a.get(name))
                .collect::<Result<Vec<_>>>()?;
            tuples.push(tuple);
            Ok(())
        })?;
        tuples
            .into_iter()
            .map(|tuple| {
                let object = self.require(&tuple)?;
                Ok((tuple, object))
            })
            .collect()
    }

    /// Number of members created so far.
    #[must_use]
    pub fn materialized(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<T> fmt::Debug for ParamTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamTree")
            .field("params", &self.params.to_string())
            .field("materialized", &self.materialized())
            .finish_non_exhaustive()
    }
}
