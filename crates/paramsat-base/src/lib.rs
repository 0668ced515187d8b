//! # paramsat-base
//!
//! Core types shared by every paramsat crate.
//!
//! - **Atoms**: name-addressed variables, signed atoms and the registry
//!   that hands out their indices
//! - **Clauses**: canonical clauses and the memoizing clause collection
//! - **Solutions**: solver answers read back as sets of true variables
//! - **Error Types**: unified error handling across the compiler

pub mod atom;
pub mod clause;
pub mod error;
pub mod solution;

pub use atom::{Atom, Variable, VariableRegistry, TRUTH_INDEX};
pub use clause::{Clause, ClauseCollection, MemoKey};
pub use error::{Error, Result};
pub use solution::Solution;
