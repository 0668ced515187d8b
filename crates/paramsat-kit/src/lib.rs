//! # paramsat-kit
//!
//! Integer encodings, formulas and requirements for paramsat.
//!
//! This crate provides:
//! - unary ([`RangeVariable`]) and two's-complement ([`BinaryVariable`])
//!   integers and their closed combinations ([`ClosedInteger`])
//! - parametrized families of variables ([`family`])
//! - quantified integers and sums that instantiate to closed ones
//! - formulas with a definitional encoding ([`Formula`])
//! - declarations, requirements and the external SAT oracle
//!
//! # Example
//!
//! ```ignore
//! use paramsat_kit::*;
//!
//! let mut decls = Declarations::new();
//! let x = decls.declare_bool("x")?;
//! let y = decls.declare_range("y", 1, 5)?;
//!
//! let mut reqs = RequirementsList::new(decls);
//! reqs.add(Formula::implies(x.into(), Formula::geq(y, 4i64)?))?;
//!
//! match reqs.solve(&ExternalSolver::default())? {
//!     Some(solution) if solution.is_satisfiable() => println!("{solution}"),
//!     Some(_) => println!("unsatisfiable"),
//!     None => println!("undecided"),
//! }
//! ```

pub mod binary;
pub mod config;
pub mod declarations;
pub mod family;
pub mod formula;
pub mod gadgets;
pub mod integer;
pub mod oracle;
pub mod quantified;
pub mod range;
pub mod requirements;
pub mod state;

pub use binary::{BinaryVariable, BinaryView};
pub use config::{ResultChannel, SolverConfig};
pub use declarations::Declarations;
pub use family::{BinaryFamily, BoolFamily, Family, IntegerFamily, RangeFamily};
pub use formula::Formula;
pub use integer::{emit_comparison, ClosedInteger, Kind, Relation};
pub use oracle::{ExternalSolver, Oracle};
pub use quantified::{QuantifiedAtom, QuantifiedInteger, QuantifiedSum};
pub use range::RangeVariable;
pub use requirements::{DebugReport, RequirementsList};
pub use state::ProgramState;

pub use paramsat_base::{Atom, Clause, ClauseCollection, Error, Result, Solution, VariableRegistry};
pub use paramsat_format::{DimacsCnf, SolverAnswer};
pub use paramsat_param::{
    Assignment, IntFunction, PConstraint, PExpression, Parameter, ParameterList, Substitution,
};
