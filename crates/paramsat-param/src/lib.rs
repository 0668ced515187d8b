//! # paramsat-param
//!
//! The parameter algebra: integer expressions and boolean conditions over
//! named parameters, parameter lists with dependent bounds, and the lazily
//! materialized object families indexed by them.

pub mod assignment;
pub mod constraint;
pub mod expression;
pub mod function;
pub mod parameter;
pub mod tree;

pub use assignment::{Assignment, Substitution};
pub use constraint::{BoolLookup, PConstraint};
pub use expression::PExpression;
pub use function::IntFunction;
pub use parameter::{Membership, Parameter, ParameterList};
pub use tree::{Lookup, ParamTree};
