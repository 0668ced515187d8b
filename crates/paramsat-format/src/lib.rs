//! # paramsat-format
//!
//! File formats at the solver boundary.
//!
//! Supports:
//! - **DIMACS CNF**: what the compiler hands to the solver
//! - **Solver answers**: result files and competition-style stdout

pub mod answer;
pub mod dimacs;

pub use answer::SolverAnswer;
pub use dimacs::DimacsCnf;
