//! Transient circuit simulator.
//!
//! A netlist is read into an ordered element list plus a `.TRAN` directive,
//! every element is stamped into a dense modified-nodal-analysis system, and
//! the system is solved at every sub-step with Newton-Raphson iteration for
//! nonlinear elements and Adams-Moulton companion models for inductors and
//! capacitors.

pub mod analysis;
pub mod compiler;
pub mod dense;
pub mod elements;
pub mod error;
pub mod ir;
pub mod output;
pub mod parser;
pub mod signal;
pub mod solver;
pub mod stats;

/// Floating-point type used for every numeric value in the engine.
pub type Scalar = f64;
