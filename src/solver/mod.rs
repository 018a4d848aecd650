//! MNA (Modified Nodal Analysis) DC solver.
//!
//! This module provides the numerical engine for DC analysis.
//!
//! ## Pipeline
//!
//! 1. [`Topology`] merges wire-connected nodes into lumped nodes (classes)
//!    with a disjoint-set; the class holding the ground node is the reference.
//! 2. [`stamp_components`] assembles the MNA system for the current
//!    threshold-element states.
//! 3. [`ThresholdIteration`] factors and solves, re-evaluates the threshold
//!    states and repeats until they stop changing or the cap is reached.
//! 4. [`DcSolution`] turns the solution vector into node voltages and
//!    component currents.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains class potentials (ground excluded) and source branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ B'  0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix of the `K-1` non-ground classes
//! - B connects the `M` voltage sources to their classes (+1 / -1)
//! - v is the vector of class potentials
//! - j is the vector of voltage source currents
//! - e is the vector of source voltages

mod dc;
mod iteration;
mod mna;
mod solution;
mod topology;

pub use dc::{solve_dc, DcSolver, SolverConfig};
pub use iteration::{IterationOutcome, ThresholdIteration};
pub use mna::{stamp_components, MnaMatrix};
pub use solution::{BranchReport, Convergence, DcSolution};
pub use topology::{DisjointSet, Topology};

/// Maximum threshold-state iterations per solve.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;
