//! # Ohmgrid Core
//!
//! A DC operating-point analyzer for small resistive networks.
//!
//! This library provides:
//! - Circuits over arbitrary node labels, or placed on a bounded grid
//! - Wire merging with a disjoint-set before equation assembly
//! - Modified Nodal Analysis (MNA) with a dense LU solve
//! - Binary threshold elements (LEDs) resolved by fixed-point iteration
//! - A line-oriented text netlist
//!
//! ## Architecture
//!
//! - [`netlist`] - Lexer and parser for the text netlist
//! - [`circuit`] - Circuit aggregates, grid placement and validation
//! - [`components`] - Component models (wire, resistor, source, LED)
//! - [`solver`] - Topology reduction, MNA assembly, iteration and results
//! - [`report`] - Plain-text summaries of a solution
//! - [`demos`] - Ready-made example circuits
//!
//! ## Usage
//!
//! ### Native
//!
//! ```rust
//! use ohmgrid_core::{Circuit, Component};
//!
//! let mut circuit = Circuit::new();
//! circuit.add(Component::voltage_source("a", "gnd", 5.0).with_name("V1"))?;
//! circuit.add(Component::resistor("a", "b", 100.0).with_name("R1"))?;
//! circuit.add(Component::led("b", "gnd", 1.6).with_name("D1"))?;
//!
//! let solution = circuit.solve(&"gnd")?;
//! assert!(solution.is_converged());
//! # Ok::<(), ohmgrid_core::GridError>(())
//! ```
//!
//! ### CLI
//!
//! ```bash
//! ohmgrid circuit.net --format json
//! ohmgrid demo led
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmGrid } from 'ohmgrid_core';
//!
//! const grid = new WasmGrid(8, 6);
//! grid.add_source(1, 1, 0, 1, 5.0);
//! const solution = grid.solve(0, 1);
//! ```
//!
//! ## Solution Method
//!
//! 1. Merge every wire-connected group of nodes into one lumped node
//! 2. Assemble the MNA system with threshold elements at their current state
//! 3. Solve, then switch each threshold element on iff its voltage drop
//!    reaches its threshold
//! 4. Repeat from 2 until the states reproduce themselves or the cap is hit

pub mod circuit;
pub mod components;
pub mod demos;
pub mod error;
pub mod netlist;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Circuit, GridCircuit, GridPos, NodeLabel};
pub use components::{Component, ThresholdParams};
pub use error::{GridError, Result};
pub use solver::{solve_dc, Convergence, DcSolution, DcSolver, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::{WasmGrid, WasmSolution};

/// Resistance of a threshold element that is not conducting, in ohms
pub const DEFAULT_OFF_RESISTANCE: f64 = 1e9;

/// Resistance of a conducting LED, in ohms
pub const DEFAULT_LED_ON_RESISTANCE: f64 = 50.0;

/// Turn-on voltage of an LED when none is given
pub const DEFAULT_LED_THRESHOLD: f64 = 2.0;
