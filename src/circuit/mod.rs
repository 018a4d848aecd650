//! Circuit aggregates and validation.
//!
//! A [`Circuit`] is an ordered list of components over any node label; a
//! [`GridCircuit`] is a circuit on a bounded grid of [`GridPos`] cells that
//! rejects out-of-bounds placements. The node set is always derived from the
//! component endpoints, never stored on its own.

mod graph;
mod grid;
mod types;
mod validate;

pub use graph::Circuit;
pub use grid::{GridCircuit, MAX_GRID_CELLS};
pub use types::*;
pub use validate::validate_component;
