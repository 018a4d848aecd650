//! Fixed-point iteration over threshold-element states.

use tracing::{debug, info, warn};

use crate::circuit::NodeLabel;
use crate::components::Component;
use crate::error::{GridError, Result};

use super::mna::{stamp_components, MnaMatrix};
use super::solution::Convergence;
use super::topology::Topology;
use super::DEFAULT_MAX_ITERATIONS;

/// Final state of the iteration.
#[derive(Debug, Clone)]
pub struct IterationOutcome {
    /// Per-component states the final solve was assembled with
    pub conducting: Vec<bool>,
    pub convergence: Convergence,
}

/// Fixed-point solver for circuits with threshold elements.
///
/// Every element starts off. Each pass assembles and solves the linear
/// system, then re-evaluates `on <=> V(a) - V(b) >= threshold` for every
/// element. The iteration stops when the re-evaluated states equal the
/// states the system was assembled with, or after `max_iterations` passes.
/// A circuit without threshold elements converges after one pass.
pub struct ThresholdIteration {
    /// Maximum linear solves
    pub max_iterations: usize,
    /// Report a capped iteration as an error instead of a flagged result
    pub strict: bool,
}

impl Default for ThresholdIteration {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdIteration {
    /// Create an iteration with the default cap.
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            strict: false,
        }
    }

    /// Create an iteration with custom settings.
    pub fn with_config(max_iterations: usize, strict: bool) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            strict,
        }
    }

    /// Run the iteration, leaving the final solution in `matrix.x`.
    pub fn run<N: NodeLabel>(
        &self,
        topology: &Topology<N>,
        components: &[Component<N>],
        sources: &[usize],
        matrix: &mut MnaMatrix,
    ) -> Result<IterationOutcome> {
        let thresholds: Vec<usize> = components
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Component::ThresholdElement(_)))
            .map(|(index, _)| index)
            .collect();
        let mut conducting = vec![false; components.len()];

        for iteration in 1..=self.max_iterations {
            matrix.clear();
            stamp_components(topology, components, sources, &conducting, matrix);
            matrix.factor().map_err(|_| singular(topology, components))?;
            matrix.solve();

            let mut changed = false;
            let mut next = conducting.clone();
            for &index in &thresholds {
                if let Component::ThresholdElement(d) = &components[index] {
                    let [a, b] = topology.terminals(index);
                    let v = matrix.voltage(topology.unknown_index(a))
                        - matrix.voltage(topology.unknown_index(b));
                    next[index] = d.conducts(v);
                    changed |= next[index] != conducting[index];
                }
            }

            debug!(
                iteration,
                on = thresholds.iter().filter(|&&i| next[i]).count(),
                changed,
                "threshold pass"
            );

            if !changed {
                info!(iterations = iteration, "threshold states converged");
                return Ok(IterationOutcome {
                    conducting,
                    convergence: Convergence::Converged { iterations: iteration },
                });
            }

            if iteration < self.max_iterations {
                conducting = next;
            }
        }

        warn!(
            iterations = self.max_iterations,
            "threshold states still changing at iteration cap"
        );
        if self.strict {
            return Err(GridError::ConvergenceFailure {
                iterations: self.max_iterations,
            });
        }

        Ok(IterationOutcome {
            conducting,
            convergence: Convergence::Capped {
                iterations: self.max_iterations,
            },
        })
    }
}

/// Turn a failed factorization into an error naming the floating nodes.
fn singular<N: NodeLabel>(topology: &Topology<N>, components: &[Component<N>]) -> GridError {
    let floating: Vec<String> = topology
        .floating_nodes(components)
        .iter()
        .map(|n| n.to_string())
        .collect();
    warn!(?floating, "singular circuit");
    GridError::SingularCircuit { floating }
}
