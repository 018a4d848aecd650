//! Main DC solver interface.

use tracing::debug;

use crate::circuit::{validate_component, NodeLabel};
use crate::components::Component;
use crate::error::Result;

use super::iteration::ThresholdIteration;
use super::mna::MnaMatrix;
use super::solution::DcSolution;
use super::topology::Topology;
use super::DEFAULT_MAX_ITERATIONS;

/// Configuration for the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum linear solves for threshold-state iteration.
    pub max_iterations: usize,
    /// Fail with `ConvergenceFailure` instead of returning a capped result.
    pub strict: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            strict: false,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap (at least one solve is always made).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Treat hitting the iteration cap as an error.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// DC operating-point solver.
///
/// Works on a read-only snapshot of the component list, so a host that
/// edits circuits from several threads only has to serialize edits against
/// the moment the slice is borrowed.
#[derive(Debug, Clone, Default)]
pub struct DcSolver {
    config: SolverConfig,
}

impl DcSolver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve `components` with `ground` held at 0 V.
    ///
    /// Component parameters are validated here as well, since the slice may
    /// not have come through [`crate::Circuit::add`].
    pub fn solve<N: NodeLabel>(&self, components: &[Component<N>], ground: &N) -> Result<DcSolution<N>> {
        components.iter().try_for_each(|c| validate_component(c))?;
        let topology = Topology::build(components, ground)?;
        topology.check_solvable(components)?;

        // One explicit source order, shared by assembly and extraction
        let sources: Vec<usize> = components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_voltage_source())
            .map(|(index, _)| index)
            .collect();

        let size = topology.num_unknowns() + sources.len();
        debug!(
            nodes = topology.nodes().len(),
            classes = topology.num_classes(),
            sources = sources.len(),
            size,
            "assembling DC system"
        );

        let mut matrix = MnaMatrix::new(size);
        let iteration = ThresholdIteration::with_config(self.config.max_iterations, self.config.strict);
        let outcome = iteration.run(&topology, components, &sources, &mut matrix)?;

        Ok(DcSolution::extract(
            &topology,
            components,
            &sources,
            &outcome.conducting,
            &matrix.x,
            outcome.convergence,
        ))
    }
}

/// Solve `components` with the default configuration.
pub fn solve_dc<N: NodeLabel>(components: &[Component<N>], ground: &N) -> Result<DcSolution<N>> {
    DcSolver::new().solve(components, ground)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ThresholdParams;
    use crate::error::GridError;
    use crate::solver::Convergence;
    use approx::assert_relative_eq;

    #[test]
    fn test_source_across_resistor() {
        let components = [
            Component::voltage_source("a", "gnd", 5.0).with_name("V1"),
            Component::resistor("a", "gnd", 100.0).with_name("R1"),
        ];
        let sol = solve_dc(&components, &"gnd").unwrap();
        assert_relative_eq!(sol.voltage(&"a").unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(sol.voltage(&"gnd"), Some(0.0));
        assert_relative_eq!(sol.current("R1").unwrap(), 0.05, epsilon = 1e-12);
        // Source branch current flows a -> b inside the source
        assert_relative_eq!(sol.current("V1").unwrap(), -0.05, epsilon = 1e-12);
        assert!(sol.is_converged());
    }

    #[test]
    fn test_reversed_source_gives_negative_potential() {
        let components = [
            Component::voltage_source("gnd", "a", 5.0),
            Component::resistor("a", "gnd", 100.0),
        ];
        let sol = solve_dc(&components, &"gnd").unwrap();
        assert_relative_eq!(sol.voltage(&"a").unwrap(), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_resistors_obey_ohms_law() {
        let components = [
            Component::voltage_source("a", "gnd", 12.0),
            Component::resistor("a", "b", 100.0).with_name("Rs"),
            Component::resistor("b", "gnd", 300.0).with_name("R1"),
            Component::resistor("b", "gnd", 600.0).with_name("R2"),
        ];
        let sol = solve_dc(&components, &"gnd").unwrap();

        // 300 || 600 = 200, divider with 100
        let vb = sol.voltage(&"b").unwrap();
        assert_relative_eq!(vb, 8.0, epsilon = 1e-9);
        assert_relative_eq!(sol.current("R1").unwrap(), vb / 300.0, epsilon = 1e-12);
        assert_relative_eq!(sol.current("R2").unwrap(), vb / 600.0, epsilon = 1e-12);
        assert_relative_eq!(
            sol.current("Rs").unwrap(),
            sol.current("R1").unwrap() + sol.current("R2").unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_source_currents_follow_source_order() {
        let components = [
            Component::resistor("a", "gnd", 10.0),
            Component::voltage_source("a", "gnd", 1.0).with_name("Va"),
            Component::resistor("b", "gnd", 10.0),
            Component::voltage_source("b", "gnd", 3.0).with_name("Vb"),
        ];
        let sol = solve_dc(&components, &"gnd").unwrap();
        assert_relative_eq!(sol.current("Va").unwrap(), -0.1, epsilon = 1e-12);
        assert_relative_eq!(sol.current("Vb").unwrap(), -0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_is_idempotent() {
        let components = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::resistor("a", "b", 100.0),
            Component::led("b", "gnd", 1.6),
        ];
        let first = solve_dc(&components, &"gnd").unwrap();
        let second = solve_dc(&components, &"gnd").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wire_only_circuit_is_all_ground() {
        let components = [Component::wire("a", "gnd"), Component::wire("b", "a")];
        let sol = solve_dc(&components, &"gnd").unwrap();
        assert_eq!(sol.voltage(&"b"), Some(0.0));
        assert!(sol.branches.is_empty());
        assert_eq!(sol.convergence, Convergence::Converged { iterations: 1 });
    }

    #[test]
    fn test_error_cases() {
        let components = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::resistor("a", "gnd", 100.0),
        ];
        assert!(matches!(
            solve_dc(&components, &"nowhere"),
            Err(GridError::MissingGround { .. })
        ));

        // A wire shorting a source leaves its constraint row empty
        let shorted = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::wire("a", "gnd"),
        ];
        assert!(matches!(
            solve_dc(&shorted, &"gnd"),
            Err(GridError::SingularCircuit { floating }) if floating.is_empty()
        ));
    }

    #[test]
    fn test_unvalidated_slices_are_checked() {
        let zero = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::resistor("a", "gnd", 0.0),
        ];
        assert!(matches!(
            solve_dc(&zero, &"gnd"),
            Err(GridError::InvalidParameter { param, .. }) if param == "resistance"
        ));

        let nan = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::resistor("a", "gnd", f64::NAN),
        ];
        assert!(matches!(solve_dc(&nan, &"gnd"), Err(GridError::InvalidParameter { .. })));
    }

    #[test]
    fn test_dangling_led_with_huge_off_resistance() {
        let params = ThresholdParams::with_threshold(100.0).off_resistance(1e13);
        let components = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::resistor("a", "gnd", 100.0),
            Component::threshold_element("a", "x", params).with_name("D1"),
        ];
        let sol = solve_dc(&components, &"gnd").unwrap();
        assert_relative_eq!(sol.voltage(&"x").unwrap(), 5.0, max_relative = 1e-9);
        assert_eq!(sol.current("D1"), Some(0.0));
        assert_eq!(sol.threshold_states().collect::<Vec<_>>(), vec![(2, false)]);
    }

    #[test]
    fn test_dangling_led_beside_tiny_resistors() {
        let components = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::resistor("a", "b", 1e-5),
            Component::resistor("b", "gnd", 1e-5),
            Component::led("b", "x", 100.0).with_name("D1"),
        ];
        let sol = solve_dc(&components, &"gnd").unwrap();
        assert_relative_eq!(sol.voltage(&"b").unwrap(), 2.5, max_relative = 1e-9);
        assert_relative_eq!(sol.voltage(&"x").unwrap(), 2.5, max_relative = 1e-9);
        assert_eq!(sol.current("D1"), Some(0.0));
        assert!(sol.is_converged());
    }

    #[test]
    fn test_parallel_sources_are_degenerate() {
        let components = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::voltage_source("a", "gnd", 3.0),
            Component::resistor("a", "gnd", 10.0),
        ];
        assert!(matches!(
            solve_dc(&components, &"gnd"),
            Err(GridError::SingularCircuit { floating }) if floating.is_empty()
        ));
    }

    #[test]
    fn test_capped_result_is_flagged() {
        let components = [
            Component::voltage_source("a", "gnd", 5.0),
            Component::resistor("a", "b", 100.0),
            Component::led("b", "gnd", 2.0).with_name("D1"),
        ];
        let solver = DcSolver::with_config(SolverConfig::new().with_max_iterations(4));
        let sol = solver.solve(&components, &"gnd").unwrap();
        assert_eq!(sol.convergence, Convergence::Capped { iterations: 4 });
        // Passes alternate off, on, off, on
        let states: Vec<_> = sol.threshold_states().collect();
        assert_eq!(states, vec![(2, true)]);
        assert_relative_eq!(sol.voltage(&"b").unwrap(), 5.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(sol.current("D1").unwrap(), 5.0 / 150.0, epsilon = 1e-9);

        let strict = DcSolver::with_config(SolverConfig::new().with_strict(true));
        assert!(matches!(
            strict.solve(&components, &"gnd"),
            Err(GridError::ConvergenceFailure { iterations: 10 })
        ));
    }
}
