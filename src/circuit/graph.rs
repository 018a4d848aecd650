//! Circuit aggregate.

use std::collections::HashSet;

use tracing::debug;

use super::types::NodeLabel;
use super::validate::validate_component;
use crate::components::Component;
use crate::error::{GridError, Result};
use crate::netlist::CircuitAst;
use crate::solver::{DcSolution, DcSolver, SolverConfig};

/// An ordered list of components.
///
/// Order only matters for reproducibility: it fixes the node and
/// lumped-node numbering and the voltage-source unknowns.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit<N> {
    components: Vec<Component<N>>,
}

impl<N> Default for Circuit<N> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
        }
    }
}

impl<N: NodeLabel> Circuit<N> {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component after validating its parameters.
    pub fn add(&mut self, component: Component<N>) -> Result<()> {
        validate_component(&component)?;
        debug!(name = component.name(), kind = ?component.kind(), "adding component");
        self.components.push(component);
        Ok(())
    }

    /// Remove the first component with this name.
    pub fn remove(&mut self, name: &str) -> Result<Component<N>> {
        let index = self
            .components
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| GridError::ComponentNotFound {
                name: name.to_string(),
            })?;
        Ok(self.components.remove(index))
    }

    /// Remove every component between `a` and `b` (either orientation).
    /// Returns how many were removed.
    pub fn remove_between(&mut self, a: &N, b: &N) -> usize {
        let before = self.components.len();
        self.components.retain(|c| !c.connects(a, b));
        before - self.components.len()
    }

    /// Remove all components.
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Components in insertion order.
    pub fn components(&self) -> &[Component<N>] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the circuit has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Distinct component endpoints in first-encounter order.
    pub fn nodes(&self) -> Vec<N> {
        let mut seen = HashSet::new();
        self.components
            .iter()
            .flat_map(|c| c.nodes().iter())
            .filter(|n| seen.insert(*n))
            .cloned()
            .collect()
    }

    /// Check if `node` is an endpoint of any component.
    pub fn contains_node(&self, node: &N) -> bool {
        self.components.iter().any(|c| c.nodes().contains(node))
    }

    /// `(name, on)` for every threshold element, as of the last solve.
    pub fn threshold_states(&self) -> Vec<(&str, bool)> {
        self.components
            .iter()
            .filter_map(|c| c.on_state().map(|on| (c.name(), on)))
            .collect()
    }

    /// Solve with `ground` at 0 V using the default configuration.
    pub fn solve(&mut self, ground: &N) -> Result<DcSolution<N>> {
        self.solve_with(ground, &SolverConfig::default())
    }

    /// Solve with `ground` at 0 V.
    ///
    /// The threshold elements' `on` flags are updated to the solved states.
    pub fn solve_with(&mut self, ground: &N, config: &SolverConfig) -> Result<DcSolution<N>> {
        let solution = DcSolver::with_config(config.clone()).solve(&self.components, ground)?;
        for (index, on) in solution.threshold_states() {
            if let Component::ThresholdElement(d) = &mut self.components[index] {
                d.on = on;
            }
        }
        Ok(solution)
    }
}

impl Circuit<String> {
    /// Build a circuit from a parsed netlist.
    pub fn from_netlist(ast: &CircuitAst) -> Result<Self> {
        let mut circuit = Circuit::new();
        for def in &ast.components {
            circuit.add(Component::from_def(def)?)?;
        }
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist;
    use approx::assert_relative_eq;

    fn led_circuit() -> Circuit<&'static str> {
        let mut c = Circuit::new();
        c.add(Component::voltage_source("a", "gnd", 5.0).with_name("V1")).unwrap();
        c.add(Component::resistor("a", "b", 100.0).with_name("R1")).unwrap();
        c.add(Component::led("b", "gnd", 1.6).with_name("D1")).unwrap();
        c
    }

    #[test]
    fn test_nodes_are_derived_in_order() {
        let c = led_circuit();
        assert_eq!(c.nodes(), vec!["a", "gnd", "b"]);
        assert!(c.contains_node(&"b"));
        assert!(!c.contains_node(&"z"));
    }

    #[test]
    fn test_add_rejects_invalid_parameters() {
        let mut c = Circuit::new();
        assert!(c.add(Component::resistor("a", "b", 0.0)).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn test_remove_by_name_and_between() {
        let mut c = led_circuit();
        assert_eq!(c.remove("R1").unwrap().name(), "R1");
        assert!(matches!(c.remove("R1"), Err(GridError::ComponentNotFound { .. })));

        assert_eq!(c.remove_between(&"gnd", &"b"), 1);
        assert_eq!(c.remove_between(&"gnd", &"b"), 0);
        assert_eq!(c.len(), 1);
        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn test_solve_updates_threshold_states() {
        let mut c = led_circuit();
        assert_eq!(c.threshold_states(), vec![("D1", false)]);
        let sol = c.solve(&"gnd").unwrap();
        assert_eq!(c.threshold_states(), vec![("D1", true)]);
        assert!(sol.voltage(&"b").unwrap() >= 1.6);

        // A second solve starts from all-off again and lands on the same answer
        let again = c.solve(&"gnd").unwrap();
        assert_eq!(sol, again);
    }

    #[test]
    fn test_solve_missing_ground_is_an_error() {
        let mut c = led_circuit();
        assert!(matches!(c.solve(&"elsewhere"), Err(GridError::MissingGround { .. })));
        let mut empty: Circuit<&str> = Circuit::new();
        assert!(empty.solve(&"gnd").is_err());
    }

    #[test]
    fn test_from_netlist() {
        let ast = netlist::parse("V1 a 0 10\nR1 a b 1k\nR b 0 1k\nW1 b c").unwrap();
        let mut c = Circuit::from_netlist(&ast).unwrap();
        assert_eq!(c.len(), 4);
        assert_eq!(c.components()[2].name(), "R(1000)");

        let sol = c.solve(&ast.ground_node().to_string()).unwrap();
        assert_relative_eq!(sol.voltage(&"c".to_string()).unwrap(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(sol.current("R1").unwrap(), 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_from_netlist_validates() {
        let ast = netlist::parse("R1 a 0 -5").unwrap();
        assert!(matches!(
            Circuit::from_netlist(&ast),
            Err(GridError::InvalidParameter { .. })
        ));
    }
}
