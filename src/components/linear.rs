//! Linear passive components: Wire, Resistor.

use crate::circuit::NodeLabel;

/// A perfect, zero-resistance connection.
///
/// Wires never reach the MNA matrix: their endpoints are merged into one
/// lumped node before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire<N> {
    pub name: String,
    pub nodes: [N; 2],
}

impl<N: NodeLabel> Wire<N> {
    /// Create a new wire.
    pub fn new(a: N, b: N) -> Self {
        Self {
            name: "Wire".to_string(),
            nodes: [a, b],
        }
    }
}

/// A resistor component.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor<N> {
    pub name: String,
    pub nodes: [N; 2], // [a, b]
    pub resistance: f64,
}

impl<N: NodeLabel> Resistor<N> {
    /// Create a new resistor, named after its value.
    pub fn new(a: N, b: N, resistance: f64) -> Self {
        Self {
            name: format!("R({})", resistance),
            nodes: [a, b],
            resistance,
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistor_conductance() {
        let r = Resistor::new("a", "b", 1000.0);
        assert!((r.conductance() - 0.001).abs() < 1e-10);
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(Resistor::new(0, 1, 100.0).name, "R(100)");
        assert_eq!(Resistor::new(0, 1, 4.7).name, "R(4.7)");
        assert_eq!(Wire::new(0, 1).name, "Wire");
    }
}
