//! Ideal voltage source.

use crate::circuit::NodeLabel;

/// A voltage source component.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V(a) - V(b) = voltage
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSource<N> {
    pub name: String,
    pub nodes: [N; 2], // [positive, negative]
    pub voltage: f64,
}

impl<N: NodeLabel> VoltageSource<N> {
    /// Create a new voltage source, named after its value.
    pub fn new(positive: N, negative: N, voltage: f64) -> Self {
        Self {
            name: format!("V({})", voltage),
            nodes: [positive, negative],
            voltage,
        }
    }
}
