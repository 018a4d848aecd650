//! Result extraction: node voltages and branch currents.

use std::collections::HashMap;

use serde::Serialize;

use crate::circuit::NodeLabel;
use crate::components::{Component, ComponentKind};

use super::topology::Topology;

/// How the threshold-state iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Convergence {
    /// The threshold states reproduced themselves after `iterations` solves.
    Converged { iterations: usize },
    /// The iteration cap was reached with states still changing.
    Capped { iterations: usize },
}

impl Convergence {
    /// Number of linear solves performed.
    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations } | Convergence::Capped { iterations } => iterations,
        }
    }

    /// Check if a fixed point was reached.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }
}

/// Current through one non-wire component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchReport {
    /// Position in the circuit's component list
    pub index: usize,
    pub name: String,
    pub kind: ComponentKind,
    /// Current from `a` to `b` through the component, in amps
    pub current: f64,
    /// Conduction state, for threshold elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
}

/// Steady-state DC operating point of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcSolution<N: NodeLabel> {
    /// Potential of every node, ground at 0 V
    pub node_voltages: HashMap<N, f64>,
    /// Distinct nodes in first-encounter order
    pub nodes: Vec<N>,
    /// Lumped-node class of each entry in `nodes`
    pub node_classes: Vec<usize>,
    /// Potential of each lumped node
    pub class_potentials: Vec<f64>,
    pub ground_class: usize,
    /// Non-wire components in circuit order
    pub branches: Vec<BranchReport>,
    pub convergence: Convergence,
}

impl<N: NodeLabel> DcSolution<N> {
    /// Build the report from a solved system.
    ///
    /// `sources` must be the same ordered list the system was assembled with:
    /// its k-th entry owns unknown `topology.num_unknowns() + k`.
    pub(crate) fn extract(
        topology: &Topology<N>,
        components: &[Component<N>],
        sources: &[usize],
        conducting: &[bool],
        x: &[f64],
        convergence: Convergence,
    ) -> Self {
        let class_potentials: Vec<f64> = (0..topology.num_classes())
            .map(|class| topology.unknown_index(class).map_or(0.0, |i| x[i]))
            .collect();

        let mut currents = vec![0.0; components.len()];
        for (index, component) in components.iter().enumerate() {
            let [a, b] = topology.terminals(index);
            let v = class_potentials[a] - class_potentials[b];
            currents[index] = match component {
                Component::Resistor(r) => v / r.resistance,
                Component::ThresholdElement(d) => d.current_for(conducting[index], v),
                Component::Wire(_) | Component::VoltageSource(_) => 0.0,
            };
        }
        for (k, &index) in sources.iter().enumerate() {
            currents[index] = x[topology.num_unknowns() + k];
        }

        let branches = components
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_wire())
            .map(|(index, c)| BranchReport {
                index,
                name: c.name().to_string(),
                kind: c.kind(),
                current: currents[index],
                on: c.on_state().map(|_| conducting[index]),
            })
            .collect();

        let nodes = topology.nodes().to_vec();
        let node_classes: Vec<usize> = nodes
            .iter()
            .filter_map(|n| topology.class_of(n))
            .collect();
        let node_voltages = nodes
            .iter()
            .zip(&node_classes)
            .map(|(n, &class)| (n.clone(), class_potentials[class]))
            .collect();

        Self {
            node_voltages,
            nodes,
            node_classes,
            class_potentials,
            ground_class: topology.ground_class(),
            branches,
            convergence,
        }
    }

    /// Potential of a node, if it belongs to the circuit.
    pub fn voltage(&self, node: &N) -> Option<f64> {
        self.node_voltages.get(node).copied()
    }

    /// Current through the first component with this name.
    pub fn current(&self, name: &str) -> Option<f64> {
        self.branches.iter().find(|b| b.name == name).map(|b| b.current)
    }

    /// Current through the component at `index` in the circuit.
    pub fn current_at(&self, index: usize) -> Option<f64> {
        self.branches.iter().find(|b| b.index == index).map(|b| b.current)
    }

    /// Component name to current. Later duplicates of a name shadow earlier ones.
    pub fn currents(&self) -> HashMap<String, f64> {
        self.branches
            .iter()
            .map(|b| (b.name.clone(), b.current))
            .collect()
    }

    /// `(component index, on)` for every threshold element.
    pub fn threshold_states(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.branches
            .iter()
            .filter_map(|b| b.on.map(|on| (b.index, on)))
    }

    /// Check if the threshold iteration reached a fixed point.
    pub fn is_converged(&self) -> bool {
        self.convergence.is_converged()
    }
}
