//! Component models for DC analysis.
//!
//! This module provides models for all supported two-terminal elements:
//! - Linear: Wire, Resistor
//! - Sources: Voltage Source
//! - Nonlinear: Threshold element (binary-state LED)
//!
//! Wires are merged away by the topology reducer; every other kind either
//! stamps a conductance or adds a voltage constraint to the MNA system.

mod linear;
mod sources;
mod threshold;

pub use linear::{Resistor, Wire};
pub use sources::VoltageSource;
pub use threshold::{ThresholdElement, ThresholdParams};

use serde::Serialize;

use crate::circuit::NodeLabel;
use crate::error::{GridError, Result};
use crate::netlist::{ComponentDef, ComponentType};

/// Kind tag of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Wire,
    Resistor,
    VoltageSource,
    ThresholdElement,
}

/// A circuit component.
#[derive(Debug, Clone, PartialEq)]
pub enum Component<N> {
    Wire(Wire<N>),
    Resistor(Resistor<N>),
    VoltageSource(VoltageSource<N>),
    ThresholdElement(ThresholdElement<N>),
}

impl<N: NodeLabel> Component<N> {
    /// A wire between `a` and `b`.
    pub fn wire(a: N, b: N) -> Self {
        Component::Wire(Wire::new(a, b))
    }

    /// A resistor between `a` and `b`.
    pub fn resistor(a: N, b: N, resistance: f64) -> Self {
        Component::Resistor(Resistor::new(a, b, resistance))
    }

    /// A voltage source holding `V(positive) - V(negative) = voltage`.
    pub fn voltage_source(positive: N, negative: N, voltage: f64) -> Self {
        Component::VoltageSource(VoltageSource::new(positive, negative, voltage))
    }

    /// A threshold element with default resistances and the given turn-on voltage.
    pub fn led(anode: N, cathode: N, threshold: f64) -> Self {
        Self::threshold_element(anode, cathode, ThresholdParams::with_threshold(threshold))
    }

    /// A threshold element with explicit parameters.
    pub fn threshold_element(anode: N, cathode: N, params: ThresholdParams) -> Self {
        Component::ThresholdElement(ThresholdElement::new(anode, cathode, params))
    }

    /// Override the derived display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match &mut self {
            Component::Wire(w) => w.name = name,
            Component::Resistor(r) => r.name = name,
            Component::VoltageSource(v) => v.name = name,
            Component::ThresholdElement(d) => d.name = name,
        }
        self
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Wire(w) => &w.name,
            Component::Resistor(r) => &r.name,
            Component::VoltageSource(v) => &v.name,
            Component::ThresholdElement(d) => &d.name,
        }
    }

    /// Get the two endpoints `[a, b]`.
    pub fn nodes(&self) -> &[N; 2] {
        match self {
            Component::Wire(w) => &w.nodes,
            Component::Resistor(r) => &r.nodes,
            Component::VoltageSource(v) => &v.nodes,
            Component::ThresholdElement(d) => &d.nodes,
        }
    }

    /// Get the kind tag.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Wire(_) => ComponentKind::Wire,
            Component::Resistor(_) => ComponentKind::Resistor,
            Component::VoltageSource(_) => ComponentKind::VoltageSource,
            Component::ThresholdElement(_) => ComponentKind::ThresholdElement,
        }
    }

    /// Resistance stamped into the conductance matrix, if this kind has one.
    pub fn effective_resistance(&self) -> Option<f64> {
        match self {
            Component::Resistor(r) => Some(r.resistance),
            Component::ThresholdElement(d) => Some(d.effective_resistance()),
            Component::Wire(_) | Component::VoltageSource(_) => None,
        }
    }

    /// Check if this component adds a branch-voltage constraint.
    pub fn is_voltage_source(&self) -> bool {
        matches!(self, Component::VoltageSource(_))
    }

    /// Check if this component is merged away during topology reduction.
    pub fn is_wire(&self) -> bool {
        matches!(self, Component::Wire(_))
    }

    /// Conduction state, for threshold elements only.
    pub fn on_state(&self) -> Option<bool> {
        match self {
            Component::ThresholdElement(d) => Some(d.on),
            _ => None,
        }
    }

    /// Check if this component connects `a` and `b`, in either orientation.
    pub fn connects(&self, a: &N, b: &N) -> bool {
        let [x, y] = self.nodes();
        (x == a && y == b) || (x == b && y == a)
    }
}

impl Component<String> {
    /// Create a component from a netlist definition.
    pub fn from_def(def: &ComponentDef) -> Result<Self> {
        let (a, b) = match def.nodes.as_slice() {
            [a, b] => (a.clone(), b.clone()),
            nodes => {
                return Err(GridError::invalid_component(
                    def.display_name(),
                    def.line,
                    format!("expected 2 nodes, got {}", nodes.len()),
                ))
            }
        };
        let component = match def.component_type {
            ComponentType::Wire => Component::wire(a, b),

            ComponentType::Resistor => {
                let value = def.value.ok_or_else(|| {
                    GridError::invalid_component(def.display_name(), def.line, "resistor requires a value")
                })?;
                Component::resistor(a, b, value)
            }

            ComponentType::VoltageSource => {
                let value = def.value.ok_or_else(|| {
                    GridError::invalid_component(def.display_name(), def.line, "voltage source requires a value")
                })?;
                Component::voltage_source(a, b, value)
            }

            ComponentType::ThresholdElement => {
                let mut params = ThresholdParams::default();
                if let Some(vth) = def.params.get("vth").copied().or(def.value) {
                    params.threshold = vth;
                }
                if let Some(&ron) = def.params.get("ron") {
                    params.on_resistance = ron;
                }
                if let Some(&roff) = def.params.get("roff") {
                    params.off_resistance = roff;
                }
                Component::threshold_element(a, b, params)
            }
        };

        Ok(match &def.name {
            Some(name) => component.with_name(name.clone()),
            None => component,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let w = Component::wire(0, 1);
        let r = Component::resistor(0, 1, 100.0);
        let v = Component::voltage_source(1, 0, 5.0);
        let d = Component::led(1, 0, 1.6);

        assert!(w.is_wire() && w.effective_resistance().is_none());
        assert_eq!(r.effective_resistance(), Some(100.0));
        assert!(v.is_voltage_source() && v.effective_resistance().is_none());
        assert_eq!(d.on_state(), Some(false));
        assert_eq!(d.effective_resistance(), Some(crate::DEFAULT_OFF_RESISTANCE));
        assert_eq!(r.on_state(), None);
    }

    #[test]
    fn test_name_override() {
        let r = Component::resistor("a", "b", 100.0);
        assert_eq!(r.name(), "R(100)");
        assert_eq!(r.with_name("R1").name(), "R1");
        assert_eq!(Component::voltage_source("a", "b", 5.0).name(), "V(5)");
    }

    #[test]
    fn test_connects_either_orientation() {
        let r = Component::resistor("a", "b", 1.0);
        assert!(r.connects(&"a", &"b"));
        assert!(r.connects(&"b", &"a"));
        assert!(!r.connects(&"a", &"c"));
    }
}
