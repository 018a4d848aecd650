//! Component validation.

use crate::components::Component;
use crate::error::{GridError, Result};

use super::NodeLabel;

/// Validate a component before it joins a circuit.
///
/// Checks:
/// - Resistances (including both threshold-element states) are finite and positive
/// - Source voltages and thresholds are finite
/// - A threshold element's off-resistance exceeds its on-resistance
pub fn validate_component<N: NodeLabel>(component: &Component<N>) -> Result<()> {
    let name = component.name();
    let positive = |param: &str, value: f64| {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(GridError::invalid_parameter(
                name,
                param,
                format!("must be finite and positive, got {}", value),
            ))
        }
    };
    let finite = |param: &str, value: f64| {
        if value.is_finite() {
            Ok(())
        } else {
            Err(GridError::invalid_parameter(
                name,
                param,
                format!("must be finite, got {}", value),
            ))
        }
    };

    match component {
        Component::Wire(_) => Ok(()),
        Component::Resistor(r) => positive("resistance", r.resistance),
        Component::VoltageSource(v) => finite("voltage", v.voltage),
        Component::ThresholdElement(d) => {
            positive("ron", d.params.on_resistance)?;
            positive("roff", d.params.off_resistance)?;
            finite("vth", d.params.threshold)?;
            if d.params.on_resistance >= d.params.off_resistance {
                return Err(GridError::invalid_parameter(
                    name,
                    "roff",
                    "off-resistance must exceed on-resistance",
                ));
            }
            Ok(())
        }
    }
}
