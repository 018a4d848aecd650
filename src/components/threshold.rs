//! Binary-state threshold element (LED abstraction).
//!
//! The element is a resistor with two discrete values. It is "on" with a
//! small on-resistance when the voltage across it reaches the threshold,
//! otherwise "off" with a large but finite off-resistance:
//!
//! ```text
//! on  <=>  V(a) - V(b) >= threshold
//! ```
//!
//! The off-resistance is finite so a node reached only through an unlit
//! element still has a (tiny) conductance to the rest of the network and
//! the MNA matrix stays non-singular. Raising it makes the element more
//! ideal at the cost of matrix conditioning.

use crate::circuit::NodeLabel;
use crate::{DEFAULT_LED_ON_RESISTANCE, DEFAULT_LED_THRESHOLD, DEFAULT_OFF_RESISTANCE};

/// Electrical parameters for a threshold element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdParams {
    /// Resistance while conducting, in ohms
    pub on_resistance: f64,
    /// Resistance while blocking, in ohms
    pub off_resistance: f64,
    /// Turn-on voltage from a to b, in volts
    pub threshold: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            on_resistance: DEFAULT_LED_ON_RESISTANCE,
            off_resistance: DEFAULT_OFF_RESISTANCE,
            threshold: DEFAULT_LED_THRESHOLD,
        }
    }
}

impl ThresholdParams {
    /// Default parameters with the given turn-on voltage.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Set the on-resistance.
    pub fn on_resistance(mut self, ohms: f64) -> Self {
        self.on_resistance = ohms;
        self
    }

    /// Set the off-resistance.
    pub fn off_resistance(mut self, ohms: f64) -> Self {
        self.off_resistance = ohms;
        self
    }
}

/// A threshold element component.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdElement<N> {
    pub name: String,
    pub nodes: [N; 2], // [anode, cathode]
    pub params: ThresholdParams,
    /// Conduction state from the most recent solve
    pub on: bool,
}

impl<N: NodeLabel> ThresholdElement<N> {
    /// Create a new threshold element, initially off.
    pub fn new(anode: N, cathode: N, params: ThresholdParams) -> Self {
        Self {
            name: format!("LED({})", params.threshold),
            nodes: [anode, cathode],
            params,
            on: false,
        }
    }

    /// Whether the element conducts with `v_diff = V(a) - V(b)` across it.
    pub fn conducts(&self, v_diff: f64) -> bool {
        v_diff >= self.params.threshold
    }

    /// Resistance for a given conduction state.
    pub fn resistance_for(&self, on: bool) -> f64 {
        if on {
            self.params.on_resistance
        } else {
            self.params.off_resistance
        }
    }

    /// Resistance for the stored conduction state.
    pub fn effective_resistance(&self) -> f64 {
        self.resistance_for(self.on)
    }

    /// Current from a to b for a given state; zero while off so the
    /// off-resistance leakage is not reported.
    pub fn current_for(&self, on: bool, v_diff: f64) -> f64 {
        if on {
            v_diff / self.params.on_resistance
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_closed_inequality() {
        let d = ThresholdElement::new("a", "b", ThresholdParams::with_threshold(1.6));
        assert!(d.conducts(1.6));
        assert!(!d.conducts(1.6 - 1e-9));
        assert!(!d.conducts(-5.0));
    }

    #[test]
    fn test_resistance_follows_state() {
        let mut d = ThresholdElement::new(
            "a",
            "b",
            ThresholdParams::default().on_resistance(20.0).off_resistance(1e8),
        );
        assert_eq!(d.effective_resistance(), 1e8);
        d.on = true;
        assert_eq!(d.effective_resistance(), 20.0);
    }

    #[test]
    fn test_off_current_is_clamped() {
        let d = ThresholdElement::new("a", "b", ThresholdParams::default());
        assert_eq!(d.current_for(false, 1.0), 0.0);
        assert!((d.current_for(true, 1.0) - 1.0 / 50.0).abs() < 1e-12);
        assert_eq!(d.name, "LED(2)");
    }
}
