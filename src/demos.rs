//! Ready-made example circuits.
//!
//! Each demo exists in two shapes: a [`Circuit<String>`] with named nodes
//! (what the CLI prints) and a [`GridCircuit`] laid out on cells (what a
//! grid editor would draw).

use std::fmt;

use crate::circuit::{Circuit, GridCircuit, GridPos};
use crate::components::Component;
use crate::error::Result;
use crate::netlist::GROUND_NAME;

/// The available demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Demo {
    /// 5 V source, 100 Ω series resistor and an LED with a 1.6 V threshold
    Led,
    /// 10 V source into two parallel 100 Ω resistors, then 200 Ω and 300 Ω in series
    ParallelSeries,
}

impl Demo {
    pub const ALL: [Demo; 2] = [Demo::Led, Demo::ParallelSeries];

    /// Ground cell of the grid layouts.
    pub const GRID_GROUND: GridPos = GridPos::new(0, 1);

    /// Build the named-node circuit. Ground is `"0"`.
    pub fn circuit(self) -> Result<Circuit<String>> {
        let n = |s: &str| s.to_string();
        let gnd = || GROUND_NAME.to_string();
        let mut c = Circuit::new();
        match self {
            Demo::Led => {
                c.add(Component::voltage_source(n("a"), gnd(), 5.0).with_name("V1"))?;
                c.add(Component::resistor(n("a"), n("b"), 100.0).with_name("R1"))?;
                c.add(Component::led(n("b"), gnd(), 1.6).with_name("D1"))?;
            }
            Demo::ParallelSeries => {
                c.add(Component::voltage_source(n("a"), gnd(), 10.0).with_name("V1"))?;
                c.add(Component::resistor(n("a"), n("b"), 100.0).with_name("R1"))?;
                c.add(Component::resistor(n("a"), n("c"), 100.0).with_name("R2"))?;
                c.add(Component::wire(n("b"), n("d")))?;
                c.add(Component::wire(n("c"), n("d")))?;
                c.add(Component::resistor(n("d"), n("e"), 200.0).with_name("R3"))?;
                c.add(Component::resistor(n("e"), n("f"), 300.0).with_name("R4"))?;
                c.add(Component::wire(n("f"), gnd()))?;
            }
        }
        Ok(c)
    }

    /// Build the grid layout. Ground is [`Demo::GRID_GROUND`].
    pub fn grid(self) -> Result<GridCircuit> {
        let p = GridPos::new;
        let ground = Self::GRID_GROUND;
        let mut g = match self {
            Demo::Led => GridCircuit::new(5, 3),
            Demo::ParallelSeries => GridCircuit::new(6, 3),
        };
        match self {
            Demo::Led => {
                g.add(Component::voltage_source(p(1, 1), ground, 5.0).with_name("V1"))?;
                g.add(Component::resistor(p(1, 1), p(2, 1), 100.0).with_name("R1"))?;
                g.add(Component::led(p(2, 1), ground, 1.6).with_name("D1"))?;
            }
            Demo::ParallelSeries => {
                g.add(Component::voltage_source(p(1, 1), ground, 10.0).with_name("V1"))?;
                g.add(Component::resistor(p(1, 1), p(1, 2), 100.0).with_name("R1"))?;
                g.add(Component::resistor(p(1, 1), p(1, 0), 100.0).with_name("R2"))?;
                g.add(Component::wire(p(1, 2), p(2, 1)))?;
                g.add(Component::wire(p(1, 0), p(2, 1)))?;
                g.add(Component::resistor(p(2, 1), p(3, 1), 200.0).with_name("R3"))?;
                g.add(Component::resistor(p(3, 1), p(4, 1), 300.0).with_name("R4"))?;
                g.add(Component::wire(p(4, 1), ground))?;
            }
        }
        Ok(g)
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Demo::Led => write!(f, "led"),
            Demo::ParallelSeries => write!(f, "parallel-series"),
        }
    }
}
