//! Plain-text rendering of a DC solution.

use std::fmt;

use crate::circuit::NodeLabel;
use crate::solver::{Convergence, DcSolution};

/// Human-readable summary of a [`DcSolution`].
///
/// ```text
/// Node voltages:
///   a          5.000000 V
///   0          0.000000 V  GND
/// Component currents:
///   V1        -33.333333 mA
///   D1         33.333333 mA  on
/// Converged after 2 iterations
/// ```
pub struct Report<'a, N: NodeLabel> {
    solution: &'a DcSolution<N>,
}

impl<'a, N: NodeLabel> Report<'a, N> {
    pub fn new(solution: &'a DcSolution<N>) -> Self {
        Self { solution }
    }
}

impl<N: NodeLabel> fmt::Display for Report<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sol = self.solution;
        let labels: Vec<String> = sol.nodes.iter().map(|n| n.to_string()).collect();
        let width = labels
            .iter()
            .map(String::len)
            .chain(sol.branches.iter().map(|b| b.name.len()))
            .max()
            .unwrap_or(0)
            .max(8);

        writeln!(f, "Node voltages:")?;
        for ((label, node), &class) in labels.iter().zip(&sol.nodes).zip(&sol.node_classes) {
            let v = sol.voltage(node).unwrap_or(0.0);
            write!(f, "  {:<width$} {:>12.6} V", label, v, width = width)?;
            if class == sol.ground_class {
                write!(f, "  GND")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Component currents:")?;
        for branch in &sol.branches {
            write!(
                f,
                "  {:<width$} {:>12.6} mA",
                branch.name,
                branch.current * 1e3,
                width = width
            )?;
            match branch.on {
                Some(true) => write!(f, "  on")?,
                Some(false) => write!(f, "  off")?,
                None => {}
            }
            writeln!(f)?;
        }

        match sol.convergence {
            Convergence::Converged { iterations } => {
                write!(f, "Converged after {} iteration{}", iterations, plural(iterations))
            }
            Convergence::Capped { iterations } => write!(
                f,
                "Not converged: threshold states still changing after {} iteration{}",
                iterations,
                plural(iterations)
            ),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
