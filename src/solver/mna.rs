//! MNA matrix assembly and solving.

use crate::circuit::NodeLabel;
use crate::components::Component;
use crate::error::{GridError, Result};

use super::topology::Topology;

/// MNA matrix system Ax = z.
#[derive(Debug)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    pub lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
}

impl MnaMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Clear the matrix and vectors to zero.
    pub fn clear(&mut self) {
        self.a.fill(0.0);
        self.z.fill(0.0);
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    /// A `None` index is ground and gets no entries.
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp a voltage source between two nodes with branch current at index br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: f64,
    ) {
        if let Some(i) = n_pos {
            self.add(br, i, 1.0);
            self.add(i, br, 1.0);
        }
        if let Some(j) = n_neg {
            self.add(br, j, -1.0);
            self.add(j, br, -1.0);
        }
        self.z[br] = voltage;
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// Only an exactly zero or non-finite pivot counts as singular. Circuits
    /// that are singular by structure are rejected before assembly by
    /// [`Topology::check_solvable`], so tiny pivots from widely spread
    /// conductances are legitimate here.
    pub fn factor(&mut self) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for (i, p) in self.pivots.iter_mut().enumerate() {
            *p = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val == 0.0 || !max_val.is_finite() {
                return Err(GridError::SingularCircuit { floating: Vec::new() });
            }

            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            self.x[i] /= self.lu[i * n + i];
        }
    }

    /// Get the voltage at a node index (None is ground).
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        match node {
            Some(i) => self.x[i],
            None => 0.0,
        }
    }
}

/// Stamp every component into `matrix` for one set of threshold states.
///
/// `sources` lists the voltage sources' component indices; the k-th entry
/// owns branch row `topology.num_unknowns() + k`. `conducting[i]` is the
/// assumed state of component `i` and is only read for threshold elements.
pub fn stamp_components<N: NodeLabel>(
    topology: &Topology<N>,
    components: &[Component<N>],
    sources: &[usize],
    conducting: &[bool],
    matrix: &mut MnaMatrix,
) {
    let node_index = |class: usize| topology.unknown_index(class);

    for (index, component) in components.iter().enumerate() {
        let [a, b] = topology.terminals(index);
        match component {
            Component::Resistor(r) => {
                matrix.stamp_conductance(node_index(a), node_index(b), r.conductance());
            }
            Component::ThresholdElement(d) => {
                let g = 1.0 / d.resistance_for(conducting[index]);
                matrix.stamp_conductance(node_index(a), node_index(b), g);
            }
            // Wires are merged by the topology, sources are stamped below
            Component::Wire(_) | Component::VoltageSource(_) => {}
        }
    }

    for (k, &index) in sources.iter().enumerate() {
        if let Component::VoltageSource(v) = &components[index] {
            let [a, b] = topology.terminals(index);
            let br = topology.num_unknowns() + k;
            matrix.stamp_voltage_source(node_index(a), node_index(b), br, v.voltage);
        }
    }
}
