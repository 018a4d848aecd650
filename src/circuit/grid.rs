//! Circuits placed on a bounded grid.

use super::graph::Circuit;
use super::types::GridPos;
use crate::components::Component;
use crate::error::{GridError, Result};
use crate::solver::{DcSolution, SolverConfig};

/// Largest number of cells a grid may have.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// A circuit whose nodes are cells of a `width` x `height` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCircuit {
    width: i32,
    height: i32,
    circuit: Circuit<GridPos>,
}

impl GridCircuit {
    /// Create an empty grid.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            circuit: Circuit::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells of a `width` x `height` grid, or `None` if either side
    /// is not positive or the grid exceeds [`MAX_GRID_CELLS`].
    pub fn cell_count(width: i32, height: i32) -> Option<usize> {
        let width = usize::try_from(width).ok().filter(|&w| w > 0)?;
        let height = usize::try_from(height).ok().filter(|&h| h > 0)?;
        width
            .checked_mul(height)
            .filter(|&cells| cells <= MAX_GRID_CELLS)
    }

    /// Row-major index of `pos`, if it lies on the grid.
    pub fn cell_index(&self, pos: GridPos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Check if `pos` lies on the grid.
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Place a component. Both endpoints must lie on the grid.
    pub fn add(&mut self, component: Component<GridPos>) -> Result<()> {
        if let Some(pos) = component.nodes().iter().find(|p| !self.in_bounds(**p)) {
            return Err(GridError::OutOfBounds {
                component: component.name().to_string(),
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        self.circuit.add(component)
    }

    /// Remove the first component with this name.
    pub fn remove(&mut self, name: &str) -> Result<Component<GridPos>> {
        self.circuit.remove(name)
    }

    /// Erase everything placed between two cells.
    pub fn remove_between(&mut self, a: GridPos, b: GridPos) -> usize {
        self.circuit.remove_between(&a, &b)
    }

    pub fn clear(&mut self) {
        self.circuit.clear();
    }

    pub fn components(&self) -> &[Component<GridPos>] {
        self.circuit.components()
    }

    /// The underlying circuit.
    pub fn circuit(&self) -> &Circuit<GridPos> {
        &self.circuit
    }

    /// Solve with the `ground` cell at 0 V.
    pub fn solve(&mut self, ground: GridPos) -> Result<DcSolution<GridPos>> {
        self.circuit.solve(&ground)
    }

    pub fn solve_with(&mut self, ground: GridPos, config: &SolverConfig) -> Result<DcSolution<GridPos>> {
        self.circuit.solve_with(&ground, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: i32, y: i32) -> GridPos {
        GridPos::new(x, y)
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut grid = GridCircuit::new(3, 2);
        assert!(grid.in_bounds(p(2, 1)));
        assert!(!grid.in_bounds(p(3, 0)));
        assert!(!grid.in_bounds(p(0, -1)));

        let err = grid
            .add(Component::resistor(p(0, 0), p(3, 0), 10.0).with_name("R1"))
            .unwrap_err();
        assert!(matches!(
            err,
            GridError::OutOfBounds { ref component, x: 3, y: 0, width: 3, height: 2 } if component == "R1"
        ));
        assert!(grid.components().is_empty());
    }

    #[test]
    fn test_cell_count_and_index() {
        assert_eq!(GridCircuit::cell_count(5, 3), Some(15));
        assert_eq!(GridCircuit::cell_count(0, 3), None);
        assert_eq!(GridCircuit::cell_count(-2, 3), None);
        assert_eq!(GridCircuit::cell_count(i32::MAX, i32::MAX), None);
        assert_eq!(GridCircuit::cell_count(1 << 12, 1 << 12), Some(MAX_GRID_CELLS));
        assert_eq!(GridCircuit::cell_count(1 << 12, (1 << 12) + 1), None);

        let grid = GridCircuit::new(5, 3);
        assert_eq!(grid.cell_index(p(0, 0)), Some(0));
        assert_eq!(grid.cell_index(p(4, 2)), Some(14));
        assert_eq!(grid.cell_index(p(5, 0)), None);
        assert_eq!(grid.cell_index(p(0, -1)), None);
    }

    #[test]
    fn test_grid_solve() {
        let mut grid = GridCircuit::new(3, 2);
        grid.add(Component::voltage_source(p(0, 0), p(0, 1), 9.0)).unwrap();
        grid.add(Component::resistor(p(0, 0), p(2, 0), 300.0)).unwrap();
        grid.add(Component::resistor(p(2, 0), p(2, 1), 600.0)).unwrap();
        grid.add(Component::wire(p(2, 1), p(0, 1))).unwrap();

        let sol = grid.solve(p(0, 1)).unwrap();
        assert_relative_eq!(sol.voltage(&p(2, 0)).unwrap(), 6.0, epsilon = 1e-9);
        assert_eq!(sol.voltage(&p(2, 1)), Some(0.0));
        assert_eq!(sol.voltage(&p(1, 1)), None);
    }

    #[test]
    fn test_erase_between_cells() {
        let mut grid = GridCircuit::new(2, 2);
        grid.add(Component::wire(p(0, 0), p(1, 0))).unwrap();
        grid.add(Component::resistor(p(1, 0), p(0, 0), 5.0)).unwrap();
        assert_eq!(grid.remove_between(p(0, 0), p(1, 0)), 2);
        assert!(grid.circuit().is_empty());
    }
}
