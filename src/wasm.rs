//! WASM bindings for Ohmgrid Core.
//!
//! This module exposes a grid editor model to JavaScript. Cells are
//! addressed by `(x, y)` integer pairs; every call that places a component
//! takes the two endpoint cells.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmGrid } from 'ohmgrid_core';
//!
//! await init();
//!
//! const grid = new WasmGrid(5, 3);
//! grid.add_source(1, 1, 0, 1, 5.0);
//! grid.add_resistor(1, 1, 2, 1, 100.0);
//! grid.add_led(2, 1, 0, 1, 1.6);
//!
//! const solution = grid.solve(0, 1);
//! const v = solution.voltages();      // row-major, NaN where nothing is placed
//! const lit = solution.on_flags();    // per component, in placement order
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{GridCircuit, GridPos, MAX_GRID_CELLS};
use crate::components::Component;
use crate::error::GridError;
use crate::solver::{Convergence, DcSolution};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: GridError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Editable circuit on a `width` x `height` grid.
#[wasm_bindgen]
pub struct WasmGrid {
    grid: GridCircuit,
}

#[wasm_bindgen]
impl WasmGrid {
    /// Create an empty grid. Both sides must be positive and the grid may
    /// hold at most `MAX_GRID_CELLS` cells.
    #[wasm_bindgen(constructor)]
    pub fn new(width: i32, height: i32) -> Result<WasmGrid, JsValue> {
        if GridCircuit::cell_count(width, height).is_none() {
            return Err(to_js(GridError::WasmError {
                message: format!(
                    "grid size must be positive and at most {} cells, got {}x{}",
                    MAX_GRID_CELLS, width, height
                ),
            }));
        }
        Ok(WasmGrid {
            grid: GridCircuit::new(width, height),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Number of placed components.
    #[wasm_bindgen(getter)]
    pub fn component_count(&self) -> usize {
        self.grid.components().len()
    }

    /// Place a wire between two cells.
    pub fn add_wire(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), JsValue> {
        self.place(Component::wire(GridPos::new(x1, y1), GridPos::new(x2, y2)))
    }

    /// Place a resistor between two cells.
    pub fn add_resistor(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, ohms: f64) -> Result<(), JsValue> {
        self.place(Component::resistor(GridPos::new(x1, y1), GridPos::new(x2, y2), ohms))
    }

    /// Place a voltage source; the first cell is the positive terminal.
    pub fn add_source(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, volts: f64) -> Result<(), JsValue> {
        self.place(Component::voltage_source(
            GridPos::new(x1, y1),
            GridPos::new(x2, y2),
            volts,
        ))
    }

    /// Place an LED; the first cell is the anode.
    pub fn add_led(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, threshold: f64) -> Result<(), JsValue> {
        self.place(Component::led(GridPos::new(x1, y1), GridPos::new(x2, y2), threshold))
    }

    /// Erase everything between two cells. Returns how many components were removed.
    pub fn erase(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> usize {
        self.grid
            .remove_between(GridPos::new(x1, y1), GridPos::new(x2, y2))
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Solve with cell `(gx, gy)` as ground.
    pub fn solve(&mut self, gx: i32, gy: i32) -> Result<WasmSolution, JsValue> {
        let solution = self.grid.solve(GridPos::new(gx, gy)).map_err(to_js)?;
        Ok(WasmSolution::from_solution(&solution, &self.grid))
    }

    fn place(&mut self, component: Component<GridPos>) -> Result<(), JsValue> {
        self.grid.add(component).map_err(to_js)
    }
}

/// Solved operating point, flattened for JavaScript.
#[wasm_bindgen]
pub struct WasmSolution {
    width: i32,
    height: i32,
    voltages: Vec<f64>,
    currents: Vec<f64>,
    on_flags: Vec<u8>,
    convergence: Convergence,
}

impl WasmSolution {
    fn from_solution(solution: &DcSolution<GridPos>, grid: &GridCircuit) -> Self {
        let cells = GridCircuit::cell_count(grid.width(), grid.height()).unwrap_or(0);
        let mut voltages = vec![f64::NAN; cells];
        for (pos, &v) in &solution.node_voltages {
            if let Some(slot) = grid.cell_index(*pos).and_then(|i| voltages.get_mut(i)) {
                *slot = v;
            }
        }
        let count = grid.components().len();

        // Wires carry no reported current; keep one slot per placed component
        let mut currents = vec![0.0; count];
        let mut on_flags = vec![0u8; count];
        for branch in &solution.branches {
            currents[branch.index] = branch.current;
            on_flags[branch.index] = u8::from(branch.on == Some(true));
        }

        Self {
            width: grid.width(),
            height: grid.height(),
            voltages,
            currents,
            on_flags,
            convergence: solution.convergence,
        }
    }
}

#[wasm_bindgen]
impl WasmSolution {
    /// Node potentials, row-major (`y * width + x`), NaN where no component touches the cell.
    pub fn voltages(&self) -> Vec<f64> {
        self.voltages.clone()
    }

    /// Potential at one cell, or `undefined` if nothing touches it.
    pub fn voltage_at(&self, x: i32, y: i32) -> Option<f64> {
        if !(0..self.width).contains(&x) || !(0..self.height).contains(&y) {
            return None;
        }
        let v = *self.voltages.get(y as usize * self.width as usize + x as usize)?;
        (!v.is_nan()).then_some(v)
    }

    /// Current through each component in placement order (0 for wires).
    pub fn currents(&self) -> Vec<f64> {
        self.currents.clone()
    }

    /// 1 for every conducting LED, in placement order.
    pub fn on_flags(&self) -> Vec<u8> {
        self.on_flags.clone()
    }

    /// Whether the LED states settled before the iteration cap.
    #[wasm_bindgen(getter)]
    pub fn converged(&self) -> bool {
        self.convergence.is_converged()
    }

    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> usize {
        self.convergence.iterations()
    }

    /// `"converged"` or `"capped"`.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        match self.convergence {
            Convergence::Converged { .. } => "converged".to_string(),
            Convergence::Capped { .. } => "capped".to_string(),
        }
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default iteration cap.
#[wasm_bindgen]
pub fn default_max_iterations() -> usize {
    crate::solver::DEFAULT_MAX_ITERATIONS
}
