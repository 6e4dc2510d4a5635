use serde::{Deserialize, Serialize};
use std::fmt;

/// Cells kept free beyond the furthest occupied cell.
pub const MARGIN_CELLS: u32 = 2;

/// Initial extent of a canvas whose host did not say otherwise
/// (a 300x150 px canvas at 25 px cells).
pub const DEFAULT_WIDTH_CELLS: u32 = 12;
pub const DEFAULT_HEIGHT_CELLS: u32 = 6;

/// One grid square. Row 0 and column 0 carry the axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// True for the label row/column, which never holds a seat.
    pub fn is_border(&self) -> bool {
        self.x == 0 || self.y == 0
    }
}

impl From<[u32; 2]> for Cell {
    fn from([x, y]: [u32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Cell> for [u32; 2] {
    fn from(c: Cell) -> Self {
        [c.x, c.y]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// A canvas size change. Whoever holds drawing state must re-apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub width_px: u32,
    pub height_px: u32,
}

/// Canvas extent in whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub cell_size: u32,
    pub width_cells: u32,
    pub height_cells: u32,
}

impl GridDimensions {
    pub fn new(cell_size: u32, width_cells: u32, height_cells: u32) -> Self {
        Self {
            cell_size,
            width_cells,
            height_cells,
        }
    }

    pub fn width_px(&self) -> u32 {
        self.width_cells * self.cell_size
    }

    pub fn height_px(&self) -> u32 {
        self.height_cells * self.cell_size
    }

    /// Floors pixel coordinates to a cell. Negative input lands on the border.
    pub fn pixel_to_cell(&self, px: f32, py: f32) -> Cell {
        let size = self.cell_size.max(1) as f32;
        Cell::new(
            (px / size).floor().max(0.0) as u32,
            (py / size).floor().max(0.0) as u32,
        )
    }

    /// Grows the canvas so `cell` keeps a margin of [`MARGIN_CELLS`].
    /// The canvas never shrinks.
    pub fn ensure_margin(&mut self, cell: Cell) -> Option<Resize> {
        let need_w = cell.x.saturating_add(MARGIN_CELLS);
        let need_h = cell.y.saturating_add(MARGIN_CELLS);

        let mut grew = false;
        if need_w > self.width_cells {
            self.width_cells = need_w;
            grew = true;
        }
        if need_h > self.height_cells {
            self.height_cells = need_h;
            grew = true;
        }

        if !grew {
            return None;
        }

        tracing::debug!(
            width_cells = self.width_cells,
            height_cells = self.height_cells,
            "canvas grown"
        );
        Some(Resize {
            width_px: self.width_px(),
            height_px: self.height_px(),
        })
    }

    /// Cells along the longer edge; grid lines and labels run out to it.
    pub fn grid_cell_count(&self) -> u32 {
        self.width_cells.max(self.height_cells)
    }
}
