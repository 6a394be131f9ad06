//! Binary edge masks.

use crate::grid::{GrayGrid, Grid};
use crate::util::HausResult;

/// Which raw value marks an edge in producer data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgePolarity {
    /// Zero is an edge and anything else is background (inverted Canny output).
    DarkEdges,
    /// Non-zero is an edge (plain Canny output).
    BrightEdges,
}

impl EdgePolarity {
    fn is_edge(self, value: u8) -> bool {
        match self {
            EdgePolarity::DarkEdges => value == 0,
            EdgePolarity::BrightEdges => value != 0,
        }
    }

    /// Raw value that encodes an edge cell.
    pub fn edge_value(self) -> u8 {
        match self {
            EdgePolarity::DarkEdges => 0,
            EdgePolarity::BrightEdges => 255,
        }
    }

    /// Raw value that encodes a background cell.
    pub fn background_value(self) -> u8 {
        match self {
            EdgePolarity::DarkEdges => 255,
            EdgePolarity::BrightEdges => 0,
        }
    }
}

/// Immutable edge classification with a cached list of edge cells.
///
/// `true` cells are edges. The edge list is kept in row-major order and is
/// what the Hausdorff metric iterates over.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeMask {
    cells: Grid<bool>,
    points: Vec<(usize, usize)>,
}

impl EdgeMask {
    /// Builds a mask from a boolean grid.
    pub fn from_grid(cells: Grid<bool>) -> Self {
        let mut points = Vec::new();
        for (y, row) in cells.rows().enumerate() {
            for (x, &is_edge) in row.iter().enumerate() {
                if is_edge {
                    points.push((x, y));
                }
            }
        }
        Self { cells, points }
    }

    /// Builds a mask from a row-major boolean buffer.
    pub fn from_bools(data: Vec<bool>, width: usize, height: usize) -> HausResult<Self> {
        Ok(Self::from_grid(Grid::new(data, width, height)?))
    }

    /// Builds an edgeless mask.
    pub fn empty(width: usize, height: usize) -> HausResult<Self> {
        Ok(Self::from_grid(Grid::filled(width, height, false)?))
    }

    /// Builds a mask whose only edges are `points`; out-of-range points are ignored.
    pub fn from_points(width: usize, height: usize, points: &[(usize, usize)]) -> HausResult<Self> {
        let mut data = vec![false; width.saturating_mul(height)];
        for &(x, y) in points {
            if x < width && y < height {
                data[y * width + x] = true;
            }
        }
        Self::from_bools(data, width, height)
    }

    /// Classifies raw intensities using an explicit polarity.
    pub fn from_gray(gray: &GrayGrid, polarity: EdgePolarity) -> Self {
        Self::from_grid(gray.map(|&value| polarity.is_edge(value)))
    }

    /// Encodes the mask back to raw intensities with the given polarity.
    pub fn to_gray(&self, polarity: EdgePolarity) -> GrayGrid {
        self.cells.map(|&is_edge| {
            if is_edge {
                polarity.edge_value()
            } else {
                polarity.background_value()
            }
        })
    }

    /// Returns the mask width.
    pub fn width(&self) -> usize {
        self.cells.width()
    }

    /// Returns the mask height.
    pub fn height(&self) -> usize {
        self.cells.height()
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        self.cells.dims()
    }

    /// Returns true if `(x, y)` is inside the mask and is an edge.
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.cells.get(x, y).copied().unwrap_or(false)
    }

    /// Edge cell coordinates in row-major order.
    pub fn edge_points(&self) -> &[(usize, usize)] {
        &self.points
    }

    /// Number of edge cells.
    pub fn edge_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the underlying boolean grid.
    pub fn cells(&self) -> &Grid<bool> {
        &self.cells
    }
}
