//! Owned 2D grids and the cell types the matcher works with.
//!
//! `Grid<T>` is a contiguous row-major buffer with `stride == width`. Three
//! variants are used across the crate:
//!
//! - [`GrayGrid`]: raw `u8` intensities handed over by an image producer,
//! - [`EdgeMask`]: boolean edge classification plus its sparse edge list,
//! - [`DistanceField`]: non-negative `f32` distance to the nearest edge.
//!
//! Conversions between variants are named functions
//! ([`EdgeMask::from_gray`], [`DistanceField::from_edges`]), never implicit.

use std::ops::Index;

use crate::util::{HausError, HausResult};

pub mod distance;
pub mod edge;
pub mod warp;

pub use distance::{DistanceField, DistanceNorm};
pub use edge::{EdgeMask, EdgePolarity};
pub use warp::{EdgeWarp, NearestWarp};

/// Grayscale intensities, typically straight from a decoder.
pub type GrayGrid = Grid<u8>;

/// Owned, bounds-checked 2D grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Grid<T> {
    /// Wraps a row-major buffer of exactly `width * height` elements.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> HausResult<Self> {
        let expected = cell_count(width, height)?;
        if data.len() != expected {
            return Err(HausError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> HausResult<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        let len = cell_count(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the row-major backing slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the cell at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks_exact(self.width)
    }

    /// Consumes the grid and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub(crate) fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            data: self.data.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> HausResult<Self> {
        let len = cell_count(width, height)?;
        Ok(Self {
            data: vec![value; len],
            width,
            height,
        })
    }
}

/// Panics when `(x, y)` lies outside the grid.
impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of bounds for {}x{} grid",
            self.width,
            self.height
        );
        &self.data[y * self.width + x]
    }
}

fn cell_count(width: usize, height: usize) -> HausResult<usize> {
    if width == 0 || height == 0 {
        return Err(HausError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(HausError::InvalidDimensions { width, height })
}
