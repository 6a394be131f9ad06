//! Geometric warps of edge masks for the pose sweep.

use crate::grid::{EdgeMask, Grid};
use crate::util::math::sin_cos_deg;

/// Produces a rotated and scaled copy of an edge mask.
///
/// Implementations must return a fresh mask with the same dimensions as the
/// input and fill cells with no source pixel as background. The identity pose
/// (`rotation_deg == 0`, `scale == 1`) is never requested by the pose search.
pub trait EdgeWarp: Sync {
    /// Rotates `edges` about its center by `rotation_deg` and scales by `scale`.
    fn warp(&self, edges: &EdgeMask, rotation_deg: f32, scale: f32) -> EdgeMask;
}

/// Nearest-neighbour inverse-mapping warp.
///
/// Rotation is about `cx = (w - 1) / 2`, `cy = (h - 1) / 2`. Each destination
/// cell `(x, y)` samples the source at
/// `R(-angle) * ((x, y) - c) / scale + c`, rounded to the nearest cell.
/// Positive angles rotate counter-clockwise as displayed (y pointing down).
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestWarp;

impl EdgeWarp for NearestWarp {
    fn warp(&self, edges: &EdgeMask, rotation_deg: f32, scale: f32) -> EdgeMask {
        let (width, height) = edges.dims();
        let (sin_a, cos_a) = sin_cos_deg(rotation_deg);
        let inv_scale = if scale > 0.0 { 1.0 / scale } else { 0.0 };
        let cx = (width as f32 - 1.0) * 0.5;
        let cy = (height as f32 - 1.0) * 0.5;

        let cells = Grid::from_fn(width, height, |x, y| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let src_x = (cos_a * dx - sin_a * dy) * inv_scale + cx;
            let src_y = (sin_a * dx + cos_a * dy) * inv_scale + cy;
            if !src_x.is_finite() || !src_y.is_finite() {
                return false;
            }
            let sx = src_x.round();
            let sy = src_y.round();
            if sx < 0.0 || sy < 0.0 {
                return false;
            }
            edges.is_edge(sx as usize, sy as usize)
        })
        .expect("warp preserves valid dimensions");
        EdgeMask::from_grid(cells)
    }
}
