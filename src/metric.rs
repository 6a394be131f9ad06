//! Directed and symmetric Hausdorff distances between edge sets.
//!
//! The directed distance walks the sparse edge list of one mask, maps every
//! edge cell through an integer offset into the other shape's distance field
//! and keeps the largest sample. Samples are only read inside the half-open
//! range `[0, width) x [0, height)`.

use crate::grid::{DistanceField, EdgeMask};
use crate::search::{Offset, Shape};

/// Distance reported when no edge cell lands inside the distance field.
pub const NO_OVERLAP_DISTANCE: f32 = 9999.0;

/// Directed Hausdorff distance from `edges` to the edges behind `field`.
///
/// Returns [`NO_OVERLAP_DISTANCE`] when `edges` has no edge cells or none of
/// them maps inside `field`.
pub fn directed_distance(edges: &EdgeMask, field: &DistanceField, offset: Offset) -> f32 {
    let width = field.width() as i64;
    let height = field.height() as i64;
    let dx = i64::from(offset.dx);
    let dy = i64::from(offset.dy);

    let mut worst: Option<f32> = None;
    for &(x, y) in edges.edge_points() {
        let fx = x as i64 + dx;
        let fy = y as i64 + dy;
        if fx < 0 || fy < 0 || fx >= width || fy >= height {
            continue;
        }
        if let Some(sample) = field.get(fx as usize, fy as usize) {
            worst = Some(worst.map_or(sample, |w| w.max(sample)));
        }
    }
    worst.unwrap_or(NO_OVERLAP_DISTANCE)
}

/// Symmetric Hausdorff distance between a needle placed at `offset` and the haystack.
///
/// The forward term maps needle edges into the haystack field at `offset`;
/// the reverse term maps haystack edges into the needle field at `-offset`.
pub fn combined_distance(
    needle_edges: &EdgeMask,
    needle_field: &DistanceField,
    haystack_edges: &EdgeMask,
    haystack_field: &DistanceField,
    offset: Offset,
) -> f32 {
    let forward = directed_distance(needle_edges, haystack_field, offset);
    let reverse = directed_distance(haystack_edges, needle_field, offset.negated());
    forward.max(reverse)
}

/// [`combined_distance`] for paired shapes.
pub fn combined_shape_distance(needle: &Shape, haystack: &Shape, offset: Offset) -> f32 {
    combined_distance(
        needle.edges(),
        needle.field(),
        haystack.edges(),
        haystack.field(),
        offset,
    )
}
