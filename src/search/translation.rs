//! Translation search: stepped grid scans and their coarse-to-fine driver.
//!
//! A grid pass visits offsets row-major with `y` as the outer loop and keeps
//! the first offset with the strictly smallest combined distance. The
//! hierarchical driver starts with a coarse step over all placements, then
//! halves the step and rescans a window around the best offset until the step
//! reaches zero.

use crate::metric::combined_shape_distance;
use crate::search::{CancelToken, Offset, Pose, SearchBounds, SearchResult, Shape};
use crate::trace::{trace_event, trace_span};

/// Scans `bounds` every `step` cells and returns the best offset.
///
/// Returns `None` when `step == 0` or `bounds` is empty.
pub fn search_grid(
    needle: &Shape,
    haystack: &Shape,
    step: usize,
    bounds: SearchBounds,
) -> Option<SearchResult> {
    if step == 0 || bounds.is_empty() {
        return None;
    }

    let mut best: Option<SearchResult> = None;
    for dy in (bounds.min_y..bounds.max_y).step_by(step) {
        for dx in (bounds.min_x..bounds.max_x).step_by(step) {
            let offset = Offset::new(dx, dy);
            let score = combined_shape_distance(needle, haystack, offset);
            if best.map_or(true, |b| score < b.score) {
                best = Some(SearchResult {
                    pose: Pose::translation(offset),
                    score,
                });
            }
        }
    }
    best
}

/// Coarse-to-fine search over the default placements of `needle` in `haystack`.
///
/// Returns `None` when `initial_step == 0` or the needle does not fit.
pub fn search_hierarchical(
    needle: &Shape,
    haystack: &Shape,
    initial_step: usize,
    cancel: &CancelToken,
) -> Option<SearchResult> {
    hierarchical_passes(needle, haystack, initial_step, cancel, false).pop()
}

/// Running best after each pass of [`search_hierarchical`].
///
/// Scores are non-increasing; the last entry is the final result.
pub fn search_hierarchical_passes(
    needle: &Shape,
    haystack: &Shape,
    initial_step: usize,
    cancel: &CancelToken,
) -> Vec<SearchResult> {
    hierarchical_passes(needle, haystack, initial_step, cancel, false)
}

pub(crate) fn hierarchical_passes(
    needle: &Shape,
    haystack: &Shape,
    initial_step: usize,
    cancel: &CancelToken,
    parallel: bool,
) -> Vec<SearchResult> {
    let placements = SearchBounds::placements(needle.dims(), haystack.dims());
    let _span = trace_span!(
        "translation_search",
        initial_step = initial_step,
        max_x = placements.max_x,
        max_y = placements.max_y
    )
    .entered();

    let mut passes = Vec::new();
    let mut best: Option<SearchResult> = None;
    let mut window = placements;
    let mut step = initial_step;
    while step > 0 {
        if let Some(found) = grid_pass(needle, haystack, step, window, parallel) {
            if best.map_or(true, |b| found.score < b.score) {
                best = Some(found);
                // The optimum is assumed to lie within one coarse step of the pass winner.
                window = placements.window(found.offset(), step);
            }
        }
        let Some(current) = best else {
            break;
        };
        trace_event!(
            "translation_pass",
            step = step,
            dx = current.offset().dx,
            dy = current.offset().dy,
            score = current.score
        );
        passes.push(current);
        if cancel.is_cancelled() {
            trace_event!("translation_cancelled", step = step);
            break;
        }
        step /= 2;
    }
    passes
}

#[cfg(feature = "rayon")]
fn grid_pass(
    needle: &Shape,
    haystack: &Shape,
    step: usize,
    bounds: SearchBounds,
    parallel: bool,
) -> Option<SearchResult> {
    if parallel {
        crate::search::parallel::search_grid_par(needle, haystack, step, bounds)
    } else {
        search_grid(needle, haystack, step, bounds)
    }
}

#[cfg(not(feature = "rayon"))]
fn grid_pass(
    needle: &Shape,
    haystack: &Shape,
    step: usize,
    bounds: SearchBounds,
    _parallel: bool,
) -> Option<SearchResult> {
    search_grid(needle, haystack, step, bounds)
}

#[cfg(test)]
mod tests {
    use super::{search_grid, search_hierarchical_passes};
    use crate::grid::{DistanceField, DistanceNorm, EdgeMask};
    use crate::search::{CancelToken, Offset, SearchBounds, Shape};

    fn dot_shape(width: usize, height: usize, x: usize, y: usize) -> Shape {
        let edges = EdgeMask::from_points(width, height, &[(x, y)]).unwrap();
        Shape::from_edges(edges, DistanceNorm::L1)
    }

    #[test]
    fn ties_keep_the_first_scanned_offset() {
        // Constant fields: every offset scores the same.
        let needle = Shape::new(
            EdgeMask::from_points(2, 2, &[(0, 0)]).unwrap(),
            DistanceField::from_vec(vec![0.0; 4], 2, 2).unwrap(),
        )
        .unwrap();
        let haystack = Shape::new(
            EdgeMask::from_bools(vec![true; 36], 6, 6).unwrap(),
            DistanceField::from_vec(vec![1.0; 36], 6, 6).unwrap(),
        )
        .unwrap();
        let found = search_grid(&needle, &haystack, 1, SearchBounds::new(1, 2, 4, 4)).unwrap();
        assert_eq!(found.offset(), Offset::new(1, 2));
        assert_eq!(found.score, 1.0);
    }

    #[test]
    fn zero_step_reports_no_result() {
        let needle = dot_shape(3, 3, 1, 1);
        let haystack = dot_shape(9, 9, 4, 4);
        assert!(search_grid(&needle, &haystack, 0, SearchBounds::new(0, 0, 6, 6)).is_none());
    }

    #[test]
    fn cancelled_search_stops_after_first_pass() {
        let needle = dot_shape(3, 3, 1, 1);
        let haystack = dot_shape(40, 40, 21, 17);
        let cancel = CancelToken::new();
        cancel.cancel();
        let passes = search_hierarchical_passes(&needle, &haystack, 8, &cancel);
        assert_eq!(passes.len(), 1);
    }
}
