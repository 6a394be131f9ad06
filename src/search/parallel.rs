//! Rayon-parallel grid passes and pose candidates (feature-gated).
//!
//! Work items are scored concurrently and then reduced in scan order, so the
//! winner is the same one the sequential loops pick.

use rayon::prelude::*;

use crate::grid::EdgeWarp;
use crate::metric::combined_shape_distance;
use crate::search::translation::hierarchical_passes;
use crate::search::{
    CancelToken, MatchConfig, Offset, Pose, SearchBounds, SearchResult, Shape,
};

/// Row-parallel equivalent of [`search_grid`](crate::search::translation::search_grid).
pub(crate) fn search_grid_par(
    needle: &Shape,
    haystack: &Shape,
    step: usize,
    bounds: SearchBounds,
) -> Option<SearchResult> {
    if step == 0 || bounds.is_empty() {
        return None;
    }

    let rows: Vec<i32> = (bounds.min_y..bounds.max_y).step_by(step).collect();
    let row_best: Vec<Option<SearchResult>> = rows
        .par_iter()
        .map(|&dy| {
            let mut best: Option<SearchResult> = None;
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
            best
        })
        .collect();

    first_minimum(row_best)
}

/// Scores every `(rotation, scale)` candidate concurrently.
///
/// Each task owns its warped needle; the shared needle and haystack are only
/// read. Candidates that start after cancellation are skipped.
pub(crate) fn search_candidates_par(
    needle: &Shape,
    haystack: &Shape,
    candidates: &[(f32, f32)],
    cfg: &MatchConfig,
    warp: &dyn EdgeWarp,
    cancel: &CancelToken,
) -> Option<SearchResult> {
    let results: Vec<Option<SearchResult>> = candidates
        .par_iter()
        .map(|&(rotation_deg, scale)| {
            if cancel.is_cancelled() {
                return None;
            }
            let shape = needle.warped(rotation_deg, scale, warp, cfg.norm);
            hierarchical_passes(&shape, haystack, cfg.initial_step, cancel, true)
                .pop()
                .map(|found| SearchResult {
                    pose: Pose {
                        offset: found.offset(),
                        rotation_deg,
                        scale,
                    },
                    score: found.score,
                })
        })
        .collect();

    first_minimum(results)
}

fn first_minimum(results: Vec<Option<SearchResult>>) -> Option<SearchResult> {
    results
        .into_iter()
        .flatten()
        .fold(None, |best: Option<SearchResult>, found| match best {
            Some(b) if b.score <= found.score => Some(b),
            _ => Some(found),
        })
}
