//! Rotation and scale sweep around the translation search.
//!
//! Rotations form the outer loop and scales the inner one. Every candidate
//! gets its own warped needle (with a field rebuilt for the warped mask), so
//! the caller's needle is never modified, even when the sweep is cancelled.

use crate::grid::EdgeWarp;
use crate::search::translation::hierarchical_passes;
use crate::search::{CancelToken, MatchConfig, Pose, SearchResult, Shape};
use crate::trace::{trace_event, trace_span};

/// Sweeps rotation and scale, running the coarse-to-fine translation search per candidate.
///
/// With `rotation = [0, 0]` and `scale = [1, 1]` this is exactly
/// [`search_hierarchical`](crate::search::translation::search_hierarchical) on
/// the unwarped needle. Returns `None` for degenerate ranges, a non-positive
/// scale, a zero initial step or a needle that does not fit.
pub fn search_pose_space(
    needle: &Shape,
    haystack: &Shape,
    cfg: &MatchConfig,
    warp: &dyn EdgeWarp,
    cancel: &CancelToken,
) -> Option<SearchResult> {
    search_pose_space_with(
        needle,
        haystack,
        &MatchConfig {
            parallel: false,
            ..cfg.clone()
        },
        warp,
        cancel,
    )
}

pub(crate) fn search_pose_space_with(
    needle: &Shape,
    haystack: &Shape,
    cfg: &MatchConfig,
    warp: &dyn EdgeWarp,
    cancel: &CancelToken,
) -> Option<SearchResult> {
    let candidates = pose_candidates(cfg)?;
    let _span = trace_span!("pose_search", candidates = candidates.len()).entered();

    #[cfg(feature = "rayon")]
    if cfg.parallel {
        let best = crate::search::parallel::search_candidates_par(
            needle,
            haystack,
            &candidates,
            cfg,
            warp,
            cancel,
        );
        trace_event!("pose_best", found = best.is_some());
        return best;
    }

    let mut best: Option<SearchResult> = None;
    for &(rotation_deg, scale) in &candidates {
        if cancel.is_cancelled() {
            trace_event!("pose_cancelled", rotation_deg = rotation_deg, scale = scale);
            break;
        }
        let shape = needle.warped(rotation_deg, scale, warp, cfg.norm);
        let Some(found) =
            hierarchical_passes(&shape, haystack, cfg.initial_step, cancel, cfg.parallel).pop()
        else {
            continue;
        };
        trace_event!(
            "pose_candidate",
            rotation_deg = rotation_deg,
            scale = scale,
            score = found.score
        );
        if best.map_or(true, |b| found.score < b.score) {
            best = Some(SearchResult {
                pose: Pose {
                    offset: found.offset(),
                    rotation_deg,
                    scale,
                },
                score: found.score,
            });
        }
    }
    trace_event!("pose_best", found = best.is_some());
    best
}

/// `(rotation, scale)` pairs in sweep order, or `None` if the sweep is degenerate.
pub fn pose_candidates(cfg: &MatchConfig) -> Option<Vec<(f32, f32)>> {
    let rotations = cfg.rotation.samples()?;
    let scales = cfg.scale.samples()?;
    if scales.iter().any(|&s| s <= 0.0) {
        return None;
    }
    let mut out = Vec::with_capacity(rotations.len() * scales.len());
    for &rotation in &rotations {
        for &scale in &scales {
            out.push((rotation, scale));
        }
    }
    Some(out)
}
