//! Pose search over translation, rotation and scale.
//!
//! [`translation`] scans integer offsets coarse-to-fine; [`pose`] sweeps
//! rotation and scale around it. [`Matcher`] bundles the needle, haystack and
//! configuration into one session value.

use std::borrow::Cow;

use crate::grid::{DistanceField, DistanceNorm, EdgeMask, EdgeWarp, NearestWarp};
use crate::metric::{combined_shape_distance, NO_OVERLAP_DISTANCE};
use crate::util::{HausError, HausResult};

pub mod cancel;
#[cfg(feature = "rayon")]
pub(crate) mod parallel;
pub mod pose;
pub mod sweep;
pub mod translation;

pub use cancel::CancelToken;
pub use sweep::SweepRange;

/// Integer translation of the needle frame inside the haystack frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    /// Creates an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Returns `(-dx, -dy)`.
    pub fn negated(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

/// Half-open rectangle of offsets `[min_x, max_x) x [min_y, max_y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl SearchBounds {
    /// Creates bounds from explicit limits.
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Default range `[0, hw - nw) x [0, hh - nh)`; empty if the needle does not fit.
    pub fn placements(needle_dims: (usize, usize), haystack_dims: (usize, usize)) -> Self {
        let span = |hay: usize, needle: usize| {
            let diff = hay as i64 - needle as i64;
            diff.clamp(0, i64::from(i32::MAX)) as i32
        };
        Self {
            min_x: 0,
            min_y: 0,
            max_x: span(haystack_dims.0, needle_dims.0),
            max_y: span(haystack_dims.1, needle_dims.1),
        }
    }

    /// Returns true if no offset lies inside the bounds.
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Returns true if `offset` lies inside the bounds.
    pub fn contains(&self, offset: Offset) -> bool {
        offset.dx >= self.min_x
            && offset.dx < self.max_x
            && offset.dy >= self.min_y
            && offset.dy < self.max_y
    }

    /// Window `[c - radius, c + radius)` around `center`, clamped to `self`.
    pub fn window(&self, center: Offset, radius: usize) -> Self {
        let radius = radius.min(i32::MAX as usize) as i32;
        Self {
            min_x: center.dx.saturating_sub(radius).max(self.min_x),
            min_y: center.dy.saturating_sub(radius).max(self.min_y),
            max_x: center.dx.saturating_add(radius).min(self.max_x),
            max_y: center.dy.saturating_add(radius).min(self.max_y),
        }
    }
}

/// Placement of the needle: translation, rotation about its center, and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub offset: Offset,
    /// Signed rotation in degrees.
    pub rotation_deg: f32,
    /// Positive scale factor; 1.0 leaves the needle unchanged.
    pub scale: f32,
}

impl Pose {
    /// Translation-only pose.
    pub const fn translation(offset: Offset) -> Self {
        Self {
            offset,
            rotation_deg: 0.0,
            scale: 1.0,
        }
    }

    /// Returns true when no warp is needed to realise the pose.
    pub fn is_unwarped(&self) -> bool {
        self.rotation_deg == 0.0 && self.scale == 1.0
    }
}

/// Best pose found by a search together with its combined Hausdorff distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    pub pose: Pose,
    /// Combined distance; [`NO_OVERLAP_DISTANCE`] means nothing could be compared.
    pub score: f32,
}

impl SearchResult {
    /// Returns the translation part of the pose.
    pub fn offset(&self) -> Offset {
        self.pose.offset
    }

    /// Returns false when the score is the no-overlap sentinel.
    pub fn has_overlap(&self) -> bool {
        self.score < NO_OVERLAP_DISTANCE
    }
}

/// An edge mask paired with the distance field derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    edges: EdgeMask,
    field: DistanceField,
}

impl Shape {
    /// Pairs a mask with a field of the same size.
    pub fn new(edges: EdgeMask, field: DistanceField) -> HausResult<Self> {
        if edges.dims() != field.dims() {
            return Err(HausError::DimensionMismatch {
                edges_width: edges.width(),
                edges_height: edges.height(),
                field_width: field.width(),
                field_height: field.height(),
            });
        }
        Ok(Self { edges, field })
    }

    /// Builds the field for `edges` with the given norm.
    pub fn from_edges(edges: EdgeMask, norm: DistanceNorm) -> Self {
        let field = DistanceField::from_edges(&edges, norm);
        Self { edges, field }
    }

    /// Returns the edge mask.
    pub fn edges(&self) -> &EdgeMask {
        &self.edges
    }

    /// Returns the distance field.
    pub fn field(&self) -> &DistanceField {
        &self.field
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        self.edges.dims()
    }

    /// Shape realised at `rotation_deg`/`scale`; borrows `self` for the identity.
    ///
    /// Warped masks get a freshly computed field so both Hausdorff directions
    /// see the same candidate shape.
    pub fn warped(
        &self,
        rotation_deg: f32,
        scale: f32,
        warp: &dyn EdgeWarp,
        norm: DistanceNorm,
    ) -> Cow<'_, Shape> {
        if rotation_deg == 0.0 && scale == 1.0 {
            return Cow::Borrowed(self);
        }
        let edges = warp.warp(&self.edges, rotation_deg, scale);
        Cow::Owned(Shape::from_edges(edges, norm))
    }
}

/// Configuration for a pose search.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// First translation step of the coarse-to-fine search, in cells.
    pub initial_step: usize,
    /// Rotation sweep in degrees.
    pub rotation: SweepRange,
    /// Scale sweep.
    pub scale: SweepRange,
    /// Norm used to rebuild the needle field after a warp.
    pub norm: DistanceNorm,
    /// Use rayon for grid passes and pose candidates when the feature is on.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            initial_step: 4,
            rotation: SweepRange::fixed(0.0),
            scale: SweepRange::fixed(1.0),
            norm: DistanceNorm::L1,
            parallel: false,
        }
    }
}

/// Matching session owning the needle, the haystack and the search settings.
pub struct Matcher {
    needle: Shape,
    haystack: Shape,
    cfg: MatchConfig,
    warp: Box<dyn EdgeWarp + Send>,
    cancel: CancelToken,
}

impl Matcher {
    /// Creates a session with the default configuration and [`NearestWarp`].
    pub fn new(needle: Shape, haystack: Shape) -> Self {
        Self {
            needle,
            haystack,
            cfg: MatchConfig::default(),
            warp: Box::new(NearestWarp),
            cancel: CancelToken::new(),
        }
    }

    /// Replaces the search configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replaces the warp collaborator.
    pub fn with_warp<W: EdgeWarp + Send + 'static>(mut self, warp: W) -> Self {
        self.warp = Box::new(warp);
        self
    }

    /// Uses `cancel` for cooperative cancellation of later searches.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the unwarped needle.
    pub fn needle(&self) -> &Shape {
        &self.needle
    }

    /// Returns the haystack.
    pub fn haystack(&self) -> &Shape {
        &self.haystack
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Returns the token checked between search passes.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Default translation range for the unwarped needle.
    pub fn placements(&self) -> SearchBounds {
        SearchBounds::placements(self.needle.dims(), self.haystack.dims())
    }

    /// Scores the unwarped needle at `offset` without searching.
    pub fn evaluate(&self, offset: Offset) -> SearchResult {
        SearchResult {
            pose: Pose::translation(offset),
            score: combined_shape_distance(&self.needle, &self.haystack, offset),
        }
    }

    /// Scores an arbitrary pose without searching.
    pub fn evaluate_pose(&self, pose: Pose) -> SearchResult {
        let shape = self.warped_needle(pose.rotation_deg, pose.scale);
        SearchResult {
            pose,
            score: combined_shape_distance(&shape, &self.haystack, pose.offset),
        }
    }

    /// Needle realised at a rotation and scale, e.g. for rendering a result.
    pub fn warped_needle(&self, rotation_deg: f32, scale: f32) -> Cow<'_, Shape> {
        self.needle
            .warped(rotation_deg, scale, self.warp.as_ref(), self.cfg.norm)
    }

    /// Coarse-to-fine translation search for the unwarped needle.
    pub fn search_translation(&self) -> Option<SearchResult> {
        self.search_translation_with(&self.cancel)
    }

    /// [`Matcher::search_translation`] with a caller-supplied cancel token.
    pub fn search_translation_with(&self, cancel: &CancelToken) -> Option<SearchResult> {
        translation::hierarchical_passes(
            &self.needle,
            &self.haystack,
            self.cfg.initial_step,
            cancel,
            self.cfg.parallel,
        )
        .pop()
    }

    /// Full rotation x scale x translation sweep.
    pub fn search_pose(&self) -> Option<SearchResult> {
        self.search_pose_with(&self.cancel)
    }

    /// [`Matcher::search_pose`] with a caller-supplied cancel token.
    pub fn search_pose_with(&self, cancel: &CancelToken) -> Option<SearchResult> {
        pose::search_pose_space_with(
            &self.needle,
            &self.haystack,
            &self.cfg,
            self.warp.as_ref(),
            cancel,
        )
    }
}
