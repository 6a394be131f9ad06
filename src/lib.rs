//! HausMatch locates a needle shape inside a haystack image by comparing edge
//! silhouettes with the symmetric Hausdorff distance.
//!
//! The engine works on in-memory grids: an [`EdgeMask`] and its
//! [`DistanceField`] per image, paired into a [`Shape`]. Translation is found
//! with a coarse-to-fine grid search; rotation and scale are swept around it.
//! Parallel scans are available via the `rayon` feature, image loading and
//! Canny edge detection via `image-io`.

pub mod grid;
#[cfg(feature = "image-io")]
pub mod io;
pub mod metric;
pub mod search;
mod trace;
pub mod util;

pub use grid::{
    DistanceField, DistanceNorm, EdgeMask, EdgePolarity, EdgeWarp, GrayGrid, Grid, NearestWarp,
};
pub use metric::{
    combined_distance, combined_shape_distance, directed_distance, NO_OVERLAP_DISTANCE,
};
pub use search::pose::search_pose_space;
pub use search::translation::{search_grid, search_hierarchical, search_hierarchical_passes};
pub use search::{
    CancelToken, MatchConfig, Matcher, Offset, Pose, SearchBounds, SearchResult, Shape,
    SweepRange,
};
pub use util::{HausError, HausResult};
