//! Image decoding and edge detection via the `image` and `imageproc` crates.
//!
//! Available when the `image-io` feature is enabled.

use std::path::Path;

use image::DynamicImage;

use crate::grid::{DistanceNorm, EdgeMask, EdgePolarity, GrayGrid};
use crate::search::Shape;
use crate::util::{HausError, HausResult};

/// Edge detector settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeDetectConfig {
    /// Gaussian pre-smoothing sigma; `0.0` disables it.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub low_threshold: f32,
    /// Canny hysteresis high threshold.
    pub high_threshold: f32,
}

impl Default for EdgeDetectConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            low_threshold: 30.0,
            high_threshold: 90.0,
        }
    }
}

/// Loads an image from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> HausResult<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|err| HausError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })
}

/// Converts any decoded image to a grayscale grid.
pub fn gray_from_dynamic(img: &DynamicImage) -> HausResult<GrayGrid> {
    let gray = img.to_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    GrayGrid::new(gray.into_raw(), width, height)
}

/// Detects edges with optional Gaussian smoothing followed by Canny.
pub fn detect_edges(img: &DynamicImage, cfg: &EdgeDetectConfig) -> HausResult<EdgeMask> {
    if cfg.low_threshold > cfg.high_threshold {
        return Err(HausError::InvalidConfig {
            reason: "low_threshold must not exceed high_threshold",
        });
    }
    let mut gray = img.to_luma8();
    if cfg.blur_sigma > 0.0 {
        gray = imageproc::filter::gaussian_blur_f32(&gray, cfg.blur_sigma);
    }
    let edges = imageproc::edges::canny(&gray, cfg.low_threshold, cfg.high_threshold);
    let (width, height) = (edges.width() as usize, edges.height() as usize);
    let raw = GrayGrid::new(edges.into_raw(), width, height)?;
    Ok(EdgeMask::from_gray(&raw, EdgePolarity::BrightEdges))
}

/// Loads an image and builds its edge mask and distance field.
pub fn load_shape<P: AsRef<Path>>(
    path: P,
    cfg: &EdgeDetectConfig,
    norm: DistanceNorm,
) -> HausResult<Shape> {
    let img = load_image(path)?;
    let edges = detect_edges(&img, cfg)?;
    Ok(Shape::from_edges(edges, norm))
}
