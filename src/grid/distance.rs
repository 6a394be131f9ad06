//! Distance fields and the transforms that produce them from edge masks.
//!
//! Two exact transforms are provided:
//!
//! - [`DistanceNorm::L1`]: city-block distance via a forward/backward sweep.
//!   This is the default and matches what distance thresholds in this crate
//!   are tuned for.
//! - [`DistanceNorm::Euclidean`]: exact Euclidean distance using the separable
//!   lower-envelope algorithm of Felzenszwalb and Huttenlocher on squared
//!   distances, columns first, then rows.
//!
//! A mask without edge cells yields a field filled with
//! [`NO_OVERLAP_DISTANCE`](crate::metric::NO_OVERLAP_DISTANCE).

use crate::grid::{EdgeMask, Grid};
use crate::metric::NO_OVERLAP_DISTANCE;
use crate::util::{HausError, HausResult};

/// Metric used when building a distance field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceNorm {
    /// City-block distance `|dx| + |dy|`.
    #[default]
    L1,
    /// Straight-line distance `sqrt(dx^2 + dy^2)`.
    Euclidean,
}

/// Dense grid of non-negative distances to the nearest edge cell.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    values: Grid<f32>,
}

impl DistanceField {
    /// Wraps a grid after checking every value is finite and non-negative.
    pub fn new(values: Grid<f32>) -> HausResult<Self> {
        let width = values.width();
        for (idx, &value) in values.as_slice().iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(HausError::InvalidDistance {
                    x: idx % width,
                    y: idx / width,
                });
            }
        }
        Ok(Self { values })
    }

    /// Wraps a row-major buffer of distances.
    pub fn from_vec(data: Vec<f32>, width: usize, height: usize) -> HausResult<Self> {
        Self::new(Grid::new(data, width, height)?)
    }

    /// Computes the distance transform of `edges`.
    pub fn from_edges(edges: &EdgeMask, norm: DistanceNorm) -> Self {
        let (width, height) = edges.dims();
        if edges.edge_count() == 0 {
            return Self {
                values: Grid::filled(width, height, NO_OVERLAP_DISTANCE)
                    .expect("edge mask dimensions are valid"),
            };
        }
        let data = match norm {
            DistanceNorm::L1 => l1_transform(edges),
            DistanceNorm::Euclidean => euclidean_transform(edges),
        };
        Self {
            values: Grid::new(data, width, height).expect("transform preserves dimensions"),
        }
    }

    /// Returns the field width.
    pub fn width(&self) -> usize {
        self.values.width()
    }

    /// Returns the field height.
    pub fn height(&self) -> usize {
        self.values.height()
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        self.values.dims()
    }

    /// Returns the distance at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.values.get(x, y).copied()
    }

    /// Returns row `y` of the field.
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        self.values.row(y)
    }

    /// Returns the underlying grid.
    pub fn values(&self) -> &Grid<f32> {
        &self.values
    }
}

fn l1_transform(edges: &EdgeMask) -> Vec<f32> {
    let (width, height) = edges.dims();
    let far = (width + height) as f32;
    let mut dist: Vec<f32> = edges
        .cells()
        .as_slice()
        .iter()
        .map(|&is_edge| if is_edge { 0.0 } else { far })
        .collect();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let mut d = dist[idx];
            if x > 0 {
                d = d.min(dist[idx - 1] + 1.0);
            }
            if y > 0 {
                d = d.min(dist[idx - width] + 1.0);
            }
            dist[idx] = d;
        }
    }
    for y in (0..height).rev() {
        for x in (0..width).rev() {
            let idx = y * width + x;
            let mut d = dist[idx];
            if x + 1 < width {
                d = d.min(dist[idx + 1] + 1.0);
            }
            if y + 1 < height {
                d = d.min(dist[idx + width] + 1.0);
            }
            dist[idx] = d;
        }
    }
    dist
}

fn euclidean_transform(edges: &EdgeMask) -> Vec<f32> {
    let (width, height) = edges.dims();
    let mut sq: Vec<f64> = edges
        .cells()
        .as_slice()
        .iter()
        .map(|&is_edge| if is_edge { 0.0 } else { f64::INFINITY })
        .collect();

    let longest = width.max(height);
    let mut line = vec![0.0f64; longest];
    let mut out = vec![0.0f64; longest];
    let mut hull = vec![0usize; longest];
    let mut bounds = vec![0.0f64; longest + 1];

    for x in 0..width {
        for y in 0..height {
            line[y] = sq[y * width + x];
        }
        lower_envelope(&line[..height], &mut out[..height], &mut hull, &mut bounds);
        for y in 0..height {
            sq[y * width + x] = out[y];
        }
    }
    for y in 0..height {
        let row = &mut sq[y * width..(y + 1) * width];
        line[..width].copy_from_slice(row);
        lower_envelope(&line[..width], &mut out[..width], &mut hull, &mut bounds);
        row.copy_from_slice(&out[..width]);
    }

    sq.into_iter().map(|d| d.sqrt() as f32).collect()
}

/// 1D squared distance transform of a sampled function `f`.
fn lower_envelope(f: &[f64], out: &mut [f64], hull: &mut [usize], bounds: &mut [f64]) {
    let n = f.len();
    let mut k = 0usize;
    let mut started = false;

    for q in 0..n {
        if !f[q].is_finite() {
            continue;
        }
        if !started {
            hull[0] = q;
            bounds[0] = f64::NEG_INFINITY;
            bounds[1] = f64::INFINITY;
            started = true;
            continue;
        }
        // bounds[0] is -inf, so k never underflows.
        let s = loop {
            let v = hull[k];
            let s = ((f[q] + (q * q) as f64) - (f[v] + (v * v) as f64)) / (2.0 * (q - v) as f64);
            if s <= bounds[k] {
                k -= 1;
            } else {
                break s;
            }
        };
        k += 1;
        hull[k] = q;
        bounds[k] = s;
        bounds[k + 1] = f64::INFINITY;
    }

    if !started {
        out.fill(f64::INFINITY);
        return;
    }

    k = 0;
    for (q, value) in out.iter_mut().enumerate() {
        while bounds[k + 1] < q as f64 {
            k += 1;
        }
        let v = hull[k];
        let diff = q as f64 - v as f64;
        *value = diff * diff + f[v];
    }
}

#[cfg(test)]
mod tests {
    use super::{DistanceField, DistanceNorm};
    use crate::grid::EdgeMask;
    use crate::metric::NO_OVERLAP_DISTANCE;
    use crate::util::HausError;

    fn brute_force(mask: &EdgeMask, norm: DistanceNorm) -> Vec<f32> {
        let (width, height) = mask.dims();
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let best = mask
                    .edge_points()
                    .iter()
                    .map(|&(ex, ey)| {
                        let dx = (x as f32 - ex as f32).abs();
                        let dy = (y as f32 - ey as f32).abs();
                        match norm {
                            DistanceNorm::L1 => dx + dy,
                            DistanceNorm::Euclidean => (dx * dx + dy * dy).sqrt(),
                        }
                    })
                    .fold(f32::INFINITY, f32::min);
                out.push(best);
            }
        }
        out
    }

    fn sample_mask() -> EdgeMask {
        EdgeMask::from_points(9, 7, &[(1, 1), (7, 2), (4, 6), (0, 5), (8, 6)]).unwrap()
    }

    #[test]
    fn l1_matches_brute_force() {
        let mask = sample_mask();
        let field = DistanceField::from_edges(&mask, DistanceNorm::L1);
        assert_eq!(
            field.values().as_slice(),
            brute_force(&mask, DistanceNorm::L1).as_slice()
        );
    }

    #[test]
    fn euclidean_matches_brute_force() {
        let mask = sample_mask();
        let field = DistanceField::from_edges(&mask, DistanceNorm::Euclidean);
        let expected = brute_force(&mask, DistanceNorm::Euclidean);
        for (got, want) in field.values().as_slice().iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-5, "got {got}, want {want}");
        }
    }

    #[test]
    fn edgeless_mask_yields_sentinel_field() {
        let mask = EdgeMask::empty(4, 3).unwrap();
        let field = DistanceField::from_edges(&mask, DistanceNorm::L1);
        assert!(field
            .values()
            .as_slice()
            .iter()
            .all(|&d| d == NO_OVERLAP_DISTANCE));
    }

    #[test]
    fn rejects_negative_and_nan_values() {
        let err = DistanceField::from_vec(vec![0.0, 1.0, -1.0, 2.0], 2, 2)
            .err()
            .unwrap();
        assert_eq!(err, HausError::InvalidDistance { x: 0, y: 1 });
        assert!(DistanceField::from_vec(vec![f32::NAN], 1, 1).is_err());
    }
}
