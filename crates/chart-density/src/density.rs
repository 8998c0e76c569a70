//! Density curves
//!
//! Evaluates the Gaussian kernel density estimate
//!
//! f(x) = (1 / (n h)) * Σ K((x - x_j) / h)
//!
//! directly at every grid point, in O(points × n). No binning or FFT
//! approximation is used; samples behind a chart are small.

use serde::{Deserialize, Serialize};

use crate::bandwidth::{sanitize_bandwidth, silverman_bandwidth};
use crate::grid::{
    EvaluationGrid, DEFAULT_MAX_POINTS, DEFAULT_PADDING_FRACTION, DEFAULT_POINTS,
};
use crate::kernel::gaussian_kernel;

/// One evaluation of the estimated density
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct DensityPoint {
    /// Grid position (x axis)
    pub value: f64,
    /// Estimated density at `value` (y axis), never negative
    pub density: f64,
}

/// Density evaluated over a grid, ordered by ascending `value`
///
/// Serializes as a plain array of `{ "value", "density" }` objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DensityCurve {
    points: Vec<DensityPoint>,
}

impl DensityCurve {
    /// Wrap already ordered points
    pub fn from_points(points: Vec<DensityPoint>) -> Self {
        Self { points }
    }

    /// An empty curve (no data)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[DensityPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<DensityPoint> {
        self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DensityPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Grid positions
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Density values
    pub fn densities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.density).collect()
    }

    /// The point with the highest density (first one on ties)
    pub fn peak(&self) -> Option<DensityPoint> {
        self.points.iter().copied().fold(None, |best, p| match best {
            Some(b) if b.density >= p.density => Some(b),
            _ => Some(p),
        })
    }

    /// Trapezoidal integral of the curve over its grid
    ///
    /// Approximately 1 when the grid covers most of the mass; a renderer
    /// should not rely on it being exact.
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].value - w[0].value) * (w[0].density + w[1].density) / 2.0)
            .sum()
    }

    /// `(x, y)` pairs for plotting
    pub fn plot_points(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.value, p.density)).collect()
    }
}

impl<'a> IntoIterator for &'a DensityCurve {
    type Item = &'a DensityPoint;
    type IntoIter = std::slice::Iter<'a, DensityPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl IntoIterator for DensityCurve {
    type Item = DensityPoint;
    type IntoIter = std::vec::IntoIter<DensityPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// Kernel density at a single position
///
/// Returns 0 for an empty sample.
pub fn density_at(sample: &[f64], bandwidth: f64, x: f64) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let h = sanitize_bandwidth(bandwidth);
    kernel_sum(sample, h, x) / (sample.len() as f64 * h)
}

/// Evaluate the density of `sample` at every point of `grid`
///
/// An empty sample gives an empty curve, whatever the grid.
pub fn evaluate_density(sample: &[f64], bandwidth: f64, grid: &EvaluationGrid) -> DensityCurve {
    if sample.is_empty() {
        return DensityCurve::empty();
    }

    let h = sanitize_bandwidth(bandwidth);
    let norm = sample.len() as f64 * h;

    let points = grid
        .values()
        .iter()
        .map(|&x| DensityPoint {
            value: x,
            density: kernel_sum(sample, h, x) / norm,
        })
        .collect();

    DensityCurve { points }
}

/// Evaluate the density on `points` evenly spaced values over the padded
/// sample range
pub fn estimate_density(sample: &[f64], bandwidth: f64, points: usize) -> DensityCurve {
    let grid = EvaluationGrid::padded(sample, points, DEFAULT_PADDING_FRACTION);
    evaluate_density(sample, bandwidth, &grid)
}

/// Density curve with Silverman's bandwidth on the default 100-point grid
pub fn kde(sample: &[f64]) -> DensityCurve {
    estimate_density(sample, silverman_bandwidth(sample), DEFAULT_POINTS)
}

/// Density curve with Silverman's bandwidth, as a flat list of points
///
/// `points` is clamped to `DEFAULT_MAX_POINTS`.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn kde_points(sample: Vec<f64>, points: u32) -> Vec<DensityPoint> {
    let requested = usize::try_from(points).unwrap_or(usize::MAX);
    let points = requested.min(DEFAULT_MAX_POINTS);
    if points < requested {
        tracing::warn!(
            "Requested {} grid points, clamped to {}",
            requested,
            DEFAULT_MAX_POINTS
        );
    }
    estimate_density(&sample, silverman_bandwidth(&sample), points).into_points()
}

fn kernel_sum(sample: &[f64], h: f64, x: f64) -> f64 {
    sample.iter().map(|&xj| gaussian_kernel((x - xj) / h)).sum()
}
