//! Evaluation grids for density curves
//!
//! A grid is the ordered list of x positions where the density is sampled.
//! The default grid spans the data range padded by a fraction of its width
//! on both sides; a tick grid evaluates at explicit, evenly stepped values.

use serde::{Deserialize, Serialize};

/// Default number of grid points
pub const DEFAULT_POINTS: usize = 100;

/// Default padding on each side, as a fraction of the sample range
pub const DEFAULT_PADDING_FRACTION: f64 = 0.1;

/// Default cap on grid points for callers without a config
pub const DEFAULT_MAX_POINTS: usize = 10_000;

/// Largest grid `EvaluationGrid::ticks` will allocate
pub const MAX_TICKS: usize = 10_000_000;

/// Ordered x positions at which a density is evaluated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationGrid {
    values: Vec<f64>,
}

impl EvaluationGrid {
    /// `points` evenly spaced values from `start` to `end`, both inclusive
    ///
    /// A single point sits at the centre of the interval; zero points give
    /// an empty grid.
    pub fn linspace(start: f64, end: f64, points: usize) -> Self {
        let values = match points {
            0 => Vec::new(),
            1 => vec![start + (end - start) / 2.0],
            _ => {
                let step = (end - start) / (points - 1) as f64;
                (0..points).map(|i| start + i as f64 * step).collect()
            }
        };
        Self { values }
    }

    /// Grid over the sample range, padded by `padding_fraction` of the range
    ///
    /// An empty sample gives an empty grid. When every value is equal the
    /// padding is zero and all grid points coincide.
    pub fn padded(sample: &[f64], points: usize, padding_fraction: f64) -> Self {
        match sample_range(sample) {
            Some((min, max)) => {
                let padding = (max - min) * padding_fraction;
                Self::linspace(min - padding, max + padding, points)
            }
            None => Self::default(),
        }
    }

    /// Ticks `start, start + step, ...` up to and including `end`
    ///
    /// Ticks are computed by index, so rounding does not accumulate. A
    /// non-positive step or `end < start` gives an empty grid, as does a
    /// grid of more than `MAX_TICKS` points. Config validation applies the
    /// tighter `limits.max_points`.
    pub fn ticks(start: f64, end: f64, step: f64) -> Self {
        let count = tick_count(start, end, step);
        if count > MAX_TICKS {
            tracing::warn!(
                "Tick grid {}..={} step {} needs {} points, over the cap of {}",
                start,
                end,
                step,
                count,
                MAX_TICKS
            );
            return Self::default();
        }
        Self {
            values: (0..count).map(|i| start + i as f64 * step).collect(),
        }
    }

    /// Grid values in ascending order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the grid is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distance between neighbouring points, if the grid has at least two
    pub fn step(&self) -> Option<f64> {
        match self.values.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }
}

/// Number of ticks an inclusive `start..=end` grid with `step` would hold
///
/// Saturates at `usize::MAX` when the count does not fit.
pub fn tick_count(start: f64, end: f64, step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || !start.is_finite() || !end.is_finite() || end < start {
        return 0;
    }
    // Tolerate rounding so an `end` that is a whole number of steps away is kept
    let steps = ((end - start) / step + 1e-9).floor();
    if !steps.is_finite() || steps >= usize::MAX as f64 {
        return usize::MAX;
    }
    (steps as usize).saturating_add(1)
}

/// Minimum and maximum of a sample
pub fn sample_range(sample: &[f64]) -> Option<(f64, f64)> {
    if sample.is_empty() {
        return None;
    }
    let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
