//! Per-field density estimation
//!
//! `DensityEstimator` runs the full pipeline for each requested field:
//! extract the sample, choose a bandwidth, then evaluate the density on the
//! configured grid. Fields are independent of each other; with the
//! `parallel` feature they are processed on the rayon thread pool.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{DensityConfig, GridSpec, MissingPolicy};
use crate::density::{evaluate_density, DensityCurve};
use crate::error::DensityResult;
use crate::grid::EvaluationGrid;
use crate::records::RecordSet;
use crate::sample::{extract_complete_samples, extract_sample, group_samples};

/// Density curves keyed by field (or group) name
pub type DensityCurves = BTreeMap<String, DensityCurve>;

/// Runs filter, bandwidth and density stages with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct DensityEstimator {
    config: DensityConfig,
}

impl DensityEstimator {
    /// Create an estimator, validating the configuration
    pub fn new(config: DensityConfig) -> DensityResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DensityConfig {
        &self.config
    }

    /// Bandwidth the configured rule picks for `sample`
    pub fn bandwidth(&self, sample: &[f64]) -> f64 {
        self.config.bandwidth.select(sample)
    }

    /// Density curve for a raw sample
    pub fn estimate(&self, sample: &[f64]) -> DensityCurve {
        let grid = self.config.grid_for(sample);
        self.estimate_on(sample, &grid)
    }

    /// Density curve of one record field
    pub fn estimate_field(&self, records: &RecordSet, field: &str) -> DensityCurve {
        let sample = extract_sample(records, field);
        tracing::debug!("Field '{}': {} values", field, sample.len());
        self.estimate(&sample)
    }

    /// One density curve per field
    ///
    /// Missing values are handled by the configured [`MissingPolicy`].
    /// A field with no numeric values maps to an empty curve.
    pub fn estimate_fields<S: AsRef<str> + Sync>(
        &self,
        records: &RecordSet,
        fields: &[S],
    ) -> DensityCurves {
        let samples: Vec<(String, Vec<f64>)> = match self.config.missing {
            MissingPolicy::DropValue => fields
                .iter()
                .map(|f| (f.as_ref().to_string(), extract_sample(records, f.as_ref())))
                .collect(),
            MissingPolicy::DropRecord => fields
                .iter()
                .map(|f| f.as_ref().to_string())
                .zip(extract_complete_samples(records, fields))
                .collect(),
        };

        for (field, sample) in &samples {
            tracing::debug!("Field '{}': {} values", field, sample.len());
        }

        #[cfg(feature = "parallel")]
        let curves = samples
            .into_par_iter()
            .map(|(field, sample)| (field, self.estimate(&sample)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let curves = samples
            .into_iter()
            .map(|(field, sample)| (field, self.estimate(&sample)))
            .collect();

        curves
    }

    /// One density curve per group, all on a shared grid
    ///
    /// The shared grid is the configured tick grid, or a padded grid over
    /// the pooled values of every group. Each group keeps its own bandwidth.
    pub fn estimate_groups(
        &self,
        records: &RecordSet,
        group_field: &str,
        value_field: &str,
    ) -> DensityCurves {
        let groups = group_samples(records, group_field, value_field);

        let grid = match self.config.grid {
            GridSpec::Padded => {
                let pooled: Vec<f64> = groups.values().flatten().copied().collect();
                self.config.grid_for(&pooled)
            }
            GridSpec::Ticks { .. } => self.config.grid_for(&[]),
        };

        tracing::debug!(
            "Grouping '{}' by '{}': {} groups on {} grid points",
            value_field,
            group_field,
            groups.len(),
            grid.len()
        );

        groups
            .into_iter()
            .map(|(key, sample)| {
                let curve = self.estimate_on(&sample, &grid);
                (key, curve)
            })
            .collect()
    }

    fn estimate_on(&self, sample: &[f64], grid: &EvaluationGrid) -> DensityCurve {
        if sample.is_empty() {
            return DensityCurve::empty();
        }
        let h = self.bandwidth(sample);
        tracing::debug!(
            "Evaluating {} samples on {} grid points (bandwidth = {:.6})",
            sample.len(),
            grid.len(),
            h
        );
        evaluate_density(sample, h, grid)
    }
}
