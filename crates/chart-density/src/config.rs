//! Configuration for density estimation
//!
//! Every section has defaults, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! points = 200
//!
//! [bandwidth]
//! rule = "silverman"
//! adjust = 1.5
//!
//! [grid]
//! kind = "ticks"
//! start = 2500.0
//! end = 6500.0
//! step = 50.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bandwidth::BandwidthRule;
use crate::error::{validation, ConfigError, ConfigResult};
use crate::grid::{
    tick_count, EvaluationGrid, DEFAULT_MAX_POINTS, DEFAULT_PADDING_FRACTION, DEFAULT_POINTS,
};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Grid resolution for padded grids
    pub points: usize,
    /// Padding on each side of the sample range, as a fraction of the range
    pub padding_fraction: f64,
    /// What to do with records missing a requested field
    pub missing: MissingPolicy,
    /// Bandwidth selection
    pub bandwidth: BandwidthRule,
    /// Where the density is evaluated
    pub grid: GridSpec,
    /// Resource limits
    pub limits: LimitsConfig,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            padding_fraction: DEFAULT_PADDING_FRACTION,
            missing: MissingPolicy::default(),
            bandwidth: BandwidthRule::default(),
            grid: GridSpec::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Evaluation grid description
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridSpec {
    /// Evenly spaced over the padded sample range
    #[default]
    Padded,
    /// Explicit ticks `start..=end` every `step`
    Ticks { start: f64, end: f64, step: f64 },
}

/// Handling of records that lack a requested field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Drop the missing value only; each field keeps every value it has
    #[default]
    DropValue,
    /// Drop the whole record if any requested field is missing
    DropRecord,
}

/// Caps on worst-case O(points × n) work
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum grid points (padded resolution or tick count)
    pub max_points: usize,
    /// Maximum records accepted by the CLI
    pub max_samples: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            max_samples: 1_000_000,
        }
    }
}

impl DensityConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid resolution
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Set the bandwidth rule
    pub fn with_bandwidth(mut self, bandwidth: BandwidthRule) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Set the grid description
    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    /// Set the missing-value policy
    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> ConfigResult<Self> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a `.toml` or `.json` configuration file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let config = match ext.as_deref() {
            Some("toml") => Self::from_toml(&content)?,
            Some("json") => Self::from_json(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        validation::validate_points(self.points, self.limits.max_points)?;

        if !self.padding_fraction.is_finite() || self.padding_fraction < 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "padding_fraction must be non-negative and finite, got {}",
                self.padding_fraction
            )));
        }

        match self.bandwidth {
            BandwidthRule::Silverman { adjust } => validation::validate_positive("adjust", adjust)?,
            BandwidthRule::Fixed { value } => {
                validation::validate_positive("bandwidth value", value)?
            }
        }

        if let GridSpec::Ticks { start, end, step } = self.grid {
            if !start.is_finite() || !end.is_finite() {
                return Err(ConfigError::InvalidGrid(
                    "tick bounds must be finite".to_string(),
                ));
            }
            if end < start {
                return Err(ConfigError::InvalidGrid(format!(
                    "tick end {} is before start {}",
                    end, start
                )));
            }
            if !step.is_finite() || step <= 0.0 {
                return Err(ConfigError::InvalidGrid(format!(
                    "tick step must be positive, got {}",
                    step
                )));
            }
            let count = tick_count(start, end, step);
            if count > self.limits.max_points {
                return Err(ConfigError::InvalidGrid(format!(
                    "{} ticks exceed the limit of {}",
                    count, self.limits.max_points
                )));
            }
        }

        Ok(())
    }

    /// Build the evaluation grid for a sample
    pub fn grid_for(&self, sample: &[f64]) -> EvaluationGrid {
        match self.grid {
            GridSpec::Padded => EvaluationGrid::padded(sample, self.points, self.padding_fraction),
            GridSpec::Ticks { start, end, step } => EvaluationGrid::ticks(start, end, step),
        }
    }
}
