//! Error types for chart-density
//!
//! Density estimation itself never fails. Errors come from the surfaces
//! around it:
//! - Loading and validating configuration
//! - Reading record files
//! - Resource limits on input size

use thiserror::Error;

/// Main error type for chart-density operations
#[derive(Error, Debug)]
pub enum DensityError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Record file not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Record file has an extension we cannot read
    #[error("Unsupported record format: {0}")]
    UnsupportedFormat(String),

    /// Malformed record data
    #[error("Failed to parse records: {0}")]
    Parse(String),

    /// Malformed CSV row
    #[error("CSV parsing error at line {line}: {message}")]
    CsvRow { line: usize, message: String },

    /// Input exceeds the configured sample limit
    #[error("Sample exceeds size limit: {size} values (max: {max})")]
    SampleTooLarge { size: usize, max: usize },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors found while loading or validating a configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Grid description is unusable
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration file extension is not recognised
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for chart-density operations
pub type DensityResult<T> = Result<T, DensityError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate the number of values handed to the estimator
    pub fn validate_sample_size(size: usize, max: usize) -> DensityResult<()> {
        if size > max {
            return Err(DensityError::SampleTooLarge { size, max });
        }
        Ok(())
    }

    /// Validate a grid resolution
    pub fn validate_points(points: usize, max: usize) -> ConfigResult<()> {
        if points < 2 {
            return Err(ConfigError::OutOfRange(format!(
                "points must be at least 2, got {}",
                points
            )));
        }
        if points > max {
            return Err(ConfigError::OutOfRange(format!(
                "points must be at most {}, got {}",
                max, points
            )));
        }
        Ok(())
    }

    /// Validate a strictly positive, finite parameter
    pub fn validate_positive(name: &str, value: f64) -> ConfigResult<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "{} must be positive and finite, got {}",
                name, value
            )));
        }
        Ok(())
    }
}
