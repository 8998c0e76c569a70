//! chart-density - Kernel density estimation for chart previews
//!
//! This crate turns a column of measurements into a smooth density curve
//! that an area or line chart can plot directly:
//!
//! - **Sample filtering**: pull numeric values out of loosely typed records,
//!   dropping nulls and absent fields
//! - **Bandwidth selection**: Silverman's rule of thumb with a fallback for
//!   degenerate samples
//! - **Gaussian kernel**: the standard normal density
//! - **Density sampling**: direct evaluation of the kernel sum on an evenly
//!   spaced (or explicit tick) grid
//!
//! # Design Philosophy
//!
//! Estimation never fails. Empty samples produce empty curves, and samples
//! with no spread still get a positive bandwidth, so a chart always has
//! something to draw. Only the outer surfaces (config and record loading)
//! return errors.
//!
//! ```
//! use chart_density::kde;
//!
//! let curve = kde(&[1.0, 2.0, 3.0, 4.0, 5.0]);
//! assert_eq!(curve.len(), 100);
//! assert!(curve.iter().all(|p| p.density >= 0.0));
//! ```

pub mod bandwidth;
pub mod config;
pub mod density;
pub mod error;
pub mod estimator;
pub mod grid;
pub mod kernel;
pub mod records;
pub mod sample;

pub use bandwidth::*;
pub use config::*;
pub use density::*;
pub use error::*;
pub use estimator::*;
pub use grid::*;
pub use kernel::*;
pub use records::*;
pub use sample::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
