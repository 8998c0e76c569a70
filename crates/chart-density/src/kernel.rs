//! Gaussian kernel
//!
//! The smoothing kernel is the standard normal density:
//!
//! K(u) = (1 / sqrt(2π)) * exp(-u² / 2)
//!
//! It is defined for every real `u` and decays to zero for large `|u|`
//! (`exp` underflows to 0.0 rather than overflowing).

/// 1 / sqrt(2π)
pub const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Evaluate the standard Gaussian kernel at `u`
#[inline]
pub fn gaussian_kernel(u: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * u * u).exp()
}
