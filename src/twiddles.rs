//! Twiddle factors for the parallel post-process.
use std::f64::consts::PI;

use num_complex::Complex;
use tracing::debug;

use crate::precision::Precision;

/// The rotation `exp(-2πik/N)`.
///
/// Both components come from a single `sin_cos` in double precision and are only then narrowed
/// to `T`.
#[inline]
pub fn twiddle<T: Precision>(k: usize, n: usize) -> Complex<T> {
    let (sin, cos) = (-2.0 * PI / n as f64 * k as f64).sin_cos();
    Complex::new(T::cast_f64(cos), T::cast_f64(sin))
}

/// Generates the `N` unit-circle rotations `exp(-2πik/N)` for `k = 0..N`, see [`twiddle`].
///
/// # Panics
///
/// Panics if `n == 0`
pub fn generate_twiddles<T: Precision>(n: usize) -> Vec<Complex<T>> {
    assert!(n > 0, "cannot generate twiddles for an empty transform");
    (0..n).map(|k| twiddle(k, n)).collect()
}

/// Twiddle factors for one transform length, shared read-only by every work item.
#[derive(Debug, Clone)]
pub struct TwiddleTable<T> {
    twiddles: Vec<Complex<T>>,
}

impl<T: Precision> TwiddleTable<T> {
    /// Creates the table for a transform of length `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`
    pub fn new(n: usize) -> Self {
        debug!(n, precision = T::NAME, "generating twiddle table");
        Self {
            twiddles: generate_twiddles(n),
        }
    }

    /// Recomputes the table if it was generated for a length other than `n`.
    ///
    /// Returns `true` if the table was regenerated.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`
    pub fn regenerate(&mut self, n: usize) -> bool {
        if self.len() == n {
            return false;
        }
        *self = Self::new(n);
        true
    }

    /// The transform length this table was generated for
    pub fn len(&self) -> usize {
        self.twiddles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.twiddles.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex<T>] {
        &self.twiddles
    }
}
