//! Accuracy metrics for comparing a computed spectrum against a reference one.
//!
//! All accumulation happens in double precision regardless of the precision of the spectra.
use num_complex::Complex;

use crate::precision::Precision;

/// L2 and L∞ norms of a complex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorNorms {
    pub l_2: f64,
    pub l_inf: f64,
}

/// Norms of `values`, treating each complex value as a magnitude
pub fn norms<T: Precision>(values: &[Complex<T>]) -> ErrorNorms {
    let (sum_sq, l_inf) = values
        .iter()
        .map(|z| widen(*z).norm_sqr())
        .fold((0.0, 0.0f64), |(sum, max), m| (sum + m, max.max(m)));

    ErrorNorms {
        l_2: sum_sq.sqrt(),
        l_inf: l_inf.sqrt(),
    }
}

/// Norms of `candidate - reference`.
///
/// # Panics
///
/// Panics if the buffers are of different lengths
pub fn distance<T: Precision>(reference: &[Complex<T>], candidate: &[Complex<T>]) -> ErrorNorms {
    assert_eq!(
        reference.len(),
        candidate.len(),
        "spectra must be of equal length, but got: {} {}",
        reference.len(),
        candidate.len()
    );

    let diff: Vec<Complex<f64>> = reference
        .iter()
        .zip(candidate.iter())
        .map(|(r, c)| widen(*c) - widen(*r))
        .collect();
    norms(&diff)
}

/// Elementwise sum of every value in `values`
pub fn spectrum_sum<T: Precision>(values: &[Complex<T>]) -> Complex<f64> {
    values.iter().map(|z| widen(*z)).sum()
}

#[inline]
fn widen<T: Precision>(z: Complex<T>) -> Complex<f64> {
    Complex::new(z.re.widen(), z.im.widen())
}

/// Outcome of comparing one spectrum against the reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub reference: ErrorNorms,
    pub difference: ErrorNorms,
    pub passed: bool,
}

/// Error thresholds for a transform of length `n`.
///
/// A candidate passes when its largest error is below `ε·max|ref|·log2(n)` and its relative
/// L2 error is below `ε·sqrt(log2(n))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accuracy {
    pub epsilon: f64,
    log2_n: f64,
}

impl Accuracy {
    /// Thresholds with the default epsilon of precision `T`.
    pub fn for_precision<T: Precision>(n: usize) -> Self {
        Self::new(n, T::EPSILON_VERIFY)
    }

    pub fn new(n: usize, epsilon: f64) -> Self {
        Self {
            epsilon,
            log2_n: (n as f64).log2(),
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn check<T: Precision>(
        &self,
        reference: &[Complex<T>],
        candidate: &[Complex<T>],
    ) -> Comparison {
        let reference_norms = norms(reference);
        let difference = distance(reference, candidate);

        let l_inf_ok = difference.l_inf <= self.epsilon * reference_norms.l_inf * self.log2_n;
        let l_2_ok = if reference_norms.l_2 == 0.0 {
            difference.l_2 == 0.0
        } else {
            difference.l_2 / reference_norms.l_2 < self.epsilon * self.log2_n.sqrt()
        };

        Comparison {
            reference: reference_norms,
            difference,
            passed: l_inf_ok && l_2_ok,
        }
    }
}
