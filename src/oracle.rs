//! Reference real-to-complex transform
//!
//! Runs a full length `N` complex transform on each real signal and keeps the non-redundant
//! half of the spectrum. Used only to validate the post-process, never on the production path.
use num_complex::Complex;
use rustfft::FftPlanner;

use crate::precision::Precision;

/// The first `N/2 + 1` bins of the length `n` transform of each of the `batch` real signals in
/// `signals`, stored back to back.
///
/// # Panics
///
/// Panics if `n == 0` or if `signals.len() < n * batch`
pub fn r2c_reference<T: Precision>(n: usize, batch: usize, signals: &[T]) -> Vec<Complex<T>> {
    assert!(n > 0, "cannot transform an empty signal");
    assert!(
        signals.len() >= n * batch,
        "expected {} real samples, but got: {}",
        n * batch,
        signals.len()
    );

    let fft = FftPlanner::new().plan_fft_forward(n);
    let mut buffer = vec![Complex::default(); n];
    let mut spectra = Vec::with_capacity((n / 2 + 1) * batch);

    for signal in signals.chunks_exact(n).take(batch) {
        buffer
            .iter_mut()
            .zip(signal.iter())
            .for_each(|(z, &x)| *z = Complex::new(x, T::zero()));
        fft.process(&mut buffer);
        spectra.extend_from_slice(&buffer[..=n / 2]);
    }

    spectra
}
