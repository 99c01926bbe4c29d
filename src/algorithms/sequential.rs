//! Sequential post-process
//!
//! Reference form of the post-process: one signal after another on the calling thread, every
//! bin computed on its own. The parallel form is checked against it.
use num_complex::Complex;

use crate::error::Result;
use crate::kernels::post_process_signal;
use crate::layout::{windows, windows_mut, Layout, Shape};
use crate::precision::Precision;

/// Post-processes `batch` half spectra of length `N/2` stored back to back in `half_spectrum`
/// into `batch` spectra of length `N/2 + 1` stored back to back in `final_spectrum`.
///
/// # Errors
///
/// Returns an error if `n` is odd or smaller than 4, if `batch` is zero, or if either buffer is
/// too short for the batch. Nothing is written in that case.
pub fn post_process_sequential<T: Precision>(
    n: usize,
    batch: usize,
    half_spectrum: &[Complex<T>],
    final_spectrum: &mut [Complex<T>],
) -> Result<()> {
    let shape = Shape::batched(n, batch)?;
    let half_len = shape.half_len();
    let spectrum_len = shape.spectrum_len();

    let inputs = windows(
        half_spectrum,
        &shape,
        Layout::packed(half_len, 1),
        half_len,
        "input",
    )?;
    let outputs = windows_mut(
        final_spectrum,
        &shape,
        Layout::packed(spectrum_len, 1),
        spectrum_len,
        "output",
    )?;

    inputs
        .into_iter()
        .zip(outputs)
        .for_each(|(half, spectrum)| post_process_signal(half, spectrum));

    Ok(())
}
