//! Real-to-complex FFT through a half-length complex transform.
//!
//! A real signal of even length `N` is read as `N/2` complex samples and transformed with an
//! ordinary complex FFT of length `N/2`. A post-process then unfolds that half spectrum into the
//! first `N/2 + 1` bins of the signal's spectrum, the only non-redundant ones for real input.
//!
//! The post-process comes in two forms. [`post_process_sequential`] evaluates one bin at a time
//! and serves as the reference. [`post_process_parallel`] treats each conjugate pair of bins as
//! one unit of work and spreads the pairs of every transform in a batch over a rayon pool, in
//! place or out of place, for strided multi-row layouts.
//!
//! [`R2cPlanner`] bundles both steps for packed batches:
//!
//! ```
//! use halfspec::{Options, R2cPlanner};
//! use num_complex::Complex;
//!
//! let n = 14;
//! let signals: Vec<f64> = (0..n).map(|i| i as f64).collect();
//! let mut spectrum = vec![Complex::default(); n / 2 + 1];
//!
//! let planner = R2cPlanner::new(n, Options::default()).unwrap();
//! planner.process(&signals, 1, &mut spectrum).unwrap();
//! assert_eq!(spectrum[0].re, 91.0);
//! ```
pub mod algorithms;
pub mod error;
pub mod kernels;
pub mod launch;
pub mod layout;
pub mod options;
pub mod oracle;
pub mod parallel;
pub mod planner;
pub mod precision;
pub mod twiddles;
pub mod verify;

pub use algorithms::{post_process_parallel, post_process_sequential, Placement};
pub use error::{R2cError, Result};
pub use launch::LaunchShape;
pub use layout::{Layout, Shape};
pub use options::{Options, PostProcessKernel};
pub use parallel::Device;
pub use planner::R2cPlanner;
pub use precision::Precision;
pub use twiddles::{generate_twiddles, TwiddleTable};

#[cfg(test)]
mod tests {
    use num_complex::Complex;
    use utilities::{assert_float_closeness, assert_spectra_closeness, gen_ramp_batch};

    use super::*;
    use crate::oracle::r2c_reference;
    use crate::verify::{spectrum_sum, Accuracy};

    /// N = 14, three signals of the ramp `x[i] = (i + 1) * 5 - (i mod 7)`
    fn ramp_scenario<T: Precision>() -> [Vec<Complex<T>>; 3] {
        let (n, batch) = (14, 3);
        let signals: Vec<T> = gen_ramp_batch(n * batch);
        let planner = R2cPlanner::new(n, Options::default()).unwrap();

        let reference = r2c_reference(n, batch, &signals);
        let mut sequential = vec![Complex::default(); 8 * batch];
        planner
            .process_sequential(&signals, batch, &mut sequential)
            .unwrap();
        let mut parallel = vec![Complex::default(); 8 * batch];
        planner.process(&signals, batch, &mut parallel).unwrap();

        [reference, sequential, parallel]
    }

    #[test]
    fn ramp_scenario_double() {
        let [reference, sequential, parallel] = ramp_scenario::<f64>();

        for spectrum in [&reference, &sequential, &parallel] {
            assert_eq!(spectrum.len(), 24);
            assert_float_closeness(spectrum[0].re, 483.0, 1e-9);
            assert_float_closeness(spectrum[1].re, -35.0, 1e-9);
            assert_float_closeness(spectrum[1].im, 153.3450193637188, 1e-9);
            assert_float_closeness(spectrum[7].re, -35.0, 1e-9);

            let sum = spectrum_sum(spectrum);
            assert_float_closeness(sum.re, 3717.0, 1e-9);
            assert_float_closeness(sum.im, 902.8542423475053, 1e-9);
        }

        let accuracy = Accuracy::for_precision::<f64>(14);
        assert!(accuracy.check(&reference, &sequential).passed);
        assert!(accuracy.check(&reference, &parallel).passed);
        assert_spectra_closeness(&parallel, &sequential, 1e-13);
    }

    #[test]
    fn ramp_scenario_single() {
        let [reference, sequential, parallel] = ramp_scenario::<f32>();

        for spectrum in [&sequential, &parallel] {
            let sum = spectrum_sum(spectrum);
            assert_float_closeness(sum.re, 3717.0, 1e-2);
            assert_float_closeness(sum.im, 902.854, 1e-2);
            assert!(spectrum.chunks_exact(8).all(|x| x[0].im == 0.0 && x[7].im == 0.0));
        }

        let accuracy = Accuracy::for_precision::<f32>(14);
        assert!(accuracy.check(&reference, &sequential).passed);
        assert!(accuracy.check(&reference, &parallel).passed);
    }
}
