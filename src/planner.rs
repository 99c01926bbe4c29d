//! The planner module provides a convenient interface for planning and executing a
//! real-to-complex transform. The planner owns everything that depends only on the transform
//! length: the twiddle table of the post-process and the plan of the half-length complex
//! transform. Both are rebuilt when the length changes and reused otherwise.
use std::sync::Arc;

use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftDirection, FftPlanner};
use tracing::debug;

use crate::algorithms::{post_process_parallel, post_process_sequential, Placement};
use crate::error::{R2cError, Result};
use crate::launch::LaunchShape;
use crate::layout::{Layout, Shape};
use crate::options::Options;
use crate::parallel::Device;
use crate::precision::Precision;
use crate::twiddles::TwiddleTable;

/// Real-to-complex transform of length `N`: a complex transform of length `N/2` followed by
/// the post-process.
pub struct R2cPlanner<T: Precision> {
    n: usize,
    twiddles: TwiddleTable<T>,
    half_fft: Arc<dyn Fft<T>>,
    options: Options,
    device: Device,
}

impl<T: Precision> R2cPlanner<T> {
    /// Plans a transform of length `n` on the global rayon pool.
    ///
    /// # Errors
    ///
    /// Returns [`R2cError::InvalidLength`] if `n` is odd or smaller than 4
    pub fn new(n: usize, options: Options) -> Result<Self> {
        Shape::batched(n, 1)?;
        debug!(n, precision = T::NAME, ?options, "planning real-to-complex transform");

        Ok(Self {
            n,
            twiddles: TwiddleTable::new(n),
            half_fft: FftPlanner::new().plan_fft_forward(n / 2),
            options,
            device: Device::global(),
        })
    }

    /// Runs every launch of this planner on `device`
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Replaces the half transform with a caller-provided plan.
    ///
    /// # Errors
    ///
    /// Returns [`R2cError::HalfTransformMismatch`] unless `half_fft` is a forward transform of
    /// length `N/2`
    pub fn with_half_fft(mut self, half_fft: Arc<dyn Fft<T>>) -> Result<Self> {
        let direction = half_fft.fft_direction();
        if half_fft.len() != self.n / 2 || direction != FftDirection::Forward {
            return Err(R2cError::HalfTransformMismatch {
                expected: self.n / 2,
                actual: half_fft.len(),
                direction,
            });
        }
        self.half_fft = half_fft;
        Ok(self)
    }

    /// Length of the real signals this planner transforms
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Re-plans for signals of length `n`.
    ///
    /// Returns `true` if anything was rebuilt; resizing to the current length is free.
    ///
    /// # Errors
    ///
    /// Returns [`R2cError::InvalidLength`] if `n` is odd or smaller than 4. The planner is left
    /// unchanged in that case.
    pub fn resize(&mut self, n: usize) -> Result<bool> {
        Shape::batched(n, 1)?;
        if !self.twiddles.regenerate(n) {
            return Ok(false);
        }

        debug!(from = self.n, to = n, "re-planning real-to-complex transform");
        self.half_fft = FftPlanner::new().plan_fft_forward(n / 2);
        self.n = n;
        Ok(true)
    }

    /// Transforms `batch` real signals of length `N`, stored back to back, into `batch`
    /// spectra of `N/2 + 1` bins, stored back to back.
    ///
    /// # Errors
    ///
    /// Returns an error if `batch` is zero or exceeds the grid limit of the planner's options,
    /// or if either buffer is too short. `output` is untouched in that case.
    pub fn process(
        &self,
        signals: &[T],
        batch: usize,
        output: &mut [Complex<T>],
    ) -> Result<LaunchShape> {
        let shape = Shape::batched(self.n, batch)?;
        let half_len = shape.half_len();

        let mut half = self.half_spectra(signals, &shape)?;
        self.device.install(|| {
            half.par_chunks_exact_mut(half_len)
                .for_each_init(|| self.scratch(), |scratch, z| {
                    self.half_fft.process_with_scratch(z, scratch)
                })
        });

        let placement = Placement::out_of_place(
            &half,
            Layout::packed(half_len, 1),
            output,
            Layout::packed(shape.spectrum_len(), 1),
        );
        post_process_parallel(&shape, placement, &self.twiddles, &self.device, &self.options)
    }

    /// Transforms `batch` real signals in place.
    ///
    /// Every signal occupies `N + 2` reals of `buffer`: its `N` samples followed by two slots
    /// of padding. On return the same `N + 2` reals hold the `N/2 + 1` bins of its spectrum as
    /// interleaved real and imaginary parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `batch` is zero or exceeds the grid limit of the planner's options,
    /// or if `buffer` holds fewer than `(N + 2) * batch` reals. `buffer` is untouched in that
    /// case.
    pub fn process_in_place(&self, buffer: &mut [T], batch: usize) -> Result<LaunchShape> {
        let shape = Shape::batched(self.n, batch)?;
        let half_len = shape.half_len();
        let spectrum_len = shape.spectrum_len();

        // everything the post-process could reject, checked before the buffer is transformed
        LaunchShape::new(&shape, &self.options)?;
        let required = 2 * spectrum_len * batch;
        if buffer.len() < required {
            return Err(R2cError::BufferTooSmall {
                buffer: "in-place",
                required,
                actual: buffer.len(),
            });
        }

        let spectra: &mut [Complex<T>] = bytemuck::cast_slice_mut(&mut buffer[..required]);
        self.device.install(|| {
            spectra
                .par_chunks_exact_mut(spectrum_len)
                .for_each_init(|| self.scratch(), |scratch, window| {
                    self.half_fft
                        .process_with_scratch(&mut window[..half_len], scratch)
                })
        });

        let layout = Layout::packed(spectrum_len, 1);
        let placement = Placement::in_place(spectra, layout, layout)?;
        post_process_parallel(&shape, placement, &self.twiddles, &self.device, &self.options)
    }

    /// Same as [`Self::process`], but on the calling thread, with the sequential post-process.
    ///
    /// # Errors
    ///
    /// Returns an error if `batch` is zero or if either buffer is too short. `output` is
    /// untouched in that case.
    pub fn process_sequential(
        &self,
        signals: &[T],
        batch: usize,
        output: &mut [Complex<T>],
    ) -> Result<()> {
        let shape = Shape::batched(self.n, batch)?;

        let mut half = self.half_spectra(signals, &shape)?;
        self.half_fft.process(&mut half);

        post_process_sequential(self.n, batch, &half, output)
    }

    /// Copies the signals of `shape` into a scratch buffer of `N/2` complex values each
    fn half_spectra(&self, signals: &[T], shape: &Shape) -> Result<Vec<Complex<T>>> {
        let required = shape.n() * shape.batch();
        if signals.len() < required {
            return Err(R2cError::BufferTooSmall {
                buffer: "signal",
                required,
                actual: signals.len(),
            });
        }
        Ok(bytemuck::cast_slice(&signals[..required]).to_vec())
    }

    fn scratch(&self) -> Vec<Complex<T>> {
        vec![Complex::default(); self.half_fft.get_inplace_scratch_len()]
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_spectra_closeness, gen_random_signal};

    use super::*;
    use crate::oracle::r2c_reference;
    use crate::options::PostProcessKernel;

    #[test]
    fn process_matches_reference() {
        for n in [4, 6, 14, 64, 1000, 1 << 12] {
            let batch = 3;
            let mut signals = vec![0.0f64; n * batch];
            gen_random_signal(&mut signals);

            let planner = R2cPlanner::new(n, Options::guess_options(n)).unwrap();
            let mut output = vec![Complex::default(); (n / 2 + 1) * batch];
            let launch = planner.process(&signals, batch, &mut output).unwrap();
            assert_eq!(launch.batch, batch);

            assert_spectra_closeness(&output, &r2c_reference(n, batch, &signals), 1e-12);
        }
    }

    #[test]
    fn all_paths_agree() {
        let n = 256;
        let batch = 5;
        let mut signals = vec![0.0f32; n * batch];
        gen_random_signal(&mut signals);

        let planner = R2cPlanner::new(n, Options::default().with_work_group_size(7))
            .unwrap()
            .with_device(Device::with_threads(2).unwrap());

        let mut parallel = vec![Complex::default(); (n / 2 + 1) * batch];
        planner.process(&signals, batch, &mut parallel).unwrap();

        let mut sequential = vec![Complex::default(); (n / 2 + 1) * batch];
        planner
            .process_sequential(&signals, batch, &mut sequential)
            .unwrap();

        let mut padded = vec![0.0f32; (n + 2) * batch];
        padded
            .chunks_exact_mut(n + 2)
            .zip(signals.chunks_exact(n))
            .for_each(|(window, signal)| window[..n].copy_from_slice(signal));
        planner.process_in_place(&mut padded, batch).unwrap();
        let in_place: &[Complex<f32>] = bytemuck::cast_slice(&padded);

        let expected = r2c_reference(n, batch, &signals);
        assert_spectra_closeness(&sequential, &expected, 1e-5);
        assert_spectra_closeness(&parallel, &sequential, 1e-5);
        assert_spectra_closeness(in_place, &parallel, 1e-6);
    }

    #[test]
    fn resize_replans_only_on_new_length() {
        let mut planner = R2cPlanner::<f64>::new(16, Options::default()).unwrap();
        assert!(!planner.resize(16).unwrap());
        assert!(planner.resize(30).unwrap());
        assert_eq!(planner.len(), 30);
        assert!(matches!(planner.resize(31), Err(R2cError::InvalidLength(31))));
        assert_eq!(planner.len(), 30);

        let mut signals = vec![0.0f64; 30 * 2];
        gen_random_signal(&mut signals);
        let mut output = vec![Complex::default(); 16 * 2];
        planner.process(&signals, 2, &mut output).unwrap();
        assert_spectra_closeness(&output, &r2c_reference(30, 2, &signals), 1e-12);
    }

    #[test]
    fn custom_half_transform() {
        let mut fft_planner = FftPlanner::<f64>::new();
        assert!(matches!(
            R2cPlanner::new(16, Options::default())
                .unwrap()
                .with_half_fft(fft_planner.plan_fft_forward(16)),
            Err(R2cError::HalfTransformMismatch {
                expected: 8,
                actual: 16,
                ..
            })
        ));
        assert!(matches!(
            R2cPlanner::new(16, Options::default())
                .unwrap()
                .with_half_fft(fft_planner.plan_fft_inverse(8)),
            Err(R2cError::HalfTransformMismatch {
                direction: FftDirection::Inverse,
                ..
            })
        ));

        let planner = R2cPlanner::new(16, Options::default())
            .unwrap()
            .with_half_fft(fft_planner.plan_fft_forward(8))
            .unwrap();
        let mut signals = vec![0.0f64; 16];
        gen_random_signal(&mut signals);
        let mut output = vec![Complex::default(); 9];
        planner.process(&signals, 1, &mut output).unwrap();
        assert_spectra_closeness(&output, &r2c_reference(16, 1, &signals), 1e-12);
    }

    #[test]
    fn basic_kernel() {
        let n = 50;
        let mut signals = vec![0.0f64; n * 4];
        gen_random_signal(&mut signals);

        let opts = Options::default().with_kernel(PostProcessKernel::Basic);
        let planner = R2cPlanner::new(n, opts).unwrap();
        assert_eq!(planner.options().kernel, PostProcessKernel::Basic);

        let mut output = vec![Complex::default(); 26 * 4];
        planner.process(&signals, 4, &mut output).unwrap();
        assert_spectra_closeness(&output, &r2c_reference(n, 4, &signals), 1e-12);
    }

    #[test]
    fn rejected_calls_leave_buffers_untouched() {
        assert!(matches!(
            R2cPlanner::<f32>::new(9, Options::default()),
            Err(R2cError::InvalidLength(9))
        ));

        let n = 8;
        let planner =
            R2cPlanner::<f64>::new(n, Options::default().with_max_grid_extent(2)).unwrap();

        let mut padded: Vec<f64> = (0..30).map(f64::from).collect();
        let original = padded.clone();
        assert!(matches!(
            planner.process_in_place(&mut padded, 3),
            Err(R2cError::GridExtentExceeded { requested: 3, .. })
        ));
        assert!(matches!(
            planner.process_in_place(&mut padded[..19], 2),
            Err(R2cError::BufferTooSmall {
                buffer: "in-place",
                required: 20,
                actual: 19
            })
        ));
        assert_eq!(padded, original);

        let mut output = vec![Complex::default(); 5];
        assert!(matches!(
            planner.process(&padded[..7], 1, &mut output),
            Err(R2cError::BufferTooSmall {
                buffer: "signal",
                ..
            })
        ));
        assert!(matches!(
            planner.process(&padded, 2, &mut output),
            Err(R2cError::BufferTooSmall {
                buffer: "output",
                ..
            })
        ));
        assert!(output.iter().all(|x| *x == Complex::default()));
    }
}
