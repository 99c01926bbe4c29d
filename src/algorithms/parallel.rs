//! Parallel post-process
//!
//! Every work item owns one conjugate pair `(p, q = N/2 - p)` of one transform and writes
//! `X[p]` and `X[q]` and nothing else. The pairing is expressed through disjoint borrows: the
//! low half `[0, pairs)` of a spectrum is chunked from the front, the high half
//! `(N/2 - pairs, N/2]` from the back, so work-group `g` of one half lines up with work-group
//! `g` of the other. When `N/2` is even the middle bin `p = q = N/4` is its own pair and is
//! handled on its own.
//!
//! Transforms run as independent rayon tasks, and so do the work-groups within a transform.
use num_complex::Complex;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{R2cError, Result};
use crate::kernels::{fold_dc_nyquist, pair_basic, pair_twiddled};
use crate::launch::LaunchShape;
use crate::layout::{windows, windows_mut, Layout, Shape};
use crate::options::{Options, PostProcessKernel};
use crate::parallel::Device;
use crate::precision::Precision;
use crate::twiddles::TwiddleTable;

/// Where the half spectra are read from and the final spectra are written to.
#[derive(Debug)]
pub enum Placement<'a, T> {
    /// Each transform's window holds `N/2` inputs followed by one slot of padding and is
    /// overwritten by the `N/2 + 1` outputs
    InPlace {
        buffer: &'a mut [Complex<T>],
        layout: Layout,
    },
    /// Inputs and outputs live in different buffers
    OutOfPlace {
        input: &'a [Complex<T>],
        input_layout: Layout,
        output: &'a mut [Complex<T>],
        output_layout: Layout,
    },
}

impl<'a, T> Placement<'a, T> {
    /// In-place placement from separate input and output layouts, which must be identical.
    pub fn in_place(
        buffer: &'a mut [Complex<T>],
        input_layout: Layout,
        output_layout: Layout,
    ) -> Result<Self> {
        if input_layout != output_layout {
            return Err(R2cError::InPlaceLayoutMismatch {
                input: input_layout,
                output: output_layout,
            });
        }
        Ok(Self::InPlace {
            buffer,
            layout: input_layout,
        })
    }

    pub fn out_of_place(
        input: &'a [Complex<T>],
        input_layout: Layout,
        output: &'a mut [Complex<T>],
        output_layout: Layout,
    ) -> Self {
        Self::OutOfPlace {
            input,
            input_layout,
            output,
            output_layout,
        }
    }

    fn is_in_place(&self) -> bool {
        matches!(self, Self::InPlace { .. })
    }
}

/// Where a work item reads its two inputs from.
#[derive(Clone, Copy)]
enum Source<'a, T> {
    /// The slots the outputs go to
    Aliased,
    /// A separate half spectrum
    Distinct(&'a [Complex<T>]),
}

impl<T: Copy> Source<'_, T> {
    #[inline]
    fn read(&self, slot: &Complex<T>, index: usize) -> Complex<T> {
        match self {
            Self::Aliased => *slot,
            Self::Distinct(input) => input[index],
        }
    }
}

/// Post-processes every transform of `shape` in parallel on `device`.
///
/// Returns the launch grid that was dispatched.
///
/// # Errors
///
/// Returns an error, before anything is written, if the grid exceeds
/// [`Options::max_grid_extent`], if a buffer is too short, if a layout addresses memory past
/// `usize::MAX`, if the output windows overlap, or if the twiddled kernel is selected and
/// `twiddles` was generated for another length.
pub fn post_process_parallel<T: Precision>(
    shape: &Shape,
    placement: Placement<'_, T>,
    twiddles: &TwiddleTable<T>,
    device: &Device,
    opts: &Options,
) -> Result<LaunchShape> {
    let launch = LaunchShape::new(shape, opts)?;
    if opts.kernel == PostProcessKernel::Twiddled && twiddles.len() != shape.n() {
        return Err(R2cError::TwiddleLengthMismatch {
            table: twiddles.len(),
            requested: shape.n(),
        });
    }

    let half_len = shape.half_len();
    let spectrum_len = shape.spectrum_len();
    let in_place = placement.is_in_place();

    let jobs: Vec<(Source<'_, T>, &mut [Complex<T>])> = match placement {
        Placement::InPlace { buffer, layout } => {
            windows_mut(buffer, shape, layout, spectrum_len, "in-place")?
                .into_iter()
                .map(|window| (Source::Aliased, window))
                .collect()
        }
        Placement::OutOfPlace {
            input,
            input_layout,
            output,
            output_layout,
        } => {
            let inputs = windows(input, shape, input_layout, half_len, "input")?;
            let outputs = windows_mut(output, shape, output_layout, spectrum_len, "output")?;
            inputs.into_iter().map(Source::Distinct).zip(outputs).collect()
        }
    };

    debug!(
        n = shape.n(),
        groups = launch.groups,
        work_items = launch.padded_work_items(),
        group_size = launch.group_size,
        rows = launch.rows,
        batch = launch.batch,
        in_place,
        kernel = ?opts.kernel,
        threads = device.num_threads(),
        "post-process launch"
    );

    let twiddles = twiddles.as_slice();
    device.install(|| {
        jobs.into_par_iter().for_each(|(source, spectrum)| {
            process_transform(source, spectrum, twiddles, shape.n(), &launch, opts.kernel);
        });
    });

    Ok(launch)
}

/// Post-processes one transform; `spectrum` is its `N/2 + 1` element output window.
fn process_transform<T: Precision>(
    source: Source<'_, T>,
    spectrum: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    n: usize,
    launch: &LaunchShape,
    kernel: PostProcessKernel,
) {
    let half_len = n / 2;
    let pairs = (half_len + 1) / 2;

    let (low, rest) = spectrum.split_at_mut(pairs);
    let (middle, high) = rest.split_at_mut(rest.len() - pairs);

    low.par_chunks_mut(launch.group_size)
        .zip(high.par_rchunks_mut(launch.group_size))
        .enumerate()
        .for_each(|(group, (low, high))| {
            let base = group * launch.group_size;
            low.iter_mut()
                .zip(high.iter_mut().rev())
                .enumerate()
                .for_each(|(i, (slot_p, slot_q))| {
                    let p = base + i;
                    let q = half_len - p;

                    // both slots are read before either is written
                    let z_p = source.read(slot_p, p);
                    let (x_p, x_q) = if p == 0 {
                        fold_dc_nyquist(z_p)
                    } else {
                        let z_q = source.read(slot_q, q);
                        pair(kernel, z_p, z_q, p, n, twiddles)
                    };

                    *slot_p = x_p;
                    *slot_q = x_q;
                });
        });

    if let Some(slot) = middle.first_mut() {
        let p = half_len / 2;
        let z = source.read(slot, p);
        *slot = pair(kernel, z, z, p, n, twiddles).0;
    }
}

#[inline]
fn pair<T: Precision>(
    kernel: PostProcessKernel,
    z_p: Complex<T>,
    z_q: Complex<T>,
    p: usize,
    n: usize,
    twiddles: &[Complex<T>],
) -> (Complex<T>, Complex<T>) {
    match kernel {
        PostProcessKernel::Twiddled => pair_twiddled(z_p, z_q, twiddles[p], twiddles[n / 2 - p]),
        PostProcessKernel::Basic => pair_basic(z_p, z_q, p, n),
    }
}
