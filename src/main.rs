use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use halfspec::oracle::r2c_reference;
use halfspec::verify::{norms, spectrum_sum, Accuracy};
use halfspec::{
    post_process_parallel, post_process_sequential, Device, Layout, Options, Placement,
    PostProcessKernel, Precision, Shape, TwiddleTable,
};
use num_complex::Complex;
use rustfft::FftPlanner;
use tracing_subscriber::EnvFilter;

/// Values printed per buffer
const PREVIEW: usize = 16;

#[derive(Parser, Debug)]
#[command(name = "halfspec")]
#[command(about = "Check the real-to-complex post-process against a full-length reference FFT", long_about = None)]
struct Cli {
    /// Length of each real signal
    #[arg(long, default_value_t = 14)]
    n: usize,
    /// Batch items
    #[arg(long, default_value_t = 3)]
    batch: usize,
    /// Rows of the secondary dimension
    #[arg(long, default_value_t = 1)]
    rows: usize,
    #[arg(long, value_enum, default_value_t = PrecisionArg::Double)]
    precision: PrecisionArg,
    #[arg(long, value_enum, default_value_t = PlacementArg::OutOfPlace)]
    placement: PlacementArg,
    #[arg(long, value_enum, default_value_t = KernelArg::Twiddled)]
    kernel: KernelArg,
    /// Pairs per work-group, picked from the length if omitted
    #[arg(long, value_name = "PAIRS")]
    work_group_size: Option<usize>,
    /// Worker threads, the global rayon pool if omitted
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PrecisionArg {
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlacementArg {
    InPlace,
    OutOfPlace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KernelArg {
    Twiddled,
    Basic,
}

impl From<KernelArg> for PostProcessKernel {
    fn from(kernel: KernelArg) -> Self {
        match kernel {
            KernelArg::Twiddled => PostProcessKernel::Twiddled,
            KernelArg::Basic => PostProcessKernel::Basic,
        }
    }
}

fn print_values<T: Precision>(label: &str, values: &[Complex<T>]) {
    println!("{label}:");
    for (i, z) in values.iter().take(PREVIEW).enumerate() {
        println!("  [{i:>2}] ({:.6}, {:.6})", z.re, z.im);
    }
    let sum = spectrum_sum(values);
    println!("  sum = ({:.6}, {:.6})", sum.re, sum.im);
}

/// Runs the reference, sequential and parallel paths, returns whether both passed
fn run<T: Precision>(cli: &Cli) -> halfspec::Result<bool> {
    let shape = Shape::new(cli.n, cli.rows, cli.batch)?;
    let (n, half_len, spectrum_len) = (shape.n(), shape.half_len(), shape.spectrum_len());
    let count = shape.num_transforms();

    let mut opts = Options::guess_options(n).with_kernel(cli.kernel.into());
    if let Some(work_group_size) = cli.work_group_size {
        opts = opts.with_work_group_size(work_group_size);
    }
    let device = match cli.threads {
        Some(threads) => Device::with_threads(threads)?,
        None => Device::global(),
    };

    println!(
        "n = {n}, rows = {}, batch = {}, precision = {}, placement = {:?}, kernel = {:?}",
        cli.rows,
        cli.batch,
        T::NAME,
        cli.placement,
        opts.kernel
    );

    let signals: Vec<T> = (0..n * count)
        .map(|i| T::cast_f64(((i + 1) * 5 - i % 7) as f64))
        .collect();
    println!("input:");
    for (i, x) in signals.iter().take(PREVIEW).enumerate() {
        println!("  [{i:>2}] {x:.6}");
    }

    let reference = r2c_reference(n, count, &signals);
    print_values("reference", &reference);

    let mut half: Vec<Complex<T>> = bytemuck::cast_slice(&signals).to_vec();
    FftPlanner::new().plan_fft_forward(half_len).process(&mut half);

    let mut sequential = vec![Complex::default(); spectrum_len * count];
    post_process_sequential(n, count, &half, &mut sequential)?;
    print_values("sequential", &sequential);

    // the parallel path sees `count` transforms as `rows` x `batch`, packed
    let twiddles = TwiddleTable::new(n);
    let layout = Layout::packed(spectrum_len, cli.rows);
    let parallel = match cli.placement {
        PlacementArg::OutOfPlace => {
            let mut output = vec![Complex::default(); spectrum_len * count];
            let placement = Placement::out_of_place(
                &half,
                Layout::packed(half_len, cli.rows),
                &mut output,
                layout,
            );
            post_process_parallel(&shape, placement, &twiddles, &device, &opts)?;
            output
        }
        PlacementArg::InPlace => {
            let mut buffer = vec![Complex::default(); spectrum_len * count];
            buffer
                .chunks_exact_mut(spectrum_len)
                .zip(half.chunks_exact(half_len))
                .for_each(|(window, z)| window[..half_len].copy_from_slice(z));
            let placement = Placement::in_place(&mut buffer, layout, layout)?;
            post_process_parallel(&shape, placement, &twiddles, &device, &opts)?;
            buffer
        }
    };
    print_values("parallel", &parallel);

    let accuracy = Accuracy::for_precision::<T>(n);
    let reference_norms = norms(&reference);
    println!(
        "reference norms: l2 = {:e}, linf = {:e}",
        reference_norms.l_2, reference_norms.l_inf
    );

    let mut passed = true;
    for (label, candidate) in [("sequential", &sequential), ("parallel", &parallel)] {
        let comparison = accuracy.check(&reference, candidate);
        println!(
            "{label}: l2 = {:e}, linf = {:e}, {}",
            comparison.difference.l_2,
            comparison.difference.l_inf,
            if comparison.passed { "ok" } else { "FAILED" }
        );
        passed &= comparison.passed;
    }

    Ok(passed)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let outcome = match cli.precision {
        PrecisionArg::Single => run::<f32>(&cli),
        PrecisionArg::Double => run::<f64>(&cli),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
