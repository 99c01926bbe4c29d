use num_complex::Complex;
use num_traits::One;

use crate::precision::Precision;
use crate::twiddles::twiddle;

/// `W^k = exp(-2πik/N)`, evaluated on the spot instead of read from a table.
#[inline]
pub fn rotation<T: Precision>(k: usize, n: usize) -> Complex<T> {
    twiddle(k, n)
}

/// The DC and Nyquist bins, both real, folded out of `Z[0]`.
#[inline]
pub fn fold_dc_nyquist<T: Precision>(z0: Complex<T>) -> (Complex<T>, Complex<T>) {
    (
        Complex::new(z0.re + z0.im, T::zero()),
        Complex::new(z0.re - z0.im, T::zero()),
    )
}

/// One bin `X[r]` from `z_r = Z[r]`, `z_t = Z[N/2 - r]` and `omega = W^r`.
#[inline]
pub fn bin<T: Precision>(z_r: Complex<T>, z_t: Complex<T>, omega: Complex<T>) -> Complex<T> {
    let half = T::cast_f64(0.5);
    let i = Complex::<T>::i();
    let one = Complex::<T>::one();

    z_r * (one - i * omega) * half + z_t.conj() * (one + i * omega) * half
}

/// `(X[p], X[q])` for `q = N/2 - p`, from `z_p = Z[p]`, `z_q = Z[q]` and the rotations
/// `tw_p = W^p`, `tw_q = W^q`.
///
/// `u` is `½·(Z[p] + conj(Z[q]))` and `v` holds the components of `½·(Z[p] - conj(Z[q]))`
/// swapped, so each output is `u` (or its conjugate) plus a rotation of `v` written out in
/// real arithmetic. For `p == q` both outputs are the same value.
#[inline]
pub fn pair_twiddled<T: Precision>(
    z_p: Complex<T>,
    z_q: Complex<T>,
    tw_p: Complex<T>,
    tw_q: Complex<T>,
) -> (Complex<T>, Complex<T>) {
    let half = T::cast_f64(0.5);

    let u = Complex::new((z_p.re + z_q.re) * half, (z_p.im - z_q.im) * half);
    let v = Complex::new((z_p.im + z_q.im) * half, (z_p.re - z_q.re) * half);

    let out_p = Complex::new(
        u.re + v.re * tw_p.re + v.im * tw_p.im,
        u.im - v.im * tw_p.re + v.re * tw_p.im,
    );
    let out_q = Complex::new(
        u.re + v.re * tw_q.re - v.im * tw_q.im,
        -u.im + v.im * tw_q.re + v.re * tw_q.im,
    );

    (out_p, out_q)
}

/// Same as [`pair_twiddled`], but computes `W^p` and `W^q` for a transform of length `n`
/// instead of reading them from a table.
#[inline]
pub fn pair_basic<T: Precision>(
    z_p: Complex<T>,
    z_q: Complex<T>,
    p: usize,
    n: usize,
) -> (Complex<T>, Complex<T>) {
    let q = n / 2 - p;
    let half = Complex::new(T::cast_f64(0.5), T::zero());
    let half_i = Complex::new(T::zero(), T::cast_f64(0.5));

    let out_p = (z_p + z_q.conj()) * half - (z_p - z_q.conj()) * rotation(p, n) * half_i;
    let out_q = (z_q + z_p.conj()) * half - (z_q - z_p.conj()) * rotation(q, n) * half_i;

    (out_p, out_q)
}

/// Sequential post-process of one signal: `half` holds `Z[0..N/2)`, `spectrum` receives
/// `X[0..=N/2]`.
///
/// Every bin is evaluated on its own with [`bin`], without pairing.
///
/// # Panics
///
/// Panics if `spectrum.len() != half.len() + 1` or if `half.len() < 2`
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
pub fn post_process_signal<T: Precision>(half: &[Complex<T>], spectrum: &mut [Complex<T>]) {
    let half_len = half.len();
    assert!(half_len >= 2 && spectrum.len() == half_len + 1);
    let n = half_len << 1;

    let (dc, nyquist) = fold_dc_nyquist(half[0]);
    spectrum[0] = dc;
    spectrum[half_len] = nyquist;

    spectrum[1..half_len]
        .iter_mut()
        .zip(half[1..].iter())
        .zip(half[1..].iter().rev())
        .enumerate()
        .for_each(|(i, ((x, z_r), z_t))| {
            *x = bin(*z_r, *z_t, rotation(i + 1, n));
        });
}
