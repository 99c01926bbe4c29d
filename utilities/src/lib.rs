pub extern crate rustfft;

use rand::{distributions::Uniform, prelude::*};
use rustfft::num_complex::Complex;
use rustfft::num_traits::Float;

/// Asserts that two fp numbers are approximately equal.
///
/// # Panics
///
/// Panics if `actual` and `expected` are too far from each other
#[allow(dead_code)]
#[track_caller]
pub fn assert_float_closeness<T: Float + std::fmt::Display>(actual: T, expected: T, epsilon: T) {
    if (actual - expected).abs() >= epsilon {
        panic!(
            "Assertion failed: {actual} too far from expected value {expected} (with epsilon {epsilon})",
        );
    }
}

/// Asserts that two spectra agree bin by bin.
///
/// The tolerance is relative to the largest magnitude in `expected`, so the same epsilon
/// works for signals of very different scales.
///
/// # Panics
///
/// Panics if the lengths differ or if any bin is too far from its expected value
#[track_caller]
pub fn assert_spectra_closeness<T: Float + std::fmt::Display>(
    actual: &[Complex<T>],
    expected: &[Complex<T>],
    epsilon: T,
) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "spectra must be of equal length, but got: {} {}",
        actual.len(),
        expected.len()
    );

    let scale = expected
        .iter()
        .map(|z| z.norm())
        .fold(T::one(), |acc, m| acc.max(m));

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let err = (a - e).norm();
        if err >= epsilon * scale {
            panic!(
                "Assertion failed at bin {i}: ({}, {}) too far from expected value ({}, {}) (with epsilon {epsilon}, scale {scale})",
                a.re, a.im, e.re, e.im
            );
        }
    }
}

/// Generate a random, real, signal in the provided buffer
pub fn gen_random_signal<T>(signal: &mut [T])
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    let mut rng = thread_rng();

    let uniform_dist = Uniform::new(T::from(-1.0).unwrap(), T::from(1.0).unwrap());
    for x in signal.iter_mut() {
        *x = uniform_dist.sample(&mut rng);
    }
}

/// The deterministic test batch `x[i] = (i + 1) * 5 - (i mod 7)`
pub fn gen_ramp_batch<T: Float>(len: usize) -> Vec<T> {
    (0..len)
        .map(|i| T::from((i + 1) * 5 - (i % 7)).unwrap())
        .collect()
}
