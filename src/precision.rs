//! Floating-point precisions the transform can be carried out in.
//!
//! The same precision is threaded through the twiddle table, the half spectrum, and the final
//! spectrum. Only `f32` and `f64` implement [`Precision`].
use std::fmt::{Debug, Display};

use bytemuck::Pod;
use num_traits::Float;
use rustfft::FftNum;

/// A real scalar type usable for every stage of the real-to-complex transform.
pub trait Precision:
    Float + FftNum + Pod + Default + Display + Debug + Send + Sync + 'static
{
    /// Name used in log output and by the verification driver
    const NAME: &'static str;

    /// Machine epsilon scaled for comparing transforms, see [`crate::verify::Accuracy`]
    const EPSILON_VERIFY: f64;

    /// Narrows a double-precision intermediate into this precision
    fn cast_f64(value: f64) -> Self;

    /// Widens this value to double precision
    fn widen(self) -> f64;
}

macro_rules! impl_precision_for {
    ($precision:ty, $name:literal, $epsilon:literal) => {
        impl Precision for $precision {
            const NAME: &'static str = $name;
            const EPSILON_VERIFY: f64 = $epsilon;

            #[inline]
            fn cast_f64(value: f64) -> Self {
                value as $precision
            }

            #[inline]
            fn widen(self) -> f64 {
                f64::from(self)
            }
        }
    };
}

impl_precision_for!(f32, "single", 3.75e-5);
impl_precision_for!(f64, "double", 1e-13);
