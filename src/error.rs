//! Errors returned by the post-process entry points and the planner.
use rustfft::FftDirection;
use thiserror::Error;

use crate::launch::GridAxis;
use crate::layout::Layout;

/// Everything that can go wrong before or while a post-process is dispatched.
///
/// Every variant is detected before the first output element is written, so a failed call
/// leaves the output buffer untouched.
#[derive(Debug, Error)]
pub enum R2cError {
    /// The transform length is odd or smaller than 4
    #[error("transform length must be even and at least 4, got {0}")]
    InvalidLength(usize),

    /// Rows or batch count is zero
    #[error("{axis} extent must be at least 1")]
    EmptyAxis { axis: GridAxis },

    /// A buffer cannot hold every transform of the requested shape at the given layout
    #[error("{buffer} buffer holds {actual} elements but the requested shape needs {required}")]
    BufferTooSmall {
        buffer: &'static str,
        required: usize,
        actual: usize,
    },

    /// A transform of the requested shape would start or end past `usize::MAX`
    #[error("{buffer} layout {layout:?} cannot address every transform of length {window}")]
    LayoutOverflow {
        buffer: &'static str,
        layout: Layout,
        window: usize,
    },

    /// Two transforms of the output would share memory
    #[error("{buffer} layout {layout:?} places two transforms of length {window} on overlapping memory")]
    OverlappingLayout {
        buffer: &'static str,
        layout: Layout,
        window: usize,
    },

    /// In-place execution was requested with different input and output layouts
    #[error("in-place execution requires identical layouts, got input {input:?} and output {output:?}")]
    InPlaceLayoutMismatch { input: Layout, output: Layout },

    /// The twiddle table was generated for another transform length
    #[error("twiddle table was generated for length {table} but the transform length is {requested}")]
    TwiddleLengthMismatch { table: usize, requested: usize },

    /// A half transform supplied to the planner does not fit the transform length
    #[error("half transform must run forward over {expected} points, got {direction:?} over {actual}")]
    HalfTransformMismatch {
        expected: usize,
        actual: usize,
        direction: FftDirection,
    },

    /// A work-group must hold at least one pair
    #[error("work-group size must be at least 1")]
    InvalidWorkGroupSize,

    /// The launch grid is larger than the device supports along one axis
    #[error("{axis} extent {requested} exceeds the grid limit of {limit}")]
    GridExtentExceeded {
        axis: GridAxis,
        requested: usize,
        limit: usize,
    },

    /// The worker pool could not be started
    #[error("failed to start the worker pool")]
    Device(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, R2cError>;
