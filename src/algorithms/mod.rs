//! Post-process Implementations
//!
//! Both forms turn the length `N/2` complex transform of a real signal, read as interleaved
//! complex samples, into the first `N/2 + 1` bins of its length `N` spectrum.
//!
//! ## Available Forms
//!
//! - **Sequential**: one signal after another on the calling thread, every bin evaluated on
//!   its own. Packed layouts only.
//!
//! - **Parallel**: conjugate pairs `(p, N/2 - p)` as units of work, spread over a rayon pool.
//!   Supports strided multi-row layouts and in-place execution.
//!
//! ## Selection
//!
//! - Use the sequential form as a reference, or for tiny batches where spawning tasks costs
//!   more than it saves.
//! - Use the parallel form everywhere else.

pub mod parallel;
pub mod sequential;

pub use parallel::{post_process_parallel, Placement};
pub use sequential::post_process_sequential;
