//! Post-process Kernels
//!
//! Both post-process forms are realizations of a single identity. Let `Z` be the length `N/2`
//! complex transform of a real signal `x` read as `N/2` complex samples `x[2m] + i·x[2m + 1]`,
//! and `W = exp(-2πi/N)`. Then the spectrum `X` of `x` is
//!
//! ```text
//! X[k] = ½·(Z[k] + conj(Z[N/2 - k])) - ½i·W^k·(Z[k] - conj(Z[N/2 - k]))    0 < k < N/2
//! X[0] = Re Z[0] + Im Z[0]
//! X[N/2] = Re Z[0] - Im Z[0]
//! ```
//!
//! ## Organization
//!
//! - [`bin`]: the identity for one `k`, used by the sequential form
//! - [`pair_twiddled`]: the identity for `k = p` and `k = q = N/2 - p` at once, sharing the sums
//!   and differences of `Z[p]` and `Z[q]` and reading `W^p`, `W^q` from the twiddle table
//! - [`pair_basic`]: the same pair, with `W^p` and `W^q` recomputed
//! - [`fold_dc_nyquist`]: the two real edge bins
pub mod post_process;

pub use post_process::{bin, fold_dc_nyquist, pair_basic, pair_twiddled, post_process_signal, rotation};
