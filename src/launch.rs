//! Launch grid of the parallel post-process.
//!
//! Work items are indexed by `(p, row, batch)` with `p` in `[0, N/4]`. Along `p` they are
//! grouped into work-groups of [`Options::work_group_size`] pairs; the grid is sized exactly,
//! so no work item falls outside `[0, N/4]`.
use std::fmt;

use tracing::warn;

use crate::error::{R2cError, Result};
use crate::layout::Shape;
use crate::options::Options;

/// One axis of the launch grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GridAxis {
    /// Rows of the secondary dimension
    Rows,
    /// Batch items
    Batch,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => "rows".fmt(f),
            Self::Batch => "batch".fmt(f),
        }
    }
}

/// The grid a parallel post-process is dispatched with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LaunchShape {
    /// Work-groups along `p`
    pub groups: usize,
    /// Pairs per work-group
    pub group_size: usize,
    pub rows: usize,
    pub batch: usize,
}

impl LaunchShape {
    /// Computes the grid for `shape`, rejecting extents above [`Options::max_grid_extent`].
    pub fn new(shape: &Shape, opts: &Options) -> Result<Self> {
        if opts.work_group_size == 0 {
            return Err(R2cError::InvalidWorkGroupSize);
        }

        let extents = [
            (GridAxis::Rows, shape.rows()),
            (GridAxis::Batch, shape.batch()),
        ];
        for (axis, requested) in extents {
            if requested > opts.max_grid_extent {
                warn!(%axis, requested, limit = opts.max_grid_extent, "launch grid too large");
                return Err(R2cError::GridExtentExceeded {
                    axis,
                    requested,
                    limit: opts.max_grid_extent,
                });
            }
        }

        Ok(Self {
            groups: work_items(shape.n()).div_ceil(opts.work_group_size),
            group_size: opts.work_group_size,
            rows: shape.rows(),
            batch: shape.batch(),
        })
    }

    /// Work items along `p`, including the padding of a partial last group
    pub const fn padded_work_items(&self) -> usize {
        self.groups * self.group_size
    }
}

/// Work items per transform: every `p` in `[0, N/4]`
pub const fn work_items(n: usize) -> usize {
    n / 4 + 1
}
