/// Options to tune the parallel post-process for the hardware and input size.
///
/// Calling the planner without specifying options will automatically select reasonable defaults
/// depending on the input size.
///
/// You only need to tune these options if you are trying to squeeze maximum performance
/// out of a known hardware platform that you can benchmark at varying input sizes.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Options {
    /// Conjugate pairs handled by one work-group
    pub work_group_size: usize,
    /// Largest row count and batch size a single launch accepts
    pub max_grid_extent: usize,
    /// Which formulation of the pair butterfly to run
    pub kernel: PostProcessKernel,
}

/// Row and batch limit of a launch, the grid extent of the devices the kernel was tuned on
pub const MAX_GRID_EXTENT: usize = 65535;

/// Default number of pairs per work-group
pub const DEFAULT_WORK_GROUP_SIZE: usize = 512;

impl Default for Options {
    fn default() -> Self {
        Self {
            work_group_size: DEFAULT_WORK_GROUP_SIZE,
            max_grid_extent: MAX_GRID_EXTENT,
            kernel: PostProcessKernel::default(),
        }
    }
}

impl Options {
    /// Picks options for a transform of length `n`.
    ///
    /// Large transforms get larger work-groups so that one rayon task still amortizes its
    /// scheduling cost.
    pub fn guess_options(n: usize) -> Options {
        let mut options = Options::default();
        if n >= 1 << 20 {
            options.work_group_size = 8 * DEFAULT_WORK_GROUP_SIZE;
        } else if n >= 1 << 16 {
            options.work_group_size = 2 * DEFAULT_WORK_GROUP_SIZE;
        }
        options
    }

    pub fn with_work_group_size(mut self, work_group_size: usize) -> Self {
        self.work_group_size = work_group_size;
        self
    }

    pub fn with_max_grid_extent(mut self, max_grid_extent: usize) -> Self {
        self.max_grid_extent = max_grid_extent;
        self
    }

    pub fn with_kernel(mut self, kernel: PostProcessKernel) -> Self {
        self.kernel = kernel;
        self
    }
}

/// The formulation of the pair butterfly used by the parallel post-process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PostProcessKernel {
    #[default]
    /// Reads both rotations from the precomputed twiddle table
    Twiddled,
    /// Recomputes the rotations of `p` and `q` in every work item, each with one double
    /// precision `sin_cos` narrowed to the working precision.
    ///
    /// Does not need a twiddle table, at the cost of two trigonometric evaluations per pair.
    Basic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.work_group_size, 512);
        assert_eq!(options.max_grid_extent, 65535);
        assert_eq!(options.kernel, PostProcessKernel::Twiddled);
    }

    #[test]
    fn guessed_group_size_grows_with_length() {
        assert_eq!(Options::guess_options(14).work_group_size, 512);
        assert_eq!(Options::guess_options(1 << 16).work_group_size, 1024);
        assert_eq!(Options::guess_options(1 << 22).work_group_size, 4096);
    }

    #[test]
    fn builders() {
        let options = Options::default()
            .with_work_group_size(3)
            .with_max_grid_extent(8)
            .with_kernel(PostProcessKernel::Basic);
        assert_eq!(options.work_group_size, 3);
        assert_eq!(options.max_grid_extent, 8);
        assert_eq!(options.kernel, PostProcessKernel::Basic);
    }
}
