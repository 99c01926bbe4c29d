//! Shapes and memory layouts of batched transforms.
//!
//! A batch is addressed by `(row, batch)` coordinates. The secondary ("high") dimension is
//! walked with [`Layout::stride`] and the batch with [`Layout::distance`]; the elements of one
//! transform are always contiguous. Both post-process forms go through the helpers here to turn
//! a flat buffer into one window per transform.
use crate::error::{R2cError, Result};
use crate::launch::GridAxis;

/// Stride and distance of a family of transforms inside a flat buffer, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    /// Distance between consecutive rows of the secondary dimension
    pub stride: usize,
    /// Distance between consecutive batch items
    pub distance: usize,
}

impl Layout {
    pub const fn new(stride: usize, distance: usize) -> Self {
        Self { stride, distance }
    }

    /// Transforms of `len` elements stored back to back, rows first, then batch items.
    pub const fn packed(len: usize, rows: usize) -> Self {
        Self {
            stride: len,
            distance: len * rows,
        }
    }

    /// Offset of the first element of transform `(row, batch)`
    #[inline]
    pub const fn offset(&self, row: usize, batch: usize) -> usize {
        batch * self.distance + row * self.stride
    }

    /// Same as [`Self::offset`], `None` if the offset does not fit in `usize`
    pub fn checked_offset(&self, row: usize, batch: usize) -> Option<usize> {
        batch
            .checked_mul(self.distance)?
            .checked_add(row.checked_mul(self.stride)?)
    }
}

/// Length `n`, row count and batch size of one post-process launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    n: usize,
    rows: usize,
    batch: usize,
}

impl Shape {
    /// Validates a shape: `n` must be even and at least 4, `rows` and `batch` non-zero.
    pub fn new(n: usize, rows: usize, batch: usize) -> Result<Self> {
        if n < 4 || n % 2 != 0 {
            return Err(R2cError::InvalidLength(n));
        }
        if rows == 0 {
            return Err(R2cError::EmptyAxis {
                axis: GridAxis::Rows,
            });
        }
        if batch == 0 {
            return Err(R2cError::EmptyAxis {
                axis: GridAxis::Batch,
            });
        }
        Ok(Self { n, rows, batch })
    }

    /// A one-dimensional batch
    pub fn batched(n: usize, batch: usize) -> Result<Self> {
        Self::new(n, 1, batch)
    }

    /// Length of the real signal
    pub const fn n(&self) -> usize {
        self.n
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn batch(&self) -> usize {
        self.batch
    }

    /// Complex values per half spectrum, `N/2`
    pub const fn half_len(&self) -> usize {
        self.n / 2
    }

    /// Complex values per final spectrum, `N/2 + 1`
    pub const fn spectrum_len(&self) -> usize {
        self.n / 2 + 1
    }

    pub const fn num_transforms(&self) -> usize {
        self.rows * self.batch
    }

    /// `(row, batch)` of every transform, batch-major
    pub(crate) fn coordinates(&self) -> impl Iterator<Item = (usize, usize)> {
        let rows = self.rows;
        (0..self.batch).flat_map(move |batch| (0..rows).map(move |row| (row, batch)))
    }

    /// Smallest buffer that holds every transform of `window` elements at `layout`, `None` if
    /// no buffer could.
    pub fn required_len(&self, layout: Layout, window: usize) -> Option<usize> {
        layout
            .checked_offset(self.rows - 1, self.batch - 1)?
            .checked_add(window)
    }
}

fn check_len(
    shape: &Shape,
    layout: Layout,
    window: usize,
    actual: usize,
    buffer: &'static str,
) -> Result<()> {
    // offsets grow with row and batch, so every other window fits once the last one does
    let required = shape
        .required_len(layout, window)
        .ok_or(R2cError::LayoutOverflow {
            buffer,
            layout,
            window,
        })?;
    if actual < required {
        return Err(R2cError::BufferTooSmall {
            buffer,
            required,
            actual,
        });
    }
    Ok(())
}

/// Read-only windows of `window` elements, one per transform, batch-major.
///
/// Windows may overlap, they are only ever read.
pub(crate) fn windows<'a, C>(
    buffer: &'a [C],
    shape: &Shape,
    layout: Layout,
    window: usize,
    name: &'static str,
) -> Result<Vec<&'a [C]>> {
    check_len(shape, layout, window, buffer.len(), name)?;

    Ok(shape
        .coordinates()
        .map(|(row, batch)| {
            let offset = layout.offset(row, batch);
            &buffer[offset..offset + window]
        })
        .collect())
}

/// Disjoint mutable windows of `window` elements, one per transform, batch-major.
///
/// The windows are carved out of `buffer` with `split_at_mut` in address order, so every
/// element of the result is reachable through exactly one window. Layouts that would make two
/// windows share memory are rejected.
pub(crate) fn windows_mut<'a, C>(
    buffer: &'a mut [C],
    shape: &Shape,
    layout: Layout,
    window: usize,
    name: &'static str,
) -> Result<Vec<&'a mut [C]>> {
    check_len(shape, layout, window, buffer.len(), name)?;

    let mut order: Vec<(usize, usize)> = shape
        .coordinates()
        .enumerate()
        .map(|(index, (row, batch))| (layout.offset(row, batch), index))
        .collect();
    order.sort_unstable();

    if order.windows(2).any(|w| w[0].0 + window > w[1].0) {
        return Err(R2cError::OverlappingLayout {
            buffer: name,
            layout,
            window,
        });
    }

    let mut slots: Vec<Option<&'a mut [C]>> = (0..order.len()).map(|_| None).collect();
    let mut rest = buffer;
    let mut consumed = 0;
    for (offset, index) in order {
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(offset - consumed);
        let (slot, tail) = tail.split_at_mut(window);
        slots[index] = Some(slot);
        rest = tail;
        consumed = offset + window;
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_validation() {
        assert!(matches!(Shape::new(2, 1, 1), Err(R2cError::InvalidLength(2))));
        assert!(matches!(Shape::new(7, 1, 1), Err(R2cError::InvalidLength(7))));
        assert!(matches!(
            Shape::new(8, 0, 1),
            Err(R2cError::EmptyAxis {
                axis: GridAxis::Rows
            })
        ));
        assert!(matches!(
            Shape::new(8, 1, 0),
            Err(R2cError::EmptyAxis {
                axis: GridAxis::Batch
            })
        ));

        let shape = Shape::new(14, 2, 3).unwrap();
        assert_eq!(shape.half_len(), 7);
        assert_eq!(shape.spectrum_len(), 8);
        assert_eq!(shape.num_transforms(), 6);
    }

    #[test]
    fn packed_layout_offsets() {
        let layout = Layout::packed(8, 2);
        assert_eq!(layout.offset(0, 0), 0);
        assert_eq!(layout.offset(1, 0), 8);
        assert_eq!(layout.offset(0, 1), 16);
        assert_eq!(layout.offset(1, 2), 40);

        let shape = Shape::new(14, 2, 3).unwrap();
        assert_eq!(shape.required_len(layout, 8), Some(48));
    }

    #[test]
    fn coordinates_are_batch_major() {
        let shape = Shape::new(4, 2, 2).unwrap();
        let coords: Vec<_> = shape.coordinates().collect();
        assert_eq!(coords, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn mutable_windows_follow_coordinates() {
        // rows interleaved with batch items: stride 2 windows apart, distance 1 window apart
        let shape = Shape::new(6, 2, 2).unwrap();
        let layout = Layout::new(8, 4);
        let mut buffer: Vec<usize> = (0..16).collect();

        let windows = windows_mut(&mut buffer, &shape, layout, 4, "output").unwrap();
        let firsts: Vec<usize> = windows.iter().map(|w| w[0]).collect();
        assert_eq!(firsts, [0, 8, 4, 12]);
        assert!(windows.iter().all(|w| w.len() == 4));
    }

    #[test]
    fn overlapping_windows_are_rejected() {
        let shape = Shape::new(8, 1, 2).unwrap();
        let mut buffer = vec![0u8; 16];

        let err = windows_mut(&mut buffer, &shape, Layout::new(0, 4), 5, "output").unwrap_err();
        assert!(matches!(err, R2cError::OverlappingLayout { window: 5, .. }));

        // reads may overlap
        let read = windows(&buffer, &shape, Layout::new(0, 4), 5, "input").unwrap();
        assert_eq!(read.len(), 2);
    }

    #[test]
    fn overflowing_layouts_are_rejected() {
        let shape = Shape::new(4, 3, 1).unwrap();
        let layout = Layout::new(usize::MAX / 2 + 1, 3);
        assert_eq!(layout.checked_offset(2, 0), None);
        assert_eq!(shape.required_len(layout, 3), None);

        let mut buffer = vec![0u8; 3];
        assert!(matches!(
            windows(&buffer, &shape, layout, 3, "input"),
            Err(R2cError::LayoutOverflow {
                buffer: "input",
                ..
            })
        ));
        assert!(matches!(
            windows_mut(&mut buffer, &shape, layout, 3, "output"),
            Err(R2cError::LayoutOverflow {
                buffer: "output",
                ..
            })
        ));

        // the offset fits but the window end does not
        let shape = Shape::new(4, 1, 2).unwrap();
        let layout = Layout::new(0, usize::MAX - 1);
        assert_eq!(layout.checked_offset(0, 1), Some(usize::MAX - 1));
        assert!(matches!(
            windows(&buffer, &shape, layout, 3, "input"),
            Err(R2cError::LayoutOverflow { window: 3, .. })
        ));
    }

    #[test]
    fn short_buffers_are_rejected() {
        let shape = Shape::new(8, 1, 3).unwrap();
        let buffer = vec![0u8; 14];
        let err = windows(&buffer, &shape, Layout::packed(5, 1), 5, "output").unwrap_err();
        assert!(matches!(
            err,
            R2cError::BufferTooSmall {
                required: 15,
                actual: 14,
                ..
            }
        ));
    }
}
