//! Padded sample planes.

use alloc::vec;
use alloc::vec::Vec;

use super::api::ReconstructError;

/// Largest width or height VP8 can signal (14 bits).
pub const MAX_DIMENSION: u32 = 16383;

/// Value of the row above the first macroblock row.
pub(crate) const BORDER_ABOVE: u8 = 127;
/// Value of the column left of the first macroblock column.
pub(crate) const BORDER_LEFT: u8 = 129;

/// One 8-bit sample plane with a border on the top, left and right.
///
/// The coded area is rounded up to whole blocks; `width` and `height`
/// describe the visible part. The border is one block wide, which is enough
/// for the intra predictors (one row and column of context plus the
/// above-right samples of the last sub-block column).
#[derive(Clone, Debug)]
pub struct Plane {
    data: Vec<u8>,
    width: usize,
    height: usize,
    coded_width: usize,
    coded_height: usize,
    border: usize,
    stride: usize,
}

impl Plane {
    /// Allocates a plane for `width`x`height` visible samples coded in
    /// blocks of `block` samples.
    pub fn new(width: u32, height: u32, block: usize) -> Result<Self, ReconstructError> {
        if width == 0 || height == 0 {
            return Err(ReconstructError::InvalidDimensions { width, height });
        }
        let width = usize::try_from(width).map_err(|_| ReconstructError::ImageTooLarge)?;
        let height = usize::try_from(height).map_err(|_| ReconstructError::ImageTooLarge)?;

        let coded_width = width.div_ceil(block) * block;
        let coded_height = height.div_ceil(block) * block;
        let border = block;
        let stride = coded_width
            .checked_add(2 * border)
            .ok_or(ReconstructError::ImageTooLarge)?;
        let len = coded_height
            .checked_add(border)
            .and_then(|rows| rows.checked_mul(stride))
            .ok_or(ReconstructError::ImageTooLarge)?;

        Ok(Self {
            data: vec![0; len],
            width,
            height,
            coded_width,
            coded_height,
            border,
            stride,
        })
    }

    /// Visible width in samples.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Visible height in samples.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width rounded up to whole blocks.
    #[must_use]
    pub fn coded_width(&self) -> usize {
        self.coded_width
    }

    /// Height rounded up to whole blocks.
    #[must_use]
    pub fn coded_height(&self) -> usize {
        self.coded_height
    }

    /// Border width on the top, left and right.
    #[must_use]
    pub fn border(&self) -> usize {
        self.border
    }

    /// Distance in bytes between vertically adjacent samples.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The whole padded buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The whole padded buffer, mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Buffer index of the visible sample `(x, y)`.
    #[inline]
    #[must_use]
    pub fn origin(&self, x: usize, y: usize) -> usize {
        (y + self.border) * self.stride + x + self.border
    }

    /// Buffer index of `(x, y)` where negative coordinates address the
    /// border.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the padded area.
    #[must_use]
    pub fn index(&self, x: isize, y: isize) -> usize {
        let bx = x + self.border as isize;
        let by = y + self.border as isize;
        assert!(
            (0..self.stride as isize).contains(&bx)
                && (0..(self.coded_height + self.border) as isize).contains(&by),
            "({x}, {y}) is outside the padded plane"
        );
        by as usize * self.stride + bx as usize
    }

    /// Writes the frame-edge prediction context: 127 along the row above the
    /// image (corner and right border included) and 129 down the column to
    /// its left.
    pub fn reset_prediction_border(&mut self) {
        let above = (self.border - 1) * self.stride;
        self.data[above..above + self.stride].fill(BORDER_ABOVE);
        for y in 0..self.coded_height {
            let left = self.origin(0, y) - 1;
            self.data[left] = BORDER_LEFT;
        }
    }

    /// Visible samples of row `y`.
    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = self.origin(0, y);
        &self.data[start..start + self.width]
    }

    /// Iterator over the visible rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }
}
