use thiserror::Error;

/// Errors returned by the frame-level reconstruction API.
///
/// The kernels themselves never fail; they panic on out-of-bounds access
/// because that can only come from a programming error in the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReconstructError {
    /// Width or height is zero
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Frame is too large for the platform's pointer size or for VP8
    #[error("Image too large")]
    ImageTooLarge,

    /// A macroblock was supplied out of raster order
    #[error("Macroblock ({mbx}, {mby}) out of order, expected ({expected_x}, {expected_y})")]
    MacroblockOutOfOrder {
        /// Column of the supplied macroblock.
        mbx: usize,
        /// Row of the supplied macroblock.
        mby: usize,
        /// Column the frame was waiting for.
        expected_x: usize,
        /// Row the frame was waiting for.
        expected_y: usize,
    },

    /// Every macroblock of the frame has already been reconstructed
    #[error("Frame already complete: all {total} macroblocks reconstructed")]
    FrameComplete {
        /// Macroblocks in the frame.
        total: usize,
    },

    /// Segment ids must be below 4
    #[error("Invalid segment id: {0}")]
    InvalidSegment(u8),

    /// The loop filter or colour conversion ran before every macroblock
    /// was reconstructed
    #[error("Frame incomplete: {reconstructed} of {total} macroblocks reconstructed")]
    IncompleteFrame {
        /// Macroblocks reconstructed so far.
        reconstructed: usize,
        /// Macroblocks in the frame.
        total: usize,
    },

    /// Output buffer is smaller than the converted frame
    #[error("Output buffer too small: need {expected} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes needed.
        expected: usize,
        /// Bytes provided.
        actual: usize,
    },

    /// Reconstruction was cancelled via a [`enough::Stop`] token.
    #[error("Reconstruction cancelled: {0}")]
    Cancelled(enough::StopReason),
}

impl From<enough::StopReason> for ReconstructError {
    fn from(reason: enough::StopReason) -> Self {
        Self::Cancelled(reason)
    }
}
