//! Bit-exact VP8 lossy macroblock reconstruction
//!
//! This crate turns already-parsed VP8 macroblocks (prediction modes plus
//! dequantized coefficients) into pixels, matching libwebp sample for
//! sample. Bitstream parsing and entropy decoding are out of scope.
//!
//! The pipeline is:
//!
//! 1. [`YuvFrame::reconstruct_macroblock`] predicts each macroblock from its
//!    already reconstructed neighbours and adds the inverse-transformed
//!    residual.
//! 2. [`YuvFrame::apply_loop_filter`] deblocks the finished frame.
//!    [`YuvFrame::reconstruct_all`] runs both steps over a slice of
//!    macroblocks.
//! 3. [`YuvFrame::fill_rgb`] converts it to packed RGB(A) or BGR(A).
//!
//! The kernels behind these steps are public in [`common`] and
//! [`decoder::loop_filter`] for callers that manage their own buffers.
//!
//! # Features
//!
//! - `std` (default): Enable standard library support. Without it the crate
//!   is `no_std` and needs only `alloc`.
//!
//! # Example
//!
//! ```rust
//! use zenvp8::{
//!     LoopFilterConfig, LumaMode, ChromaMode, MacroblockData, PixelLayout, Unstoppable,
//!     UpsamplingMethod, YuvFrame,
//! };
//!
//! let mut frame = YuvFrame::new(32, 16, LoopFilterConfig::new().level(20))?;
//! let mb = MacroblockData::new(LumaMode::DC, ChromaMode::DC);
//! frame.reconstruct_all(&[mb.clone(), mb], &Unstoppable)?;
//!
//! let mut rgb = vec![0u8; frame.rgb_len(PixelLayout::Rgb)];
//! frame.fill_rgb(&mut rgb, PixelLayout::Rgb, UpsamplingMethod::Bilinear)?;
//! assert!(rgb.iter().all(|&c| c == 130));
//! # Ok::<(), zenvp8::ReconstructError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

// Core modules
pub mod common;
pub mod decoder;

pub use common::types::{ChromaMode, IntraMode, LumaMode};

// Re-export decoder public API
pub use decoder::{
    FilterDeltas, FilterParams, FilterType, LoopFilterConfig, MacroblockData, PixelLayout, Plane,
    ReconstructError, SegmentFilterLevels, SegmentMode, UpsamplingMethod, YuvFrame,
    MAX_DIMENSION,
};

// Re-export cooperative cancellation types
pub use enough::{Stop, StopReason, Unstoppable};
