//! Frame reconstruction on top of the kernels in [`crate::common`]

mod api;
mod filter_params;
mod frame;
/// Scalar loop filter kernels
pub mod loop_filter;
mod plane;
mod yuv;

// Re-export public API
pub use api::ReconstructError;
pub use filter_params::{
    FilterDeltas, FilterParams, FilterType, LoopFilterConfig, SegmentFilterLevels, SegmentMode,
};
pub use frame::{MacroblockData, YuvFrame};
pub use plane::{Plane, MAX_DIMENSION};
pub use yuv::{
    write_bgr, write_rgb, yuv_to_b, yuv_to_bgr, yuv_to_g, yuv_to_r, yuv_to_rgb, PixelLayout,
    UpsamplingMethod,
};
