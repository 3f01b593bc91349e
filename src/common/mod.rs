//! Pixel-level kernels shared by every stage of reconstruction

pub mod clip;
pub mod prediction;
/// Inverse DCT and WHT kernels
pub mod transform;
pub mod types;
