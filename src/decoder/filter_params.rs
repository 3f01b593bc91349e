//! Loop filter configuration and per-macroblock filter strength.
//!
//! The values here come from the VP8 frame header; this crate does not parse
//! it, so callers fill in a [`LoopFilterConfig`] themselves.

use crate::common::types::LumaMode;

/// Which loop filter family the frame uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Luma-only two-tap filter.
    Simple,
    /// Full filter on luma and chroma.
    #[default]
    Normal,
}

/// How per-segment filter levels combine with the frame level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentMode {
    /// Segment levels replace the frame level.
    Absolute,
    /// Segment levels are added to the frame level.
    #[default]
    Delta,
}

/// Per-segment filter levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentFilterLevels {
    /// Whether `levels` replace or adjust the frame level.
    pub mode: SegmentMode,
    /// One level (or delta) per segment id.
    pub levels: [i8; 4],
}

/// Loop filter adjustments for intra frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterDeltas {
    /// Delta for the intra reference frame, applied to every macroblock.
    pub ref_frame: i8,
    /// Additional delta for macroblocks predicted with [`LumaMode::B`].
    pub mode_b: i8,
}

/// Loop filter settings for one frame.
///
/// # Example
///
/// ```rust
/// use zenvp8::{FilterType, LoopFilterConfig};
///
/// let config = LoopFilterConfig::new()
///     .filter_type(FilterType::Simple)
///     .level(32)
///     .sharpness(2);
/// assert_eq!(config.level, 32);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct LoopFilterConfig {
    /// Filter family.
    pub filter_type: FilterType,
    /// Frame filter level, `0..=63`. Zero disables filtering.
    pub level: u8,
    /// Sharpness, `0..=7`.
    pub sharpness: u8,
    /// Segment-based level adjustments, if segmentation is on.
    pub segments: Option<SegmentFilterLevels>,
    /// Reference frame and mode adjustments, if enabled.
    pub deltas: Option<FilterDeltas>,
}

/// Thresholds used to filter the edges of one macroblock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterParams {
    /// Sub-block edge limit, `2 * level + interior_limit`. Zero means the
    /// macroblock is not filtered.
    pub limit: u8,
    /// Limit on the interior differences of the normal filter.
    pub interior_limit: u8,
    /// High edge variance threshold.
    pub hev_threshold: u8,
    /// Whether the sub-block edges inside the macroblock are filtered.
    pub inner: bool,
}

impl FilterParams {
    /// Whether any edge of the macroblock is filtered.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.limit != 0
    }

    /// Limit for the macroblock's left and top edges.
    #[must_use]
    pub fn macroblock_limit(&self) -> i32 {
        i32::from(self.limit) + 4
    }
}

impl LoopFilterConfig {
    /// A disabled filter (level 0).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter family.
    #[must_use]
    pub fn filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    /// Set the frame filter level. Values above 63 are clamped.
    #[must_use]
    pub fn level(mut self, level: u8) -> Self {
        self.level = level.min(63);
        self
    }

    /// Set the sharpness. Values above 7 are clamped.
    #[must_use]
    pub fn sharpness(mut self, sharpness: u8) -> Self {
        self.sharpness = sharpness.min(7);
        self
    }

    /// Enable segment-based levels.
    #[must_use]
    pub fn segments(mut self, segments: SegmentFilterLevels) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Enable reference frame and mode adjustments.
    #[must_use]
    pub fn deltas(mut self, deltas: FilterDeltas) -> Self {
        self.deltas = Some(deltas);
        self
    }

    /// Computes the filter strength of one macroblock.
    ///
    /// # Panics
    ///
    /// Panics if `segment` is not below 4.
    #[must_use]
    pub fn params_for(&self, segment: u8, luma_mode: LumaMode, has_coeffs: bool) -> FilterParams {
        // if frame level filter level is 0, we must skip loop filter
        if self.level == 0 {
            return FilterParams::default();
        }

        let mut level = i32::from(self.level);
        if let Some(segments) = &self.segments {
            let value = i32::from(segments.levels[usize::from(segment)]);
            level = match segments.mode {
                SegmentMode::Absolute => value,
                SegmentMode::Delta => level + value,
            };
        }
        level = level.clamp(0, 63);

        if let Some(deltas) = &self.deltas {
            level += i32::from(deltas.ref_frame);
            if luma_mode == LumaMode::B {
                level += i32::from(deltas.mode_b);
            }
            level = level.clamp(0, 63);
        }

        if level == 0 {
            return FilterParams::default();
        }

        let sharpness = i32::from(self.sharpness);
        let mut interior_limit = level;
        if sharpness > 0 {
            interior_limit >>= if sharpness > 4 { 2 } else { 1 };
            interior_limit = interior_limit.min(9 - sharpness);
        }
        let interior_limit = interior_limit.max(1);

        let hev_threshold = if level >= 40 {
            2
        } else if level >= 15 {
            1
        } else {
            0
        };

        FilterParams {
            limit: (2 * level + interior_limit) as u8,
            interior_limit: interior_limit as u8,
            hev_threshold,
            inner: luma_mode == LumaMode::B || has_coeffs,
        }
    }
}
