//! Frame-level reconstruction: prediction and residual add per macroblock,
//! then the loop filter over the whole frame.

use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};

use super::api::ReconstructError;
use super::filter_params::{FilterParams, FilterType, LoopFilterConfig};
use super::loop_filter::{
    normal_filter16, normal_filter16_inner, normal_filter8, normal_filter8_inner, simple_filter16,
    simple_filter16_inner, EdgeDirection,
};
use super::plane::{Plane, MAX_DIMENSION};
use crate::common::prediction::{predict_chroma8, predict_luma16, predict_subblock};
use crate::common::transform::{iwht4x4, transform_auto, transform_dc_uv, transform_uv};
use crate::common::types::{ChromaMode, IntraMode, LumaMode};

/// Offset of the U blocks in [`MacroblockData::coeffs`].
const U_COEFFS: usize = 16 * 16;
/// Offset of the V blocks in [`MacroblockData::coeffs`].
const V_COEFFS: usize = 20 * 16;

/// Everything needed to reconstruct one macroblock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroblockData {
    /// Luma prediction mode.
    pub luma_mode: LumaMode,
    /// Per sub-block modes, raster order. Only read when `luma_mode` is
    /// [`LumaMode::B`].
    pub sub_modes: [IntraMode; 16],
    /// Chroma prediction mode.
    pub chroma_mode: ChromaMode,
    /// Segment id, `0..4`.
    pub segment: u8,
    /// Dequantized coefficients: 16 luma blocks, then 4 U and 4 V blocks,
    /// 16 coefficients each in raster order.
    pub coeffs: [i16; 384],
    /// Dequantized second-order luma block. When present (and the luma mode
    /// is not [`LumaMode::B`]) its inverse WHT replaces the DC coefficient of
    /// every luma block.
    pub y2: Option<[i16; 16]>,
}

impl Default for MacroblockData {
    fn default() -> Self {
        Self {
            luma_mode: LumaMode::default(),
            sub_modes: [IntraMode::default(); 16],
            chroma_mode: ChromaMode::default(),
            segment: 0,
            coeffs: [0; 384],
            y2: None,
        }
    }
}

impl MacroblockData {
    /// A macroblock with the given modes and no residual.
    #[must_use]
    pub fn new(luma_mode: LumaMode, chroma_mode: ChromaMode) -> Self {
        Self {
            luma_mode,
            chroma_mode,
            ..Self::default()
        }
    }

    /// Coefficients as seen by the transforms, with the Y2 block folded in.
    fn effective_coeffs(&self) -> [i16; 384] {
        let mut coeffs = self.coeffs;
        if self.luma_mode != LumaMode::B {
            if let Some(y2) = &self.y2 {
                let mut dc = y2.map(i32::from);
                iwht4x4(&mut dc);
                for (i, &v) in dc.iter().enumerate() {
                    coeffs[i * 16] = v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
                }
            }
        }
        coeffs
    }
}

/// A frame being reconstructed into padded Y, U and V planes.
///
/// Macroblocks are fed in raster order with
/// [`reconstruct_macroblock`](Self::reconstruct_macroblock); prediction
/// reads the unfiltered neighbours. Once every macroblock is in place,
/// [`apply_loop_filter`](Self::apply_loop_filter) deblocks the frame.
#[derive(Clone, Debug)]
pub struct YuvFrame {
    y: Plane,
    u: Plane,
    v: Plane,
    mb_width: usize,
    mb_height: usize,
    filter: LoopFilterConfig,
    params: Vec<FilterParams>,
    next_mb: usize,
    filtered: bool,
}

impl YuvFrame {
    /// Allocates a frame of `width`x`height` luma samples.
    pub fn new(width: u32, height: u32, filter: LoopFilterConfig) -> Result<Self, ReconstructError> {
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ReconstructError::ImageTooLarge);
        }
        let y = Plane::new(width, height, 16)?;
        let u = Plane::new(width.div_ceil(2), height.div_ceil(2), 8)?;
        let v = u.clone();
        let mb_width = y.coded_width() / 16;
        let mb_height = y.coded_height() / 16;

        debug!(
            "allocated {width}x{height} frame ({mb_width}x{mb_height} macroblocks, {:?} filter level {})",
            filter.filter_type, filter.level
        );

        let mut frame = Self {
            y,
            u,
            v,
            mb_width,
            mb_height,
            filter,
            params: vec![FilterParams::default(); mb_width * mb_height],
            next_mb: 0,
            filtered: false,
        };
        frame.reset();
        Ok(frame)
    }

    /// Restarts reconstruction, keeping the allocation.
    pub fn reset(&mut self) {
        for plane in [&mut self.y, &mut self.u, &mut self.v] {
            plane.reset_prediction_border();
        }
        self.params.fill(FilterParams::default());
        self.next_mb = 0;
        self.filtered = false;
    }

    /// Luma plane.
    #[must_use]
    pub fn y(&self) -> &Plane {
        &self.y
    }

    /// Blue-difference chroma plane.
    #[must_use]
    pub fn u(&self) -> &Plane {
        &self.u
    }

    /// Red-difference chroma plane.
    #[must_use]
    pub fn v(&self) -> &Plane {
        &self.v
    }

    /// Visible width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.y.width()
    }

    /// Visible height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.y.height()
    }

    /// Macroblock columns.
    #[must_use]
    pub fn mb_width(&self) -> usize {
        self.mb_width
    }

    /// Macroblock rows.
    #[must_use]
    pub fn mb_height(&self) -> usize {
        self.mb_height
    }

    /// Loop filter settings of the frame.
    #[must_use]
    pub fn filter_config(&self) -> &LoopFilterConfig {
        &self.filter
    }

    /// Whether every macroblock has been reconstructed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_mb == self.mb_width * self.mb_height
    }

    pub(crate) fn ensure_complete(&self) -> Result<(), ReconstructError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ReconstructError::IncompleteFrame {
                reconstructed: self.next_mb,
                total: self.mb_width * self.mb_height,
            })
        }
    }

    /// Predicts macroblock `(mbx, mby)` and adds its residual.
    ///
    /// Macroblocks must arrive in raster order.
    pub fn reconstruct_macroblock(
        &mut self,
        mbx: usize,
        mby: usize,
        mb: &MacroblockData,
    ) -> Result<(), ReconstructError> {
        if self.is_complete() {
            return Err(ReconstructError::FrameComplete {
                total: self.mb_width * self.mb_height,
            });
        }
        let expected_x = self.next_mb % self.mb_width;
        let expected_y = self.next_mb / self.mb_width;
        if (mbx, mby) != (expected_x, expected_y) {
            return Err(ReconstructError::MacroblockOutOfOrder {
                mbx,
                mby,
                expected_x,
                expected_y,
            });
        }
        if mb.segment >= 4 {
            return Err(ReconstructError::InvalidSegment(mb.segment));
        }
        if mbx == 0 {
            trace!("reconstructing macroblock row {mby}");
        }

        let coeffs = mb.effective_coeffs();
        self.reconstruct_luma(mbx, mby, mb, &coeffs);
        self.reconstruct_chroma(mbx, mby, mb.chroma_mode, &coeffs);

        let has_coeffs = coeffs.iter().any(|&c| c != 0);
        self.params[self.next_mb] = self.filter.params_for(mb.segment, mb.luma_mode, has_coeffs);
        self.next_mb += 1;
        Ok(())
    }

    fn reconstruct_luma(&mut self, mbx: usize, mby: usize, mb: &MacroblockData, coeffs: &[i16; 384]) {
        let stride = self.y.stride();
        let border = self.y.border();
        let x0 = border + mbx * 16;
        let y0 = border + mby * 16;
        let last_column = mbx + 1 == self.mb_width;
        let buf = self.y.data_mut();

        if mb.luma_mode == LumaMode::B {
            let above_right = (y0 - 1) * stride + x0 + 16;
            if mby > 0 && last_column {
                let v = buf[above_right - 1];
                buf[above_right..above_right + 4].fill(v);
            }
            // the sub-blocks on the right edge all see the macroblock's
            // above-right samples
            for row in [3, 7, 11] {
                let dst = (y0 + row) * stride + x0 + 16;
                buf.copy_within(above_right..above_right + 4, dst);
            }

            for (i, &mode) in mb.sub_modes.iter().enumerate() {
                let bx = x0 + (i % 4) * 4;
                let by = y0 + (i / 4) * 4;
                predict_subblock(buf, mode, bx, by, stride);
                transform_auto(&coeffs[i * 16..], buf, by * stride + bx, stride);
            }
        } else {
            predict_luma16(buf, mb.luma_mode, x0, y0, stride, mby > 0, mbx > 0);
            for i in 0..16 {
                let pos = (y0 + (i / 4) * 4) * stride + x0 + (i % 4) * 4;
                transform_auto(&coeffs[i * 16..], buf, pos, stride);
            }
        }
    }

    fn reconstruct_chroma(&mut self, mbx: usize, mby: usize, mode: ChromaMode, coeffs: &[i16; 384]) {
        let stride = self.u.stride();
        let border = self.u.border();
        let x0 = border + mbx * 8;
        let y0 = border + mby * 8;
        let pos = y0 * stride + x0;

        for (plane, offset) in [(&mut self.u, U_COEFFS), (&mut self.v, V_COEFFS)] {
            let buf = plane.data_mut();
            predict_chroma8(buf, mode, x0, y0, stride, mby > 0, mbx > 0);

            let blocks = &coeffs[offset..offset + 64];
            let has_ac = blocks
                .chunks_exact(16)
                .any(|block| block[1..].iter().any(|&c| c != 0));
            if has_ac {
                transform_uv(blocks, buf, pos, stride);
            } else {
                transform_dc_uv(blocks, buf, pos, stride);
            }
        }
    }

    /// Runs the loop filter over the whole frame in raster order.
    ///
    /// Every macroblock must have been reconstructed first. Calling this
    /// again on an already filtered frame does nothing.
    pub fn apply_loop_filter(&mut self, stop: &dyn enough::Stop) -> Result<(), ReconstructError> {
        self.ensure_complete()?;
        if self.filtered {
            return Ok(());
        }
        if self.filter.level == 0 {
            debug!("loop filter disabled");
            self.filtered = true;
            return Ok(());
        }

        debug!("loop filter pass ({:?})", self.filter.filter_type);
        for mby in 0..self.mb_height {
            stop.check()?;
            trace!("filtering macroblock row {mby}");
            for mbx in 0..self.mb_width {
                let params = self.params[mby * self.mb_width + mbx];
                if !params.is_enabled() {
                    continue;
                }
                match self.filter.filter_type {
                    FilterType::Simple => self.filter_simple(mbx, mby, params),
                    FilterType::Normal => self.filter_normal(mbx, mby, params),
                }
            }
        }
        self.filtered = true;
        debug!("loop filter pass finished");
        Ok(())
    }

    fn filter_simple(&mut self, mbx: usize, mby: usize, params: FilterParams) {
        let stride = self.y.stride();
        let pos = self.y.origin(mbx * 16, mby * 16);
        let limit = i32::from(params.limit);
        let mb_limit = params.macroblock_limit();
        let buf = self.y.data_mut();

        if mbx > 0 {
            simple_filter16(buf, pos, stride, EdgeDirection::Vertical, mb_limit);
        }
        if params.inner {
            simple_filter16_inner(buf, pos, stride, EdgeDirection::Vertical, limit);
        }
        if mby > 0 {
            simple_filter16(buf, pos, stride, EdgeDirection::Horizontal, mb_limit);
        }
        if params.inner {
            simple_filter16_inner(buf, pos, stride, EdgeDirection::Horizontal, limit);
        }
    }

    fn filter_normal(&mut self, mbx: usize, mby: usize, params: FilterParams) {
        let y_stride = self.y.stride();
        let y_pos = self.y.origin(mbx * 16, mby * 16);
        let uv_stride = self.u.stride();
        let uv_pos = self.u.origin(mbx * 8, mby * 8);

        let hev = i32::from(params.hev_threshold);
        let interior = i32::from(params.interior_limit);
        let limit = i32::from(params.limit);
        let mb_limit = params.macroblock_limit();

        let y = self.y.data_mut();
        let u = self.u.data_mut();
        let v = self.v.data_mut();

        for direction in [EdgeDirection::Vertical, EdgeDirection::Horizontal] {
            let on_frame_edge = match direction {
                EdgeDirection::Vertical => mbx == 0,
                EdgeDirection::Horizontal => mby == 0,
            };
            if !on_frame_edge {
                normal_filter16(y, y_pos, y_stride, direction, hev, interior, mb_limit);
                normal_filter8(u, v, uv_pos, uv_stride, direction, hev, interior, mb_limit);
            }
            if params.inner {
                normal_filter16_inner(y, y_pos, y_stride, direction, hev, interior, limit);
                normal_filter8_inner(u, v, uv_pos, uv_stride, direction, hev, interior, limit);
            }
        }
    }

    /// Reconstructs a whole frame from macroblocks in raster order, then
    /// runs the loop filter.
    pub fn reconstruct_all(
        &mut self,
        macroblocks: &[MacroblockData],
        stop: &dyn enough::Stop,
    ) -> Result<(), ReconstructError> {
        for (i, mb) in macroblocks.iter().enumerate() {
            let (mbx, mby) = (i % self.mb_width, i / self.mb_width);
            if mbx == 0 {
                stop.check()?;
            }
            self.reconstruct_macroblock(mbx, mby, mb)?;
        }
        self.apply_loop_filter(stop)
    }
}
