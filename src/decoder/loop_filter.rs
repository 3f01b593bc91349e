//! Scalar VP8 deblocking kernels.
//!
//! Each kernel works on one position of an edge: `pos` is the first sample
//! past the edge (`q0`) and `step` is the distance between successive taps
//! across the edge, so `p0 = buf[pos - step]`. Filtering a vertical edge
//! uses `step = 1`; a horizontal edge uses `step = stride`.
//!
//! Edge limits are passed as-is; kernels compare against `2 * limit + 1`.

use crate::common::clip::{abs0, clip1, sclip1, sclip2};

/// Orientation of the edge being filtered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeDirection {
    /// A vertical edge between two columns (filtered horizontally).
    Vertical,
    /// A horizontal edge between two rows (filtered vertically).
    Horizontal,
}

impl EdgeDirection {
    /// `(across, along)` sample distances for a plane with `stride`.
    #[inline]
    #[must_use]
    pub fn steps(self, stride: usize) -> (usize, usize) {
        match self {
            Self::Vertical => (1, stride),
            Self::Horizontal => (stride, 1),
        }
    }
}

/// Filter strength applied along an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeFilter {
    /// Two-tap simple filter.
    Simple,
    /// Normal filter on a sub-block edge inside a macroblock.
    Inner,
    /// Normal filter on a macroblock edge.
    Macroblock,
}

#[inline(always)]
fn tap(buf: &[u8], pos: usize, step: usize, k: isize) -> i32 {
    i32::from(buf[pos.wrapping_add_signed(k * step as isize)])
}

/// Simple filter threshold: `4|p0 - q0| + |p1 - q1| <= thresh2`.
#[inline]
pub fn needs_filter(buf: &[u8], pos: usize, step: usize, thresh2: i32) -> bool {
    let p1 = tap(buf, pos, step, -2);
    let p0 = tap(buf, pos, step, -1);
    let q0 = tap(buf, pos, step, 0);
    let q1 = tap(buf, pos, step, 1);
    4 * abs0(p0 - q0) + abs0(p1 - q1) <= thresh2
}

/// Normal filter threshold: the simple test plus six interior differences
/// no larger than `ithresh`.
#[inline]
pub fn needs_filter2(buf: &[u8], pos: usize, step: usize, thresh2: i32, ithresh: i32) -> bool {
    let [p3, p2, p1, p0, q0, q1, q2, q3] =
        core::array::from_fn(|i| tap(buf, pos, step, i as isize - 4));
    if 4 * abs0(p0 - q0) + abs0(p1 - q1) > thresh2 {
        return false;
    }
    abs0(p3 - p2) <= ithresh
        && abs0(p2 - p1) <= ithresh
        && abs0(p1 - p0) <= ithresh
        && abs0(q3 - q2) <= ithresh
        && abs0(q2 - q1) <= ithresh
        && abs0(q1 - q0) <= ithresh
}

/// High edge variance: either flank steps by more than `thresh`.
#[inline]
pub fn hev(buf: &[u8], pos: usize, step: usize, thresh: i32) -> bool {
    let p1 = tap(buf, pos, step, -2);
    let p0 = tap(buf, pos, step, -1);
    let q0 = tap(buf, pos, step, 0);
    let q1 = tap(buf, pos, step, 1);
    abs0(p1 - p0) > thresh || abs0(q1 - q0) > thresh
}

/// Adjusts `p0` and `q0` using the outer taps.
#[inline]
pub fn do_filter2(buf: &mut [u8], pos: usize, step: usize) {
    let p1 = tap(buf, pos, step, -2);
    let p0 = tap(buf, pos, step, -1);
    let q0 = tap(buf, pos, step, 0);
    let q1 = tap(buf, pos, step, 1);
    let a = 3 * (q0 - p0) + sclip1(p1 - q1);
    let a1 = sclip2((a + 4) >> 3);
    let a2 = sclip2((a + 3) >> 3);
    buf[pos - step] = clip1(p0 + a2);
    buf[pos] = clip1(q0 - a1);
}

/// Adjusts `p1..q1` without the outer taps.
#[inline]
pub fn do_filter4(buf: &mut [u8], pos: usize, step: usize) {
    let p1 = tap(buf, pos, step, -2);
    let p0 = tap(buf, pos, step, -1);
    let q0 = tap(buf, pos, step, 0);
    let q1 = tap(buf, pos, step, 1);
    let a = 3 * (q0 - p0);
    let a1 = sclip2((a + 4) >> 3);
    let a2 = sclip2((a + 3) >> 3);
    let a3 = (a1 + 1) >> 1;
    buf[pos - 2 * step] = clip1(p1 + a3);
    buf[pos - step] = clip1(p0 + a2);
    buf[pos] = clip1(q0 - a1);
    buf[pos + step] = clip1(q1 - a3);
}

/// Adjusts `p2..q2`, spreading the correction 27:18:9.
#[inline]
pub fn do_filter6(buf: &mut [u8], pos: usize, step: usize) {
    let p2 = tap(buf, pos, step, -3);
    let p1 = tap(buf, pos, step, -2);
    let p0 = tap(buf, pos, step, -1);
    let q0 = tap(buf, pos, step, 0);
    let q1 = tap(buf, pos, step, 1);
    let q2 = tap(buf, pos, step, 2);
    let a = sclip1(3 * (q0 - p0) + sclip1(p1 - q1));
    // a is in [-128, 127]
    let a1 = (27 * a + 63) >> 7;
    let a2 = (18 * a + 63) >> 7;
    let a3 = (9 * a + 63) >> 7;
    buf[pos - 3 * step] = clip1(p2 + a3);
    buf[pos - 2 * step] = clip1(p1 + a2);
    buf[pos - step] = clip1(p0 + a1);
    buf[pos] = clip1(q0 - a1);
    buf[pos + step] = clip1(q1 - a2);
    buf[pos + 2 * step] = clip1(q2 - a3);
}

/// Filters `len` positions of one edge starting at `pos`.
#[allow(clippy::too_many_arguments)]
pub fn filter_edge(
    buf: &mut [u8],
    pos: usize,
    stride: usize,
    direction: EdgeDirection,
    kind: EdgeFilter,
    len: usize,
    hev_threshold: i32,
    interior_limit: i32,
    edge_limit: i32,
) {
    let (across, along) = direction.steps(stride);
    let thresh2 = 2 * edge_limit + 1;
    for i in 0..len {
        let p = pos + i * along;
        match kind {
            EdgeFilter::Simple => {
                if needs_filter(buf, p, across, thresh2) {
                    do_filter2(buf, p, across);
                }
            }
            EdgeFilter::Inner | EdgeFilter::Macroblock => {
                if !needs_filter2(buf, p, across, thresh2, interior_limit) {
                    continue;
                }
                if hev(buf, p, across, hev_threshold) {
                    do_filter2(buf, p, across);
                } else if kind == EdgeFilter::Macroblock {
                    do_filter6(buf, p, across);
                } else {
                    do_filter4(buf, p, across);
                }
            }
        }
    }
}

/// Simple filter on the luma macroblock edge at `pos`.
pub fn simple_filter16(
    buf: &mut [u8],
    pos: usize,
    stride: usize,
    direction: EdgeDirection,
    edge_limit: i32,
) {
    filter_edge(buf, pos, stride, direction, EdgeFilter::Simple, 16, 0, 0, edge_limit);
}

/// Simple filter on the three luma sub-block edges of the macroblock at `pos`.
pub fn simple_filter16_inner(
    buf: &mut [u8],
    pos: usize,
    stride: usize,
    direction: EdgeDirection,
    edge_limit: i32,
) {
    let (across, _) = direction.steps(stride);
    for k in [4, 8, 12] {
        simple_filter16(buf, pos + k * across, stride, direction, edge_limit);
    }
}

/// Normal filter on the luma macroblock edge at `pos`.
pub fn normal_filter16(
    buf: &mut [u8],
    pos: usize,
    stride: usize,
    direction: EdgeDirection,
    hev_threshold: i32,
    interior_limit: i32,
    edge_limit: i32,
) {
    filter_edge(
        buf,
        pos,
        stride,
        direction,
        EdgeFilter::Macroblock,
        16,
        hev_threshold,
        interior_limit,
        edge_limit,
    );
}

/// Normal filter on the three luma sub-block edges of the macroblock at `pos`.
pub fn normal_filter16_inner(
    buf: &mut [u8],
    pos: usize,
    stride: usize,
    direction: EdgeDirection,
    hev_threshold: i32,
    interior_limit: i32,
    edge_limit: i32,
) {
    let (across, _) = direction.steps(stride);
    for k in [4, 8, 12] {
        filter_edge(
            buf,
            pos + k * across,
            stride,
            direction,
            EdgeFilter::Inner,
            16,
            hev_threshold,
            interior_limit,
            edge_limit,
        );
    }
}

/// Normal filter on the chroma macroblock edge at `pos`, both planes.
#[allow(clippy::too_many_arguments)]
pub fn normal_filter8(
    u: &mut [u8],
    v: &mut [u8],
    pos: usize,
    stride: usize,
    direction: EdgeDirection,
    hev_threshold: i32,
    interior_limit: i32,
    edge_limit: i32,
) {
    for plane in [u, v] {
        filter_edge(
            plane,
            pos,
            stride,
            direction,
            EdgeFilter::Macroblock,
            8,
            hev_threshold,
            interior_limit,
            edge_limit,
        );
    }
}

/// Normal filter on the middle chroma sub-block edge of the macroblock at
/// `pos`, both planes.
#[allow(clippy::too_many_arguments)]
pub fn normal_filter8_inner(
    u: &mut [u8],
    v: &mut [u8],
    pos: usize,
    stride: usize,
    direction: EdgeDirection,
    hev_threshold: i32,
    interior_limit: i32,
    edge_limit: i32,
) {
    let (across, _) = direction.steps(stride);
    for plane in [u, v] {
        filter_edge(
            plane,
            pos + 4 * across,
            stride,
            direction,
            EdgeFilter::Inner,
            8,
            hev_threshold,
            interior_limit,
            edge_limit,
        );
    }
}
