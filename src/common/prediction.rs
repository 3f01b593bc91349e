//! Intra predictors.
//!
//! All predictors write a block into a padded plane in place. `(x0, y0)` is
//! the top-left sample of the block being predicted; the row at `y0 - 1`
//! and the column at `x0 - 1` must already hold reconstructed (or border)
//! samples. 4x4 predictors additionally read four samples above-right.
//!
//! Neighbour naming for the 4x4 modes follows the usual VP8 diagram:
//!
//! ```text
//!  X | A B C D E F G H
//! ---+----------------
//!  I | . . . .
//!  J | . . . .
//!  K | . . . .
//!  L | . . . .
//! ```

use super::clip::{avg2, avg3, clip8};
use super::types::{ChromaMode, IntraMode, LumaMode};

/// Replicates the row above into the `size`x`size` block.
pub fn predict_vertical(buf: &mut [u8], size: usize, x0: usize, y0: usize, stride: usize) {
    let (above, rows) = buf.split_at_mut(y0 * stride);
    let top = &above[(y0 - 1) * stride + x0..][..size];
    for row in rows.chunks_mut(stride).take(size) {
        row[x0..x0 + size].copy_from_slice(top);
    }
}

/// Replicates the left column into the `size`x`size` block.
pub fn predict_horizontal(buf: &mut [u8], size: usize, x0: usize, y0: usize, stride: usize) {
    for row in buf.chunks_mut(stride).skip(y0).take(size) {
        let left = row[x0 - 1];
        row[x0..x0 + size].fill(left);
    }
}

/// DC prediction for 16x16 luma or 8x8 chroma blocks.
///
/// `above` and `left` say whether the neighbouring row or column lies
/// inside the frame. Missing sides are left out of the average; with
/// neither side the block is filled with 128.
pub fn predict_dc(
    buf: &mut [u8],
    size: usize,
    x0: usize,
    y0: usize,
    stride: usize,
    above: bool,
    left: bool,
) {
    debug_assert!(size == 8 || size == 16);
    // log2(size) - 1
    let mut shift = if size == 8 { 2u32 } else { 3u32 };
    let mut sum = 0u32;

    if above {
        let top = &buf[(y0 - 1) * stride + x0..][..size];
        sum += top.iter().map(|&v| u32::from(v)).sum::<u32>();
        shift += 1;
    }
    if left {
        sum += (0..size)
            .map(|y| u32::from(buf[(y0 + y) * stride + x0 - 1]))
            .sum::<u32>();
        shift += 1;
    }

    let dc = if above || left {
        ((sum + (1 << (shift - 1))) >> shift) as u8
    } else {
        0x80
    };

    for row in buf.chunks_mut(stride).skip(y0).take(size) {
        row[x0..x0 + size].fill(dc);
    }
}

/// TrueMotion: `clip8(L[y] + A[x] - X)`, for blocks of size 4, 8 or 16.
pub fn predict_true_motion(buf: &mut [u8], size: usize, x0: usize, y0: usize, stride: usize) {
    let corner_pos = (y0 - 1) * stride + x0 - 1;
    let corner = i32::from(buf[corner_pos]);

    let (above, rows) = buf.split_at_mut(y0 * stride);
    let top = &above[corner_pos + 1..][..size];
    for row in rows.chunks_mut(stride).take(size) {
        let delta = i32::from(row[x0 - 1]) - corner;
        for (out, &a) in row[x0..x0 + size].iter_mut().zip(top) {
            *out = clip8(delta + i32::from(a));
        }
    }
}

/// The 13 neighbours of a 4x4 block.
struct Edge {
    corner: u8,
    top: [u8; 8],
    left: [u8; 4],
}

impl Edge {
    fn gather(buf: &[u8], x0: usize, y0: usize, stride: usize) -> Self {
        let above = (y0 - 1) * stride + x0;
        let mut top = [0u8; 8];
        top.copy_from_slice(&buf[above..above + 8]);
        let left = core::array::from_fn(|y| buf[(y0 + y) * stride + x0 - 1]);
        Self {
            corner: buf[above - 1],
            top,
            left,
        }
    }

    /// `L K J I X A B C D`, bottom-left to top-right.
    fn perimeter(&self) -> [u8; 9] {
        let [i, j, k, l] = self.left;
        let [a, b, c, d, ..] = self.top;
        [l, k, j, i, self.corner, a, b, c, d]
    }
}

fn put4(buf: &mut [u8], x0: usize, y0: usize, stride: usize, block: &[[u8; 4]; 4]) {
    for (y, row) in block.iter().enumerate() {
        let pos = (y0 + y) * stride + x0;
        buf[pos..pos + 4].copy_from_slice(row);
    }
}

/// 4x4 DC: rounded mean of `A..D` and `I..L`.
pub fn predict_b_dc(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let e = Edge::gather(buf, x0, y0, stride);
    let sum = e.top[..4]
        .iter()
        .chain(&e.left)
        .map(|&v| u32::from(v))
        .sum::<u32>();
    let dc = ((sum + 4) >> 3) as u8;
    put4(buf, x0, y0, stride, &[[dc; 4]; 4]);
}

/// 4x4 vertical, smoothed along the top edge.
pub fn predict_b_ve(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let edge = Edge::gather(buf, x0, y0, stride);
    let [a, b, c, d, e, ..] = edge.top;
    let row = [
        avg3(edge.corner, a, b),
        avg3(a, b, c),
        avg3(b, c, d),
        avg3(c, d, e),
    ];
    put4(buf, x0, y0, stride, &[row; 4]);
}

/// 4x4 horizontal, smoothed along the left edge.
pub fn predict_b_he(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let e = Edge::gather(buf, x0, y0, stride);
    let [i, j, k, l] = e.left;
    let rows = [
        avg3(e.corner, i, j),
        avg3(i, j, k),
        avg3(j, k, l),
        avg3(k, l, l),
    ];
    put4(buf, x0, y0, stride, &rows.map(|v| [v; 4]));
}

/// 4x4 diagonal down-left, from `A..H`.
pub fn predict_b_ld(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let e = Edge::gather(buf, x0, y0, stride);
    let t = e.top;
    let diag: [u8; 7] = core::array::from_fn(|n| avg3(t[n], t[n + 1], t[(n + 2).min(7)]));
    let block = core::array::from_fn(|y| core::array::from_fn(|x| diag[x + y]));
    put4(buf, x0, y0, stride, &block);
}

/// 4x4 diagonal down-right, from `L..I X A..D`.
pub fn predict_b_rd(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let p = Edge::gather(buf, x0, y0, stride).perimeter();
    let diag: [u8; 7] = core::array::from_fn(|n| avg3(p[n], p[n + 1], p[n + 2]));
    let block = core::array::from_fn(|y| core::array::from_fn(|x| diag[3 + x - y]));
    put4(buf, x0, y0, stride, &block);
}

/// 4x4 vertical-right.
pub fn predict_b_vr(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let e = Edge::gather(buf, x0, y0, stride);
    let x = e.corner;
    let [i, j, k, _] = e.left;
    let [a, b, c, d, ..] = e.top;

    let mut out = [[0u8; 4]; 4];
    out[0][0] = avg2(x, a);
    out[2][1] = out[0][0];
    out[0][1] = avg2(a, b);
    out[2][2] = out[0][1];
    out[0][2] = avg2(b, c);
    out[2][3] = out[0][2];
    out[0][3] = avg2(c, d);

    out[3][0] = avg3(k, j, i);
    out[2][0] = avg3(j, i, x);
    out[1][0] = avg3(i, x, a);
    out[3][1] = out[1][0];
    out[1][1] = avg3(x, a, b);
    out[3][2] = out[1][1];
    out[1][2] = avg3(a, b, c);
    out[3][3] = out[1][2];
    out[1][3] = avg3(b, c, d);

    put4(buf, x0, y0, stride, &out);
}

/// 4x4 vertical-left, from `A..H`.
pub fn predict_b_vl(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let edge = Edge::gather(buf, x0, y0, stride);
    let [a, b, c, d, e, f, g, h] = edge.top;

    let mut out = [[0u8; 4]; 4];
    out[0][0] = avg2(a, b);
    out[0][1] = avg2(b, c);
    out[2][0] = out[0][1];
    out[0][2] = avg2(c, d);
    out[2][1] = out[0][2];
    out[0][3] = avg2(d, e);
    out[2][2] = out[0][3];

    out[1][0] = avg3(a, b, c);
    out[1][1] = avg3(b, c, d);
    out[3][0] = out[1][1];
    out[1][2] = avg3(c, d, e);
    out[3][1] = out[1][2];
    out[1][3] = avg3(d, e, f);
    out[3][2] = out[1][3];
    // the two bottom-right samples break the pattern
    out[2][3] = avg3(e, f, g);
    out[3][3] = avg3(f, g, h);

    put4(buf, x0, y0, stride, &out);
}

/// 4x4 horizontal-down.
pub fn predict_b_hd(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let e = Edge::gather(buf, x0, y0, stride);
    let x = e.corner;
    let [i, j, k, l] = e.left;
    let [a, b, c, ..] = e.top;

    let mut out = [[0u8; 4]; 4];
    out[0][0] = avg2(i, x);
    out[1][2] = out[0][0];
    out[1][0] = avg2(j, i);
    out[2][2] = out[1][0];
    out[2][0] = avg2(k, j);
    out[3][2] = out[2][0];
    out[3][0] = avg2(l, k);

    out[0][3] = avg3(a, b, c);
    out[0][2] = avg3(x, a, b);
    out[0][1] = avg3(i, x, a);
    out[1][3] = out[0][1];
    out[1][1] = avg3(j, i, x);
    out[2][3] = out[1][1];
    out[2][1] = avg3(k, j, i);
    out[3][3] = out[2][1];
    out[3][1] = avg3(l, k, j);

    put4(buf, x0, y0, stride, &out);
}

/// 4x4 horizontal-up, from `I..L` only.
pub fn predict_b_hu(buf: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let e = Edge::gather(buf, x0, y0, stride);
    let [i, j, k, l] = e.left;

    let mut out = [[l; 4]; 4];
    out[0][0] = avg2(i, j);
    out[0][2] = avg2(j, k);
    out[1][0] = out[0][2];
    out[1][2] = avg2(k, l);
    out[2][0] = out[1][2];
    out[0][1] = avg3(i, j, k);
    out[0][3] = avg3(j, k, l);
    out[1][1] = out[0][3];
    out[1][3] = avg3(k, l, l);
    out[2][1] = out[1][3];

    put4(buf, x0, y0, stride, &out);
}

/// Predicts a 16x16 luma block. [`LumaMode::B`] is predicted per sub-block
/// by [`predict_subblock`] and is a no-op here.
pub fn predict_luma16(
    buf: &mut [u8],
    mode: LumaMode,
    x0: usize,
    y0: usize,
    stride: usize,
    above: bool,
    left: bool,
) {
    match mode {
        LumaMode::DC => predict_dc(buf, 16, x0, y0, stride, above, left),
        LumaMode::V => predict_vertical(buf, 16, x0, y0, stride),
        LumaMode::H => predict_horizontal(buf, 16, x0, y0, stride),
        LumaMode::TM => predict_true_motion(buf, 16, x0, y0, stride),
        LumaMode::B => {}
    }
}

/// Predicts one 8x8 chroma block.
pub fn predict_chroma8(
    buf: &mut [u8],
    mode: ChromaMode,
    x0: usize,
    y0: usize,
    stride: usize,
    above: bool,
    left: bool,
) {
    match mode {
        ChromaMode::DC => predict_dc(buf, 8, x0, y0, stride, above, left),
        ChromaMode::V => predict_vertical(buf, 8, x0, y0, stride),
        ChromaMode::H => predict_horizontal(buf, 8, x0, y0, stride),
        ChromaMode::TM => predict_true_motion(buf, 8, x0, y0, stride),
    }
}

/// Predicts one 4x4 luma sub-block.
pub fn predict_subblock(buf: &mut [u8], mode: IntraMode, x0: usize, y0: usize, stride: usize) {
    match mode {
        IntraMode::DC => predict_b_dc(buf, x0, y0, stride),
        IntraMode::TM => predict_true_motion(buf, 4, x0, y0, stride),
        IntraMode::VE => predict_b_ve(buf, x0, y0, stride),
        IntraMode::HE => predict_b_he(buf, x0, y0, stride),
        IntraMode::LD => predict_b_ld(buf, x0, y0, stride),
        IntraMode::RD => predict_b_rd(buf, x0, y0, stride),
        IntraMode::VR => predict_b_vr(buf, x0, y0, stride),
        IntraMode::VL => predict_b_vl(buf, x0, y0, stride),
        IntraMode::HD => predict_b_hd(buf, x0, y0, stride),
        IntraMode::HU => predict_b_hu(buf, x0, y0, stride),
    }
}
