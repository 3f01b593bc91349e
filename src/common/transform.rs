//! Inverse transforms that add a residual into already-predicted samples.
//!
//! Every entry point takes dequantized coefficients in raster order and a
//! destination position inside a padded plane. Results are added to the
//! existing samples and saturated, never stored over them.

use super::clip::{clip8, mul1, mul2};

#[inline(always)]
fn store(buf: &mut [u8], idx: usize, v: i32) {
    buf[idx] = clip8(i32::from(buf[idx]) + (v >> 3));
}

/// Full two-pass inverse DCT of one 4x4 block.
pub fn transform_one(coeffs: &[i16], buf: &mut [u8], pos: usize, stride: usize) {
    // Perform one length check up front to avoid subsequent bounds checks in this function
    assert!(coeffs.len() >= 16);
    assert!(buf.len() >= pos + 3 * stride + 4);

    let c = |i: usize| i32::from(coeffs[i]);

    // vertical pass, stored transposed
    let mut tmp = [0i32; 16];
    for i in 0..4 {
        let a = c(i) + c(8 + i);
        let b = c(i) - c(8 + i);
        let cc = mul2(c(4 + i)) - mul1(c(12 + i));
        let d = mul1(c(4 + i)) + mul2(c(12 + i));
        tmp[4 * i] = a + d;
        tmp[4 * i + 1] = b + cc;
        tmp[4 * i + 2] = b - cc;
        tmp[4 * i + 3] = a - d;
    }

    // horizontal pass
    for i in 0..4 {
        let dc = tmp[i] + 4;
        let a = dc + tmp[8 + i];
        let b = dc - tmp[8 + i];
        let cc = mul2(tmp[4 + i]) - mul1(tmp[12 + i]);
        let d = mul1(tmp[4 + i]) + mul2(tmp[12 + i]);
        let row = pos + i * stride;
        store(buf, row, a + d);
        store(buf, row + 1, b + cc);
        store(buf, row + 2, b - cc);
        store(buf, row + 3, a - d);
    }
}

/// Full inverse transform of one block, or of two horizontally adjacent
/// blocks when `two` is set (the second reads `coeffs[16..32]` and lands at
/// `pos + 4`).
pub fn transform(coeffs: &[i16], buf: &mut [u8], pos: usize, stride: usize, two: bool) {
    transform_one(coeffs, buf, pos, stride);
    if two {
        transform_one(&coeffs[16..], buf, pos + 4, stride);
    }
}

/// Block with only a DC coefficient: adds `(coeffs[0] + 4) >> 3` everywhere.
pub fn transform_dc(coeffs: &[i16], buf: &mut [u8], pos: usize, stride: usize) {
    let dc = i32::from(coeffs[0]) + 4;
    for y in 0..4 {
        let row = pos + y * stride;
        for idx in row..row + 4 {
            store(buf, idx, dc);
        }
    }
}

/// Block whose only non-zero coefficients are 0, 1 and 4.
pub fn transform_ac3(coeffs: &[i16], buf: &mut [u8], pos: usize, stride: usize) {
    let a = i32::from(coeffs[0]) + 4;
    let c4 = mul2(i32::from(coeffs[4]));
    let d4 = mul1(i32::from(coeffs[4]));
    let c1 = mul2(i32::from(coeffs[1]));
    let d1 = mul1(i32::from(coeffs[1]));

    for (y, dc) in [a + d4, a + c4, a - c4, a - d4].into_iter().enumerate() {
        let row = pos + y * stride;
        store(buf, row, dc + d1);
        store(buf, row + 1, dc + c1);
        store(buf, row + 2, dc - c1);
        store(buf, row + 3, dc - d1);
    }
}

/// The four 4x4 blocks of one 8x8 chroma block (`coeffs[0..64]`).
pub fn transform_uv(coeffs: &[i16], buf: &mut [u8], pos: usize, stride: usize) {
    transform(coeffs, buf, pos, stride, true);
    transform(&coeffs[32..], buf, pos + 4 * stride, stride, true);
}

/// DC-only variant of [`transform_uv`]; sub-blocks with a zero DC are skipped.
pub fn transform_dc_uv(coeffs: &[i16], buf: &mut [u8], pos: usize, stride: usize) {
    let offsets = [0, 4, 4 * stride, 4 * stride + 4];
    for (n, offset) in offsets.into_iter().enumerate() {
        if coeffs[16 * n] != 0 {
            transform_dc(&coeffs[16 * n..], buf, pos + offset, stride);
        }
    }
}

/// Picks the cheapest exact path for one block's coefficient pattern.
pub fn transform_auto(coeffs: &[i16], buf: &mut [u8], pos: usize, stride: usize) {
    let block = &coeffs[..16];
    let ac_mask = block
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(_, &c)| c != 0)
        .fold(0u16, |mask, (i, _)| mask | (1 << i));

    if ac_mask == 0 {
        if block[0] != 0 {
            transform_dc(block, buf, pos, stride);
        }
    } else if ac_mask & !((1 << 1) | (1 << 4)) == 0 {
        transform_ac3(block, buf, pos, stride);
    } else {
        transform_one(block, buf, pos, stride);
    }
}

// 14.3 inverse walsh-hadamard transform, used in decoding
/// Inverse WHT of the second-order luma block. Output `i` is the DC
/// coefficient of luma sub-block `i`.
pub fn iwht4x4(block: &mut [i32; 16]) {
    for i in 0usize..4 {
        let a1 = block[i] + block[12 + i];
        let b1 = block[4 + i] + block[8 + i];
        let c1 = block[4 + i] - block[8 + i];
        let d1 = block[i] - block[12 + i];

        block[i] = a1 + b1;
        block[4 + i] = c1 + d1;
        block[8 + i] = a1 - b1;
        block[12 + i] = d1 - c1;
    }

    for row in block.chunks_exact_mut(4) {
        let a1 = row[0] + row[3];
        let b1 = row[1] + row[2];
        let c1 = row[1] - row[2];
        let d1 = row[0] - row[3];

        row[0] = (a1 + b1 + 3) >> 3;
        row[1] = (c1 + d1 + 3) >> 3;
        row[2] = (a1 - b1 + 3) >> 3;
        row[3] = (d1 - c1 + 3) >> 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRIDE: usize = 8;

    fn grid(seed: u8) -> [u8; 4 * STRIDE] {
        let mut buf = [0u8; 4 * STRIDE];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = seed.wrapping_add((i as u8).wrapping_mul(37));
        }
        buf
    }

    #[test]
    fn zero_block_leaves_prediction_untouched() {
        let before = grid(11);
        let mut buf = before;
        transform_one(&[0; 16], &mut buf, 0, STRIDE);
        assert_eq!(buf, before);
        transform_auto(&[0; 16], &mut buf, 0, STRIDE);
        assert_eq!(buf, before);
    }

    #[test]
    fn dc_path_matches_full_transform() {
        for dc in [-2048i16, -300, -5, -4, -1, 0, 1, 3, 4, 12, 1000, 2047] {
            let mut coeffs = [0i16; 16];
            coeffs[0] = dc;
            let mut full = grid(dc as u8);
            let mut fast = full;
            transform_one(&coeffs, &mut full, 0, STRIDE);
            transform_dc(&coeffs, &mut fast, 0, STRIDE);
            assert_eq!(full, fast, "dc {dc}");
        }
    }

    #[test]
    fn ac3_path_matches_full_transform() {
        let values = [-900i16, -77, -1, 0, 2, 45, 513];
        for &c0 in &values {
            for &c1 in &values {
                for &c4 in &values {
                    let mut coeffs = [0i16; 16];
                    coeffs[0] = c0;
                    coeffs[1] = c1;
                    coeffs[4] = c4;
                    let mut full = grid(c1 as u8);
                    let mut fast = full;
                    transform_one(&coeffs, &mut full, 0, STRIDE);
                    transform_ac3(&coeffs, &mut fast, 0, STRIDE);
                    assert_eq!(full, fast, "coeffs {c0} {c1} {c4}");
                }
            }
        }
    }

    #[test]
    fn residual_is_added_not_stored() {
        let mut coeffs = [0i16; 16];
        coeffs[0] = 8 * 10;
        let mut buf = [100u8; 4 * STRIDE];
        transform_one(&coeffs, &mut buf, 0, STRIDE);
        for row in buf.chunks_exact(STRIDE) {
            assert_eq!(&row[..4], &[110; 4]);
            assert_eq!(&row[4..], &[100; 4]);
        }
    }

    #[test]
    fn reconstruction_saturates() {
        let mut coeffs = [0i16; 16];
        coeffs[0] = 2047;
        let mut buf = [250u8; 4 * STRIDE];
        transform_one(&coeffs, &mut buf, 0, STRIDE);
        assert!(buf.chunks_exact(STRIDE).all(|r| r[..4] == [255; 4]));

        coeffs[0] = -2048;
        let mut buf = [5u8; 4 * STRIDE];
        transform_one(&coeffs, &mut buf, 0, STRIDE);
        assert!(buf.chunks_exact(STRIDE).all(|r| r[..4] == [0; 4]));
    }

    #[test]
    fn two_blocks_land_side_by_side() {
        let mut coeffs = [0i16; 32];
        coeffs[0] = 16;
        coeffs[16] = -16;
        let mut buf = [50u8; 4 * STRIDE];
        transform(&coeffs, &mut buf, 0, STRIDE, true);
        for row in buf.chunks_exact(STRIDE) {
            assert_eq!(row, &[52, 52, 52, 52, 48, 48, 48, 48]);
        }
    }

    #[test]
    fn dc_uv_skips_zero_sub_blocks() {
        let mut coeffs = [0i16; 64];
        coeffs[16] = 24;
        coeffs[48] = -24;
        let mut buf = [128u8; 8 * STRIDE];
        transform_dc_uv(&coeffs, &mut buf, 0, STRIDE);
        for (y, row) in buf.chunks_exact(STRIDE).enumerate() {
            let expected: [u8; 8] = if y < 4 {
                [128, 128, 128, 128, 131, 131, 131, 131]
            } else {
                [128, 128, 128, 128, 125, 125, 125, 125]
            };
            assert_eq!(row, &expected, "row {y}");
        }
    }

    #[test]
    fn iwht_spreads_dc_evenly() {
        let mut block = [0i32; 16];
        block[0] = 80;
        iwht4x4(&mut block);
        assert_eq!(block, [10; 16]);
    }

    #[test]
    fn iwht_matches_reference_butterflies() {
        let input: [i32; 16] = [
            38, 6, 210, 107, 42, 125, 185, 151, 241, 224, 125, 233, 227, 8, 57, 96,
        ];
        let mut tmp = [0i32; 16];
        for i in 0..4 {
            let a0 = input[i] + input[12 + i];
            let a1 = input[4 + i] + input[8 + i];
            let a2 = input[4 + i] - input[8 + i];
            let a3 = input[i] - input[12 + i];
            tmp[i] = a0 + a1;
            tmp[8 + i] = a0 - a1;
            tmp[4 + i] = a3 + a2;
            tmp[12 + i] = a3 - a2;
        }
        let mut expected = [0i32; 16];
        for i in 0..4 {
            let dc = tmp[i * 4] + 3;
            let a0 = dc + tmp[i * 4 + 3];
            let a1 = tmp[i * 4 + 1] + tmp[i * 4 + 2];
            let a2 = tmp[i * 4 + 1] - tmp[i * 4 + 2];
            let a3 = dc - tmp[i * 4 + 3];
            expected[i * 4] = (a0 + a1) >> 3;
            expected[i * 4 + 1] = (a3 + a2) >> 3;
            expected[i * 4 + 2] = (a0 - a1) >> 3;
            expected[i * 4 + 3] = (a3 - a2) >> 3;
        }

        let mut block = input;
        iwht4x4(&mut block);
        assert_eq!(block, expected);
    }
}
