//! Saturating arithmetic, rounded averages and fixed-point helpers.
//!
//! The loop filter indexes small clamp tables instead of branching. They are
//! built at compile time and are read-only for the life of the process.

/// 16 bit fixed point version of cos(PI/8) * sqrt(2) - 1
const CONST1: i64 = 20091;
/// 16 bit fixed point version of sin(PI/8) * sqrt(2)
const CONST2: i64 = 35468;

/// Fraction bits of the intermediate YUV -> RGB values.
pub(crate) const YUV_FIX2: i32 = 6;
const YUV_MASK2: i32 = (256 << YUV_FIX2) - 1;

/// Clamps a reconstructed sample to `0..=255`.
#[inline(always)]
#[must_use]
pub fn clip8(v: i32) -> u8 {
    if v & !0xff == 0 {
        v as u8
    } else if v < 0 {
        0
    } else {
        255
    }
}

/// Clamps a Q6 fixed-point colour value and drops the fraction bits.
#[inline(always)]
#[must_use]
pub fn yuv_clip8(v: i32) -> u8 {
    if v & !YUV_MASK2 == 0 {
        (v >> YUV_FIX2) as u8
    } else if v < 0 {
        0
    } else {
        255
    }
}

/// `(a + b + 1) >> 1`
#[inline(always)]
#[must_use]
pub fn avg2(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + 1) >> 1) as u8
}

/// `(a + 2b + c + 2) >> 2`
#[inline(always)]
#[must_use]
pub fn avg3(a: u8, b: u8, c: u8) -> u8 {
    ((u16::from(a) + 2 * u16::from(b) + u16::from(c) + 2) >> 2) as u8
}

/// `_mm_mulhi_epu16` emulation: `(v * coeff) >> 8`.
#[inline(always)]
#[must_use]
pub fn mul_hi(v: u8, coeff: u16) -> i32 {
    ((u32::from(v) * u32::from(coeff)) >> 8) as i32
}

// The products are widened so that out-of-range coefficient blocks
// saturate in `clip8` instead of overflowing here.

/// Multiplication by sqrt(2) * cos(pi/8) in Q16.
#[inline(always)]
#[must_use]
pub fn mul1(a: i32) -> i32 {
    ((i64::from(a) * CONST1) >> 16) as i32 + a
}

/// Multiplication by sqrt(2) * sin(pi/8) in Q16.
#[inline(always)]
#[must_use]
pub fn mul2(a: i32) -> i32 {
    ((i64::from(a) * CONST2) >> 16) as i32
}

const ABS0_RANGE: i32 = 255;
const SCLIP1_RANGE: i32 = 1020;
const SCLIP2_RANGE: i32 = 112;
const CLIP1_LOW: i32 = 255;
const CLIP1_HIGH: i32 = 511;

const fn clamp_const(v: i32, lo: i32, hi: i32) -> i32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

const fn build_abs0() -> [u8; (2 * ABS0_RANGE + 1) as usize] {
    let mut table = [0u8; (2 * ABS0_RANGE + 1) as usize];
    let mut i = 0;
    while i < table.len() {
        let v = i as i32 - ABS0_RANGE;
        table[i] = (if v < 0 { -v } else { v }) as u8;
        i += 1;
    }
    table
}

const fn build_sclip1() -> [i8; (2 * SCLIP1_RANGE + 1) as usize] {
    let mut table = [0i8; (2 * SCLIP1_RANGE + 1) as usize];
    let mut i = 0;
    while i < table.len() {
        table[i] = clamp_const(i as i32 - SCLIP1_RANGE, -128, 127) as i8;
        i += 1;
    }
    table
}

const fn build_sclip2() -> [i8; (2 * SCLIP2_RANGE + 1) as usize] {
    let mut table = [0i8; (2 * SCLIP2_RANGE + 1) as usize];
    let mut i = 0;
    while i < table.len() {
        table[i] = clamp_const(i as i32 - SCLIP2_RANGE, -16, 15) as i8;
        i += 1;
    }
    table
}

const fn build_clip1() -> [u8; (CLIP1_LOW + CLIP1_HIGH + 1) as usize] {
    let mut table = [0u8; (CLIP1_LOW + CLIP1_HIGH + 1) as usize];
    let mut i = 0;
    while i < table.len() {
        table[i] = clamp_const(i as i32 - CLIP1_LOW, 0, 255) as u8;
        i += 1;
    }
    table
}

static ABS0: [u8; (2 * ABS0_RANGE + 1) as usize] = build_abs0();
static SCLIP1: [i8; (2 * SCLIP1_RANGE + 1) as usize] = build_sclip1();
static SCLIP2: [i8; (2 * SCLIP2_RANGE + 1) as usize] = build_sclip2();
static CLIP1: [u8; (CLIP1_LOW + CLIP1_HIGH + 1) as usize] = build_clip1();

// Indices outside a table's domain wrap to huge usize values and panic.

/// `|v|` for `v` in `[-255, 255]`.
#[inline(always)]
pub(crate) fn abs0(v: i32) -> i32 {
    i32::from(ABS0[(v + ABS0_RANGE) as usize])
}

/// Clamps `v` in `[-1020, 1020]` to `[-128, 127]`.
#[inline(always)]
pub(crate) fn sclip1(v: i32) -> i32 {
    i32::from(SCLIP1[(v + SCLIP1_RANGE) as usize])
}

/// Clamps `v` in `[-112, 112]` to `[-16, 15]`.
#[inline(always)]
pub(crate) fn sclip2(v: i32) -> i32 {
    i32::from(SCLIP2[(v + SCLIP2_RANGE) as usize])
}

/// Clamps `v` in `[-255, 511]` to `[0, 255]`.
#[inline(always)]
pub(crate) fn clip1(v: i32) -> u8 {
    CLIP1[(v + CLIP1_LOW) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip8_saturates_instead_of_wrapping() {
        for v in 0..=255 {
            assert_eq!(clip8(v), v as u8);
        }
        for v in [-1, -2, -255, -256, -61000, i32::MIN] {
            assert_eq!(clip8(v), 0, "clip8({v})");
        }
        for v in [256, 257, 511, 61000, i32::MAX] {
            assert_eq!(clip8(v), 255, "clip8({v})");
        }
    }

    #[test]
    fn yuv_clip8_matches_shift_then_clamp() {
        for v in -70_000..70_000 {
            let expected = (v >> YUV_FIX2).clamp(0, 255) as u8;
            assert_eq!(yuv_clip8(v), expected, "yuv_clip8({v})");
        }
    }

    #[test]
    fn test_avg2() {
        for i in 0u8..=255 {
            for j in 0u8..=255 {
                let ceil_avg = (f32::from(i) + f32::from(j)) / 2.0;
                let ceil_avg = ceil_avg.ceil() as u8;
                assert_eq!(ceil_avg, avg2(i, j), "avg2({i}, {j})");
            }
        }
    }

    #[test]
    fn test_avg3() {
        for i in (0u8..=255).step_by(3) {
            for j in 0u8..=255 {
                for k in (0u8..=255).step_by(5) {
                    let floor_avg = (f32::from(i) + 2.0 * f32::from(j) + f32::from(k) + 2.0) / 4.0;
                    assert_eq!(floor_avg.floor() as u8, avg3(i, j, k), "avg3({i}, {j}, {k})");
                }
            }
        }
        assert_eq!(avg3(255, 255, 255), 255);
        assert_eq!(avg3(0, 0, 1), 0);
        assert_eq!(avg3(0, 1, 1), 1);
    }

    #[test]
    fn dct_multipliers_use_exact_constants() {
        assert_eq!(mul1(0), 0);
        assert_eq!(mul2(0), 0);
        // 65536 * (1 + 20091/65536) and 65536 * 35468/65536
        assert_eq!(mul1(65536), 65536 + 20091);
        assert_eq!(mul2(65536), 35468);
        // arithmetic shift rounds towards negative infinity
        assert_eq!(mul1(-1), -2);
        assert_eq!(mul2(-1), -1);
        assert_eq!(mul1(100), 130);
        assert_eq!(mul2(100), 54);
    }

    #[test]
    fn mul_hi_is_high_byte_of_product() {
        assert_eq!(mul_hi(128, 19077), 9538);
        assert_eq!(mul_hi(255, 33050), 32920);
        assert_eq!(mul_hi(0, 65535), 0);
    }

    #[test]
    fn tables_agree_with_direct_clamps() {
        for v in -255..=255 {
            assert_eq!(abs0(v), v.abs());
        }
        for v in -1020..=1020 {
            assert_eq!(sclip1(v), v.clamp(-128, 127));
        }
        for v in -112..=112 {
            assert_eq!(sclip2(v), v.clamp(-16, 15));
        }
        for v in -255..=511 {
            assert_eq!(i32::from(clip1(v)), v.clamp(0, 255));
        }
    }

    #[test]
    #[should_panic]
    fn table_lookup_outside_domain_fails_fast() {
        let _ = sclip2(113);
    }
}
