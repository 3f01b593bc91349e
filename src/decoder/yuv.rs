//! YUV -> RGB conversion of reconstructed frames.
//!
//! Chroma planes are half the size of the luma plane in both directions, so
//! each chroma sample covers a 2x2 block of pixels. [`UpsamplingMethod::Simple`]
//! reuses that sample for all four pixels. [`UpsamplingMethod::Bilinear`]
//! (the libwebp default) weights the nearest chroma sample 9/16, its two
//! neighbours 3/16 each and the diagonal one 1/16:
//! `(9a + 3b + 3c + d + 8) / 16`. Samples past the edge are replaced by the
//! edge sample itself.
//!
//! The per-sample math follows libwebp's `src/dsp/yuv.h`: BT.601 limited
//! range in 14-bit fixed point, clamped after dropping 6 fraction bits.

use alloc::vec;

use log::debug;
use rgb::alt::BGR8;
use rgb::RGB8;

use super::api::ReconstructError;
use super::frame::YuvFrame;
use super::plane::Plane;
use crate::common::clip::{mul_hi, yuv_clip8};

/// Byte order of converted pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 bytes: red, green, blue.
    #[default]
    Rgb,
    /// 4 bytes: red, green, blue, alpha (always 255).
    Rgba,
    /// 3 bytes: blue, green, red.
    Bgr,
    /// 4 bytes: blue, green, red, alpha (always 255).
    Bgra,
}

impl PixelLayout {
    /// Bytes written per pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }

    #[inline(always)]
    fn write(self, out: &mut [u8], y: u8, u: u8, v: u8) {
        match self {
            Self::Rgb => write_rgb(y, u, v, out),
            Self::Bgr => write_bgr(y, u, v, out),
            Self::Rgba => {
                write_rgb(y, u, v, out);
                out[3] = 255;
            }
            Self::Bgra => {
                write_bgr(y, u, v, out);
                out[3] = 255;
            }
        }
    }
}

/// How chroma is brought up to luma resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpsamplingMethod {
    /// Bilinear ("fancy") interpolation.
    #[default]
    Bilinear,
    /// Nearest sample.
    Simple,
}

/// Red channel of one pixel.
#[inline(always)]
#[must_use]
pub fn yuv_to_r(y: u8, v: u8) -> u8 {
    yuv_clip8(mul_hi(y, 19077) + mul_hi(v, 26149) - 14234)
}

/// Green channel of one pixel.
#[inline(always)]
#[must_use]
pub fn yuv_to_g(y: u8, u: u8, v: u8) -> u8 {
    yuv_clip8(mul_hi(y, 19077) - mul_hi(u, 6419) - mul_hi(v, 13320) + 8708)
}

/// Blue channel of one pixel.
#[inline(always)]
#[must_use]
pub fn yuv_to_b(y: u8, u: u8) -> u8 {
    yuv_clip8(mul_hi(y, 19077) + mul_hi(u, 33050) - 17685)
}

/// Converts one pixel.
#[inline]
#[must_use]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> RGB8 {
    RGB8 {
        r: yuv_to_r(y, v),
        g: yuv_to_g(y, u, v),
        b: yuv_to_b(y, u),
    }
}

/// Converts one pixel to blue-green-red order.
#[inline]
#[must_use]
pub fn yuv_to_bgr(y: u8, u: u8, v: u8) -> BGR8 {
    BGR8 {
        b: yuv_to_b(y, u),
        g: yuv_to_g(y, u, v),
        r: yuv_to_r(y, v),
    }
}

/// Writes one pixel as `[r, g, b]` into the first three bytes of `out`.
#[inline]
pub fn write_rgb(y: u8, u: u8, v: u8, out: &mut [u8]) {
    out[0] = yuv_to_r(y, v);
    out[1] = yuv_to_g(y, u, v);
    out[2] = yuv_to_b(y, u);
}

/// Writes one pixel as `[b, g, r]` into the first three bytes of `out`.
#[inline]
pub fn write_bgr(y: u8, u: u8, v: u8, out: &mut [u8]) {
    out[0] = yuv_to_b(y, u);
    out[1] = yuv_to_g(y, u, v);
    out[2] = yuv_to_r(y, v);
}

/// Nearest chroma index and the one on the other side of the pixel,
/// clamped to the plane.
#[inline(always)]
fn chroma_taps(t: usize, len: usize) -> (usize, usize) {
    let near = t / 2;
    let far = if t % 2 == 1 {
        (near + 1).min(len - 1)
    } else {
        near.saturating_sub(1)
    };
    (near, far)
}

#[inline(always)]
fn fancy(near: u8, side1: u8, side2: u8, diagonal: u8) -> u8 {
    let v = 9 * u16::from(near) + 3 * u16::from(side1) + 3 * u16::from(side2) + u16::from(diagonal);
    ((v + 8) / 16) as u8
}

/// Upsamples the chroma for luma row `y` into `out`.
fn upsample_row(plane: &Plane, y: usize, method: UpsamplingMethod, out: &mut [u8]) {
    let len = plane.width();
    match method {
        UpsamplingMethod::Simple => {
            let row = plane.row(y / 2);
            for (x, o) in out.iter_mut().enumerate() {
                *o = row[x / 2];
            }
        }
        UpsamplingMethod::Bilinear => {
            let (near_y, far_y) = chroma_taps(y, plane.height());
            let near = plane.row(near_y);
            let far = plane.row(far_y);
            for (x, o) in out.iter_mut().enumerate() {
                let (nx, fx) = chroma_taps(x, len);
                *o = fancy(near[nx], near[fx], far[nx], far[fx]);
            }
        }
    }
}

/// Converts three planes into a packed pixel buffer of `y.width()` pixels
/// per row.
pub(crate) fn fill_rgb_planes(
    y: &Plane,
    u: &Plane,
    v: &Plane,
    buf: &mut [u8],
    layout: PixelLayout,
    method: UpsamplingMethod,
) {
    let width = y.width();
    let bpp = layout.bytes_per_pixel();
    let mut u_row = vec![0u8; width];
    let mut v_row = vec![0u8; width];

    for (row, out) in buf.chunks_exact_mut(width * bpp).take(y.height()).enumerate() {
        upsample_row(u, row, method, &mut u_row);
        upsample_row(v, row, method, &mut v_row);
        for (((pixel, &luma), &cb), &cr) in out
            .chunks_exact_mut(bpp)
            .zip(y.row(row))
            .zip(&u_row)
            .zip(&v_row)
        {
            layout.write(pixel, luma, cb, cr);
        }
    }
}

impl YuvFrame {
    /// Bytes needed to hold the frame in `layout`.
    #[must_use]
    pub fn rgb_len(&self, layout: PixelLayout) -> usize {
        self.width() * self.height() * layout.bytes_per_pixel()
    }

    /// Converts the visible frame into `buf`, rows packed without padding.
    ///
    /// The frame must be fully reconstructed. Converting before the loop
    /// filter has run is allowed and yields the unfiltered picture.
    pub fn fill_rgb(
        &self,
        buf: &mut [u8],
        layout: PixelLayout,
        upsampling: UpsamplingMethod,
    ) -> Result<(), ReconstructError> {
        self.ensure_complete()?;
        let expected = self.rgb_len(layout);
        if buf.len() < expected {
            return Err(ReconstructError::BufferTooSmall {
                expected,
                actual: buf.len(),
            });
        }
        debug!(
            "converting {}x{} frame to {layout:?} ({upsampling:?} upsampling)",
            self.width(),
            self.height()
        );
        fill_rgb_planes(self.y(), self.u(), self.v(), buf, layout, upsampling);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(width: u32, height: u32, samples: &[u8]) -> Plane {
        let mut plane = Plane::new(width, height, 8).unwrap();
        let w = width as usize;
        for (y, row) in samples.chunks_exact(w).enumerate() {
            let o = plane.origin(0, y);
            plane.data_mut()[o..o + w].copy_from_slice(row);
        }
        plane
    }

    #[test]
    fn test_yuv_conversions() {
        let (y, u, v) = (203, 40, 42);

        assert_eq!(yuv_to_r(y, v), 80);
        assert_eq!(yuv_to_g(y, u, v), 255);
        assert_eq!(yuv_to_b(y, u), 40);
        assert_eq!(yuv_to_rgb(y, u, v), RGB8 { r: 80, g: 255, b: 40 });
        assert_eq!(yuv_to_bgr(y, u, v), BGR8 { b: 40, g: 255, r: 80 });
    }

    #[test]
    fn neutral_and_extreme_gray() {
        assert_eq!(yuv_to_rgb(128, 128, 128), RGB8 { r: 130, g: 130, b: 130 });
        assert_eq!(yuv_to_rgb(16, 128, 128), RGB8 { r: 0, g: 0, b: 0 });
        assert_eq!(yuv_to_rgb(235, 128, 128), RGB8 { r: 255, g: 255, b: 255 });
    }

    #[test]
    fn writers_use_their_byte_order() {
        let mut rgb = [0u8; 4];
        let mut bgr = [0u8; 4];
        write_rgb(203, 40, 42, &mut rgb);
        write_bgr(203, 40, 42, &mut bgr);
        assert_eq!(rgb, [80, 255, 40, 0]);
        assert_eq!(bgr, [40, 255, 80, 0]);
    }

    #[test]
    fn chroma_taps_mirror_at_edges() {
        assert_eq!(chroma_taps(0, 2), (0, 0));
        assert_eq!(chroma_taps(1, 2), (0, 1));
        assert_eq!(chroma_taps(2, 2), (1, 0));
        assert_eq!(chroma_taps(3, 2), (1, 1));
        assert_eq!(chroma_taps(4, 3), (2, 1));
    }

    #[test]
    fn test_fancy_grid() {
        #[rustfmt::skip]
        let y_samples = [
            77, 162, 202, 185,
            28, 13, 199, 182,
            135, 147, 164, 135,
            66, 27, 171, 130,
        ];
        let y = plane(4, 4, &y_samples);
        let u = plane(2, 2, &[34, 101, 123, 163]);
        let v = plane(2, 2, &[97, 167, 149, 23]);

        let mut rgb_buffer = [0u8; 16 * 3];
        fill_rgb_planes(
            &y,
            &u,
            &v,
            &mut rgb_buffer,
            PixelLayout::Rgb,
            UpsamplingMethod::Bilinear,
        );

        #[rustfmt::skip]
        let upsampled_u = [
            34, 51, 84, 101,
            56, 71, 101, 117,
            101, 112, 136, 148,
            123, 133, 153, 163,
        ];

        #[rustfmt::skip]
        let upsampled_v = [
            97, 115, 150, 167,
            110, 115, 126, 131,
            136, 117, 78, 59,
            149, 118, 55, 23,
        ];

        let mut expected = [0u8; 16 * 3];
        for (((px, y), u), v) in expected
            .chunks_exact_mut(3)
            .zip(y_samples)
            .zip(upsampled_u)
            .zip(upsampled_v)
        {
            write_rgb(y, u, v, px);
        }

        assert_eq!(rgb_buffer, expected);
    }

    #[test]
    fn odd_sizes_use_the_last_chroma_sample() {
        let y = plane(3, 3, &[100; 9]);
        let u = plane(2, 2, &[50, 200, 50, 200]);
        let v = plane(2, 2, &[128; 4]);

        let mut simple = [0u8; 9 * 4];
        fill_rgb_planes(
            &y,
            &u,
            &v,
            &mut simple,
            PixelLayout::Rgba,
            UpsamplingMethod::Simple,
        );
        for row in simple.chunks_exact(3 * 4) {
            assert_eq!(&row[0..4], &row[4..8]);
            assert_ne!(&row[4..8], &row[8..12]);
            assert!(row.chunks_exact(4).all(|px| px[3] == 255));
        }

        let mut fancy_out = [0u8; 9 * 3];
        fill_rgb_planes(
            &y,
            &u,
            &v,
            &mut fancy_out,
            PixelLayout::Bgr,
            UpsamplingMethod::Bilinear,
        );
        // x = 2: 9/16 of the last column, 3/16 of the one before it, rows identical
        let u_last = ((12 * 200 + 4 * 50 + 8) / 16) as u8;
        assert_eq!(
            fancy_out[6..9],
            [yuv_to_b(100, u_last), yuv_to_g(100, u_last, 128), yuv_to_r(100, 128)]
        );
    }

    #[test]
    fn fill_rgb_checks_frame_and_buffer() {
        use crate::decoder::filter_params::LoopFilterConfig;
        use crate::decoder::frame::MacroblockData;

        let mut frame = YuvFrame::new(3, 2, LoopFilterConfig::new()).unwrap();
        let mut buf = [0u8; 3 * 2 * 4];
        assert!(matches!(
            frame.fill_rgb(&mut buf, PixelLayout::Rgba, UpsamplingMethod::Bilinear),
            Err(ReconstructError::IncompleteFrame { reconstructed: 0, total: 1 })
        ));

        frame
            .reconstruct_macroblock(0, 0, &MacroblockData::default())
            .unwrap();
        assert!(matches!(
            frame.fill_rgb(&mut buf[..23], PixelLayout::Rgba, UpsamplingMethod::Bilinear),
            Err(ReconstructError::BufferTooSmall { expected: 24, actual: 23 })
        ));
        frame
            .fill_rgb(&mut buf, PixelLayout::Bgra, UpsamplingMethod::Bilinear)
            .unwrap();
        assert!(buf.chunks_exact(4).all(|px| px == [130, 130, 130, 255]));
    }
}
