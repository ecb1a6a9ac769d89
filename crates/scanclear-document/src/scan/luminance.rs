// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Luminance extraction — RGB(A) colour to a single intensity channel using the
// ITU-R BT.601 luma weights.

use image::{RgbImage, RgbaImage};
use scanclear_core::error::{Result, ScanError};

use super::buffer::PixelBuffer;

/// BT.601 luma of one pixel, rounded to the nearest integer.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299f32 * r as f32 + 0.587f32 * g as f32 + 0.114f32 * b as f32;
    ((y + 0.5) as i32).clamp(0, 255) as u8
}

/// Extract intensities from an RGBA image. Alpha is ignored.
pub fn extract_luminance(source: &RgbaImage) -> Result<PixelBuffer> {
    let (width, height) = source.dimensions();
    luminance_from_rgba_bytes(width, height, source.as_raw())
}

/// Extract intensities from an RGB image.
pub fn extract_luminance_rgb(source: &RgbImage) -> Result<PixelBuffer> {
    let (width, height) = source.dimensions();
    ScanError::check_dimensions(width, height, 3, source.as_raw().len())?;
    let data = source
        .as_raw()
        .chunks_exact(3)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();
    PixelBuffer::new(width, height, data)
}

/// Extract intensities from tightly packed RGBA8888 bytes.
///
/// Fails fast if `bytes` is not exactly `width * height * 4` long.
pub fn luminance_from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<PixelBuffer> {
    ScanError::check_dimensions(width, height, 4, bytes.len())?;
    let data = bytes
        .chunks_exact(4)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();
    PixelBuffer::new(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn primaries_use_bt601_weights() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        // 0.299 * 255 = 76.245
        assert_eq!(luma(255, 0, 0), 76);
        // 0.587 * 255 = 149.685
        assert_eq!(luma(0, 255, 0), 150);
        // 0.114 * 255 = 29.07
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn gray_input_is_unchanged() {
        for v in [0u8, 1, 17, 128, 200, 254, 255] {
            assert_eq!(luma(v, v, v), v);
        }
    }

    #[test]
    fn alpha_is_ignored() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([10, 20, 30, 0])
            } else {
                Rgba([10, 20, 30, 255])
            }
        });
        let buf = extract_luminance(&img).unwrap();
        assert_eq!(buf.get(0, 0), buf.get(1, 0));
    }

    #[test]
    fn rgb_and_rgba_agree() {
        let rgb = RgbImage::from_fn(5, 4, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 90]));
        let rgba = RgbaImage::from_fn(5, 4, |x, y| Rgba([(x * 40) as u8, (y * 60) as u8, 90, 255]));
        assert_eq!(
            extract_luminance_rgb(&rgb).unwrap(),
            extract_luminance(&rgba).unwrap()
        );
    }

    #[test]
    fn raw_bytes_must_match_dimensions() {
        let err = luminance_from_rgba_bytes(2, 2, &[0u8; 15]).unwrap_err();
        assert!(matches!(err, ScanError::InvalidDimensions { expected: 16, actual: 15, .. }));
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = RgbaImage::new(0, 0);
        assert!(matches!(
            extract_luminance(&img),
            Err(ScanError::EmptyImage { .. })
        ));
    }
}
