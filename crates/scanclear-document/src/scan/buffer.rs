// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-channel intensity buffer passed between pipeline stages.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use scanclear_core::error::{Result, ScanError};

/// An owned, row-major `width` x `height` array of 8-bit intensities.
///
/// The length always equals `width * height` and neither dimension is zero.
/// Stages never mutate their input; each one returns a fresh buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap raw intensities, validating the size.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        ScanError::check_dimensions(width, height, 1, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self> {
        ScanError::check_dimensions(width, height, 1, width as usize * height as usize)?;
        Ok(Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Result<Self> {
        ScanError::check_dimensions(width, height, 1, width as usize * height as usize)?;
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Take ownership of an 8-bit grayscale image.
    pub fn from_gray_image(image: GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    /// A buffer of the same dimensions holding `data`.
    ///
    /// Only used by stages, which always produce exactly one value per pixel.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a buffer has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Intensity at `(x, y)`. Panics if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Borrow the row-major intensities.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return the row-major intensities.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Darkest and brightest intensity present.
    pub fn min_max(&self) -> (u8, u8) {
        self.data
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Whether every pixel is pure black or pure white.
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v == 0 || v == 255)
    }

    // -- Conversion -----------------------------------------------------------

    /// Copy into an 8-bit grayscale image.
    pub fn to_gray_image(&self) -> GrayImage {
        let mut image = GrayImage::new(self.width, self.height);
        for (pixel, &v) in image.pixels_mut().zip(&self.data) {
            *pixel = Luma([v]);
        }
        image
    }

    /// Expand into an opaque RGBA image with R = G = B = intensity.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        for (pixel, &v) in image.pixels_mut().zip(&self.data) {
            *pixel = Rgba([v, v, v, 255]);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_length_mismatch() {
        let err = PixelBuffer::new(3, 3, vec![0; 8]).unwrap_err();
        assert!(matches!(err, ScanError::InvalidDimensions { expected: 9, actual: 8, .. }));
    }

    #[test]
    fn new_rejects_zero_size() {
        assert!(matches!(
            PixelBuffer::new(0, 5, Vec::new()),
            Err(ScanError::EmptyImage { .. })
        ));
        assert!(matches!(
            PixelBuffer::filled(5, 0, 255),
            Err(ScanError::EmptyImage { .. })
        ));
    }

    #[test]
    fn from_fn_is_row_major() {
        let buf = PixelBuffer::from_fn(3, 2, |x, y| (y * 10 + x) as u8).unwrap();
        assert_eq!(buf.as_raw(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(buf.get(2, 1), 12);
    }

    #[test]
    fn min_max_and_binary() {
        let buf = PixelBuffer::new(2, 2, vec![0, 255, 255, 0]).unwrap();
        assert_eq!(buf.min_max(), (0, 255));
        assert!(buf.is_binary());

        let buf = PixelBuffer::new(2, 1, vec![40, 90]).unwrap();
        assert_eq!(buf.min_max(), (40, 90));
        assert!(!buf.is_binary());
    }

    #[test]
    fn rgba_expansion_is_opaque_gray() {
        let buf = PixelBuffer::new(2, 1, vec![7, 200]).unwrap();
        let rgba = buf.to_rgba_image();
        assert_eq!(rgba.get_pixel(0, 0).0, [7, 7, 7, 255]);
        assert_eq!(rgba.get_pixel(1, 0).0, [200, 200, 200, 255]);
    }

    #[test]
    fn gray_image_round_trip() {
        let buf = PixelBuffer::from_fn(4, 3, |x, y| (x * 50 + y) as u8).unwrap();
        let back = PixelBuffer::from_gray_image(buf.to_gray_image()).unwrap();
        assert_eq!(back, buf);
    }
}
