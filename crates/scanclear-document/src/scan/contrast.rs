// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contrast stretch with gamma, applied through a 256-entry lookup table.

use tracing::debug;

use super::buffer::PixelBuffer;

/// Intensity mapping built from one buffer's observed dynamic range.
///
/// The darkest and brightest `headroom` fraction of the range is clipped, the
/// rest is stretched to `[0, 255]` and then raised to `gamma`. Gammas below 1
/// brighten midtones, which is what paper backgrounds want.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContrastLut {
    table: [u8; 256],
    lo: i32,
    hi: i32,
}

impl ContrastLut {
    /// Build the table for `src`. Min and max are rescanned on every call.
    pub fn from_buffer(src: &PixelBuffer, headroom: f32, gamma: f64) -> Self {
        let (min, max) = src.min_max();
        Self::from_range(min, max, headroom, gamma)
    }

    /// Build the table for an observed `[min, max]` range.
    pub fn from_range(min: u8, max: u8, headroom: f32, gamma: f64) -> Self {
        let spread = max as i32 - min as i32;
        let margin = (spread as f32 * headroom) as i32;
        let lo = min as i32 + margin;
        let hi = max as i32 - margin;
        // A flat image has no range to stretch; the guard keeps the division sane.
        let range = (hi - lo).max(1) as f32;

        let mut table = [0u8; 256];
        for (v, entry) in table.iter_mut().enumerate() {
            let normalized = ((v as i32 - lo) as f32 / range).clamp(0.0, 1.0);
            let curved = (normalized as f64).powf(gamma) as f32;
            *entry = ((curved * 255.0 + 0.5) as i32).clamp(0, 255) as u8;
        }

        debug!(min, max, lo, hi, gamma, "Contrast LUT built");
        Self { table, lo, hi }
    }

    /// Output intensity for input `v`.
    pub fn map(&self, v: u8) -> u8 {
        self.table[v as usize]
    }

    /// Lower and upper stretch bounds after headroom clipping.
    pub fn bounds(&self) -> (i32, i32) {
        (self.lo, self.hi)
    }

    /// Borrow the full table.
    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }

    /// Map every pixel of `src` through the table.
    pub fn apply(&self, src: &PixelBuffer) -> PixelBuffer {
        let out = src.as_raw().iter().map(|&v| self.table[v as usize]).collect();
        src.with_data(out)
    }
}

/// Stretch `src` to full range with the given gamma.
pub fn stretch_contrast(src: &PixelBuffer, headroom: f32, gamma: f64) -> PixelBuffer {
    ContrastLut::from_buffer(src, headroom, gamma).apply(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_gradient_bounds_and_values() {
        let lut = ContrastLut::from_range(0, 255, 0.02, 0.7);
        // 255 * 0.02 = 5.1, truncated to 5.
        assert_eq!(lut.bounds(), (5, 250));
        assert_eq!(lut.map(0), 0);
        assert_eq!(lut.map(5), 0);
        assert_eq!(lut.map(6), 5);
        assert_eq!(lut.map(100), 131);
        assert_eq!(lut.map(128), 157);
        assert_eq!(lut.map(250), 255);
        assert_eq!(lut.map(255), 255);
    }

    #[test]
    fn higher_gamma_darkens_midtones() {
        let soft = ContrastLut::from_range(0, 255, 0.02, 0.7);
        let hard = ContrastLut::from_range(0, 255, 0.02, 0.75);
        assert_eq!(hard.map(100), 125);
        assert_eq!(hard.map(128), 152);
        assert!(hard.map(128) < soft.map(128));
    }

    #[test]
    fn lut_is_monotonic() {
        for (min, max) in [(0u8, 255u8), (30, 200), (219, 255), (100, 101)] {
            for gamma in [0.5, 0.7, 0.75, 1.0, 2.2] {
                let lut = ContrastLut::from_range(min, max, 0.02, gamma);
                for v in 1..256 {
                    assert!(
                        lut.table()[v] >= lut.table()[v - 1],
                        "not monotonic at {v} for [{min}, {max}] gamma {gamma}"
                    );
                }
            }
        }
    }

    #[test]
    fn flat_image_does_not_divide_by_zero() {
        let flat = PixelBuffer::filled(8, 8, 120).unwrap();
        let lut = ContrastLut::from_buffer(&flat, 0.02, 0.7);
        assert_eq!(lut.bounds(), (120, 120));
        // (120 - 120) / 1 = 0.
        assert_eq!(lut.apply(&flat), PixelBuffer::filled(8, 8, 0).unwrap());
    }

    #[test]
    fn stretch_reaches_both_ends() {
        let src = PixelBuffer::from_fn(64, 4, |x, _| (60 + x * 2) as u8).unwrap();
        let out = stretch_contrast(&src, 0.02, 0.7);
        assert_eq!(out.min_max(), (0, 255));
    }

    #[test]
    fn stretch_recomputes_range_each_call() {
        // A second pass sees a different range and keeps changing the image.
        let src = PixelBuffer::from_fn(64, 4, |x, _| (60 + x * 2) as u8).unwrap();
        let once = stretch_contrast(&src, 0.02, 0.7);
        let twice = stretch_contrast(&once, 0.02, 0.7);
        assert_ne!(once, twice);
    }
}
