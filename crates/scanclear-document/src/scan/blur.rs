// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blur primitives — a separable 5-tap Gaussian for denoising and an
// integral-image box blur for local mean estimation.

use super::buffer::PixelBuffer;

/// Binomial approximation of a Gaussian, sums to 16.
const GAUSSIAN_TAPS: [u32; 5] = [1, 4, 6, 4, 1];
const GAUSSIAN_SUM: u32 = 16;

// -- Gaussian blur ------------------------------------------------------------

/// Blur with the 5-tap `[1, 4, 6, 4, 1] / 16` kernel, horizontally then
/// vertically.
///
/// Samples outside the image are taken from the nearest edge pixel. Each pass
/// truncates its weighted sum, so the result is bit-exact across platforms.
pub fn gaussian_blur(src: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let input = src.as_raw();

    let mut temp = vec![0u8; w * h];
    for y in 0..h {
        let row = &input[y * w..(y + 1) * w];
        for x in 0..w {
            let sum: u32 = GAUSSIAN_TAPS
                .iter()
                .enumerate()
                .map(|(k, &tap)| row[clamp_offset(x, k, w)] as u32 * tap)
                .sum();
            temp[y * w + x] = (sum / GAUSSIAN_SUM) as u8;
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let sum: u32 = GAUSSIAN_TAPS
                .iter()
                .enumerate()
                .map(|(k, &tap)| temp[clamp_offset(y, k, h) * w + x] as u32 * tap)
                .sum();
            out[y * w + x] = (sum / GAUSSIAN_SUM) as u8;
        }
    }

    src.with_data(out)
}

/// Coordinate of tap `k` (0..5) around `center`, clamped into `[0, len)`.
#[inline]
fn clamp_offset(center: usize, k: usize, len: usize) -> usize {
    (center + k).saturating_sub(2).min(len - 1)
}

// -- Integral image -----------------------------------------------------------

/// Summed-area table over a [`PixelBuffer`].
///
/// `sums[y * (width + 1) + x]` holds the sum of every pixel in the rectangle
/// `[0, x) x [0, y)`. The first row and column are zero. Sums are `u64`, so
/// even a 255-valued image of several gigapixels cannot overflow.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    sums: Vec<u64>,
}

impl IntegralImage {
    /// Build the table in a single pass.
    pub fn new(src: &PixelBuffer) -> Self {
        let (w, h) = (src.width() as usize, src.height() as usize);
        let stride = w + 1;
        let input = src.as_raw();
        let mut sums = vec![0u64; stride * (h + 1)];

        for y in 0..h {
            let mut row_sum: u64 = 0;
            for x in 0..w {
                row_sum += input[y * w + x] as u64;
                sums[(y + 1) * stride + x + 1] = row_sum + sums[y * stride + x + 1];
            }
        }

        Self {
            width: w,
            height: h,
            sums,
        }
    }

    /// Sum over the inclusive rectangle `[x1, x2] x [y1, y2]`.
    pub fn region_sum(&self, x1: usize, y1: usize, x2: usize, y2: usize) -> u64 {
        let stride = self.width + 1;
        self.sums[(y2 + 1) * stride + x2 + 1] + self.sums[y1 * stride + x1]
            - self.sums[y1 * stride + x2 + 1]
            - self.sums[(y2 + 1) * stride + x1]
    }

    /// Truncated mean of the `(2r + 1)^2` window centred on `(cx, cy)`,
    /// clipped to the image. The divisor is the clipped pixel count.
    pub fn window_mean(&self, cx: usize, cy: usize, radius: usize) -> u8 {
        let x1 = cx.saturating_sub(radius);
        let y1 = cy.saturating_sub(radius);
        let x2 = (cx + radius).min(self.width - 1);
        let y2 = (cy + radius).min(self.height - 1);
        let count = ((x2 - x1 + 1) * (y2 - y1 + 1)) as u64;
        (self.region_sum(x1, y1, x2, y2) / count) as u8
    }
}

// -- Box blur -----------------------------------------------------------------

/// Local mean of every pixel over a `(2 * radius + 1)` square window.
///
/// Windows shrink at the borders rather than padding. O(1) per pixel
/// regardless of `radius`.
pub fn box_blur(src: &PixelBuffer, radius: u32) -> PixelBuffer {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let integral = IntegralImage::new(src);
    let radius = radius as usize;

    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            out.push(integral.window_mean(x, y, radius));
        }
    }

    src.with_data(out)
}
