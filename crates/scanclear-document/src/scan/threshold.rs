// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adaptive binarization against the local mean, followed by a single
// isolated-pixel cleanup sweep.

use tracing::debug;

use super::blur::box_blur;
use super::buffer::PixelBuffer;

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 255;

/// Binarize `src` against its own local mean.
///
/// A pixel turns black when it is darker than `local_mean * (1 - sensitivity)`,
/// where the mean is taken over a `(2 * radius + 1)` window. Larger
/// `sensitivity` whitens more of the background.
pub fn adaptive_threshold(src: &PixelBuffer, radius: u32, sensitivity: f32) -> PixelBuffer {
    let local_mean = box_blur(src, radius);
    let factor = 1.0f32 - sensitivity;

    let out = src
        .as_raw()
        .iter()
        .zip(local_mean.as_raw())
        .map(|(&v, &mean)| {
            let threshold = (mean as f32 * factor) as i32;
            if (v as i32) < threshold { BLACK } else { WHITE }
        })
        .collect();

    src.with_data(out)
}

/// Flip interior pixels that disagree with at least `min_opposite` of their
/// eight neighbours.
///
/// One sweep only: neighbour counts are read from `src`, never from pixels
/// already flipped in this sweep. The outermost rows and columns are copied
/// through untouched.
pub fn remove_isolated_pixels(src: &PixelBuffer, min_opposite: u8) -> PixelBuffer {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let input = src.as_raw();
    let mut out = input.to_vec();

    let mut flipped = 0usize;
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let idx = y * w + x;
            let current = input[idx];
            let mut opposite = 0u8;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if (nx, ny) != (x, y) && input[ny * w + nx] != current {
                        opposite += 1;
                    }
                }
            }
            if opposite >= min_opposite {
                out[idx] = if current == BLACK { WHITE } else { BLACK };
                flipped += 1;
            }
        }
    }

    debug!(flipped, min_opposite, "Isolated-pixel cleanup complete");
    src.with_data(out)
}

/// Adaptive threshold followed by one cleanup sweep.
pub fn binarize_document(
    src: &PixelBuffer,
    radius: u32,
    sensitivity: f32,
    min_opposite: u8,
) -> PixelBuffer {
    debug!(radius, sensitivity, "Adaptive threshold");
    let thresholded = adaptive_threshold(src, radius, sensitivity);
    remove_isolated_pixels(&thresholded, min_opposite)
}
