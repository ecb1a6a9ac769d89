// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unsharp mask: out = in + amount * (in - gaussian(in)), gated by a minimum
// difference so flat regions and sensor noise are left alone.

use super::blur::gaussian_blur;
use super::buffer::PixelBuffer;
use super::threshold::{BLACK, WHITE};

/// Unsharp mask parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsharpMask {
    /// Multiplier applied to the high-frequency difference.
    pub amount: f32,
    /// Differences with magnitude at or below this are passed through.
    pub threshold: u8,
    /// Snap sharpened pixels back to pure black/white (cut at 128).
    pub rebinarize: bool,
}

impl UnsharpMask {
    /// Tonal sharpening.
    pub fn new(amount: f32, threshold: u8) -> Self {
        Self {
            amount,
            threshold,
            rebinarize: false,
        }
    }

    /// Sharpening for an already-binary image that keeps it binary.
    pub fn binary(amount: f32, threshold: u8) -> Self {
        Self {
            amount,
            threshold,
            rebinarize: true,
        }
    }

    /// Sharpen `src`.
    pub fn apply(&self, src: &PixelBuffer) -> PixelBuffer {
        let blurred = gaussian_blur(src);
        let threshold = self.threshold as i32;

        let out = src
            .as_raw()
            .iter()
            .zip(blurred.as_raw())
            .map(|(&v, &b)| {
                let diff = v as i32 - b as i32;
                if diff.abs() <= threshold {
                    return v;
                }
                let sharpened = (v as i32 + (self.amount * diff as f32) as i32).clamp(0, 255);
                if self.rebinarize {
                    if sharpened < 128 { BLACK } else { WHITE }
                } else {
                    sharpened as u8
                }
            })
            .collect();

        src.with_data(out)
    }
}
