// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — luminance extraction, denoising, contrast stretch,
// adaptive binarization, unsharp masking, and the enhancement modes that
// compose them.

pub mod blur;
pub mod buffer;
pub mod cancel;
pub mod contrast;
pub mod enhance;
pub mod luminance;
pub mod sharpen;
pub mod threshold;
pub mod worker;

pub use buffer::PixelBuffer;
pub use cancel::CancelToken;
pub use enhance::{ScanEnhancer, enhance};
