// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanclear-document — Document scan enhancement for Scanclear.
//
// Provides the enhancement pipeline (luminance, denoise, contrast stretch,
// adaptive binarization, unsharp masking), image decode/encode with preview
// downscaling, and scan-to-PDF assembly.

pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary structs so callers can use `scanclear_document::ScanEnhancer` etc.
pub use image::processor::ImageProcessor;
pub use pdf::writer::ScanPdfWriter;
pub use scan::buffer::PixelBuffer;
pub use scan::cancel::CancelToken;
pub use scan::enhance::{ScanEnhancer, enhance};
pub use scan::worker::{enhance_in_background, scan_to_pdf_in_background};
