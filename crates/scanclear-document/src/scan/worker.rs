// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async wrappers that keep CPU-bound enhancement off the caller's executor.

use std::sync::Arc;

use image::RgbaImage;
use scanclear_core::EnhanceMode;
use scanclear_core::error::{Result, ScanError};

use super::enhance::ScanEnhancer;

/// Enhance `source` on tokio's blocking pool.
///
/// Full-resolution pages can take hundreds of milliseconds, which would stall
/// an async runtime if run inline.
pub async fn enhance_in_background(
    enhancer: Arc<ScanEnhancer>,
    source: RgbaImage,
    mode: EnhanceMode,
) -> Result<RgbaImage> {
    tokio::task::spawn_blocking(move || enhancer.enhance(&source, mode))
        .await
        .map_err(|e| ScanError::Worker(format!("enhancement task failed: {e}")))?
}

/// Run [`ScanEnhancer::scan_to_pdf`] on tokio's blocking pool.
pub async fn scan_to_pdf_in_background(
    enhancer: Arc<ScanEnhancer>,
    photos: Vec<Vec<u8>>,
    mode: EnhanceMode,
) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || enhancer.scan_to_pdf(&photos, mode))
        .await
        .map_err(|e| ScanError::Worker(format!("scan-to-PDF task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::cancel::CancelToken;
    use image::Rgba;

    #[tokio::test]
    async fn background_matches_inline() {
        let enhancer = Arc::new(ScanEnhancer::default());
        let src = RgbaImage::from_fn(32, 24, |x, y| {
            let v = ((x * 9 + y * 5) % 256) as u8;
            Rgba([v, v / 2, 255 - v, 255])
        });
        let inline = enhancer.enhance(&src, EnhanceMode::Sharpen).unwrap();
        let background = enhance_in_background(enhancer.clone(), src, EnhanceMode::Sharpen)
            .await
            .unwrap();
        assert_eq!(inline, background);
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let enhancer = Arc::new(ScanEnhancer::default());
        let white = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        let dark = RgbaImage::from_pixel(20, 20, Rgba([30, 30, 30, 255]));

        let (a, b) = tokio::join!(
            enhance_in_background(enhancer.clone(), white, EnhanceMode::SuperClear),
            enhance_in_background(enhancer.clone(), dark, EnhanceMode::Grayscale),
        );
        assert!(a.unwrap().pixels().all(|p| p.0[0] == 255));
        // A flat page has no range; the stretch maps it to black.
        assert!(b.unwrap().pixels().all(|p| p.0[0] == 0));
    }

    #[tokio::test]
    async fn cancellation_propagates_from_worker() {
        let token = CancelToken::new();
        token.cancel();
        let enhancer = Arc::new(ScanEnhancer::default().with_cancel_token(token));
        let src = RgbaImage::from_pixel(8, 8, Rgba([100, 100, 100, 255]));
        let result = enhance_in_background(enhancer, src, EnhanceMode::BwDocument).await;
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }

    #[tokio::test]
    async fn empty_pdf_request_fails_in_background() {
        let enhancer = Arc::new(ScanEnhancer::default());
        let result = scan_to_pdf_in_background(enhancer, Vec::new(), EnhanceMode::BwDocument).await;
        assert!(matches!(result, Err(ScanError::NoPages)));
    }
}
