// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan enhancement pipeline — composes the luminance, blur, contrast,
// threshold, and sharpen stages into the five enhancement modes, plus the
// preview and scan-to-PDF conveniences built on top of them.

use std::time::Instant;

use image::RgbaImage;
use scanclear_core::error::{Result, ScanError};
use scanclear_core::{EnhanceConfig, EnhanceMode};
use tracing::{debug, info, instrument};

use super::blur::gaussian_blur;
use super::buffer::PixelBuffer;
use super::cancel::CancelToken;
use super::contrast::stretch_contrast;
use super::luminance::luminance_from_rgba_bytes;
use super::sharpen::UnsharpMask;
use super::threshold::binarize_document;
use crate::image::processor::ImageProcessor;
use crate::pdf::writer::ScanPdfWriter;

/// Runs enhancement pipelines over document photos.
///
/// An enhancer holds only its tunables and an optional cancel token; every
/// call is independent and allocates its own intermediates, so one enhancer
/// can be shared across threads.
///
/// | Mode | Stages |
/// |---|---|
/// | Original | opaque copy |
/// | Grayscale | luminance, blur, contrast (gamma 0.7) |
/// | BwDocument | luminance, blur, threshold (C 0.08), cleanup (6) |
/// | Sharpen | luminance, blur, contrast (gamma 0.75), unsharp (1.8, 4) |
/// | SuperClear | luminance, blur x2, threshold (C 0.06), cleanup (7), binary unsharp (1.5, 2) |
#[derive(Debug, Clone, Default)]
pub struct ScanEnhancer {
    config: EnhanceConfig,
    cancel: Option<CancelToken>,
}

impl ScanEnhancer {
    // -- Construction ---------------------------------------------------------

    /// Create an enhancer with validated tunables.
    pub fn new(config: EnhanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: None,
        })
    }

    /// Stop between stages once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Borrow the tunables.
    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    // -- Enhancement ----------------------------------------------------------

    /// Enhance an RGBA image. The result has the same dimensions and is
    /// fully opaque.
    #[instrument(skip(self, source), fields(width = source.width(), height = source.height(), mode = %mode))]
    pub fn enhance(&self, source: &RgbaImage, mode: EnhanceMode) -> Result<RgbaImage> {
        let (width, height) = source.dimensions();
        self.enhance_raw(width, height, source.as_raw(), mode)
    }

    /// Enhance tightly packed RGBA8888 bytes.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len(), mode = %mode))]
    pub fn enhance_rgba_bytes(
        &self,
        width: u32,
        height: u32,
        bytes: &[u8],
        mode: EnhanceMode,
    ) -> Result<RgbaImage> {
        self.enhance_raw(width, height, bytes, mode)
    }

    fn enhance_raw(
        &self,
        width: u32,
        height: u32,
        bytes: &[u8],
        mode: EnhanceMode,
    ) -> Result<RgbaImage> {
        ScanError::check_dimensions(width, height, 4, bytes.len())?;
        info!(width, height, mode = %mode, "Running enhancement pipeline");
        let started = Instant::now();

        let result = if mode == EnhanceMode::Original {
            self.checkpoint()?;
            opaque_copy(width, height, bytes)?
        } else {
            let gray = self.stage("luminance", || luminance_from_rgba_bytes(width, height, bytes))??;
            self.enhance_luma(gray, mode)?.to_rgba_image()
        };

        info!(
            mode = %mode,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Enhancement complete"
        );
        Ok(result)
    }

    /// Run the intensity stages of `mode` over an existing luminance buffer.
    ///
    /// `Original` returns the buffer unchanged.
    pub fn enhance_luma(&self, gray: PixelBuffer, mode: EnhanceMode) -> Result<PixelBuffer> {
        match mode {
            EnhanceMode::Original => Ok(gray),
            EnhanceMode::Grayscale => self.grayscale(&gray),
            EnhanceMode::BwDocument => self.bw_document(&gray),
            EnhanceMode::Sharpen => self.sharpen(&gray),
            EnhanceMode::SuperClear => self.super_clear(&gray),
        }
    }

    // -- Pipelines ------------------------------------------------------------

    fn grayscale(&self, gray: &PixelBuffer) -> Result<PixelBuffer> {
        let denoised = self.stage("denoise", || gaussian_blur(gray))?;
        self.stage("contrast", || {
            stretch_contrast(
                &denoised,
                self.config.contrast_headroom,
                self.config.grayscale_gamma,
            )
        })
    }

    fn bw_document(&self, gray: &PixelBuffer) -> Result<PixelBuffer> {
        let denoised = self.stage("denoise", || gaussian_blur(gray))?;
        let radius = self.config.window_radius(gray.width(), gray.height());
        self.stage("threshold", || {
            binarize_document(
                &denoised,
                radius,
                self.config.document_sensitivity,
                self.config.document_cleanup_neighbors,
            )
        })
    }

    fn sharpen(&self, gray: &PixelBuffer) -> Result<PixelBuffer> {
        let denoised = self.stage("denoise", || gaussian_blur(gray))?;
        let enhanced = self.stage("contrast", || {
            stretch_contrast(
                &denoised,
                self.config.contrast_headroom,
                self.config.sharpen_gamma,
            )
        })?;
        drop(denoised);
        let mask = UnsharpMask::new(self.config.sharpen_amount, self.config.sharpen_threshold);
        self.stage("unsharp", || mask.apply(&enhanced))
    }

    fn super_clear(&self, gray: &PixelBuffer) -> Result<PixelBuffer> {
        let first = self.stage("denoise", || gaussian_blur(gray))?;
        let denoised = self.stage("denoise", || gaussian_blur(&first))?;
        drop(first);
        let radius = self.config.window_radius(gray.width(), gray.height());
        let cleaned = self.stage("threshold", || {
            binarize_document(
                &denoised,
                radius,
                self.config.super_clear_sensitivity,
                self.config.super_clear_cleanup_neighbors,
            )
        })?;
        drop(denoised);
        let mask = UnsharpMask::binary(
            self.config.super_clear_amount,
            self.config.super_clear_threshold,
        );
        self.stage("unsharp", || mask.apply(&cleaned))
    }

    /// Check for cancellation, then run one stage and log its duration.
    fn stage<T>(&self, name: &'static str, run: impl FnOnce() -> T) -> Result<T> {
        self.checkpoint()?;
        let started = Instant::now();
        let out = run();
        debug!(
            stage = name,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Stage complete"
        );
        Ok(out)
    }

    fn checkpoint(&self) -> Result<()> {
        match &self.cancel {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    // -- Preview and export ---------------------------------------------------

    /// Decode a photo, rescale its longer side to the preview size, and
    /// enhance it.
    #[instrument(skip(self, data), fields(data_len = data.len(), mode = %mode))]
    pub fn preview(&self, data: &[u8], mode: EnhanceMode) -> Result<RgbaImage> {
        let processor = ImageProcessor::from_bytes(data)?
            .scale_to_max_side(self.config.preview_max_side)
            .enhance(self, mode)?;
        Ok(processor.to_rgba())
    }

    /// Enhance every photo at full resolution and lay them out one per page
    /// in a PDF.
    ///
    /// Each page is encoded with the mode's output format before embedding
    /// and keeps that compression inside the PDF: binary modes stay lossless,
    /// tonal modes are stored as JPEG.
    #[instrument(skip(self, photos), fields(pages = photos.len(), mode = %mode))]
    pub fn scan_to_pdf<B: AsRef<[u8]>>(&self, photos: &[B], mode: EnhanceMode) -> Result<Vec<u8>> {
        if photos.is_empty() {
            return Err(ScanError::NoPages);
        }
        info!(pages = photos.len(), mode = %mode, "Converting scans to PDF");

        let format = mode.output_format(self.config.jpeg_quality);
        let mut encoded = Vec::with_capacity(photos.len());
        for (index, photo) in photos.iter().enumerate() {
            let page = ImageProcessor::from_bytes(photo.as_ref())?.enhance(self, mode)?;
            let bytes = page.encode(format)?;
            debug!(page = index + 1, encoded_len = bytes.len(), "Page encoded");
            encoded.push(bytes);
        }

        let mut writer = ScanPdfWriter::new(self.config.paper_size);
        writer.set_margin_pt(self.config.page_margin_pt);
        writer.set_title("Scanclear Scan");
        writer.set_page_format(format);
        writer.create_from_pages(&encoded)
    }
}

/// Enhance `image` with the stock tunables.
pub fn enhance(image: &RgbaImage, mode: EnhanceMode) -> Result<RgbaImage> {
    ScanEnhancer::default().enhance(image, mode)
}

/// Copy RGBA bytes with alpha forced to 255.
fn opaque_copy(width: u32, height: u32, bytes: &[u8]) -> Result<RgbaImage> {
    let mut data = bytes.to_vec();
    for px in data.chunks_exact_mut(4) {
        px[3] = 255;
    }
    RgbaImage::from_raw(width, height, data).ok_or(ScanError::InvalidDimensions {
        width,
        height,
        expected: width as usize * height as usize * 4,
        actual: bytes.len(),
    })
}

// -- Tests --------------------------------------------------------------------
