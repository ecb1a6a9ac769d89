// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode photos, shrink them for preview, run an
// enhancement, and encode the result as PNG or JPEG. Operates on in-memory
// images using the `image` crate.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use scanclear_core::error::{Result, ScanError};
use scanclear_core::{EnhanceMode, OutputFormat};
use tracing::{debug, info, instrument};

use crate::scan::enhance::ScanEnhancer;

/// Image handling around the enhancement engine for a single page.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::open("receipt.jpg")?
///     .scale_to_max_side(1200)
///     .enhance(&enhancer, EnhanceMode::Sharpen)?
///     .encode(OutputFormat::Jpeg { quality: 98 })?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ScanError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(
            width = img.width(),
            height = img.height(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            ScanError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Convert the current image to RGBA8.
    pub fn to_rgba(&self) -> RgbaImage {
        self.image.to_rgba8()
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Rescale the image so that its longer side is exactly `max_side`,
    /// preserving aspect ratio with bilinear filtering. Small photos are
    /// enlarged, so the enhancement window sees the same geometry whatever
    /// the source resolution.
    #[instrument(skip(self), fields(max_side))]
    pub fn scale_to_max_side(self, max_side: u32) -> Self {
        let (w, h) = (self.image.width(), self.image.height());
        let longest = w.max(h);
        if longest == 0 || max_side == 0 {
            return self;
        }

        let scale = max_side as f32 / longest as f32;
        let new_w = ((w as f32 * scale) as u32).max(1);
        let new_h = ((h as f32 * scale) as u32).max(1);
        if (new_w, new_h) == (w, h) {
            return self;
        }
        info!(from_w = w, from_h = h, new_w, new_h, "Rescaling for preview");

        Self {
            image: self.image.resize_exact(new_w, new_h, FilterType::Triangle),
        }
    }

    /// Run an enhancement pipeline over the image.
    pub fn enhance(self, enhancer: &ScanEnhancer, mode: EnhanceMode) -> Result<Self> {
        let rgba = self.image.to_rgba8();
        let enhanced = enhancer.enhance(&rgba, mode)?;
        Ok(Self {
            image: DynamicImage::ImageRgba8(enhanced),
        })
    }

    // -- Output ---------------------------------------------------------------

    /// Encode in the given output format.
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => self.to_png_bytes(),
            OutputFormat::Jpeg { quality } => self.to_jpeg_bytes(quality),
        }
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder).map_err(|err| {
            ScanError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let rgb;
        // JPEG has no alpha channel.
        let image = match ImageFormat::from_path(path.as_ref()) {
            Ok(ImageFormat::Jpeg) => {
                rgb = DynamicImage::ImageRgb8(self.image.to_rgb8());
                &rgb
            }
            _ => &self.image,
        };
        image.save(path.as_ref()).map_err(|err| {
            ScanError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        ScanError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}
