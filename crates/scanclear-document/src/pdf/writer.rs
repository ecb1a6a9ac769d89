// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — lay out scanned page images one per page using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use printpdf::{
    ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use scanclear_core::{OutputFormat, PaperSize};
use scanclear_core::error::{Result, ScanError};
use tracing::{debug, info, instrument};

/// Images are embedded at 72 DPI so that one pixel is one point before scaling.
const PAGE_DPI: f32 = 72.0;

/// Builds a PDF with one scanned image per page.
pub struct ScanPdfWriter {
    /// Paper size for every page.
    paper_size: PaperSize,
    /// Blank border on each side of the image, in points.
    margin_pt: f32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    /// How page pixels are compressed inside the PDF.
    page_format: OutputFormat,
}

/// Where an image lands on a page, in points from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub width: f32,
    pub height: f32,
}

impl ScanPdfWriter {
    /// Create a new writer targeting the given paper size with 36 pt margins.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            margin_pt: 36.0,
            title: None,
            page_format: OutputFormat::Png,
        }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Set the paper size.
    pub fn set_paper_size(&mut self, paper_size: PaperSize) {
        self.paper_size = paper_size;
    }

    /// Set the margin kept clear on every side of the page.
    pub fn set_margin_pt(&mut self, margin_pt: f32) {
        self.margin_pt = margin_pt.max(0.0);
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Choose the stream filter for embedded pages: lossless Flate for
    /// [`OutputFormat::Png`], DCT at the given quality for
    /// [`OutputFormat::Jpeg`].
    pub fn set_page_format(&mut self, format: OutputFormat) {
        self.page_format = format;
    }

    /// Save options that keep every page at its full pixel size.
    ///
    /// printpdf's defaults resize images above 2 MB and re-detect colour
    /// spaces, which would blur binarized pages.
    fn save_options(&self) -> PdfSaveOptions {
        let (format, quality) = match self.page_format {
            OutputFormat::Png => (ImageCompression::Flate, None),
            OutputFormat::Jpeg { quality } => {
                (ImageCompression::Jpeg, Some(f32::from(quality) / 100.0))
            }
        };
        PdfSaveOptions {
            image_optimization: Some(ImageOptimizationOptions {
                quality,
                max_image_size: None,
                dither_greyscale: None,
                convert_to_greyscale: None,
                auto_optimize: Some(false),
                format: Some(format),
            }),
            ..PdfSaveOptions::default()
        }
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Compute where a `img_width` x `img_height` pixel image goes on a page.
    ///
    /// The image is scaled uniformly to fill the area inside the margins as
    /// far as its aspect ratio allows (small scans are enlarged) and anchored
    /// to the top-left corner of that area.
    pub fn placement(&self, img_width: u32, img_height: u32) -> Placement {
        let (page_w, page_h) = self.page_dimensions();
        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        let usable_w = (page_w_pt - 2.0 * self.margin_pt).max(1.0);
        let usable_h = (page_h_pt - 2.0 * self.margin_pt).max(1.0);

        let scale = (usable_w / img_width.max(1) as f32).min(usable_h / img_height.max(1) as f32);
        let width = img_width as f32 * scale;
        let height = img_height as f32 * scale;

        Placement {
            x: self.margin_pt,
            y: page_h_pt - self.margin_pt - height,
            scale,
            width,
            height,
        }
    }

    // -- Pages to PDF ---------------------------------------------------------

    /// Create a PDF with one page per encoded image (PNG, JPEG, ...).
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn create_from_pages<B: AsRef<[u8]>>(&self, pages: &[B]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ScanError::NoPages);
        }

        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Scanclear Scan");
        info!(
            paper = ?self.paper_size,
            format = ?self.page_format,
            title,
            pages = pages.len(),
            "Creating scan PDF"
        );

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages = Vec::with_capacity(pages.len());

        for (index, image_bytes) in pages.iter().enumerate() {
            // Decode the image to get its dimensions and pixel data.
            let dynamic_image = ::image::load_from_memory(image_bytes.as_ref()).map_err(|err| {
                ScanError::ImageError(format!(
                    "failed to decode page {} for PDF: {}",
                    index + 1,
                    err
                ))
            })?;

            let img_width = dynamic_image.width();
            let img_height = dynamic_image.height();

            // Convert to RGB8 for printpdf.
            let rgb_image = dynamic_image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width as usize,
                height: img_height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let placement = self.placement(img_width, img_height);
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(placement.x)),
                    translate_y: Some(Pt(placement.y)),
                    scale_x: Some(placement.scale),
                    scale_y: Some(placement.scale),
                    dpi: Some(PAGE_DPI),
                    rotate: None,
                },
            }];

            debug!(
                page = index + 1,
                img_width,
                img_height,
                scale = placement.scale,
                "Image placed on page"
            );
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&self.save_options(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "PDF serialised with warnings");
        }

        Ok(output)
    }

    // -- File output convenience ----------------------------------------------

    /// Create a scan PDF and write it directly to a file.
    pub fn write_pages_to_file<B: AsRef<[u8]>>(
        &self,
        pages: &[B],
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.create_from_pages(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote scan PDF to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::processor::ImageProcessor;
    use image::{DynamicImage, Luma, GrayImage};

    fn png_page(width: u32, height: u32) -> Vec<u8> {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 { Luma([0]) } else { Luma([255]) }
        });
        ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img))
            .to_png_bytes()
            .unwrap()
    }

    /// Every image XObject in `bytes` as (width, height, filter, pixels).
    fn embedded_images(bytes: &[u8]) -> Vec<(i64, i64, Vec<u8>, Vec<u8>)> {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        doc.objects
            .values()
            .filter_map(|object| match object {
                lopdf::Object::Stream(stream) => Some(stream),
                _ => None,
            })
            .filter(|stream| {
                stream.dict.get(b"Subtype").and_then(|s| s.as_name()).ok() == Some(&b"Image"[..])
            })
            .map(|stream| {
                let width = stream.dict.get(b"Width").unwrap().as_i64().unwrap();
                let height = stream.dict.get(b"Height").unwrap().as_i64().unwrap();
                let filter = stream
                    .dict
                    .get(b"Filter")
                    .and_then(|f| f.as_name())
                    .map(|f| f.to_vec())
                    .unwrap_or_default();
                let pixels = if filter == b"DCTDecode" {
                    Vec::new()
                } else {
                    stream.get_plain_content().unwrap()
                };
                (width, height, filter, pixels)
            })
            .collect()
    }

    fn a4_pt() -> (f32, f32) {
        (Mm(210.0).into_pt().0, Mm(297.0).into_pt().0)
    }

    #[test]
    fn placement_fits_width_of_portrait_page() {
        let writer = ScanPdfWriter::a4();
        let (page_w, page_h) = a4_pt();
        // A wide image is limited by the page width.
        let p = writer.placement(1000, 500);
        assert!((p.width - (page_w - 72.0)).abs() < 0.01, "{p:?}");
        assert!((p.height - p.width / 2.0).abs() < 0.01);
        assert_eq!(p.x, 36.0);
        // Top edge sits on the top margin.
        assert!((p.y + p.height - (page_h - 36.0)).abs() < 0.01);
    }

    #[test]
    fn placement_fits_height_of_tall_image() {
        let writer = ScanPdfWriter::a4();
        let (_, page_h) = a4_pt();
        let p = writer.placement(300, 3000);
        assert!((p.height - (page_h - 72.0)).abs() < 0.01, "{p:?}");
        assert!((p.y - 36.0).abs() < 0.01);
    }

    #[test]
    fn small_images_are_enlarged() {
        let writer = ScanPdfWriter::a4();
        let p = writer.placement(100, 100);
        assert!(p.scale > 1.0);
    }

    #[test]
    fn one_pdf_page_per_image() {
        let writer = ScanPdfWriter::a4();
        let pages = vec![png_page(64, 90), png_page(90, 64), png_page(32, 32)];
        let bytes = writer.create_from_pages(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn empty_page_list_is_rejected() {
        let writer = ScanPdfWriter::a4();
        let pages: Vec<Vec<u8>> = Vec::new();
        assert!(matches!(writer.create_from_pages(&pages), Err(ScanError::NoPages)));
    }

    #[test]
    fn undecodable_page_is_an_image_error() {
        let writer = ScanPdfWriter::a4();
        let pages = vec![png_page(16, 16), b"junk".to_vec()];
        match writer.create_from_pages(&pages) {
            Err(ScanError::ImageError(msg)) => assert!(msg.contains("page 2"), "{msg}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn large_pages_keep_full_resolution() {
        // 1000 x 800 RGB is 2.4 MB of raw pixels.
        let writer = ScanPdfWriter::a4();
        let bytes = writer.create_from_pages(&[png_page(1000, 800)]).unwrap();

        let images = embedded_images(&bytes);
        assert_eq!(images.len(), 1);
        let (width, height, filter, pixels) = &images[0];
        assert_eq!((*width, *height), (1000, 800));
        assert_eq!(filter.as_slice(), b"FlateDecode");
        assert_eq!(pixels.len(), 1000 * 800 * 3);
        assert!(pixels.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn jpeg_page_format_embeds_dct() {
        let mut writer = ScanPdfWriter::a4();
        writer.set_page_format(OutputFormat::Jpeg { quality: 98 });
        let bytes = writer.create_from_pages(&[png_page(64, 48)]).unwrap();

        let images = embedded_images(&bytes);
        assert_eq!(images.len(), 1);
        assert_eq!((images[0].0, images[0].1), (64, 48));
        assert_eq!(images[0].2.as_slice(), b"DCTDecode");
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        let mut writer = ScanPdfWriter::new(PaperSize::Letter);
        writer.set_title("Receipts");
        writer.write_pages_to_file(&[png_page(40, 60)], &path).unwrap();

        let doc = lopdf::Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
