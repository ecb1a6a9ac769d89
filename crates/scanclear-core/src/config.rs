// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancement tunables.
//
// The defaults reproduce the stock pipelines exactly. The window radius policy
// and the cleanup neighbour counts were picked empirically; they are exposed
// here so they can be tuned without touching the kernels.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScanError};
use crate::types::PaperSize;

/// Persistent enhancement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Local-mean window radius is `min(width, height) / window_divisor`...
    pub window_divisor: u32,
    /// ...clamped to at least this many pixels...
    pub min_window_radius: u32,
    /// ...and at most this many.
    pub max_window_radius: u32,
    /// Fraction of the observed dynamic range clipped at each end before
    /// contrast stretching.
    pub contrast_headroom: f32,
    /// Gamma applied by the Grayscale pipeline.
    pub grayscale_gamma: f64,
    /// Gamma applied by the Sharpen pipeline before unsharp masking.
    pub sharpen_gamma: f64,
    /// Unsharp mask strength for the Sharpen pipeline.
    pub sharpen_amount: f32,
    /// Minimum |original - blurred| difference the Sharpen pipeline amplifies.
    pub sharpen_threshold: u8,
    /// Adaptive threshold sensitivity `C` for B/W Document.
    pub document_sensitivity: f32,
    /// Opposite-neighbour count that flips a pixel in B/W Document cleanup.
    pub document_cleanup_neighbors: u8,
    /// Adaptive threshold sensitivity `C` for Super Clear.
    pub super_clear_sensitivity: f32,
    /// Opposite-neighbour count that flips a pixel in Super Clear cleanup.
    pub super_clear_cleanup_neighbors: u8,
    /// Unsharp mask strength for Super Clear's final stage.
    pub super_clear_amount: f32,
    /// Minimum difference Super Clear's final stage amplifies.
    pub super_clear_threshold: u8,
    /// Longest side of a preview image, in pixels.
    pub preview_max_side: u32,
    /// JPEG quality used for tonal (non-binary) output.
    pub jpeg_quality: u8,
    /// Paper size for scan-to-PDF output.
    pub paper_size: PaperSize,
    /// Page margin in points on every side of a PDF page.
    pub page_margin_pt: f32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            window_divisor: 8,
            min_window_radius: 15,
            max_window_radius: 80,
            contrast_headroom: 0.02,
            grayscale_gamma: 0.7,
            sharpen_gamma: 0.75,
            sharpen_amount: 1.8,
            sharpen_threshold: 4,
            document_sensitivity: 0.08,
            document_cleanup_neighbors: 6,
            super_clear_sensitivity: 0.06,
            super_clear_cleanup_neighbors: 7,
            super_clear_amount: 1.5,
            super_clear_threshold: 2,
            preview_max_side: 1200,
            jpeg_quality: 98,
            paper_size: PaperSize::A4,
            page_margin_pt: 36.0,
        }
    }
}

impl EnhanceConfig {
    /// Box-blur radius for an image of the given size.
    pub fn window_radius(&self, width: u32, height: u32) -> u32 {
        (width.min(height) / self.window_divisor.max(1))
            .clamp(self.min_window_radius, self.max_window_radius)
    }

    /// Reject settings the kernels cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.window_divisor == 0 {
            return Err(invalid("window_divisor must be at least 1"));
        }
        if self.min_window_radius > self.max_window_radius {
            return Err(invalid(format!(
                "min_window_radius {} exceeds max_window_radius {}",
                self.min_window_radius, self.max_window_radius
            )));
        }
        if !(0.0..0.5).contains(&self.contrast_headroom) {
            return Err(invalid("contrast_headroom must be in [0, 0.5)"));
        }
        for (name, gamma) in [
            ("grayscale_gamma", self.grayscale_gamma),
            ("sharpen_gamma", self.sharpen_gamma),
        ] {
            if !(gamma.is_finite() && gamma > 0.0) {
                return Err(invalid(format!("{name} must be a positive number")));
            }
        }
        for (name, amount) in [
            ("sharpen_amount", self.sharpen_amount),
            ("super_clear_amount", self.super_clear_amount),
        ] {
            if !(amount.is_finite() && amount >= 0.0) {
                return Err(invalid(format!("{name} must be non-negative")));
            }
        }
        for (name, c) in [
            ("document_sensitivity", self.document_sensitivity),
            ("super_clear_sensitivity", self.super_clear_sensitivity),
        ] {
            if !(0.0..1.0).contains(&c) {
                return Err(invalid(format!("{name} must be in [0, 1)")));
            }
        }
        for (name, neighbors) in [
            ("document_cleanup_neighbors", self.document_cleanup_neighbors),
            ("super_clear_cleanup_neighbors", self.super_clear_cleanup_neighbors),
        ] {
            if neighbors == 0 || neighbors > 8 {
                return Err(invalid(format!("{name} must be in 1..=8")));
            }
        }
        if self.preview_max_side == 0 {
            return Err(invalid("preview_max_side must be at least 1"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(invalid("jpeg_quality must be in 1..=100"));
        }
        if !(self.page_margin_pt.is_finite() && self.page_margin_pt >= 0.0) {
            return Err(invalid("page_margin_pt must be non-negative"));
        }
        Ok(())
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.display(), "Enhancement config loaded");
        Ok(config)
    }

    /// Load settings from `path`, falling back to the defaults if the file is
    /// absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No enhancement config found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write settings to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ScanError {
    ScanError::InvalidConfig(msg.into())
}
