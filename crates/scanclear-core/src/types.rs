// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanclear enhancement engine.

use serde::{Deserialize, Serialize};

/// Which enhancement pipeline runs over a scanned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhanceMode {
    /// Passthrough copy, no processing.
    Original,
    /// Denoise + contrast stretch with a brightening gamma.
    Grayscale,
    /// Denoise + adaptive threshold + isolated-pixel cleanup.
    #[default]
    BwDocument,
    /// Denoise + contrast stretch + unsharp mask.
    Sharpen,
    /// Two-pass denoise + adaptive threshold + cleanup + binary unsharp mask.
    SuperClear,
}

impl EnhanceMode {
    /// Every mode, in the order the host presents them.
    pub const ALL: [EnhanceMode; 5] = [
        Self::Original,
        Self::Grayscale,
        Self::BwDocument,
        Self::Sharpen,
        Self::SuperClear,
    ];

    /// Stable machine name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Grayscale => "grayscale",
            Self::BwDocument => "bw_document",
            Self::Sharpen => "sharpen",
            Self::SuperClear => "super_clear",
        }
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Grayscale => "Grayscale",
            Self::BwDocument => "B/W Document",
            Self::Sharpen => "Sharpen",
            Self::SuperClear => "Super Clear",
        }
    }

    /// One-line description of what the pipeline does.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Original => "no enhancement",
            Self::Grayscale => "grayscale + high contrast + denoise",
            Self::BwDocument => "adaptive threshold, closest to a flatbed scan",
            Self::Sharpen => "denoise + contrast + unsharp mask",
            Self::SuperClear => "denoise + adaptive threshold + unsharp mask",
        }
    }

    /// Whether the mode always produces pure black/white output.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::BwDocument | Self::SuperClear)
    }

    /// Encoding used when the enhanced page is written out.
    ///
    /// Binary output compresses well and must stay lossless, so it goes to
    /// PNG. Tonal output uses JPEG at `jpeg_quality`.
    pub fn output_format(&self, jpeg_quality: u8) -> OutputFormat {
        if self.is_binary() {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg {
                quality: jpeg_quality,
            }
        }
    }
}

impl std::fmt::Display for EnhanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnhanceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown enhance mode: {s}"))
    }
}

/// Encoded output format for an enhanced page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    /// Conventional file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Standard paper sizes for scan-to-PDF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}
