// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanclear.

use thiserror::Error;

/// Top-level error type for all Scanclear operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Precondition errors --
    #[error("buffer length {actual} does not match {width}x{height} (expected {expected})")]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    // -- Pipeline control --
    #[error("enhancement cancelled")]
    Cancelled,

    #[error("background enhancement task failed: {0}")]
    Worker(String),

    // -- Codec / document errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("no pages to export")]
    NoPages,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    /// Check that a `width` x `height` image is non-empty and that a buffer
    /// holding `channels` bytes per pixel has exactly `actual` bytes.
    pub fn check_dimensions(width: u32, height: u32, channels: usize, actual: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Self::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * channels;
        if expected != actual {
            return Err(Self::InvalidDimensions {
                width,
                height,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_is_empty_image() {
        let err = ScanError::check_dimensions(0, 10, 1, 0).unwrap_err();
        assert!(matches!(err, ScanError::EmptyImage { width: 0, height: 10 }));
    }

    #[test]
    fn zero_size_wins_over_length_mismatch() {
        let err = ScanError::check_dimensions(5, 0, 4, 17).unwrap_err();
        assert!(matches!(err, ScanError::EmptyImage { .. }));
    }

    #[test]
    fn length_mismatch_reports_expected_and_actual() {
        let err = ScanError::check_dimensions(4, 3, 4, 40).unwrap_err();
        match err {
            ScanError::InvalidDimensions { expected, actual, .. } => {
                assert_eq!(expected, 48);
                assert_eq!(actual, 40);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn matching_length_passes() {
        assert!(ScanError::check_dimensions(4, 3, 1, 12).is_ok());
        assert!(ScanError::check_dimensions(4, 3, 4, 48).is_ok());
    }

    #[test]
    fn display_messages_are_lowercase_sentences() {
        let msg = ScanError::EmptyImage { width: 0, height: 0 }.to_string();
        assert_eq!(msg, "image has no pixels (0x0)");
        assert_eq!(ScanError::Cancelled.to_string(), "enhancement cancelled");
    }
}
