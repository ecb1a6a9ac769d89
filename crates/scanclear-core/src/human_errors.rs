// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the host application's scan screen.
//
// The engine itself has no user-facing error surface; hosts call
// `humanize_error` to turn a `ScanError` into a heading, a suggestion, and a
// severity that drives presentation.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something outside the pipeline hiccuped; trying again may work.
    Transient,
    /// The user must do something (pick another photo, fix a setting).
    ActionRequired,
    /// Retrying the same input will fail the same way.
    Permanent,
    /// The user asked for this; not really an error.
    Informational,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the host may usefully retry without changing anything.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError`.
///
/// Enhancement is deterministic, so precondition and codec failures are never
/// retriable.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::InvalidDimensions { .. } | ScanError::EmptyImage { .. } => HumanError {
            message: "This photo couldn't be read as an image.".into(),
            suggestion: "The photo may be empty or damaged. Try taking the picture again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Cancelled => HumanError {
            message: "Enhancement was stopped.".into(),
            suggestion: "Choose an enhancement mode again when you're ready.".into(),
            retriable: false,
            severity: Severity::Informational,
        },

        ScanError::Worker(_) => HumanError {
            message: "Enhancing the page stopped unexpectedly.".into(),
            suggestion: "Try again. If this keeps happening, try a smaller photo.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::NoPages => HumanError {
            message: "There are no pages to save.".into(),
            suggestion: "Take or choose at least one photo first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "One of the enhancement settings isn't valid.".into(),
            suggestion: format!("Reset the enhancement settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "The app doesn't have permission to use that file.".into(),
                suggestion: "Check the file permissions, or try copying the file to a different location first.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        ScanError::Serialization(_) => HumanError {
            message: "The saved enhancement settings couldn't be read.".into(),
            suggestion: "Reset the enhancement settings to their defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_are_permanent() {
        let human = humanize_error(&ScanError::EmptyImage { width: 0, height: 0 });
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn cancellation_is_informational() {
        let human = humanize_error(&ScanError::Cancelled);
        assert_eq!(human.severity, Severity::Informational);
    }

    #[test]
    fn missing_file_asks_the_user_to_pick_again() {
        let err = ScanError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("choosing the file again"));
    }

    #[test]
    fn export_failures_point_at_the_input() {
        let empty = humanize_error(&ScanError::NoPages);
        assert_eq!(empty.severity, Severity::ActionRequired);

        let undecodable = humanize_error(&ScanError::ImageError("failed to decode page 2".into()));
        assert_eq!(undecodable.severity, Severity::Permanent);
        assert!(!undecodable.retriable);
    }

    #[test]
    fn config_detail_is_surfaced() {
        let human = humanize_error(&ScanError::InvalidConfig("jpeg_quality".into()));
        assert!(human.suggestion.contains("jpeg_quality"));
    }
}
