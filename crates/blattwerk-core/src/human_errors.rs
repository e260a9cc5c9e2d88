// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the service boundary.
//
// Every engine error is mapped to plain English with a clear suggestion,
// so the surrounding service can show callers exactly which input to fix
// instead of a raw diagnostic.

use crate::error::BlattwerkError;

/// Severity of an error from the caller's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Transient internal failure — safe to retry unchanged.
    Transient,
    /// The caller must fix their input before retrying.
    ActionRequired,
    /// Cannot be fixed by retrying or changing parameters.
    Permanent,
}

/// A human-readable error with a plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the caller should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the identical request can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `BlattwerkError` into a `HumanError`.
pub fn humanize_error(err: &BlattwerkError) -> HumanError {
    match err {
        BlattwerkError::InvalidParameter(detail) => HumanError {
            message: "One of the conversion settings is out of range.".into(),
            suggestion: format!("Adjust the named parameter and resubmit. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::EmptyInput(detail) => HumanError {
            message: "An uploaded file was empty.".into(),
            suggestion: format!("Re-export the document and upload it again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::MalformedFrameList(_) | BlattwerkError::InvalidFrameFields { .. } => {
            HumanError {
                message: "The crop frame list could not be read.".into(),
                suggestion: "Send frames as a JSON array of objects with integer \
                             page, x, y, width, and height fields."
                    .into(),
                retriable: false,
                severity: Severity::ActionRequired,
            }
        }

        BlattwerkError::FrameOutOfRange { index, page, .. } => HumanError {
            message: format!("Crop frame #{index} points at page {page}, which doesn't exist."),
            suggestion: "Check that every frame's page index is within the document.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::SkippedFrames { skipped, total, .. } => HumanError {
            message: format!("{skipped} of {total} crop frames fell outside their pages."),
            suggestion: "Nothing was produced so no content would be silently lost. \
                         Re-draw the listed frames — and check that the client and \
                         server render pages at the same DPI."
                .into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::NoValidFrames => HumanError {
            message: "None of the crop frames produced a usable region.".into(),
            suggestion: "Draw at least one frame that overlaps a page.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::MalformedDocument(_) | BlattwerkError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it on a computer first \
                         to check it works, or try a different file."
                .into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BlattwerkError::ImageError(_) | BlattwerkError::RasterError(_) => HumanError {
            message: "A page image could not be produced.".into(),
            suggestion: "The document may use features the renderer doesn't support. \
                         Try re-exporting it as a standard PDF."
                .into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BlattwerkError::Processing(detail) => HumanError {
            message: "Processing failed unexpectedly.".into(),
            suggestion: format!("This is usually transient — try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        BlattwerkError::Io(_) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: "Check disk space and permissions, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BlattwerkError::Serialization(_) => HumanError {
            message: "A request field could not be decoded.".into(),
            suggestion: "Check that all JSON fields have the expected types.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
