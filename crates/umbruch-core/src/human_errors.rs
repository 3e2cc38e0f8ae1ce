// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for embedding hosts.
//
// Scripting hosts surface conversion failures directly to end users, so
// every technical error maps to plain English with a concrete suggestion.
// The severity classes tell the host whether the fix lies in its own call
// sequence, the document, the build, or the environment.

use crate::error::UmbruchError;

/// Where the fix for an error lies, from the host's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The host called the API out of contract (wrong order, bad value).
    CallerMisuse,
    /// The input document is damaged, unsupported, or empty.
    BadDocument,
    /// The feature is not compiled into this build.
    MissingCapability,
    /// Filesystem or other environment trouble — may succeed on retry.
    Environment,
}

/// A plain-language error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the host (or its user) should try.
    pub suggestion: String,
    /// Severity class (drives host-side presentation and retry policy).
    pub severity: Severity,
}

/// Convert an `UmbruchError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &UmbruchError) -> HumanError {
    match err {
        // -- Caller misuse --
        UmbruchError::NotInitialized => HumanError {
            message: "The converter has not been started.".into(),
            suggestion: "Call init() before any other operation.".into(),
            severity: Severity::CallerMisuse,
        },

        UmbruchError::InvalidValue { field, reason } => HumanError {
            message: format!("The {field} setting was rejected."),
            suggestion: format!("Check the value and try again. ({reason})"),
            severity: Severity::CallerMisuse,
        },

        UmbruchError::InvalidArgument(detail) => HumanError {
            message: "An argument to this call was rejected.".into(),
            suggestion: format!("Check the call's arguments. ({detail})"),
            severity: Severity::CallerMisuse,
        },

        UmbruchError::UnknownDevice(name) => HumanError {
            message: format!("No device called {name:?} is known."),
            suggestion: "Pick a device from the profile table, or set width and \
                         height directly."
                .into(),
            severity: Severity::CallerMisuse,
        },

        UmbruchError::NotImplemented(what) => HumanError {
            message: format!("{what} is not available in this version."),
            suggestion: "This part of the interface is reserved for a future \
                         release."
                .into(),
            severity: Severity::CallerMisuse,
        },

        // -- Missing capability --
        UmbruchError::OcrUnavailable => HumanError {
            message: "Text recognition is not included in this build.".into(),
            suggestion: "Use a build with the \"ocr\" feature enabled, or \
                         convert without OCR."
                .into(),
            severity: Severity::MissingCapability,
        },

        // -- Bad document --
        UmbruchError::DocumentUnreadable(detail) => HumanError {
            message: "This document could not be read.".into(),
            suggestion: format!(
                "The file may be damaged or in an unsupported format. ({detail})"
            ),
            severity: Severity::BadDocument,
        },

        UmbruchError::ConversionFailed(detail) => HumanError {
            message: "The conversion did not produce a usable document.".into(),
            suggestion: format!(
                "Check the page range and the input file, then try again. ({detail})"
            ),
            severity: Severity::BadDocument,
        },

        UmbruchError::PdfError(detail) => HumanError {
            message: "There is a problem with this PDF file.".into(),
            suggestion: format!("The file may be damaged. ({detail})"),
            severity: Severity::BadDocument,
        },

        UmbruchError::ImageError(detail) => HumanError {
            message: "There is a problem with this image.".into(),
            suggestion: format!(
                "Try re-saving the image as JPEG or PNG first. ({detail})"
            ),
            severity: Severity::BadDocument,
        },

        UmbruchError::PageRange(detail) => HumanError {
            message: "The page selection does not match this document.".into(),
            suggestion: format!(
                "Use selectors like \"1-10\" or \"1,3,5\" within the document's \
                 page count. ({detail})"
            ),
            severity: Severity::BadDocument,
        },

        UmbruchError::OcrError(detail) => HumanError {
            message: "Text recognition failed on this document.".into(),
            suggestion: format!(
                "Check that the OCR model files are present and readable. ({detail})"
            ),
            severity: Severity::Environment,
        },

        // -- Environment --
        UmbruchError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file could not be found.".into(),
                    suggestion: "Check the input and output paths.".into(),
                    severity: Severity::Environment,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Check permissions and free space, then try again."
                        .into(),
                    severity: Severity::Environment,
                }
            }
        }

        UmbruchError::Serialization(_) => HumanError {
            message: "An internal data problem occurred.".into(),
            suggestion: "Try again; report this if it persists.".into(),
            severity: Severity::Environment,
        },
    }
}
