// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Umbruch.

use thiserror::Error;

/// Top-level error type for all Umbruch operations.
#[derive(Debug, Error)]
pub enum UmbruchError {
    // -- Session lifecycle --
    #[error("session not initialized — call init() first")]
    NotInitialized,

    // -- Configuration staging --
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown device profile: {0:?}")]
    UnknownDevice(String),

    #[error("OCR support is not compiled into this build")]
    OcrUnavailable,

    #[error("{0} is not implemented in this version")]
    NotImplemented(&'static str),

    // -- Conversion --
    #[error("conversion failed: {0}")]
    ConversionFailed(String),

    #[error("document unreadable: {0}")]
    DocumentUnreadable(String),

    // -- Engine internals (surface as ConversionFailed / DocumentUnreadable
    //    at the session layer) --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("bad page range: {0}")]
    PageRange(String),

    // -- Environment --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UmbruchError>;
